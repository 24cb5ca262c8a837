pub mod combat_log;
pub mod context;
pub mod encounter;

// Re-exports for convenience
pub use combat_log::*;
pub use context::{AppConfig, AppConfigExt, ChartConfig, LogDirectory, LogFileEntry};
pub use encounter::{
    EncounterDefinition, EncounterState, PullRecord, PullSegmenter, PullSummary, SegmentError,
    segment,
};
