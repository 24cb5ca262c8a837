//! Pull segmentation.
//!
//! Walks a stream of [`SourcedLine`](crate::combat_log::SourcedLine)s and
//! folds it into [`PullRecord`]s:
//! - `Idle`: waiting for an outside ability to land on the boss
//! - `InProgress`: a pull is running; phase gates advance, a zone re-entry
//!   throws the attempt away, a wipe closes it
//!
//! Wipes closing attempts shorter than the definition's minimum are dropped
//! as noise and consume no ordinal.

mod definition;
mod error;
mod segmenter;
pub mod summary;


pub use definition::{EncounterDefinition, MAX_MINIMUM_PULL_SECS, MAX_PHASE, MAX_PHASE_GATES};
pub use error::{DefinitionError, SegmentError};
pub use segmenter::{PullSegmenter, Pulls, segment};
pub use summary::PullSummary;

use chrono::{NaiveDateTime, TimeDelta};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EncounterState {
    #[default]
    Idle,
    InProgress {
        start_time: NaiveDateTime,
        /// Highest phase reached so far, starting at 1
        phase: u8,
    },
}

impl EncounterState {
    pub fn is_in_progress(&self) -> bool {
        matches!(self, EncounterState::InProgress { .. })
    }

    pub fn phase(&self) -> Option<u8> {
        match self {
            EncounterState::InProgress { phase, .. } => Some(*phase),
            EncounterState::Idle => None,
        }
    }
}

/// One qualifying attempt at the encounter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRecord {
    /// 1-based count of qualifying pulls
    pub ordinal: u32,
    pub duration: TimeDelta,
    pub final_phase: u8,
    /// 1-based index of the file holding the closing wipe
    pub file_index: u32,
    pub source_file: Arc<str>,
}

impl PullRecord {
    pub fn duration_secs(&self) -> f64 {
        self.duration.num_milliseconds() as f64 / 1000.0
    }

    /// Duration as `m:ss`
    pub fn formatted_duration(&self) -> String {
        let secs = self.duration.num_seconds().max(0);
        format!("{}:{:02}", secs / 60, secs % 60)
    }
}
