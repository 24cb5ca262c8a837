pub mod commands;
pub mod logging;
pub mod report;

pub use commands::RunArgs;
