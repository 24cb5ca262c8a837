mod config;
mod error;
mod log_files;

pub use config::{APP_NAME, AppConfig, AppConfigExt, ChartConfig, CONFIG_NAME, PhaseStyle};
pub use error::{ConfigError, DirectoryError};
pub use log_files::{LogDirectory, LogFileEntry, parse_log_filename};
