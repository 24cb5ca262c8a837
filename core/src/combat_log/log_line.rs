use chrono::NaiveDateTime;
use std::sync::Arc;

/// Network log line type codes (field 0 of every line).
pub mod line_type {
    pub const CHANGE_ZONE: &str = "01";
    pub const NETWORK_ABILITY: &str = "21";
    pub const NETWORK_DIRECTOR: &str = "33";
}

/// Typed view of a log line's event-dependent fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// `01|ts|zoneId|zoneName|...`
    ChangeZone { zone_id: String, zone_name: String },
    /// `21|ts|sourceId|source|abilityId|ability|targetId|target|...`
    Ability {
        source_id: String,
        source_name: String,
        ability_id: String,
        ability_name: String,
        target_id: String,
        target_name: String,
    },
    /// `33|ts|instance|command|data0|...`
    Director { instance: String, command: String },
    /// Any other line type, or a known type with too few fields.
    Other { type_code: String },
}

impl LogEvent {
    pub fn type_code(&self) -> &str {
        match self {
            LogEvent::ChangeZone { .. } => line_type::CHANGE_ZONE,
            LogEvent::Ability { .. } => line_type::NETWORK_ABILITY,
            LogEvent::Director { .. } => line_type::NETWORK_DIRECTOR,
            LogEvent::Other { type_code } => type_code,
        }
    }
}

/// One physical line of a log file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    /// 1-based line number within the file
    pub line_number: u64,
    /// `None` when the timestamp field is missing or unparseable
    pub timestamp: Option<NaiveDateTime>,
    pub event: LogEvent,
}

/// The parsed contents of one log file, in line order.
#[derive(Debug, Clone)]
pub struct LogFile {
    /// 1-based position of the file in enumeration order
    pub file_index: u32,
    pub filename: Arc<str>,
    pub lines: Vec<LogLine>,
}

impl LogFile {
    /// Stamp every line with this file's provenance.
    pub fn into_sourced_lines(self) -> impl Iterator<Item = SourcedLine> {
        let file_index = self.file_index;
        let filename = self.filename;
        self.lines.into_iter().map(move |line| SourcedLine {
            file_index,
            source_file: Arc::clone(&filename),
            line,
        })
    }
}

/// A log line together with the file it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedLine {
    pub file_index: u32,
    pub source_file: Arc<str>,
    pub line: LogLine,
}
