use super::*;
use chrono::{NaiveDate, NaiveDateTime};
use memchr::memchr_iter;

#[cfg(test)]
mod tests;

/// Only the first 19 characters of the timestamp field are significant:
/// `YYYY-MM-DDTHH:MM:SS`. Fractional seconds and the offset are dropped.
const TIMESTAMP_LEN: usize = 19;

// minimum field counts (type code and timestamp included)
const CHANGE_ZONE_FIELDS: usize = 4;
const ABILITY_FIELDS: usize = 8;
const DIRECTOR_FIELDS: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct LogParser;

impl LogParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse one physical line. Never fails: lines that are too short for
    /// their type code come back as [`LogEvent::Other`].
    pub fn parse_line(&self, line_number: u64, line: &str) -> LogLine {
        let line = line.trim_end_matches(['\r', '\n']);
        let fields = split_fields(line);

        let timestamp = fields.get(1).and_then(|f| parse_timestamp(f));
        let event = parse_event(&fields);

        LogLine {
            line_number,
            timestamp,
            event,
        }
    }
}

fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::with_capacity(16);
    let mut start = 0;
    for pipe in memchr_iter(b'|', line.as_bytes()) {
        fields.push(&line[start..pipe]);
        start = pipe + 1;
    }
    fields.push(&line[start..]);
    fields
}

fn parse_event(fields: &[&str]) -> LogEvent {
    let type_code = fields.first().copied().unwrap_or_default();

    match type_code {
        line_type::CHANGE_ZONE if fields.len() >= CHANGE_ZONE_FIELDS => LogEvent::ChangeZone {
            zone_id: fields[2].to_string(),
            zone_name: fields[3].to_string(),
        },
        line_type::NETWORK_ABILITY if fields.len() >= ABILITY_FIELDS => LogEvent::Ability {
            source_id: fields[2].to_string(),
            source_name: fields[3].to_string(),
            ability_id: fields[4].to_string(),
            ability_name: fields[5].to_string(),
            target_id: fields[6].to_string(),
            target_name: fields[7].to_string(),
        },
        line_type::NETWORK_DIRECTOR if fields.len() >= DIRECTOR_FIELDS => LogEvent::Director {
            instance: fields[2].to_string(),
            command: fields[3].to_string(),
        },
        _ => LogEvent::Other {
            type_code: type_code.to_string(),
        },
    }
}

// parse YYYY-MM-DDTHH:MM:SS
pub(crate) fn parse_timestamp(segment: &str) -> Option<NaiveDateTime> {
    let b = segment.as_bytes();
    if b.len() < TIMESTAMP_LEN
        || b[4] != b'-'
        || b[7] != b'-'
        || b[10] != b'T'
        || b[13] != b':'
        || b[16] != b':'
    {
        return None;
    }

    let year = digits(&b[0..4])?;
    let month = digits(&b[5..7])?;
    let day = digits(&b[8..10])?;
    let hour = digits(&b[11..13])?;
    let minute = digits(&b[14..16])?;
    let second = digits(&b[17..19])?;

    NaiveDate::from_ymd_opt(year as i32, month, day)?.and_hms_opt(hour, minute, second)
}

#[inline]
fn digits(b: &[u8]) -> Option<u32> {
    b.iter().try_fold(0u32, |acc, &c| {
        c.is_ascii_digit().then(|| acc * 10 + u32::from(c - b'0'))
    })
}
