use super::{LogLine, LogParser, ReaderError};
use encoding_rs::UTF_8;
use memchr::memchr_iter;
use memmap2::Mmap;
use rayon::prelude::*;
use std::fs;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read and parse a whole log file, returning its lines in file order.
///
/// Lines are decoded and parsed in parallel; the collected order always
/// matches the physical line order. Any line that is not valid UTF-8 fails
/// the whole file.
pub fn read_log_file<P: AsRef<Path>>(path: P) -> Result<Vec<LogLine>, ReaderError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|source| ReaderError::OpenFile {
        path: path.to_path_buf(),
        source,
    })?;

    let len = file
        .metadata()
        .map_err(|source| ReaderError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    if len == 0 {
        return Ok(Vec::new());
    }

    let mmap = unsafe { Mmap::map(&file) }.map_err(|source| ReaderError::MemoryMap {
        path: path.to_path_buf(),
        source,
    })?;
    let bytes = mmap.as_ref();
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    // (line_number, start, end) for every non-empty physical line
    let mut line_ranges: Vec<(u64, usize, usize)> = Vec::new();
    let mut start = 0;
    let mut line_number = 0u64;
    for newline in memchr_iter(b'\n', bytes) {
        line_number += 1;
        let end = trim_cr(bytes, start, newline);
        if end > start {
            line_ranges.push((line_number, start, end));
        }
        start = newline + 1;
    }
    if start < bytes.len() {
        let end = trim_cr(bytes, start, bytes.len());
        if end > start {
            line_ranges.push((line_number + 1, start, end));
        }
    }

    let parser = LogParser::new();
    let lines = line_ranges
        .par_iter()
        .map(|&(line_number, start, end)| -> Result<LogLine, ReaderError> {
            let line = UTF_8
                .decode_without_bom_handling_and_without_replacement(&bytes[start..end])
                .ok_or_else(|| ReaderError::Encoding {
                    path: path.to_path_buf(),
                    line_number,
                })?;
            Ok(parser.parse_line(line_number, &line))
        })
        .collect::<Result<Vec<LogLine>, ReaderError>>()?;

    tracing::debug!(path = %path.display(), lines = lines.len(), "Read log file");
    Ok(lines)
}

#[inline]
fn trim_cr(bytes: &[u8], start: usize, end: usize) -> usize {
    if end > start && bytes[end - 1] == b'\r' {
        end - 1
    } else {
        end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat_log::LogEvent;
    use std::io::Write;

    fn write_file(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_lines_in_order_with_physical_line_numbers() {
        let file = write_file(
            b"01|2022-05-12T20:10:00.0000000-04:00|3C8|Dragonsong's Reprise (Ultimate)|h\r\n\
              \r\n\
              33|2022-05-12T20:11:00.0000000-04:00|80037586|40000005|00|00|00|00|h\r\n\
              00|2022-05-12T20:12:00.0000000-04:00|0839||no newline",
        );

        let lines = read_log_file(file.path()).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].line_number, 1);
        assert!(matches!(lines[0].event, LogEvent::ChangeZone { .. }));
        assert_eq!(lines[1].line_number, 3);
        assert!(matches!(lines[1].event, LogEvent::Director { .. }));
        assert_eq!(lines[2].line_number, 4);
        assert_eq!(lines[2].event.type_code(), "00");
    }

    #[test]
    fn strips_byte_order_mark() {
        let file = write_file(b"\xEF\xBB\xBF01|2022-05-12T20:10:00.0000000-04:00|3C8|Zone|h\n");

        let lines = read_log_file(file.path()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].event.type_code(), "01");
    }

    #[test]
    fn empty_file_has_no_lines() {
        let file = write_file(b"");
        assert!(read_log_file(file.path()).unwrap().is_empty());
    }

    #[test]
    fn invalid_utf8_fails_file() {
        let file = write_file(b"01|2022-05-12T20:10:00|3C8|Zone|h\n21|\xFF\xFE|broken\n");

        let err = read_log_file(file.path()).unwrap_err();
        assert!(matches!(err, ReaderError::Encoding { line_number: 2, .. }));
    }

    #[test]
    fn missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_log_file(dir.path().join("missing.log")).unwrap_err();
        assert!(matches!(err, ReaderError::OpenFile { .. }));
    }
}
