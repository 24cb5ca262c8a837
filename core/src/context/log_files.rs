use super::DirectoryError;
use crate::combat_log::{LogFile, ReaderError, read_log_file};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LogFileEntry {
    /// 1-based position in enumeration order
    pub file_index: u32,
    pub path: PathBuf,
    pub filename: String,
    /// Date encoded in ACT's `Network_<build>_<YYYYMMDD>.log` names
    pub date: Option<NaiveDate>,
    pub file_size: u64,
    pub is_empty: bool,
}

impl LogFileEntry {
    /// Read and parse this file.
    pub fn read(&self) -> Result<LogFile, ReaderError> {
        let lines = read_log_file(&self.path)?;
        Ok(LogFile {
            file_index: self.file_index,
            filename: Arc::from(self.filename.as_str()),
            lines,
        })
    }
}

/// The files of one log directory, in the order they are fed to segmentation.
#[derive(Debug, Default)]
pub struct LogDirectory {
    root: PathBuf,
    entries: Vec<LogFileEntry>,
}

impl LogDirectory {
    /// List the regular files of `dir`, sorted by file name.
    pub fn scan(dir: &Path) -> Result<Self, DirectoryError> {
        if !dir.is_dir() {
            return Err(DirectoryError::NotFound {
                path: dir.to_path_buf(),
            });
        }

        let read_dir = fs::read_dir(dir).map_err(|source| DirectoryError::ReadDir {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files: Vec<(String, PathBuf, u64)> = Vec::new();
        for entry in read_dir.filter_map(|e| e.ok()) {
            let path = entry.path();
            let metadata = fs::metadata(&path).map_err(|source| DirectoryError::Metadata {
                path: path.clone(),
                source,
            })?;
            if !metadata.is_file() {
                continue;
            }
            let Some(filename) = path.file_name().and_then(|f| f.to_str()) else {
                tracing::warn!(path = %path.display(), "Skipping file with non UTF-8 name");
                continue;
            };
            files.push((filename.to_string(), path, metadata.len()));
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));

        let entries = files
            .into_iter()
            .enumerate()
            .map(|(idx, (filename, path, file_size))| LogFileEntry {
                file_index: idx as u32 + 1,
                date: parse_log_filename(&filename),
                path,
                filename,
                file_size,
                is_empty: file_size == 0,
            })
            .collect();

        Ok(Self {
            root: dir.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn entries(&self) -> &[LogFileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get total size of all listed files in bytes
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|e| e.file_size).sum()
    }
}

pub fn parse_log_filename(filename: &str) -> Option<NaiveDate> {
    let stem = filename.strip_suffix(".log").unwrap_or(filename);
    let (_, date) = stem.rsplit_once('_')?;
    NaiveDate::parse_from_str(date, "%Y%m%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_sorts_by_name_and_numbers_from_one() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Network_26707_20220514.log"), "01|x\n").unwrap();
        fs::write(dir.path().join("Network_26707_20220512.log"), "").unwrap();
        fs::write(dir.path().join("Network_26707_20220513.log"), "01|x\n").unwrap();
        fs::create_dir(dir.path().join("archive")).unwrap();

        let index = LogDirectory::scan(dir.path()).unwrap();
        let names: Vec<_> = index.entries().iter().map(|e| e.filename.as_str()).collect();

        assert_eq!(
            names,
            vec![
                "Network_26707_20220512.log",
                "Network_26707_20220513.log",
                "Network_26707_20220514.log",
            ]
        );
        assert_eq!(index.entries()[0].file_index, 1);
        assert!(index.entries()[0].is_empty);
        assert_eq!(index.entries()[2].file_index, 3);
        assert_eq!(index.total_size(), 10);
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let index = LogDirectory::scan(dir.path()).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.len(), 0);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = LogDirectory::scan(&dir.path().join("logs")).unwrap_err();
        assert!(matches!(err, DirectoryError::NotFound { .. }));
    }

    #[test]
    fn entry_read_stamps_provenance() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Network_26707_20220512.log"),
            "33|2022-05-12T20:11:00.0000000-04:00|80037586|40000005|00|00|00|00|h\n",
        )
        .unwrap();

        let index = LogDirectory::scan(dir.path()).unwrap();
        let file = index.entries()[0].read().unwrap();
        assert_eq!(file.file_index, 1);
        assert_eq!(&*file.filename, "Network_26707_20220512.log");
        assert_eq!(file.lines.len(), 1);
    }

    #[test]
    fn parses_act_filename_dates() {
        assert_eq!(
            parse_log_filename("Network_26707_20220512.log"),
            NaiveDate::from_ymd_opt(2022, 5, 12)
        );
        assert_eq!(parse_log_filename("notes.txt"), None);
        assert_eq!(parse_log_filename("Network_26707_2022.log"), None);
    }
}
