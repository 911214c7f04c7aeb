use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;

use crate::domain::Student;

use super::codec;

/// File-backed store for the ledger and its append-only audit log.
///
/// Files are opened, read or appended, and closed per call; no handles are
/// held between operations.
pub struct Store {
    data_path: PathBuf,
    audit_path: PathBuf,
}

impl Store {
    pub fn new(data_path: impl Into<PathBuf>, audit_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            audit_path: audit_path.into(),
        }
    }

    /// Load the full student list. A missing ledger file is an empty
    /// ledger, not an error.
    pub fn load(&self) -> Result<Vec<Student>> {
        if !self.data_path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.data_path)
            .with_context(|| format!("Failed to read {}", self.data_path.display()))?;
        Ok(codec::parse(&text))
    }

    /// Rewrite the ledger file with the full student list.
    pub fn save(&self, students: &[Student]) -> Result<()> {
        std::fs::write(&self.data_path, codec::serialize(students))
            .with_context(|| format!("Failed to write {}", self.data_path.display()))
    }

    /// Append one timestamped line to the audit log, best-effort. The log is
    /// write-only; nothing ever reads it back, and append failures are
    /// swallowed.
    pub fn append_audit(&self, message: &str) {
        let line = format!(
            "[{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            message
        );
        let _ = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.audit_path)
            .and_then(|mut f| f.write_all(line.as_bytes()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (Store, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = Store::new(
            dir.path().join("tutoring_data.txt"),
            dir.path().join("tutoring_log.txt"),
        );
        (store, dir)
    }

    #[test]
    fn test_load_missing_file_is_empty_ledger() {
        let (store, _dir) = temp_store();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let (store, _dir) = temp_store();
        let students =
            codec::parse("STUDENT:Alice\nSUBJECTS:Math\nRECORD:2024-01-01,2.0\nPAYMENT:2024-01-02,1.0\n");
        store.save(&students).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(students, loaded);
    }

    #[test]
    fn test_append_audit_writes_timestamped_lines() {
        let (store, dir) = temp_store();
        store.append_audit("first action");
        store.append_audit("second action");

        let log = std::fs::read_to_string(dir.path().join("tutoring_log.txt")).unwrap();
        let lines: Vec<&str> = log.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("first action"));
        assert!(lines[1].ends_with("second action"));
    }
}
