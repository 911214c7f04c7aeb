// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use tempfile::TempDir;
use tutorbook::application::LedgerService;
use tutorbook::storage::Store;

/// Helper to create a test service backed by a temporary directory.
pub fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = LedgerService::open(store_in(&temp_dir))?;
    Ok((service, temp_dir))
}

/// A store pointing at the standard file names inside the given directory.
/// Useful for reopening the same ledger a second time.
pub fn store_in(temp_dir: &TempDir) -> Store {
    Store::new(
        temp_dir.path().join("tutoring_data.txt"),
        temp_dir.path().join("tutoring_log.txt"),
    )
}

/// Helper to parse a date string into a NaiveDate.
pub fn date(date_str: &str) -> NaiveDate {
    date_str.parse().unwrap()
}

/// Test fixture: a couple of students with sessions and payments.
pub struct StandardStudents;

impl StandardStudents {
    pub fn create(service: &mut LedgerService) -> Result<()> {
        service.add_student("Alice", vec!["Math".into(), "English".into()])?;
        service.add_student("Bob", vec![])?;

        service.add_session("Alice", date("2024-01-01"), 20)?;
        service.add_session("Alice", date("2024-01-03"), 10)?;
        service.add_payment("Alice", date("2024-01-02"), 20)?;

        service.add_session("Bob", date("2024-02-01"), 15)?;
        Ok(())
    }
}
