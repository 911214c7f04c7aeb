mod common;

use anyhow::Result;
use common::{StandardStudents, test_service};
use tutorbook::io::{Exporter, LedgerSnapshot, workbook_filename};

#[test]
fn test_workbook_export_writes_expected_sheet_count() -> Result<()> {
    let (mut service, temp) = test_service()?;
    StandardStudents::create(&mut service)?;

    let path = temp.path().join(workbook_filename("tutoring_"));
    let exporter = Exporter::new(&service);
    let sheets = exporter.export_workbook(&path)?;

    // Overview plus two sheets per student
    assert_eq!(sheets, 1 + 2 * service.students().len());
    let metadata = std::fs::metadata(&path)?;
    assert!(metadata.len() > 0);
    Ok(())
}

#[test]
fn test_workbook_export_empty_ledger_fails() -> Result<()> {
    let (service, temp) = test_service()?;
    let exporter = Exporter::new(&service);

    let result = exporter.export_workbook(&temp.path().join("empty.xlsx"));
    assert!(result.is_err());
    assert!(!temp.path().join("empty.xlsx").exists());
    Ok(())
}

#[test]
fn test_workbook_export_handles_long_student_names() -> Result<()> {
    let (mut service, temp) = test_service()?;
    service.add_student(&"A".repeat(40), vec!["Math".into()])?;
    service.add_session(&"A".repeat(40), common::date("2024-01-01"), 10)?;

    // Sheet names get clipped to Excel's limit instead of failing the export
    let path = temp.path().join("long.xlsx");
    Exporter::new(&service).export_workbook(&path)?;
    assert!(path.exists());
    Ok(())
}

#[test]
fn test_overview_csv_contents() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    StandardStudents::create(&mut service)?;

    let mut buf = Vec::new();
    let count = Exporter::new(&service).export_overview_csv(&mut buf)?;
    assert_eq!(count, 2);

    let text = String::from_utf8(buf)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        lines[0],
        "student,subjects,total_hours,paid_hours,remaining_hours"
    );
    assert_eq!(lines[1], "Alice,\"Math, English\",3.0,2.0,1.0");
    assert!(lines[2].starts_with("Bob,"));
    Ok(())
}

#[test]
fn test_sessions_csv_running_cumulative() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    StandardStudents::create(&mut service)?;

    let mut buf = Vec::new();
    Exporter::new(&service).export_sessions_csv(&mut buf, "Alice")?;

    let text = String::from_utf8(buf)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "date,hours,cumulative_hours");
    assert_eq!(lines[1], "2024-01-01,2.0,2.0");
    assert_eq!(lines[2], "2024-01-03,1.0,3.0");
    Ok(())
}

#[test]
fn test_payments_csv_running_cumulative() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    StandardStudents::create(&mut service)?;
    service.add_payment("Alice", common::date("2024-01-05"), 5)?;

    let mut buf = Vec::new();
    Exporter::new(&service).export_payments_csv(&mut buf, "Alice")?;

    let text = String::from_utf8(buf)?;
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[1], "2024-01-02,2.0,2.0");
    assert_eq!(lines[2], "2024-01-05,0.5,2.5");
    Ok(())
}

#[test]
fn test_json_snapshot_round_trips() -> Result<()> {
    let (mut service, _temp) = test_service()?;
    StandardStudents::create(&mut service)?;

    let mut buf = Vec::new();
    let snapshot = Exporter::new(&service).export_full_json(&mut buf)?;
    assert_eq!(snapshot.version, env!("CARGO_PKG_VERSION"));

    let parsed: LedgerSnapshot = serde_json::from_slice(&buf)?;
    assert_eq!(parsed.students, service.students());
    Ok(())
}
