use std::io::Write;
use std::path::Path;

use anyhow::{Result, bail};
use chrono::{DateTime, Local};
use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};

use crate::application::LedgerService;
use crate::domain::{Student, format_hours};

/// Excel worksheet names are capped at 31 characters.
const MAX_SHEET_NAME: usize = 31;

/// Full-ledger snapshot for JSON export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Local>,
    pub students: Vec<Student>,
}

/// Exporter for converting ledger data to workbook, CSV, and JSON formats.
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export the whole ledger as an xlsx workbook: one overview sheet plus
    /// a session sheet and a payment sheet per student. Returns the number
    /// of sheets written.
    pub fn export_workbook(&self, path: &Path) -> Result<usize> {
        let students = self.service.students();
        if students.is_empty() {
            bail!("no students to export");
        }

        let mut workbook = Workbook::new();

        let overview = workbook.add_worksheet();
        overview.set_name("Overview")?;
        let headers = ["Student", "Subjects", "Total hours", "Paid hours", "Remaining hours"];
        for (col, header) in headers.iter().enumerate() {
            overview.write_string(0, col as u16, *header)?;
        }
        let mut row = 1;
        for summary in self.service.summaries() {
            overview.write_string(row, 0, &summary.name)?;
            overview.write_string(row, 1, summary.subjects.join(", "))?;
            overview.write_number(row, 2, summary.total_hours as f64 / 10.0)?;
            overview.write_number(row, 3, summary.total_paid as f64 / 10.0)?;
            overview.write_number(row, 4, summary.remaining_hours as f64 / 10.0)?;
            row += 1;
        }
        // Marker row recording when the export was taken
        overview.write_string(row, 0, "Exported at")?;
        overview.write_string(row, 2, Local::now().format("%Y-%m-%d %H:%M:%S").to_string())?;

        let mut sheets = 1;
        for student in students {
            let sessions = workbook.add_worksheet();
            sessions.set_name(sheet_name(&student.name, "Sessions"))?;
            sessions.write_string(0, 0, "Date")?;
            sessions.write_string(0, 1, "Hours")?;
            sessions.write_string(0, 2, "Cumulative hours")?;
            for (i, (session, cumulative)) in student.cumulative_sessions().iter().enumerate() {
                let row = (i + 1) as u32;
                sessions.write_string(row, 0, session.date.to_string())?;
                sessions.write_number(row, 1, session.duration as f64 / 10.0)?;
                sessions.write_number(row, 2, *cumulative as f64 / 10.0)?;
            }

            let payments = workbook.add_worksheet();
            payments.set_name(sheet_name(&student.name, "Payments"))?;
            payments.write_string(0, 0, "Date")?;
            payments.write_string(0, 1, "Hours")?;
            payments.write_string(0, 2, "Cumulative paid")?;
            for (i, (payment, cumulative)) in student.cumulative_payments().iter().enumerate() {
                let row = (i + 1) as u32;
                payments.write_string(row, 0, payment.date.to_string())?;
                payments.write_number(row, 1, payment.hours as f64 / 10.0)?;
                payments.write_number(row, 2, *cumulative as f64 / 10.0)?;
            }

            sheets += 2;
        }

        workbook.save(path)?;
        Ok(sheets)
    }

    /// Export the overview sheet as CSV.
    pub fn export_overview_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record([
            "student",
            "subjects",
            "total_hours",
            "paid_hours",
            "remaining_hours",
        ])?;

        let mut count = 0;
        for summary in self.service.summaries() {
            csv_writer.write_record([
                summary.name.as_str(),
                &summary.subjects.join(", "),
                &format_hours(summary.total_hours),
                &format_hours(summary.total_paid),
                &format_hours(summary.remaining_hours),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export one student's session log as CSV, with the running cumulative.
    pub fn export_sessions_csv<W: Write>(&self, writer: W, name: &str) -> Result<usize> {
        let student = self.service.student(name)?;
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["date", "hours", "cumulative_hours"])?;

        let mut count = 0;
        for (session, cumulative) in student.cumulative_sessions() {
            csv_writer.write_record([
                &session.date.to_string(),
                &format_hours(session.duration),
                &format_hours(cumulative),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export one student's payment log as CSV, with the running cumulative.
    pub fn export_payments_csv<W: Write>(&self, writer: W, name: &str) -> Result<usize> {
        let student = self.service.student(name)?;
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(["date", "hours", "cumulative_paid"])?;

        let mut count = 0;
        for (payment, cumulative) in student.cumulative_payments() {
            csv_writer.write_record([
                &payment.date.to_string(),
                &format_hours(payment.hours),
                &format_hours(cumulative),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the full ledger as a JSON snapshot.
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Local::now(),
            students: self.service.students().to_vec(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}

/// Export file name for a workbook taken today: `<prefix><YYYYMMDD>.xlsx`.
pub fn workbook_filename(prefix: &str) -> String {
    format!("{}{}.xlsx", prefix, Local::now().format("%Y%m%d"))
}

/// "<name> <suffix>", clipping the name so the whole fits Excel's sheet
/// name limit with the suffix intact.
fn sheet_name(name: &str, suffix: &str) -> String {
    let budget = MAX_SHEET_NAME.saturating_sub(suffix.chars().count() + 1);
    let clipped: String = name.chars().take(budget).collect();
    format!("{clipped} {suffix}")
}
