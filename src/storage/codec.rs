//! Line-oriented ledger file codec.
//!
//! One block per student, in list order:
//!
//! ```text
//! STUDENT:<name>
//! SUBJECTS:<comma-separated subjects>
//! RECORD:<date>,<duration>
//! PAYMENT:<date>,<hours>
//! ```
//!
//! Loading tolerates the legacy 3-field `RECORD:<date>,<duration>,<subject>`
//! form (the trailing subject is dropped) and skips malformed lines instead
//! of failing the whole file. Saving always writes the current 2-field form.

use chrono::NaiveDate;

use crate::domain::{Payment, Session, Student, format_hours, normalize_subjects, parse_hours};

/// Serialize the full student list to the flat text format.
pub fn serialize(students: &[Student]) -> String {
    let mut out = String::new();
    for student in students {
        out.push_str(&format!("STUDENT:{}\n", student.name));
        out.push_str(&format!("SUBJECTS:{}\n", student.subjects.join(",")));
        for session in &student.sessions {
            out.push_str(&format!(
                "RECORD:{},{}\n",
                session.date,
                format_hours(session.duration)
            ));
        }
        for payment in &student.payments {
            out.push_str(&format!(
                "PAYMENT:{},{}\n",
                payment.date,
                format_hours(payment.hours)
            ));
        }
    }
    out
}

/// Parse ledger text into students. Never fails: lines that don't parse are
/// skipped so one corrupt line can't lose the rest of the file.
pub fn parse(input: &str) -> Vec<Student> {
    let mut students: Vec<Student> = Vec::new();
    // Index into `students` for the block being filled; None until the
    // first STUDENT line, which makes earlier record lines orphans.
    let mut current: Option<usize> = None;

    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some((tag, content)) = line.split_once(':') else {
            continue;
        };

        match tag {
            "STUDENT" => {
                // A repeated name continues the existing student's block
                current = Some(
                    students
                        .iter()
                        .position(|s| s.name == content)
                        .unwrap_or_else(|| {
                            students.push(Student {
                                name: content.to_string(),
                                sessions: Vec::new(),
                                payments: Vec::new(),
                                subjects: Vec::new(),
                            });
                            students.len() - 1
                        }),
                );
            }
            "SUBJECTS" => {
                if let Some(idx) = current {
                    let subjects: Vec<String> = content
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect();
                    // An empty list leaves whatever the student already has
                    if !subjects.is_empty() {
                        students[idx].subjects = subjects;
                    }
                }
            }
            "RECORD" => {
                if let Some(idx) = current {
                    let fields: Vec<&str> = content.split(',').collect();
                    // 2 fields is the current form; 3 or more is the legacy
                    // form whose trailing subject is dropped
                    if fields.len() >= 2 {
                        if let (Ok(date), Ok(duration)) =
                            (parse_date(fields[0]), parse_hours(fields[1]))
                        {
                            students[idx].sessions.push(Session::new(date, duration));
                        }
                    }
                }
            }
            "PAYMENT" => {
                if let Some(idx) = current {
                    let fields: Vec<&str> = content.split(',').collect();
                    if fields.len() == 2 {
                        if let (Ok(date), Ok(hours)) =
                            (parse_date(fields[0]), parse_hours(fields[1]))
                        {
                            students[idx].payments.push(Payment::new(date, hours));
                        }
                    }
                }
            }
            _ => {} // Unknown tags ignored
        }
    }

    for student in &mut students {
        student.subjects = normalize_subjects(std::mem::take(&mut student.subjects));
        student.sort_sessions();
        student.sort_payments();
    }
    students
}

fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
}
