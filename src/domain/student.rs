use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Tenths;

/// Placeholder subject assigned when a student has no subjects set.
pub const DEFAULT_SUBJECT: &str = "unassigned";

/// One tutoring occurrence: a date and a duration in tenths of an hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub date: NaiveDate,
    pub duration: Tenths,
}

impl Session {
    pub fn new(date: NaiveDate, duration: Tenths) -> Self {
        Self { date, duration }
    }
}

/// A settlement consuming previously accrued session hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub date: NaiveDate,
    pub hours: Tenths,
}

impl Payment {
    pub fn new(date: NaiveDate, hours: Tenths) -> Self {
        Self { date, hours }
    }
}

/// A student with their session log, payment log, and subject tags.
/// Students are keyed by display name; iteration order is significant
/// and owned by the service, not by this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub name: String,
    pub sessions: Vec<Session>,
    pub payments: Vec<Payment>,
    pub subjects: Vec<String>,
}

impl Student {
    pub fn new(name: String, subjects: Vec<String>) -> Self {
        Self {
            name,
            sessions: Vec::new(),
            payments: Vec::new(),
            subjects: normalize_subjects(subjects),
        }
    }

    /// Re-sort sessions ascending by date. The sort is stable, so entries
    /// sharing a date keep their relative order.
    pub fn sort_sessions(&mut self) {
        self.sessions.sort_by_key(|s| s.date);
    }

    /// Re-sort payments ascending by date, stable like `sort_sessions`.
    pub fn sort_payments(&mut self) {
        self.payments.sort_by_key(|p| p.date);
    }

    /// Session log with a running cumulative duration per row.
    pub fn cumulative_sessions(&self) -> Vec<(Session, Tenths)> {
        let mut cumulative = 0;
        self.sessions
            .iter()
            .map(|s| {
                cumulative += s.duration;
                (*s, cumulative)
            })
            .collect()
    }

    /// Payment log with a running cumulative paid total per row.
    pub fn cumulative_payments(&self) -> Vec<(Payment, Tenths)> {
        let mut cumulative = 0;
        self.payments
            .iter()
            .map(|p| {
                cumulative += p.hours;
                (*p, cumulative)
            })
            .collect()
    }
}

/// Trim subjects, drop empties, and substitute the placeholder when nothing
/// is left. The result is never empty.
pub fn normalize_subjects(subjects: Vec<String>) -> Vec<String> {
    let trimmed: Vec<String> = subjects
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if trimmed.is_empty() {
        vec![DEFAULT_SUBJECT.to_string()]
    } else {
        trimmed
    }
}

/// Split a comma-separated subject string the way `normalize_subjects`
/// expects. "Math, English," -> ["Math", "English"]
pub fn split_subjects(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
