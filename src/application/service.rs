use chrono::NaiveDate;

use crate::domain::{
    Payment, Session, Student, Tenths, format_hours, normalize_subjects, remaining_hours,
    total_hours, total_paid, validate_payment,
};
use crate::storage::Store;

use super::AppError;

/// Application service owning the in-memory ledger and its file-backed store.
/// This is the primary interface for any client (CLI, exporter, tests).
///
/// Every successful mutation rewrites the ledger file and appends an audit
/// line. A failed save surfaces as `AppError::Persistence` but the in-memory
/// mutation stays applied; the next successful save writes everything.
pub struct LedgerService {
    students: Vec<Student>,
    store: Store,
}

/// Per-student totals for the overview/summary surface.
pub struct StudentSummary {
    pub name: String,
    pub subjects: Vec<String>,
    pub total_hours: Tenths,
    pub total_paid: Tenths,
    pub remaining_hours: Tenths,
}

impl LedgerService {
    /// Open the ledger at the given paths, loading existing data if present.
    pub fn open(store: Store) -> Result<Self, AppError> {
        let students = match store.load() {
            Ok(students) => students,
            Err(e) => {
                store.append_audit(&format!("Data load failed: {e}"));
                return Err(AppError::Persistence(e));
            }
        };
        store.append_audit("Data loaded");
        Ok(Self { students, store })
    }

    // ========================
    // Queries
    // ========================

    /// All students in list order.
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Look up a single student by name.
    pub fn student(&self, name: &str) -> Result<&Student, AppError> {
        self.students
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| AppError::UnknownStudent(name.to_string()))
    }

    /// Sum of session durations for a student.
    pub fn total_hours(&self, name: &str) -> Result<Tenths, AppError> {
        Ok(total_hours(&self.student(name)?.sessions))
    }

    /// Sum of payment hours for a student.
    pub fn total_paid(&self, name: &str) -> Result<Tenths, AppError> {
        Ok(total_paid(&self.student(name)?.payments))
    }

    /// Accrued minus paid hours for a student.
    pub fn remaining_hours(&self, name: &str) -> Result<Tenths, AppError> {
        let student = self.student(name)?;
        Ok(remaining_hours(&student.sessions, &student.payments))
    }

    /// Totals for a single student.
    pub fn summary(&self, name: &str) -> Result<StudentSummary, AppError> {
        Ok(summarize(self.student(name)?))
    }

    /// Totals for every student, in list order.
    pub fn summaries(&self) -> Vec<StudentSummary> {
        self.students.iter().map(summarize).collect()
    }

    /// Append a line to the audit log, best-effort.
    pub fn audit(&self, message: &str) {
        self.store.append_audit(message);
    }

    // ========================
    // Student operations
    // ========================

    /// Add a new student with the given subject list.
    pub fn add_student(&mut self, name: &str, subjects: Vec<String>) -> Result<(), AppError> {
        let name = name.trim();
        if name.is_empty() || self.students.iter().any(|s| s.name == name) {
            return Err(AppError::DuplicateStudent(name.to_string()));
        }

        let student = Student::new(name.to_string(), subjects);
        let message = format!(
            "Added student {} (subjects: {})",
            student.name,
            student.subjects.join(", ")
        );
        self.students.push(student);
        self.commit(&[message])
    }

    /// Replace the student list order. `new_order` must be a permutation of
    /// the current names; all per-student data is preserved.
    pub fn reorder_students(&mut self, new_order: &[String]) -> Result<(), AppError> {
        let mut current: Vec<&str> = self.students.iter().map(|s| s.name.as_str()).collect();
        let mut proposed: Vec<&str> = new_order.iter().map(String::as_str).collect();
        current.sort_unstable();
        proposed.sort_unstable();
        if current != proposed {
            return Err(AppError::InvalidPermutation(new_order.join(", ")));
        }

        // Names are unique, so sorted equality above guarantees each lookup hits.
        let mut remaining = std::mem::take(&mut self.students);
        for name in new_order {
            let pos = remaining
                .iter()
                .position(|s| &s.name == name)
                .expect("validated permutation");
            self.students.push(remaining.swap_remove(pos));
        }
        self.commit(&["Reordered student list".to_string()])
    }

    /// Replace a student's subject list.
    pub fn modify_subjects(&mut self, name: &str, subjects: Vec<String>) -> Result<(), AppError> {
        let normalized = normalize_subjects(subjects);
        let message = format!("Changed subjects for {} to: {}", name, normalized.join(", "));
        let student = self.student_mut(name)?;
        student.subjects = normalized;
        self.commit(&[message])
    }

    // ========================
    // Session operations
    // ========================

    /// Record a session for a student. Sessions stay sorted by date; ties
    /// keep insertion order.
    pub fn add_session(
        &mut self,
        name: &str,
        date: NaiveDate,
        duration: Tenths,
    ) -> Result<(), AppError> {
        let student = self.student_mut(name)?;
        if duration <= 0 {
            return Err(AppError::InvalidDuration(format_hours(duration)));
        }
        student.sessions.push(Session::new(date, duration));
        student.sort_sessions();
        self.commit(&[format!(
            "Added {} hour session for {} on {}",
            format_hours(duration),
            name,
            date
        )])
    }

    /// Rewrite the session at `index` (position in the date-sorted list).
    pub fn modify_session(
        &mut self,
        name: &str,
        index: usize,
        new_date: NaiveDate,
        new_duration: Tenths,
    ) -> Result<(), AppError> {
        let student = self.student_mut(name)?;
        let len = student.sessions.len();
        if index >= len {
            return Err(AppError::IndexOutOfRange { index, len });
        }
        if new_duration <= 0 {
            return Err(AppError::InvalidDuration(format_hours(new_duration)));
        }
        student.sessions[index] = Session::new(new_date, new_duration);
        student.sort_sessions();
        self.commit(&[format!(
            "Modified session for {}: {} hours on {}",
            name,
            format_hours(new_duration),
            new_date
        )])
    }

    /// Delete the sessions at the given indices (any order, duplicates
    /// tolerated). The payment invariant is not re-checked afterwards:
    /// settled payments stand even if they now exceed accrued hours.
    pub fn delete_sessions(&mut self, name: &str, indices: &[usize]) -> Result<(), AppError> {
        let student = self.student_mut(name)?;
        let len = student.sessions.len();

        let mut to_delete: Vec<usize> = indices.to_vec();
        to_delete.sort_unstable();
        to_delete.dedup();
        if let Some(&index) = to_delete.iter().find(|&&i| i >= len) {
            return Err(AppError::IndexOutOfRange { index, len });
        }

        // Highest first, so earlier removals don't shift later indices
        let mut messages = Vec::with_capacity(to_delete.len());
        for &index in to_delete.iter().rev() {
            let session = student.sessions.remove(index);
            messages.push(format!(
                "Deleted session for {}: {} hours on {}",
                name,
                format_hours(session.duration),
                session.date
            ));
        }
        self.commit(&messages)
    }

    // ========================
    // Payment operations
    // ========================

    /// Record a payment for a student. Rejected when it would push the paid
    /// total past the accrued session hours.
    pub fn add_payment(
        &mut self,
        name: &str,
        date: NaiveDate,
        hours: Tenths,
    ) -> Result<(), AppError> {
        let student = self.student_mut(name)?;
        if hours <= 0 {
            return Err(AppError::InvalidHours(format_hours(hours)));
        }
        validate_payment(&student.sessions, &student.payments, hours)
            .map_err(|e| AppError::overpayment(name, e))?;

        student.payments.push(Payment::new(date, hours));
        student.sort_payments();
        self.commit(&[format!(
            "Added {} hour payment for {} on {}",
            format_hours(hours),
            name,
            date
        )])
    }

    // ========================
    // Internals
    // ========================

    fn student_mut(&mut self, name: &str) -> Result<&mut Student, AppError> {
        self.students
            .iter_mut()
            .find(|s| s.name == name)
            .ok_or_else(|| AppError::UnknownStudent(name.to_string()))
    }

    /// Persist the ledger and append the audit lines for an applied
    /// mutation. On save failure the mutation stays in memory, the failure
    /// is audit-logged, and a `Persistence` error is returned.
    fn commit(&self, messages: &[String]) -> Result<(), AppError> {
        match self.store.save(&self.students) {
            Ok(()) => {
                for message in messages {
                    self.store.append_audit(message);
                }
                Ok(())
            }
            Err(e) => {
                self.store.append_audit(&format!("Data save failed: {e}"));
                Err(AppError::Persistence(e))
            }
        }
    }
}

fn summarize(student: &Student) -> StudentSummary {
    StudentSummary {
        name: student.name.clone(),
        subjects: student.subjects.clone(),
        total_hours: total_hours(&student.sessions),
        total_paid: total_paid(&student.payments),
        remaining_hours: remaining_hours(&student.sessions, &student.payments),
    }
}
