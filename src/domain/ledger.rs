use super::{Payment, Session, Tenths, format_hours};

/// Total accrued session hours for a student.
pub fn total_hours(sessions: &[Session]) -> Tenths {
    sessions.iter().map(|s| s.duration).sum()
}

/// Total settled payment hours for a student.
pub fn total_paid(payments: &[Payment]) -> Tenths {
    payments.iter().map(|p| p.hours).sum()
}

/// Accrued but unsettled hours. Can go negative after session deletions,
/// since historical payments stand regardless.
pub fn remaining_hours(sessions: &[Session], payments: &[Payment]) -> Tenths {
    total_hours(sessions) - total_paid(payments)
}

/// Validate that a proposed payment doesn't push the paid total past the
/// accrued session hours.
pub fn validate_payment(
    sessions: &[Session],
    payments: &[Payment],
    requested: Tenths,
) -> Result<(), OverpaymentError> {
    let accrued = total_hours(sessions);
    let already_paid = total_paid(payments);
    if already_paid + requested > accrued {
        return Err(OverpaymentError {
            total_hours: accrued,
            already_paid,
            requested,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpaymentError {
    pub total_hours: Tenths,
    pub already_paid: Tenths,
    pub requested: Tenths,
}

impl std::fmt::Display for OverpaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Payment of {} hours would exceed accrued hours ({} total, {} already paid)",
            format_hours(self.requested),
            format_hours(self.total_hours),
            format_hours(self.already_paid)
        )
    }
}

impl std::error::Error for OverpaymentError {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn session(date: &str, duration: Tenths) -> Session {
        Session::new(date.parse::<NaiveDate>().unwrap(), duration)
    }

    fn payment(date: &str, hours: Tenths) -> Payment {
        Payment::new(date.parse::<NaiveDate>().unwrap(), hours)
    }

    #[test]
    fn test_total_hours_empty() {
        assert_eq!(total_hours(&[]), 0);
    }

    #[test]
    fn test_total_hours_sums_durations() {
        let sessions = vec![session("2024-01-01", 20), session("2024-01-03", 10)];
        assert_eq!(total_hours(&sessions), 30);
    }

    #[test]
    fn test_remaining_hours() {
        let sessions = vec![session("2024-01-01", 20), session("2024-01-03", 10)];
        let payments = vec![payment("2024-01-02", 20)];
        assert_eq!(remaining_hours(&sessions, &payments), 10);
    }

    #[test]
    fn test_remaining_hours_negative_after_deletion() {
        // Sessions deleted after payments were settled leave a negative balance
        let sessions = vec![session("2024-01-01", 10)];
        let payments = vec![payment("2024-01-02", 20)];
        assert_eq!(remaining_hours(&sessions, &payments), -10);
    }

    #[test]
    fn test_validate_payment_success() {
        let sessions = vec![session("2024-01-01", 20), session("2024-01-03", 10)];
        assert!(validate_payment(&sessions, &[], 20).is_ok());
    }

    #[test]
    fn test_validate_payment_exact_balance() {
        let sessions = vec![session("2024-01-01", 20)];
        let payments = vec![payment("2024-01-02", 10)];
        assert!(validate_payment(&sessions, &payments, 10).is_ok());
    }

    #[test]
    fn test_validate_payment_exceeds_accrued() {
        let sessions = vec![session("2024-01-01", 20), session("2024-01-03", 10)];
        let payments = vec![payment("2024-01-02", 20)];

        let result = validate_payment(&sessions, &payments, 20);
        assert_eq!(
            result,
            Err(OverpaymentError {
                total_hours: 30,
                already_paid: 20,
                requested: 20,
            })
        );
    }

    #[test]
    fn test_validate_payment_no_sessions() {
        let result = validate_payment(&[], &[], 5);
        assert!(result.is_err());
    }
}
