use std::fmt;

/// Hours are represented as integer tenths to avoid floating-point drift.
/// 1 hour = 10 tenths, so 1.5 hours = 15 tenths.
pub type Tenths = i64;

/// Format tenths as a decimal hours string with one decimal place.
/// Example: 15 -> "1.5", 20 -> "2.0"
pub fn format_hours(tenths: Tenths) -> String {
    let sign = if tenths < 0 { "-" } else { "" };
    let abs = tenths.abs();
    format!("{}{}.{}", sign, abs / 10, abs % 10)
}

/// Parse a decimal hours string into tenths.
/// Example: "1.5" -> 15, "2" -> 20, ".5" -> 5
pub fn parse_hours(input: &str) -> Result<Tenths, ParseHoursError> {
    let input = input.trim();
    let negative = input.starts_with('-');
    let input = input.trim_start_matches('-');

    let parts: Vec<&str> = input.split('.').collect();
    match parts.len() {
        1 => {
            // No decimal point, treat as whole hours
            let hours: i64 = parts[0]
                .parse()
                .map_err(|_| ParseHoursError::InvalidFormat)?;
            let tenths = hours * 10;
            Ok(if negative { -tenths } else { tenths })
        }
        2 => {
            let hours: i64 = if parts[0].is_empty() {
                0
            } else {
                parts[0]
                    .parse()
                    .map_err(|_| ParseHoursError::InvalidFormat)?
            };

            // Keep a single decimal digit - anything further is truncated
            let decimal_str = parts[1];
            let decimal_tenths: i64 = match decimal_str.len() {
                0 => 0,
                1 => decimal_str
                    .parse()
                    .map_err(|_| ParseHoursError::InvalidFormat)?,
                _ => decimal_str
                    .get(..1)
                    .ok_or(ParseHoursError::InvalidFormat)?
                    .parse()
                    .map_err(|_| ParseHoursError::InvalidFormat)?,
            };

            let tenths = hours * 10 + decimal_tenths;
            Ok(if negative { -tenths } else { tenths })
        }
        _ => Err(ParseHoursError::InvalidFormat),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseHoursError {
    InvalidFormat,
}

impl fmt::Display for ParseHoursError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseHoursError::InvalidFormat => write!(f, "invalid hours format"),
        }
    }
}

impl std::error::Error for ParseHoursError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(15), "1.5");
        assert_eq!(format_hours(20), "2.0");
        assert_eq!(format_hours(10), "1.0");
        assert_eq!(format_hours(5), "0.5");
        assert_eq!(format_hours(0), "0.0");
        assert_eq!(format_hours(105), "10.5");
        assert_eq!(format_hours(-15), "-1.5");
    }

    #[test]
    fn test_parse_hours() {
        assert_eq!(parse_hours("1.5"), Ok(15));
        assert_eq!(parse_hours("2"), Ok(20));
        assert_eq!(parse_hours("2.0"), Ok(20));
        assert_eq!(parse_hours("0.5"), Ok(5));
        assert_eq!(parse_hours(".5"), Ok(5));
        assert_eq!(parse_hours("10.5"), Ok(105));
        assert_eq!(parse_hours("-1.5"), Ok(-15));
        assert_eq!(parse_hours("1.25"), Ok(12)); // Truncates
        assert_eq!(parse_hours(" 1.5 "), Ok(15));
    }

    #[test]
    fn test_parse_hours_invalid() {
        assert!(parse_hours("abc").is_err());
        assert!(parse_hours("1.5.5").is_err());
        assert!(parse_hours("").is_err());
        assert!(parse_hours("1.x").is_err());
        assert!(parse_hours("1.é5").is_err());
    }
}
