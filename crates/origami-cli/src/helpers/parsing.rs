//! Parsing helpers for dates.

use chrono::{Local, NaiveDate};
use origami_core::storage::types::DATE_FORMAT;

use crate::errors::CliError;

/// Parse an entry date: `YYYY-MM-DD`, `today`, or `yesterday`.
pub fn parse_date(value: &str) -> anyhow::Result<NaiveDate> {
    let trimmed = value.trim();
    let today = Local::now().date_naive();
    match trimmed.to_ascii_lowercase().as_str() {
        "today" => return Ok(today),
        "yesterday" => {
            return today
                .pred_opt()
                .ok_or_else(|| CliError::invalid_input("Date out of range").into())
        }
        _ => {}
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| {
        CliError::invalid_input(format!(
            "Invalid date: {} (use YYYY-MM-DD, today, or yesterday)",
            value
        ))
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_iso_date() {
        let date = parse_date("2025-01-01").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_parse_today() {
        assert_eq!(parse_date("today").unwrap(), Local::now().date_naive());
        assert_eq!(parse_date(" Today ").unwrap(), Local::now().date_naive());
    }

    #[test]
    fn test_parse_yesterday() {
        let expected = Local::now().date_naive().pred_opt().unwrap();
        assert_eq!(parse_date("yesterday").unwrap(), expected);
    }

    #[test]
    fn test_parse_invalid_date() {
        assert!(parse_date("2025-13-01").is_err());
        assert!(parse_date("01/02/2025").is_err());
        assert!(parse_date("").is_err());
    }
}
