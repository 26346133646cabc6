//! Conversions between the display form (`dd/mm/yyyy`) and the machine
//! form (`yyyy-mm-dd`).
//!
//! The conversions are plain string shuffles and never fail: a malformed
//! input produces a malformed output. Only [`parse_date`] interprets the
//! text, and only for the start/end comparison.

use chrono::{Datelike, NaiveDate};

fn components(text: &str) -> (&str, &str, &str) {
    let mut parts = text.split(|c| c == '/' || c == '-');
    let a = parts.next().unwrap_or("");
    let b = parts.next().unwrap_or("");
    let c = parts.next().unwrap_or("");
    (a, b, c)
}

/// `dd/mm/yyyy` -> `yyyy-mm-dd`
pub fn to_machine(display: &str) -> String {
    let (day, month, year) = components(display);
    format!("{}-{}-{}", year, month, day)
}

/// `yyyy-mm-dd` -> `dd/mm/yyyy`
pub fn to_display(machine: &str) -> String {
    let (year, month, day) = components(machine);
    format!("{}/{}/{}", day, month, year)
}

/// Wire form of a date typed by the user: machine form, then back to display.
pub fn normalize_for_wire(display: &str) -> String {
    to_display(&to_machine(display))
}

/// Parse a date in either layout. A four-digit first component means the
/// text is year-first.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let (a, b, c) = components(text.trim());
    let (year, month, day) = if a.len() == 4 { (a, b, c) } else { (c, b, a) };
    let year: i32 = year.parse().ok()?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn format_display(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Inclusive date range in display form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self { start: start.into(), end: end.into() }
    }

    /// True when both ends parse and start falls after end. Unparseable
    /// dates are never reported as inverted.
    pub fn is_inverted(&self) -> bool {
        match (parse_date(&self.start), parse_date(&self.end)) {
            (Some(start), Some(end)) => start > end,
            _ => false,
        }
    }

    pub fn wire_params(&self) -> [(&'static str, String); 2] {
        [
            ("data_inicio", normalize_for_wire(&self.start)),
            ("data_fim", normalize_for_wire(&self.end)),
        ]
    }
}

/// First day of `today`'s month through `today`.
pub fn default_range(today: NaiveDate) -> DateRange {
    let first = today.with_day(1).unwrap_or(today);
    DateRange::new(format_display(first), format_display(today))
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_to_machine() {
        assert_eq!(to_machine("10/03/2024"), "2024-03-10");
        assert_eq!(to_machine("10-03-2024"), "2024-03-10");
    }

    #[test]
    fn test_round_trip_both_ways() {
        for display in ["01/01/2024", "29/02/2024", "31/12/1999"] {
            assert_eq!(to_display(&to_machine(display)), display);
        }
        for machine in ["2024-01-01", "2024-02-29", "1999-12-31"] {
            assert_eq!(to_machine(&to_display(machine)), machine);
        }
    }

    #[test]
    fn test_malformed_input_is_not_rejected() {
        assert_eq!(to_machine("10.03.2024"), "--10.03.2024");
        assert_eq!(to_display("garbage"), "//garbage");
    }

    #[test]
    fn test_parse_accepts_both_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 10);
        assert_eq!(parse_date("10/03/2024"), expected);
        assert_eq!(parse_date("2024-03-10"), expected);
        assert_eq!(parse_date("31/02/2024"), None);
        assert_eq!(parse_date("abc"), None);
    }

    #[test]
    fn test_inverted_range() {
        assert!(DateRange::new("2024-03-10", "2024-03-01").is_inverted());
        assert!(DateRange::new("10/03/2024", "01/03/2024").is_inverted());
        assert!(!DateRange::new("01/03/2024", "01/03/2024").is_inverted());
        assert!(!DateRange::new("xx", "01/03/2024").is_inverted());
    }

    #[test]
    fn test_default_range() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        let range = default_range(today);
        assert_eq!(range.start, "01/03/2024");
        assert_eq!(range.end, "17/03/2024");
    }

    #[test]
    fn test_wire_params_use_display_form() {
        let range = DateRange::new("1-3-2024", "2024-03-10");
        let params = range.wire_params();
        assert_eq!(params[0], ("data_inicio", "1/3/2024".to_string()));
        assert_eq!(params[1], ("data_fim", "2024/03/10".to_string()));
    }
}
