//! Date and amount formatting for the printed checklist

use chrono::{DateTime, NaiveDate};

/// Date layouts seen on job records, tried in order
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%d-%b-%Y", "%d %b %Y"];

/// Parse a job-record date, ignoring any time-of-day suffix
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(date) = parse_day(trimmed) {
        return Some(date);
    }

    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.date_naive());
    }

    // "2025-01-15T10:30:00" or "15-01-2025 10:30"
    let day_part = trimmed.split(['T', ' ']).next()?;
    parse_day(day_part)
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// `15 Jan 2025`
pub fn print_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// `15-Jan-2025`, used in file names
pub fn file_date(date: NaiveDate) -> String {
    date.format("%d-%b-%Y").to_string()
}

/// Reformat a record date for printing, passing unreadable text through
pub fn display_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => print_date(date),
        None => raw.trim().to_string(),
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Two-decimal amount; never prints `-0.00`
pub fn money(value: f64) -> String {
    let rounded = round2(value);
    if rounded == 0.0 {
        return "0.00".to_string();
    }
    format!("{:.2}", rounded)
}

/// Quantity with trailing zeros removed (`12`, `12.5`, `0.125`)
pub fn quantity(value: f64) -> String {
    let text = format!("{:.3}", value);
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" || trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `1250.500 KGS`
pub fn weight(value: f64, unit: &str) -> String {
    let unit = if unit.trim().is_empty() {
        "KGS"
    } else {
        unit.trim()
    };
    let rounded = (value * 1000.0).round() / 1000.0;
    // Normalises -0.0
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.3} {}", rounded, unit)
}

/// Join non-empty parts with `sep`
pub fn join_present(parts: &[&str], sep: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date_layouts() {
        let expected = ymd(2025, 1, 15);
        for raw in [
            "2025-01-15",
            "15-01-2025",
            "15/01/2025",
            "15-Jan-2025",
            "2025-01-15T10:30:00",
            "2025-01-15T10:30:00+05:30",
            "15-01-2025 10:30",
            "  2025-01-15 ",
        ] {
            assert_eq!(parse_date(raw), Some(expected), "{}", raw);
        }
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("next week"), None);
        assert_eq!(parse_date("2025-13-45"), None);
    }

    #[test]
    fn test_print_formats() {
        assert_eq!(print_date(ymd(2025, 1, 5)), "05 Jan 2025");
        assert_eq!(file_date(ymd(2025, 1, 5)), "05-Jan-2025");
        assert_eq!(display_date("2025-03-09"), "09 Mar 2025");
        assert_eq!(display_date("TBA"), "TBA");
    }

    #[test]
    fn test_money_rounds_half_away() {
        assert_eq!(money(583104.963), "583104.96");
        assert_eq!(money(0.005), "0.01");
        assert_eq!(money(-0.001), "0.00");
        assert_eq!(money(12.0), "12.00");
    }

    #[test]
    fn test_quantity_and_weight() {
        assert_eq!(quantity(1200.0), "1200");
        assert_eq!(quantity(12.5), "12.5");
        assert_eq!(quantity(0.0), "0");
        assert_eq!(weight(1250.5, ""), "1250.500 KGS");
        assert_eq!(weight(3.0, "MTS"), "3.000 MTS");
    }

    #[test]
    fn test_weight_never_prints_negative_zero() {
        let empty: f64 = Vec::<f64>::new().into_iter().sum();
        assert_eq!(weight(empty, ""), "0.000 KGS");
        assert_eq!(weight(-0.0, "KGS"), "0.000 KGS");
        assert_eq!(weight(-0.0001, ""), "0.000 KGS");
    }
}
