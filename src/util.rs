// Utility helpers for parsing and basic statistics.
//
// All the forgiving CSV/number/date handling lives here so the metric code
// can assume clean, typed values.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use num_format::{Locale, ToFormattedString};

// Two-digit years first: `%Y` would happily read "25" as year 25.
const DATE_FORMATS: &[&str] = &["%m/%d/%y", "%m/%d/%Y", "%Y-%m-%d"];
const DATETIME_FORMATS: &[&str] = &["%m/%d/%Y %H:%M", "%m/%d/%Y %I:%M %p", "%Y-%m-%d %H:%M:%S"];
const TIME_FORMATS: &[&str] = &["%I:%M %p", "%I:%M%p", "%H:%M", "%H:%M:%S"];

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in spreadsheet exports.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Non-negative whole number, accepting `"12"`, `"12.0"` and `"1,200"`.
pub fn parse_count_safe(s: Option<&str>) -> Option<u32> {
    let v = parse_f64_safe(s)?;
    if v < 0.0 || v.fract() != 0.0 || v > u32::MAX as f64 {
        return None;
    }
    Some(v as u32)
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
                .map(|dt| dt.date())
        })
}

/// Clock times from the booking log, normally 12-hour (`"9:30 AM"`).
pub fn parse_time_safe(s: Option<&str>) -> Option<NaiveTime> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    TIME_FORMATS
        .iter()
        .find_map(|f| NaiveTime::parse_from_str(s, f).ok())
}

/// Signed span between two clock times on the same day.
pub fn hours_between(start: NaiveTime, finish: NaiveTime) -> f64 {
    finish.signed_duration_since(start).num_seconds() as f64 / 3600.0
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// `numerator / denominator`, or `None` when the denominator is zero or the
/// result is not finite.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator).filter(|v| v.is_finite())
}

/// Share of `part` in `whole` as a percentage; 0 for an empty whole.
pub fn percent(part: f64, whole: f64) -> f64 {
    ratio(part, whole).map(|r| r * 100.0).unwrap_or(0.0)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimal places plus thousands separators (e.g. `1,234,567.89`).
    if !n.is_finite() {
        return "n/a".to_string();
    }
    let s = format!("{:.*}", decimals, n.abs());
    let neg = n.is_sign_negative() && s.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Integer parts beyond u128 have no grouped rendering.
    let Ok(int_val) = int_part.parse::<u128>() else {
        return "n/a".to_string();
    };
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Like [`format_number`] but renders `None` as `n/a`.
pub fn format_opt(n: Option<f64>, decimals: usize) -> String {
    n.map(|v| format_number(v, decimals))
        .unwrap_or_else(|| "n/a".to_string())
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for counts in report lines.
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_f64_strips_separators_and_rejects_text() {
        assert_eq!(parse_f64_safe(Some(" 5,978,000 ")), Some(5_978_000.0));
        assert_eq!(parse_f64_safe(Some("12.5")), Some(12.5));
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn parse_count_rejects_negative_and_fractional() {
        assert_eq!(parse_count_safe(Some("14")), Some(14));
        assert_eq!(parse_count_safe(Some("14.0")), Some(14));
        assert_eq!(parse_count_safe(Some("-1")), None);
        assert_eq!(parse_count_safe(Some("2.5")), None);
    }

    #[test]
    fn parse_date_accepts_us_and_iso_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 7);
        assert_eq!(parse_date_safe(Some("3/7/2025")), expected);
        assert_eq!(parse_date_safe(Some("2025-03-07")), expected);
        assert_eq!(parse_date_safe(Some(" 03/07/2025 ")), expected);
        assert_eq!(parse_date_safe(Some("3/7/2025 14:00")), expected);
        assert_eq!(parse_date_safe(Some("not a date")), None);
    }

    #[test]
    fn parse_time_accepts_twelve_hour_clock() {
        assert_eq!(parse_time_safe(Some("9:30 AM")), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_time_safe(Some("01:15 PM")), NaiveTime::from_hms_opt(13, 15, 0));
        assert_eq!(parse_time_safe(Some("17:45")), NaiveTime::from_hms_opt(17, 45, 0));
        assert_eq!(parse_time_safe(Some("All Day")), None);
    }

    #[test]
    fn hours_between_is_signed() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let half_ten = NaiveTime::from_hms_opt(10, 30, 0).unwrap();
        assert_eq!(hours_between(nine, half_ten), 1.5);
        assert_eq!(hours_between(half_ten, nine), -1.5);
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio(3.0, 0.0), None);
        assert_eq!(ratio(3.0, 2.0), Some(1.5));
        assert_eq!(percent(1.0, 0.0), 0.0);
        assert_eq!(percent(1.0, 4.0), 25.0);
    }

    #[test]
    fn format_number_groups_thousands() {
        assert_eq!(format_number(1_234_567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-4200.0, 0), "-4,200");
        assert_eq!(format_number(-0.001, 1), "0.0");
        assert_eq!(format_number(f64::NAN, 1), "n/a");
        assert_eq!(format_opt(None, 1), "n/a");
        assert_eq!(format_int(179_616u64), "179,616");
    }

    #[test]
    fn format_number_handles_magnitudes_past_i64() {
        assert_eq!(format_number(1e20, 0), "100,000,000,000,000,000,000");
        assert_eq!(format_number(-1e20, 1), "-100,000,000,000,000,000,000.0");
        assert_eq!(format_number(1e300, 0), "n/a");
    }
}
