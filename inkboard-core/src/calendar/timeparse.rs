//! Parsing for icalBuddy-style time ranges.
//!
//! The exporter prints ranges like `"10:00 AM - 11:00 AM"`. Newer macOS
//! releases emit a narrow no-break space (U+202F) before the meridiem, and
//! events crossing the day boundary show a `"..."` continuation marker on
//! the truncated side, which clamps to the start or end of the visible day.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const CONTINUATION: &str = "...";

/// Parse a time range into start/end instants on `date`.
///
/// Returns `None` for anything without a recognizable range (all-day
/// markers, malformed lines), which drops the event upstream.
pub fn parse_time_range(raw: &str, date: NaiveDate) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let clean = raw.replace('\u{202f}', " ");
    let (start_str, end_str) = clean.trim().split_once(" - ")?;

    let start = if start_str.trim() == CONTINUATION {
        date.and_hms_opt(0, 0, 0)
    } else {
        parse_clock(start_str).map(|t| date.and_time(t))
    }?;

    let end = if end_str.trim() == CONTINUATION {
        date.and_hms_milli_opt(23, 59, 59, 999)
    } else {
        parse_clock(end_str).map(|t| date.and_time(t))
    }?;

    Some((start, end))
}

/// Parse a 12-hour clock like `"6:15 AM"`, tolerating a leading prefix
/// (the exporter sometimes prepends day labels) and a missing space before
/// the meridiem.
fn parse_clock(raw: &str) -> Option<NaiveTime> {
    let s = raw.trim();
    let digits_at = s.find(|c: char| c.is_ascii_digit())?;
    let s = &s[digits_at..];

    let (hour_str, rest) = s.split_once(':')?;
    let minute_str: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    let tail = rest[minute_str.len()..].trim_start();

    let mut hour: u32 = hour_str.parse().ok()?;
    let minute: u32 = minute_str.parse().ok()?;

    let meridiem = tail.get(..2)?;
    if meridiem.eq_ignore_ascii_case("PM") {
        if hour < 12 {
            hour += 12;
        }
    } else if meridiem.eq_ignore_ascii_case("AM") {
        if hour == 12 {
            hour = 0;
        }
    } else {
        return None;
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[test]
    fn test_plain_range() {
        let (start, end) = parse_time_range("10:00 AM - 11:00 AM", date()).unwrap();
        assert_eq!(start, date().and_hms_opt(10, 0, 0).unwrap());
        assert_eq!(end, date().and_hms_opt(11, 0, 0).unwrap());
    }

    #[test]
    fn test_narrow_no_break_space() {
        let (start, end) = parse_time_range("10:00\u{202f}AM - 1:30\u{202f}PM", date()).unwrap();
        assert_eq!(start, date().and_hms_opt(10, 0, 0).unwrap());
        assert_eq!(end, date().and_hms_opt(13, 30, 0).unwrap());
    }

    #[test]
    fn test_continuation_start_clamps_to_midnight() {
        let (start, end) = parse_time_range("... - 6:15 AM", date()).unwrap();
        assert_eq!(start, date().and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(end, date().and_hms_opt(6, 15, 0).unwrap());
    }

    #[test]
    fn test_continuation_end_clamps_to_day_end() {
        let (start, end) = parse_time_range("10:00 PM - ...", date()).unwrap();
        assert_eq!(start, date().and_hms_opt(22, 0, 0).unwrap());
        assert_eq!(end, date().and_hms_milli_opt(23, 59, 59, 999).unwrap());
    }

    #[test]
    fn test_noon_and_midnight() {
        let (start, end) = parse_time_range("12:00 AM - 12:30 PM", date()).unwrap();
        assert_eq!(start, date().and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(end, date().and_hms_opt(12, 30, 0).unwrap());
    }

    #[test]
    fn test_all_day_marker_is_rejected() {
        assert!(parse_time_range("All-day", date()).is_none());
    }

    #[test]
    fn test_missing_meridiem_is_rejected() {
        assert!(parse_time_range("10:00 - 11:00", date()).is_none());
    }
}
