//! Source-neutral calendar event types.
//!
//! Every tier (local snapshot, iCal feed, mock data) produces `RawEvent`s,
//! which the shared pipeline filters to the current day, classifies, sorts
//! and decorates for display.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Event category, derived from the title unless the source already knows
/// better (e.g. an iCal STATUS:TENTATIVE).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Work,
    Personal,
    Meeting,
    Tentative,
}

/// 12-hour display time, split so the client can style the meridiem separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeDisplay {
    pub time_val: String,
    pub ampm: String,
}

/// An event as produced by a source, before the day filter and sorting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub attendees: Vec<String>,
    /// Set only when the source itself carries a category.
    #[serde(skip)]
    pub kind: Option<EventKind>,
}

/// A finalized event as served by `/api/calendar`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub attendees: Vec<String>,
    #[serde(rename = "timeDisplay")]
    pub time_display: TimeDisplay,
}

/// Classify an event by title keywords. Anything unrecognized is work.
pub fn classify_title(title: &str) -> EventKind {
    let lower = title.to_lowercase();
    if lower.contains("meeting") || lower.contains("sync") || lower.contains("standup") {
        EventKind::Meeting
    } else if lower.contains("lunch") || lower.contains("break") || lower.contains("personal") {
        EventKind::Personal
    } else {
        EventKind::Work
    }
}

/// Split a start instant into the `{timeVal, ampm}` pair, formatted in the
/// display timezone.
pub fn time_display(start: DateTime<Utc>, tz: Tz) -> TimeDisplay {
    let local = start.with_timezone(&tz);
    TimeDisplay {
        time_val: local.format("%-I:%M").to_string(),
        ampm: local.format("%p").to_string(),
    }
}

/// Run raw events through the shared pipeline: keep events starting on
/// `today` in the display timezone, classify untyped ones, sort ascending
/// by start, and attach display times.
pub fn finalize_events(raw: Vec<RawEvent>, tz: Tz, today: NaiveDate) -> Vec<Event> {
    let mut events: Vec<Event> = raw
        .into_iter()
        .filter(|e| e.start.with_timezone(&tz).date_naive() == today)
        .map(|e| {
            let kind = e.kind.unwrap_or_else(|| classify_title(&e.title));
            let time_display = time_display(e.start, tz);
            Event {
                title: e.title,
                start: e.start,
                end: e.end,
                kind,
                attendees: e.attendees,
                time_display,
            }
        })
        .collect();

    events.sort_by_key(|e| e.start);
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Kolkata;

    fn raw(title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> RawEvent {
        RawEvent {
            title: title.to_string(),
            start,
            end,
            attendees: Vec::new(),
            kind: None,
        }
    }

    fn at(today: NaiveDate, h: u32, m: u32) -> DateTime<Utc> {
        Kolkata
            .from_local_datetime(&today.and_hms_opt(h, m, 0).unwrap())
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_classify_meeting_keywords_case_insensitive() {
        assert_eq!(classify_title("Weekly SYNC"), EventKind::Meeting);
        assert_eq!(classify_title("Morning Standup"), EventKind::Meeting);
        assert_eq!(classify_title("All-hands meeting"), EventKind::Meeting);
    }

    #[test]
    fn test_classify_personal_keywords() {
        assert_eq!(classify_title("Lunch with Sam"), EventKind::Personal);
        assert_eq!(classify_title("Coffee break"), EventKind::Personal);
        assert_eq!(classify_title("Personal errand"), EventKind::Personal);
    }

    #[test]
    fn test_classify_defaults_to_work() {
        assert_eq!(classify_title("Deep focus block"), EventKind::Work);
    }

    #[test]
    fn test_finalize_keeps_only_todays_events_sorted() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let yesterday = today.pred_opt().unwrap();

        let events = finalize_events(
            vec![
                raw("Later", at(today, 15, 0), at(today, 16, 0)),
                raw("Old", at(yesterday, 10, 0), at(yesterday, 11, 0)),
                raw("Earlier", at(today, 9, 30), at(today, 10, 0)),
            ],
            Kolkata,
            today,
        );

        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Earlier", "Later"]);
    }

    #[test]
    fn test_finalize_respects_source_provided_kind() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let mut event = raw("Quarterly sync", at(today, 9, 0), at(today, 10, 0));
        event.kind = Some(EventKind::Tentative);

        let events = finalize_events(vec![event], Kolkata, today);

        assert_eq!(events[0].kind, EventKind::Tentative);
    }

    #[test]
    fn test_time_display_splits_value_and_meridiem() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        let display = time_display(at(today, 22, 5), Kolkata);

        assert_eq!(display.time_val, "10:05");
        assert_eq!(display.ampm, "PM");
    }
}
