//! Remote iCal feed tier.
//!
//! Fetches a configured .ics URL and extracts VEVENTs using the icalendar
//! crate's parser. Recurrence is not expanded; the feed is treated as a
//! flat list of concrete events and the day filter does the rest.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use icalendar::{
    DatePerhapsTime,
    parser::{Property, read_calendar, unfold},
};

use crate::error::InkboardResult;
use crate::event::{EventKind, RawEvent};

/// Fetch and parse the feed into raw events.
pub async fn fetch_feed(client: &reqwest::Client, url: &str, tz: Tz) -> InkboardResult<Vec<RawEvent>> {
    let body = client.get(url).send().await?.error_for_status()?.text().await?;
    Ok(events_from_ics(&body, tz))
}

/// Parse ICS content into raw events. Components without a usable
/// start/end are skipped.
pub fn events_from_ics(content: &str, tz: Tz) -> Vec<RawEvent> {
    let unfolded = unfold(content);
    let Ok(calendar) = read_calendar(&unfolded) else {
        return Vec::new();
    };

    calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .filter_map(|vevent| {
            let title = vevent
                .find_prop("SUMMARY")
                .map(|p| p.val.to_string())
                .unwrap_or_else(|| "(No title)".to_string());

            let start = prop_to_utc(vevent.find_prop("DTSTART")?, tz)?;
            let end = prop_to_utc(vevent.find_prop("DTEND")?, tz)?;

            // Tentative status survives classification; everything else is
            // derived from the title downstream.
            let kind = vevent.find_prop("STATUS").and_then(|p| {
                (p.val.as_ref() == "TENTATIVE").then_some(EventKind::Tentative)
            });

            let attendees = vevent
                .properties
                .iter()
                .filter(|p| p.name == "ATTENDEE")
                .map(attendee_label)
                .collect();

            Some(RawEvent {
                title,
                start,
                end,
                attendees,
                kind,
            })
        })
        .collect()
}

/// Resolve a DTSTART/DTEND property to UTC, interpreting floating and
/// all-day values in the display timezone.
fn prop_to_utc(prop: &Property, tz: Tz) -> Option<DateTime<Utc>> {
    let dpt = DatePerhapsTime::try_from(prop).ok()?;
    match dpt {
        DatePerhapsTime::Date(d) => local_to_utc(d.and_hms_opt(0, 0, 0)?, tz),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            icalendar::CalendarDateTime::Utc(dt) => Some(dt),
            icalendar::CalendarDateTime::Floating(naive) => local_to_utc(naive, tz),
            icalendar::CalendarDateTime::WithTimezone { date_time, tzid } => {
                let event_tz: Tz = tzid.parse().ok()?;
                local_to_utc(date_time, event_tz)
            }
        },
    }
}

fn local_to_utc(naive: chrono::NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    use chrono::TimeZone;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Display label for an ATTENDEE property: CN parameter if present,
/// otherwise the email without the mailto: prefix.
fn attendee_label(prop: &Property) -> String {
    prop.params
        .iter()
        .find(|p| p.key == "CN")
        .and_then(|p| p.val.as_ref().map(|v| v.to_string()))
        .unwrap_or_else(|| {
            prop.val
                .as_ref()
                .strip_prefix("mailto:")
                .unwrap_or(prop.val.as_ref())
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Kolkata;

    #[test]
    fn test_parses_utc_event_with_attendees() {
        let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:a1\r\nSUMMARY:Design review\r\nDTSTART:20260310T043000Z\r\nDTEND:20260310T053000Z\r\nATTENDEE;CN=Asha:mailto:asha@example.com\r\nATTENDEE:mailto:dev@example.com\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";

        let events = events_from_ics(ics, Kolkata);

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Design review");
        assert_eq!(
            events[0].start,
            Utc.with_ymd_and_hms(2026, 3, 10, 4, 30, 0).unwrap()
        );
        assert_eq!(events[0].attendees, vec!["Asha", "dev@example.com"]);
        assert_eq!(events[0].kind, None);
    }

    #[test]
    fn test_tentative_status_maps_to_tentative_kind() {
        let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:a2\r\nSUMMARY:Maybe coffee\r\nSTATUS:TENTATIVE\r\nDTSTART:20260310T100000Z\r\nDTEND:20260310T110000Z\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";

        let events = events_from_ics(ics, Kolkata);

        assert_eq!(events[0].kind, Some(EventKind::Tentative));
    }

    #[test]
    fn test_floating_time_is_interpreted_in_display_timezone() {
        let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:a3\r\nSUMMARY:Gym\r\nDTSTART:20260310T070000\r\nDTEND:20260310T080000\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";

        let events = events_from_ics(ics, Kolkata);

        let expected = Kolkata
            .with_ymd_and_hms(2026, 3, 10, 7, 0, 0)
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(events[0].start, expected);
    }

    #[test]
    fn test_event_without_dtend_is_skipped() {
        let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:a4\r\nSUMMARY:Broken\r\nDTSTART:20260310T100000Z\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";

        assert!(events_from_ics(ics, Kolkata).is_empty());
    }
}
