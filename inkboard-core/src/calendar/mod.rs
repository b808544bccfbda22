//! Calendar ingestion.
//!
//! Events come from an ordered chain of sources, first non-empty wins:
//! the synced local snapshot, then a remote iCal feed if one is configured,
//! then a fixed mock set so the dashboard always has something to show.
//! Each tier's output runs through the same finalize pipeline (day filter,
//! classification, sort, display times).

pub mod feed;
pub mod timeparse;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::InkboardResult;
use crate::event::{Event, EventKind, RawEvent, finalize_events};

/// One tier of the calendar fallback chain.
#[async_trait]
pub trait EventSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Raw candidate events for the current day. An empty result (or an
    /// error) hands over to the next tier.
    async fn events(&self, tz: Tz, today: NaiveDate) -> InkboardResult<Vec<RawEvent>>;
}

/// Events published by the periodic sync job.
pub struct SnapshotSource {
    events: Arc<Vec<RawEvent>>,
}

impl SnapshotSource {
    pub fn new(events: Arc<Vec<RawEvent>>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl EventSource for SnapshotSource {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    async fn events(&self, _tz: Tz, _today: NaiveDate) -> InkboardResult<Vec<RawEvent>> {
        Ok(self.events.as_ref().clone())
    }
}

/// Remote iCal feed, active only when a URL is configured.
pub struct FeedSource {
    client: reqwest::Client,
    url: String,
}

impl FeedSource {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl EventSource for FeedSource {
    fn name(&self) -> &'static str {
        "ical-feed"
    }

    async fn events(&self, tz: Tz, _today: NaiveDate) -> InkboardResult<Vec<RawEvent>> {
        feed::fetch_feed(&self.client, &self.url, tz).await
    }
}

/// Last-resort fixed event set on today's date.
pub struct MockSource;

#[async_trait]
impl EventSource for MockSource {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn events(&self, tz: Tz, today: NaiveDate) -> InkboardResult<Vec<RawEvent>> {
        Ok(mock_events(tz, today))
    }
}

/// The standard chain: snapshot, then feed (if configured), then mock.
pub fn default_sources(
    snapshot: Arc<Vec<RawEvent>>,
    client: reqwest::Client,
    calendar_url: Option<String>,
) -> Vec<Box<dyn EventSource>> {
    let mut sources: Vec<Box<dyn EventSource>> = vec![Box::new(SnapshotSource::new(snapshot))];
    if let Some(url) = calendar_url {
        sources.push(Box::new(FeedSource::new(client, url)));
    }
    sources.push(Box::new(MockSource));
    sources
}

/// Today's finalized events from the first tier that yields any.
pub async fn fetch_events(sources: &[Box<dyn EventSource>], tz: Tz) -> Vec<Event> {
    let today = Utc::now().with_timezone(&tz).date_naive();
    events_for_day(sources, tz, today).await
}

pub async fn events_for_day(
    sources: &[Box<dyn EventSource>],
    tz: Tz,
    today: NaiveDate,
) -> Vec<Event> {
    for source in sources {
        match source.events(tz, today).await {
            Ok(raw) => {
                let events = finalize_events(raw, tz, today);
                if !events.is_empty() {
                    return events;
                }
            }
            Err(err) => eprintln!("Calendar source '{}' failed: {}", source.name(), err),
        }
    }
    Vec::new()
}

fn mock_events(tz: Tz, today: NaiveDate) -> Vec<RawEvent> {
    let at = |h: u32, m: u32, s: u32| {
        tz.from_local_datetime(&today.and_hms_opt(h, m, s).unwrap())
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    };

    let mock = [
        ("Standups", (9, 30, 0), (12, 45, 0), EventKind::Work),
        ("Lunch", (13, 0, 0), (14, 0, 0), EventKind::Personal),
        ("Meetings", (14, 0, 0), (16, 0, 0), EventKind::Work),
        ("Sleep", (22, 0, 0), (23, 59, 59), EventKind::Personal),
    ];

    mock.into_iter()
        .filter_map(|(title, (sh, sm, ss), (eh, em, es), kind)| {
            Some(RawEvent {
                title: title.to_string(),
                start: at(sh, sm, ss)?,
                end: at(eh, em, es)?,
                attendees: Vec::new(),
                kind: Some(kind),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Kolkata;

    struct FailingSource;

    #[async_trait]
    impl EventSource for FailingSource {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn events(&self, _tz: Tz, _today: NaiveDate) -> InkboardResult<Vec<RawEvent>> {
            Err(crate::error::InkboardError::Fetch("boom".into()))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    #[tokio::test]
    async fn test_chain_falls_through_to_mock() {
        let sources: Vec<Box<dyn EventSource>> = vec![
            Box::new(FailingSource),
            Box::new(SnapshotSource::new(Arc::new(Vec::new()))),
            Box::new(MockSource),
        ];

        let events = events_for_day(&sources, Kolkata, today()).await;

        let titles: Vec<&str> = events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Standups", "Lunch", "Meetings", "Sleep"]);
    }

    #[tokio::test]
    async fn test_snapshot_tier_wins_over_mock() {
        let snapshot = vec![RawEvent {
            title: "Planning sync".to_string(),
            start: Kolkata
                .from_local_datetime(&today().and_hms_opt(11, 0, 0).unwrap())
                .unwrap()
                .with_timezone(&Utc),
            end: Kolkata
                .from_local_datetime(&today().and_hms_opt(12, 0, 0).unwrap())
                .unwrap()
                .with_timezone(&Utc),
            attendees: Vec::new(),
            kind: None,
        }];
        let sources: Vec<Box<dyn EventSource>> = vec![
            Box::new(SnapshotSource::new(Arc::new(snapshot))),
            Box::new(MockSource),
        ];

        let events = events_for_day(&sources, Kolkata, today()).await;

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Planning sync");
        assert_eq!(events[0].kind, EventKind::Meeting);
    }

    #[tokio::test]
    async fn test_snapshot_with_only_stale_events_falls_through() {
        let yesterday = today().pred_opt().unwrap();
        let snapshot = vec![RawEvent {
            title: "Old event".to_string(),
            start: Kolkata
                .from_local_datetime(&yesterday.and_hms_opt(11, 0, 0).unwrap())
                .unwrap()
                .with_timezone(&Utc),
            end: Kolkata
                .from_local_datetime(&yesterday.and_hms_opt(12, 0, 0).unwrap())
                .unwrap()
                .with_timezone(&Utc),
            attendees: Vec::new(),
            kind: None,
        }];

        let sources: Vec<Box<dyn EventSource>> = vec![
            Box::new(SnapshotSource::new(Arc::new(snapshot))),
            Box::new(MockSource),
        ];

        let events = events_for_day(&sources, Kolkata, today()).await;

        // Stale snapshot yields nothing for today, so the mock tier serves.
        assert_eq!(events.len(), 4);
    }
}
