//! Fixed-grid timeline projection for the e-ink page.
//!
//! One row per hour, one event per row: the first event whose start falls
//! in an hour claims the slot, later starters in the same hour are dropped.
//! This is a deliberate simplification for a single-column display, not a
//! layout solver.

use chrono_tz::Tz;

use crate::event::{Event, EventKind};

/// Dashboard timeline window, 9 AM to 10 PM inclusive.
pub const START_HOUR: u32 = 9;
pub const END_HOUR: u32 = 22;

#[derive(Debug, Clone, PartialEq)]
pub struct SlotEntry {
    pub title: String,
    /// Compact range like `9:30AM-12:45PM`.
    pub time_range: String,
    pub kind: EventKind,
}

#[derive(Debug, Clone)]
pub struct TimelineSlot {
    pub hour: u32,
    pub entry: Option<SlotEntry>,
}

/// 12-hour label without minutes, e.g. `9AM` or `12PM`.
pub fn hour_label(hour: u32) -> String {
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display}{meridiem}")
}

fn clock_label(hour: u32, minute: u32) -> String {
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display}:{minute:02}{meridiem}")
}

/// Project events (assumed sorted by start) onto the hour grid.
pub fn build_timeline(events: &[Event], tz: Tz) -> Vec<TimelineSlot> {
    let mut slots: Vec<TimelineSlot> = (START_HOUR..=END_HOUR)
        .map(|hour| TimelineSlot { hour, entry: None })
        .collect();

    for event in events {
        use chrono::Timelike;
        let start = event.start.with_timezone(&tz);
        let end = event.end.with_timezone(&tz);
        let hour = start.hour();

        if !(START_HOUR..=END_HOUR).contains(&hour) {
            continue;
        }
        let slot = &mut slots[(hour - START_HOUR) as usize];
        if slot.entry.is_some() {
            continue;
        }

        slot.entry = Some(SlotEntry {
            title: event.title.clone(),
            time_range: format!(
                "{}-{}",
                clock_label(start.hour(), start.minute()),
                clock_label(end.hour(), end.minute())
            ),
            kind: event.kind,
        });
    }

    slots
}
