//! Periodic snapshot sync against the platform exporters.
//!
//! The calendar tool (icalBuddy or a compatible wrapper) prints today's
//! events as bulleted text; the reminders tool prints a todo JSON array.
//! Each sync run invokes the tool, parses stdout, writes the snapshot file
//! and publishes the result to the shared cache. A failed run leaves the
//! previous snapshot in place until the next interval.

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tokio::process::Command;

use crate::calendar::timeparse::parse_time_range;
use crate::config::InkboardConfig;
use crate::error::{InkboardError, InkboardResult};
use crate::event::RawEvent;
use crate::snapshot::{SnapshotCell, save_snapshot};
use crate::todo::{Todo, TodoCache};

/// icalBuddy flags: no property names, no calendar names, EVT: bullets,
/// exclude url/notes/location so only time and attendee lines remain.
pub const CALENDAR_TOOL_ARGS: &[&str] = &[
    "-npn",
    "-nc",
    "-b",
    "EVT:",
    "-eep",
    "url,notes,location",
    "eventsToday",
];

const EVENT_BULLET: &str = "EVT:";

/// Resolve `binary` on PATH and capture its stdout.
pub async fn run_tool(binary: &str, args: &[&str]) -> InkboardResult<String> {
    let path = which::which(binary)
        .map_err(|_| InkboardError::ToolNotInstalled(binary.to_string()))?;

    let output = Command::new(&path)
        .args(args)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::piped())
        .stderr(std::process::Stdio::inherit())
        .output()
        .await?;

    if !output.status.success() {
        return Err(InkboardError::Tool(format!(
            "{} exited with status {}",
            binary,
            output.status.code().unwrap_or(-1)
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run the calendar tool and publish today's events.
pub async fn sync_calendar(
    config: &InkboardConfig,
    cell: &SnapshotCell<Vec<RawEvent>>,
) -> InkboardResult<usize> {
    let stdout = run_tool(&config.calendar_tool, CALENDAR_TOOL_ARGS).await?;

    let tz = config.display_timezone;
    let today = Utc::now().with_timezone(&tz).date_naive();
    let events = parse_buddy_output(&stdout, tz, today);

    save_snapshot(&config.calendar_snapshot_path(), &events)?;
    let count = events.len();
    cell.store(events);
    Ok(count)
}

/// Run the reminders tool and publish the todo list. The tool's output is
/// already priority-sorted, so order is preserved as-is.
pub async fn sync_todos(config: &InkboardConfig, cache: &TodoCache) -> InkboardResult<usize> {
    let command = config
        .reminders_tool
        .as_deref()
        .ok_or_else(|| InkboardError::Config("reminders_tool is not configured".into()))?;

    let mut parts = command.split_whitespace();
    let binary = parts
        .next()
        .ok_or_else(|| InkboardError::Config("reminders_tool is empty".into()))?;
    let args: Vec<&str> = parts.collect();

    let stdout = run_tool(binary, &args).await?;
    let todos: Vec<Todo> = serde_json::from_str(stdout.trim())
        .map_err(|e| InkboardError::Parse(format!("reminders output: {e}")))?;

    save_snapshot(&config.todos_snapshot_path(), &todos)?;
    let count = todos.len();
    cache.publish(todos);
    Ok(count)
}

/// Parse icalBuddy's bulleted output.
///
/// Each `EVT:` line starts an event; following indented lines are either
/// the time range (anything with a `H:MM` clock or a continuation marker)
/// or attendee names. Events without a parseable range (all-day entries)
/// are dropped.
pub fn parse_buddy_output(output: &str, tz: Tz, today: NaiveDate) -> Vec<RawEvent> {
    struct Pending {
        title: String,
        time_str: Option<String>,
        attendees: Vec<String>,
    }

    let mut pending: Vec<Pending> = Vec::new();
    for line in output.lines() {
        if let Some(title) = line.strip_prefix(EVENT_BULLET) {
            pending.push(Pending {
                title: title.trim().to_string(),
                time_str: None,
                attendees: Vec::new(),
            });
            continue;
        }

        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let Some(current) = pending.last_mut() else {
            continue;
        };

        if looks_like_time(text) {
            current.time_str = Some(text.to_string());
        } else {
            current
                .attendees
                .extend(text.split(", ").map(|s| s.to_string()));
        }
    }

    pending
        .into_iter()
        .filter_map(|p| {
            use chrono::TimeZone;
            let (start, end) = parse_time_range(p.time_str.as_deref()?, today)?;
            let start = tz.from_local_datetime(&start).earliest()?;
            let end = tz.from_local_datetime(&end).earliest()?;
            Some(RawEvent {
                title: p.title,
                start: start.with_timezone(&Utc),
                end: end.with_timezone(&Utc),
                attendees: p.attendees,
                kind: None,
            })
        })
        .collect()
}

fn looks_like_time(text: &str) -> bool {
    if text.contains("...") {
        return true;
    }
    text.as_bytes().windows(3).any(|w| {
        w[0].is_ascii_digit() && w[1] == b':' && w[2].is_ascii_digit()
    })
}
