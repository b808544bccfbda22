//! Background sync loops.
//!
//! Each loop ticks on a fixed interval (first tick immediately at startup),
//! shells out to its exporter tool and publishes the fresh snapshot.
//! Failures are logged and retried on the next tick only; overlapping runs
//! are not prevented, a run is expected to finish well inside the interval.

use std::time::Duration;

use inkboard_core::sync::{sync_calendar, sync_todos};

use crate::state::AppState;

pub fn spawn_sync_loops(state: AppState) {
    let interval = Duration::from_secs(state.config.sync_interval_secs);

    {
        let state = state.clone();
        tokio::spawn(async move {
            println!("Starting calendar sync loop ({}s)", interval.as_secs());
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match sync_calendar(&state.config, &state.calendar).await {
                    Ok(count) => println!("Calendar synced: {count} events"),
                    Err(err) => eprintln!("Calendar sync error: {err}"),
                }
            }
        });
    }

    if state.config.reminders_tool.is_some() {
        tokio::spawn(async move {
            println!("Starting todos sync loop ({}s)", interval.as_secs());
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match sync_todos(&state.config, &state.todos).await {
                    Ok(count) => println!("Todos synced: {count} items"),
                    Err(err) => eprintln!("Todos sync error: {err}"),
                }
            }
        });
    } else {
        println!("No reminders_tool configured, todos sync disabled");
    }
}
