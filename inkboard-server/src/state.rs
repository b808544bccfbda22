use std::sync::Arc;

use anyhow::Result;
use inkboard_core::calendar::{self, EventSource};
use inkboard_core::snapshot::{SnapshotCell, load_snapshot};
use inkboard_core::todo::{Todo, TodoCache};
use inkboard_core::{InkboardConfig, RawEvent};

/// Shared application state: configuration, one HTTP client, and the two
/// snapshot caches the sync loops publish into.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<InkboardConfig>,
    pub http: reqwest::Client,
    pub calendar: SnapshotCell<Vec<RawEvent>>,
    pub todos: TodoCache,
}

impl AppState {
    /// Build state and prime both caches from any snapshot files left by a
    /// previous run. A corrupt file is logged and treated as absent.
    pub fn new(config: InkboardConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("inkboard/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let calendar = SnapshotCell::default();
        match load_snapshot::<Vec<RawEvent>>(&config.calendar_snapshot_path()) {
            Ok(Some(events)) => calendar.store(events),
            Ok(None) => {}
            Err(err) => eprintln!("Ignoring unreadable calendar snapshot: {err}"),
        }

        let todos = TodoCache::default();
        match load_snapshot::<Vec<Todo>>(&config.todos_snapshot_path()) {
            Ok(Some(list)) => todos.publish(list),
            Ok(None) => {}
            Err(err) => eprintln!("Ignoring unreadable todos snapshot: {err}"),
        }

        Ok(AppState {
            config: Arc::new(config),
            http,
            calendar,
            todos,
        })
    }

    /// The calendar fallback chain for one request.
    pub fn event_sources(&self) -> Vec<Box<dyn EventSource>> {
        calendar::default_sources(
            self.calendar.load(),
            self.http.clone(),
            self.config.calendar_url.clone(),
        )
    }
}
