//! Core types and transforms for the inkboard dashboard.
//!
//! This crate holds everything deterministic and testable: event types and
//! the calendar ingestion chain, todo records and their cache, weather /
//! GitHub / Hacker News fetchers, snapshot persistence, sync-tool
//! invocation, and the timeline projection. The server crate wires these
//! into HTTP routes and background loops.

pub mod calendar;
pub mod config;
pub mod error;
pub mod event;
pub mod github;
pub mod hackernews;
pub mod snapshot;
pub mod sync;
pub mod timeline;
pub mod todo;
pub mod weather;

pub use config::InkboardConfig;
pub use error::{InkboardError, InkboardResult};
pub use event::{Event, EventKind, RawEvent, TimeDisplay};
