//! File watcher for continuous sync and server restarts
//!
//! Implements the `watch` command with:
//! - Top-level watch of the configured directory
//! - Debounced, coalesced restarts (1s default quiet period)
//! - Graceful Ctrl+C shutdown (the server itself is left running)
//! - NDJSON output for CI

mod debounce;
mod event;
mod router;
mod run;

#[cfg(test)]
mod tests;

pub use debounce::{DebounceScheduler, QUIET_PERIOD_MS};
pub use event::{ChangeEvent, ChangeKind, WatchEvent, WatchOptions};
pub use router::{copy_to_server, sync_all, ChangeRouter, RouteOutcome};
pub use run::watch;
