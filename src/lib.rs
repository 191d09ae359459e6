//! ompwatch - development-loop supervisor for open.mp servers
//!
//! ompwatch watches a set of source files, copies changed ones into a running
//! server's installation and restarts the server process with debounced,
//! coalesced restarts.

pub mod config;
pub mod error;
pub mod process;
pub mod watcher;

// Re-exports for convenience
pub use config::{Config, ServerConfig, WatcherConfig, CONFIG_FILE_NAME};
pub use error::{OmpwatchError, OmpwatchResult};
pub use process::{ProcessSupervisor, ServerHandle};
pub use watcher::{watch, sync_all, WatchEvent, WatchOptions, QUIET_PERIOD_MS};
