//! Watch event types and options

use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::watcher::debounce::QUIET_PERIOD_MS;

/// Watch options
#[derive(Debug, Clone)]
pub struct WatchOptions {
    /// Immutable configuration loaded at startup
    pub config: Config,
    /// Quiet period before a coalesced restart fires
    pub quiet_period: Duration,
    /// Output as NDJSON
    pub json: bool,
}

impl WatchOptions {
    /// Create watch options with the default quiet period
    pub fn new(config: Config) -> Self {
        Self {
            config,
            quiet_period: Duration::from_millis(QUIET_PERIOD_MS),
            json: false,
        }
    }

    /// Override the quiet period
    pub fn with_quiet_period(mut self, quiet_period: Duration) -> Self {
        self.quiet_period = quiet_period;
        self
    }

    /// Set JSON output mode
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }
}

/// Kind of filesystem change, reduced from `notify`'s event taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Modify,
    Create,
    Remove,
    Other,
}

impl From<notify::EventKind> for ChangeKind {
    fn from(kind: notify::EventKind) -> Self {
        use notify::EventKind;
        match kind {
            EventKind::Modify(_) => ChangeKind::Modify,
            EventKind::Create(_) => ChangeKind::Create,
            EventKind::Remove(_) => ChangeKind::Remove,
            _ => ChangeKind::Other,
        }
    }
}

impl ChangeKind {
    /// Only content modifications trigger a sync; creates, removes and
    /// access/metadata noise are discarded.
    pub fn is_modification(&self) -> bool {
        matches!(self, ChangeKind::Modify)
    }
}

/// Transient value produced by the filesystem watcher, consumed immediately
/// by the router; never persisted.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Watch event types for NDJSON output
#[derive(Debug, Clone, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WatchEvent {
    /// Watch started
    WatchStarted {
        directory: String,
        files: Vec<String>,
    },
    /// Server process launched
    ServerStarted { pid: u32 },
    /// Server process about to be killed for a restart
    ServerStopping { pid: u32 },
    /// A watched file changed on disk
    FileChanged { path: String },
    /// A watched file was copied into the server
    FileCopied { file: String, destination: String },
    /// A copy failed; the watch loop keeps running
    SyncError { file: String, message: String },
    /// Fatal error
    Error { message: String },
    /// Watch stopped (the server is left running)
    Shutdown,
}

impl WatchEvent {
    /// Convert to JSON string with "command": "watch" field included
    pub fn to_json(&self) -> String {
        let mut value =
            serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({"event": "error"}));
        if let Some(obj) = value.as_object_mut() {
            obj.insert("command".to_string(), serde_json::json!("watch"));
        }
        serde_json::to_string(&value).unwrap_or_else(|_| "{}".to_string())
    }
}
