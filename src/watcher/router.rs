//! Change routing: filter, sync, schedule
//!
//! Takes raw filesystem notifications, drops everything that is not a
//! content modification of a watched file, copies the survivors into the
//! server's components directory and arms the debounced restart.

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::config::Config;
use crate::error::{OmpwatchError, OmpwatchResult};
use crate::watcher::debounce::DebounceScheduler;
use crate::watcher::event::ChangeEvent;

/// What the router did with a single filesystem event
#[derive(Debug)]
pub enum RouteOutcome {
    /// Not a watched file or not a content modification; no side effects
    Ignored,
    /// File copied into the server, restart armed
    Synced { file: String, destination: String },
    /// Copy failed; the restart is still armed so the server picks up
    /// whatever did copy
    SyncFailed { file: String, error: OmpwatchError },
}

/// Routes filesystem events to file sync and restart scheduling
#[derive(Debug)]
pub struct ChangeRouter {
    config: Config,
    scheduler: DebounceScheduler,
}

impl ChangeRouter {
    pub fn new(config: Config, quiet_period: Duration) -> Self {
        Self {
            config,
            scheduler: DebounceScheduler::new(quiet_period),
        }
    }

    /// Handle one raw change notification.
    ///
    /// Sync errors are caught here and surfaced in the outcome; they never
    /// escape to the watch loop.
    pub fn on_fs_event(&mut self, event: &ChangeEvent) -> RouteOutcome {
        if !event.kind.is_modification() {
            return RouteOutcome::Ignored;
        }

        let Some(file) = self.watched_name(&event.path) else {
            return RouteOutcome::Ignored;
        };

        let outcome = match copy_to_server(&self.config, &file) {
            Ok(destination) => RouteOutcome::Synced {
                file,
                destination: destination.display().to_string(),
            },
            Err(error) => RouteOutcome::SyncFailed { file, error },
        };

        self.scheduler.request();
        outcome
    }

    /// Consume the pending restart if its quiet period has elapsed
    pub fn restart_due(&mut self) -> bool {
        self.scheduler.take_due()
    }

    /// Resolve an absolute event path to a watched file name.
    ///
    /// The watch is top-level only, so the relative path must be a bare file
    /// name that is a member of the configured set.
    fn watched_name(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.config.watcher.directory).ok()?;
        let name = relative.to_str()?;
        if self.config.is_watched(name) {
            Some(name.to_string())
        } else {
            None
        }
    }
}

/// Copy one watched file into `<server>/components/`, overwriting
pub fn copy_to_server(config: &Config, file: &str) -> OmpwatchResult<std::path::PathBuf> {
    let source = config.watcher.directory.join(file);
    let destination = config.components_dir().join(file);

    fs::copy(&source, &destination).map_err(|e| OmpwatchError::Sync {
        file: source.clone(),
        source: e,
    })?;

    Ok(destination)
}

/// Copy every watched file into the server, unconditionally.
///
/// Used by the watch loop's startup sync and the one-shot `sync` command.
/// Per-file failures don't abort the remaining copies.
pub fn sync_all(config: &Config) -> Vec<(String, OmpwatchResult<std::path::PathBuf>)> {
    config
        .watcher
        .files
        .iter()
        .map(|file| (file.clone(), copy_to_server(config, file)))
        .collect()
}
