//! The watch loop
//!
//! Wires the `notify` event source to the change router and drives the
//! debounced server restarts. Runs on the calling thread until the running
//! flag is cleared (Ctrl+C handler in the binary).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Config as NotifyConfig, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::OmpwatchResult;
use crate::process::ProcessSupervisor;
use crate::watcher::event::{ChangeEvent, ChangeKind, WatchEvent, WatchOptions};
use crate::watcher::router::{sync_all, ChangeRouter, RouteOutcome};

/// How long the loop blocks on the event channel before re-checking the
/// running flag and the restart deadline
const POLL_INTERVAL_MS: u64 = 50;

/// Start watching for file changes (blocking).
///
/// Startup: full sync of every watched file, then server launch — a launch
/// failure is fatal. After that the loop routes change events until the
/// running flag clears. On shutdown the watcher is dropped but the server is
/// intentionally left running.
pub fn watch(
    options: WatchOptions,
    running: Arc<AtomicBool>,
    event_callback: impl Fn(WatchEvent),
) -> OmpwatchResult<()> {
    let config = &options.config;

    event_callback(WatchEvent::WatchStarted {
        directory: config.watcher.directory.display().to_string(),
        files: config.watcher.files.clone(),
    });

    // Initial full sync: unconditional, per-file failures are non-fatal
    for (file, result) in sync_all(config) {
        match result {
            Ok(destination) => event_callback(WatchEvent::FileCopied {
                file,
                destination: destination.display().to_string(),
            }),
            Err(e) => event_callback(WatchEvent::SyncError {
                file,
                message: e.to_string(),
            }),
        }
    }

    let supervisor = ProcessSupervisor::new(config);
    let mut handle = supervisor.start()?;
    event_callback(WatchEvent::ServerStarted { pid: handle.pid() });

    // Set up file watcher; notify errors are forwarded through the channel
    // and treated as fatal below
    let (tx, rx) = channel();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| {
            let _ = tx.send(res);
        },
        NotifyConfig::default(),
    )?;

    // Top-level only: subdirectories of the watch directory are not relevant
    watcher.watch(&config.watcher.directory, RecursiveMode::NonRecursive)?;

    let mut router = ChangeRouter::new(config.clone(), options.quiet_period);

    // Startup cooldown: drain any initial events from notify (it sometimes
    // sends events for existing files when the watcher is first registered)
    let cooldown_end = Instant::now() + Duration::from_millis(200);
    while Instant::now() < cooldown_end {
        let _ = rx.recv_timeout(Duration::from_millis(POLL_INTERVAL_MS));
    }

    while running.load(Ordering::SeqCst) {
        if let Ok(res) = rx.recv_timeout(Duration::from_millis(POLL_INTERVAL_MS)) {
            // A failed watch source is fatal; no re-subscription is attempted
            let event = res?;
            let kind = ChangeKind::from(event.kind);

            for path in event.paths {
                let change = ChangeEvent { path, kind };
                match router.on_fs_event(&change) {
                    RouteOutcome::Ignored => {}
                    RouteOutcome::Synced { file, destination } => {
                        event_callback(WatchEvent::FileChanged {
                            path: change.path.display().to_string(),
                        });
                        event_callback(WatchEvent::FileCopied { file, destination });
                    }
                    RouteOutcome::SyncFailed { file, error } => {
                        event_callback(WatchEvent::FileChanged {
                            path: change.path.display().to_string(),
                        });
                        event_callback(WatchEvent::SyncError {
                            file,
                            message: error.to_string(),
                        });
                    }
                }
            }
        }

        // Debounced restart: the handle is replaced wholesale, so no stale
        // handle survives past this point. Requests arriving while the
        // restart runs queue in the channel and arm the next deadline.
        if router.restart_due() {
            event_callback(WatchEvent::ServerStopping { pid: handle.pid() });
            handle = supervisor.restart(handle)?;
            event_callback(WatchEvent::ServerStarted { pid: handle.pid() });
        }
    }

    // Stop accepting events; the server child is left running on purpose
    drop(watcher);
    event_callback(WatchEvent::Shutdown);
    Ok(())
}
