//! Tests for the watcher module

use super::event::{ChangeEvent, ChangeKind, WatchEvent, WatchOptions};
use super::router::{sync_all, ChangeRouter, RouteOutcome};
use super::run::watch;
use crate::config::{Config, ServerConfig, WatcherConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread::sleep;
use std::time::Duration;
use tempfile::tempdir;

const QUIET: Duration = Duration::from_millis(80);

fn test_config(root: &Path) -> Config {
    let server = root.join("server");
    let watch_dir = root.join("src");
    fs::create_dir_all(server.join("components")).unwrap();
    fs::create_dir_all(&watch_dir).unwrap();
    fs::write(watch_dir.join("a.json"), "{\"a\": 1}").unwrap();
    fs::write(watch_dir.join("b.json"), "{\"b\": 2}").unwrap();

    Config {
        server: ServerConfig {
            directory: server,
            entrypoint: "omp-server".to_string(),
        },
        watcher: WatcherConfig {
            directory: watch_dir,
            files: vec!["a.json".to_string(), "b.json".to_string()],
        },
    }
}

#[test]
fn test_watch_event_to_json_started() {
    let event = WatchEvent::WatchStarted {
        directory: "/src".to_string(),
        files: vec!["a.json".to_string()],
    };
    let json = event.to_json();
    assert!(json.contains("\"event\":\"watch_started\""));
    assert!(json.contains("\"directory\":\"/src\""));
    assert!(json.contains("\"command\":\"watch\""));
}

#[test]
fn test_watch_event_to_json_server_started() {
    let event = WatchEvent::ServerStarted { pid: 4242 };
    let json = event.to_json();
    assert!(json.contains("\"event\":\"server_started\""));
    assert!(json.contains("\"pid\":4242"));
}

#[test]
fn test_watch_event_to_json_sync_error() {
    let event = WatchEvent::SyncError {
        file: "a.json".to_string(),
        message: "copy \"failed\"".to_string(),
    };
    let json = event.to_json();
    assert!(json.contains("\"event\":\"sync_error\""));
    assert!(json.contains("\\\"failed\\\""));
}

#[test]
fn test_change_kind_from_notify() {
    use notify::event::{CreateKind, DataChange, EventKind, ModifyKind, RemoveKind};

    assert_eq!(
        ChangeKind::from(EventKind::Modify(ModifyKind::Data(DataChange::Content))),
        ChangeKind::Modify
    );
    assert_eq!(
        ChangeKind::from(EventKind::Create(CreateKind::File)),
        ChangeKind::Create
    );
    assert_eq!(
        ChangeKind::from(EventKind::Remove(RemoveKind::File)),
        ChangeKind::Remove
    );
    assert!(ChangeKind::Modify.is_modification());
    assert!(!ChangeKind::Create.is_modification());
}

#[test]
fn test_router_copies_watched_file_and_arms_restart() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let mut router = ChangeRouter::new(config.clone(), QUIET);

    let event = ChangeEvent {
        path: config.watcher.directory.join("a.json"),
        kind: ChangeKind::Modify,
    };

    match router.on_fs_event(&event) {
        RouteOutcome::Synced { file, .. } => assert_eq!(file, "a.json"),
        other => panic!("expected Synced, got {:?}", other),
    }
    assert!(config.components_dir().join("a.json").exists());

    // Restart armed but not due until the quiet period elapses
    assert!(!router.restart_due());
    sleep(QUIET + Duration::from_millis(20));
    assert!(router.restart_due());
    assert!(!router.restart_due());
}

#[test]
fn test_router_ignores_unwatched_file() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    fs::write(config.watcher.directory.join("c.json"), "{}").unwrap();
    let mut router = ChangeRouter::new(config.clone(), QUIET);

    let event = ChangeEvent {
        path: config.watcher.directory.join("c.json"),
        kind: ChangeKind::Modify,
    };

    assert!(matches!(router.on_fs_event(&event), RouteOutcome::Ignored));
    assert!(!config.components_dir().join("c.json").exists());

    // No copy, no restart
    sleep(QUIET + Duration::from_millis(20));
    assert!(!router.restart_due());
}

#[test]
fn test_router_ignores_non_modification() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let mut router = ChangeRouter::new(config.clone(), QUIET);

    for kind in [ChangeKind::Create, ChangeKind::Remove, ChangeKind::Other] {
        let event = ChangeEvent {
            path: config.watcher.directory.join("a.json"),
            kind,
        };
        assert!(matches!(router.on_fs_event(&event), RouteOutcome::Ignored));
    }

    sleep(QUIET + Duration::from_millis(20));
    assert!(!router.restart_due());
}

#[test]
fn test_router_ignores_path_outside_watch_dir() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let mut router = ChangeRouter::new(config.clone(), QUIET);

    let event = ChangeEvent {
        path: PathBuf::from("/elsewhere/a.json"),
        kind: ChangeKind::Modify,
    };
    assert!(matches!(router.on_fs_event(&event), RouteOutcome::Ignored));
}

#[test]
fn test_router_copy_failure_still_arms_restart() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    // Break the destination so the copy fails
    fs::remove_dir_all(config.components_dir()).unwrap();
    let mut router = ChangeRouter::new(config.clone(), QUIET);

    let event = ChangeEvent {
        path: config.watcher.directory.join("a.json"),
        kind: ChangeKind::Modify,
    };

    match router.on_fs_event(&event) {
        RouteOutcome::SyncFailed { file, error } => {
            assert_eq!(file, "a.json");
            assert!(!error.is_fatal());
        }
        other => panic!("expected SyncFailed, got {:?}", other),
    }

    // Restart proceeds with whatever did copy
    sleep(QUIET + Duration::from_millis(20));
    assert!(router.restart_due());
}

#[test]
fn test_router_burst_coalesces_to_one_restart() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    let mut router = ChangeRouter::new(config.clone(), QUIET);

    for _ in 0..5 {
        let event = ChangeEvent {
            path: config.watcher.directory.join("a.json"),
            kind: ChangeKind::Modify,
        };
        router.on_fs_event(&event);
        sleep(Duration::from_millis(10));
    }

    sleep(QUIET + Duration::from_millis(20));
    assert!(router.restart_due());
    assert!(!router.restart_due());
}

#[test]
fn test_sync_all_copies_every_watched_file() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());

    let results = sync_all(&config);
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|(_, r)| r.is_ok()));
    assert!(config.components_dir().join("a.json").exists());
    assert!(config.components_dir().join("b.json").exists());
}

#[test]
fn test_sync_all_reports_per_file_failures() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    // One source file missing: its copy fails, the other still lands
    fs::remove_file(config.watcher.directory.join("a.json")).unwrap();

    let results = sync_all(&config);
    assert_eq!(results.len(), 2);
    assert!(results.iter().any(|(f, r)| f == "a.json" && r.is_err()));
    assert!(results.iter().any(|(f, r)| f == "b.json" && r.is_ok()));
    assert!(config.components_dir().join("b.json").exists());
}

#[cfg(unix)]
fn write_fake_server(config: &Config) {
    use std::os::unix::fs::PermissionsExt;

    let path = config.entrypoint_path();
    fs::write(&path, "#!/bin/sh\nsleep 5\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_watch_initial_sync_and_start() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    write_fake_server(&config);

    let options = WatchOptions::new(config.clone()).with_quiet_period(QUIET);

    let events: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();

    let running = Arc::new(AtomicBool::new(false)); // Stop immediately

    watch(options, running, |event| {
        events_clone.lock().unwrap().push(event.to_json());
    })
    .unwrap();

    let captured = events.lock().unwrap();
    assert!(captured[0].contains("watch_started"));
    assert!(captured.iter().any(|e| e.contains("file_copied")));
    assert!(captured.iter().any(|e| e.contains("server_started")));
    assert!(captured.last().unwrap().contains("shutdown"));

    // Initial sync is unconditional
    assert!(config.components_dir().join("a.json").exists());
    assert!(config.components_dir().join("b.json").exists());
}

#[test]
fn test_watch_launch_failure_is_fatal() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    // No server executable written

    let options = WatchOptions::new(config).with_quiet_period(QUIET);
    let running = Arc::new(AtomicBool::new(false));

    let result = watch(options, running, |_| {});
    assert!(matches!(
        result,
        Err(crate::error::OmpwatchError::ExecutableNotFound { .. })
    ));
}
