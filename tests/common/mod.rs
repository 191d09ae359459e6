//! Shared helpers for CLI tests

use std::fs;
use std::path::{Path, PathBuf};

/// Lay out a server installation, a watch directory with two watched files
/// and a config pointing at both. Returns the config path.
pub fn setup_project(root: &Path) -> PathBuf {
    let server = root.join("server");
    let watch_dir = root.join("src");
    fs::create_dir_all(server.join("components")).unwrap();
    fs::create_dir_all(&watch_dir).unwrap();
    fs::write(watch_dir.join("a.json"), "{\"a\": 1}").unwrap();
    fs::write(watch_dir.join("b.json"), "{\"b\": 2}").unwrap();

    let config = format!(
        r#"[server]
directory = "{0}/server"

[watcher]
directory = "{0}/src"
files = ["a.json", "b.json"]
"#,
        root.display()
    );
    let config_path = root.join(".ompwatch.toml");
    fs::write(&config_path, config).unwrap();
    config_path
}

/// Write a fake server executable that exits on its own after a few seconds,
/// so test runs don't leak processes (ompwatch does not stop the server on
/// shutdown).
#[cfg(unix)]
#[allow(dead_code)]
pub fn write_fake_server(root: &Path) {
    use std::os::unix::fs::PermissionsExt;

    let path = root.join("server/omp-server");
    fs::write(&path, "#!/bin/sh\nsleep 3\n").unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}
