//! Server process supervision
//!
//! Owns the lifecycle of exactly one child server process. The handle is
//! replaced, never mutated, on restart: `restart` consumes the old handle so
//! a stale one cannot be reused once replacement begins.

use std::path::PathBuf;
use std::process::{Child, Command};

use crate::config::Config;
use crate::error::{OmpwatchError, OmpwatchResult};

/// Handle to the currently running server process
#[derive(Debug)]
pub struct ServerHandle {
    child: Child,
}

impl ServerHandle {
    /// OS process id of the server
    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// Check liveness without blocking
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

/// Starts, terminates and restarts the server executable
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    executable: PathBuf,
    server_dir: PathBuf,
}

impl ProcessSupervisor {
    pub fn new(config: &Config) -> Self {
        Self {
            executable: config.entrypoint_path(),
            server_dir: config.server.directory.clone(),
        }
    }

    /// Launch the server executable as a child process.
    ///
    /// The child runs with the server directory as its working directory and
    /// inherits stdio, so server output lands on the supervisor's console.
    /// A missing or unspawnable executable is fatal.
    pub fn start(&self) -> OmpwatchResult<ServerHandle> {
        if !self.executable.is_file() {
            return Err(OmpwatchError::ExecutableNotFound {
                path: self.executable.clone(),
            });
        }

        let child = Command::new(&self.executable)
            .current_dir(&self.server_dir)
            .spawn()
            .map_err(|e| OmpwatchError::Launch {
                path: self.executable.clone(),
                source: e,
            })?;

        Ok(ServerHandle { child })
    }

    /// Forcefully terminate the server.
    ///
    /// Idempotent: killing an already-exited child yields `InvalidInput`,
    /// which is swallowed. The wait reaps the child so the pid is released.
    pub fn terminate(&self, handle: &mut ServerHandle) {
        let _ = handle.child.kill();
        let _ = handle.child.wait();
    }

    /// Terminate then start, as one logical operation.
    ///
    /// Consumes the old handle; the caller only ever holds the authoritative
    /// one. If the start half fails the error propagates and no handle
    /// remains — callers treat that as fatal rather than retrying.
    pub fn restart(&self, mut handle: ServerHandle) -> OmpwatchResult<ServerHandle> {
        self.terminate(&mut handle);
        self.start()
    }
}
