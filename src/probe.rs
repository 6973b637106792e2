//! Process-table probe for the player executable.
//!
//! Decides whether the full command menu or the reduced one is offered.
//! The result is a point-in-time snapshot; the player may exit right after.

use std::path::PathBuf;

/// A process found in the table: pid plus its scheduler state line
/// (e.g. "S (sleeping)").
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessHandle {
    pub pid: i32,
    pub state: String,
}

impl ProcessHandle {
    /// Re-check liveness without signalling.
    pub fn is_alive(&self) -> bool {
        // kill(pid, 0) checks existence without sending a signal
        unsafe { libc::kill(self.pid, 0) == 0 }
    }
}

#[derive(Debug, Clone)]
pub struct ProcessProbe {
    root: PathBuf,
}

impl Default for ProcessProbe {
    fn default() -> Self {
        Self {
            root: PathBuf::from("/proc"),
        }
    }
}

impl ProcessProbe {
    /// Probe against an alternate proc root (tests).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Scan the process table for the first process named `process`.
    ///
    /// Entries that vanish mid-scan or carry an unreadable status file are
    /// skipped; a race here means "not found for this entry", never a failure.
    pub fn find(&self, process: &str) -> Option<ProcessHandle> {
        let entries = std::fs::read_dir(&self.root).ok()?;
        for entry in entries.flatten() {
            let pid: i32 = match entry.file_name().to_string_lossy().parse() {
                Ok(pid) => pid,
                Err(_) => continue,
            };
            let status = match std::fs::read_to_string(entry.path().join("status")) {
                Ok(content) => content,
                Err(_) => continue,
            };
            let mut name = None;
            let mut state = None;
            for line in status.lines() {
                if let Some(value) = line.strip_prefix("Name:") {
                    name = Some(value.trim().to_string());
                } else if let Some(value) = line.strip_prefix("State:") {
                    state = Some(value.trim().to_string());
                }
                if name.is_some() && state.is_some() {
                    break;
                }
            }
            if name.as_deref() == Some(process) {
                return Some(ProcessHandle {
                    pid,
                    state: state.unwrap_or_default(),
                });
            }
        }
        None
    }

    /// Convenience liveness check.
    pub fn is_running(&self, process: &str) -> bool {
        self.find(process).is_some()
    }
}
