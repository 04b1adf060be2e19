//! # Encode Log Module
//!
//! Append-only log shared by every worker. Each encoder invocation appends a
//! `Running: <command>` line, then the encoder's stdout and stderr are
//! redirected straight into the same file.
//!
//! The file is opened with `O_APPEND`, so every `write` lands at the current
//! end of file. Lines from concurrent jobs may interleave, but a single line is
//! never torn. The log is never truncated across runs.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// Shared append-only encoder log
#[derive(Debug)]
pub struct EncodeLog {
    path: PathBuf,
    file: File,
}

impl EncodeLog {
    /// Open (or create) the log in append mode
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record the exact command about to run, as one append
    pub fn record_command(&self, command: &str) -> io::Result<()> {
        let line = format!("Running: {}\n", command);
        (&self.file).write_all(line.as_bytes())
    }

    /// Handles redirecting a child's stdout and stderr into the log
    pub fn child_stdio(&self) -> io::Result<(Stdio, Stdio)> {
        let stdout = self.file.try_clone()?;
        let stderr = self.file.try_clone()?;
        Ok((Stdio::from(stdout), Stdio::from(stderr)))
    }
}
