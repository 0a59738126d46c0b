// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Spawn settings for one external command.
//!
//! ```text
//! ProcessBuilder::new("ssh")
//!   .arg(host) .args(["find", path]) .env(k, v)
//!   .capture(Capture::STDOUT) .timeout(Some(limit))
//! ```

use std::ffi::{OsStr, OsString};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bitflags::bitflags;

use crate::error::ProcessError;

bitflags! {
    /// Output streams kept in [`ProcessOutput`]. Streams that are not kept
    /// are still drained and logged at trace level.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Capture: u8 {
        const STDOUT = 1;
        const STDERR = 1 << 1;
    }
}

/// What a finished command left behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub(super) code: Option<i32>,
    pub(super) stdout: String,
    pub(super) stderr: String,
}

impl ProcessOutput {
    /// Exit code, `None` when the process was killed by a signal.
    #[must_use]
    pub const fn code(&self) -> Option<i32> {
        self.code
    }

    #[must_use]
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    #[must_use]
    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}

/// A command line plus how to run it.
///
/// The child never gets a terminal on stdin, so `git` and `ssh` fail
/// instead of waiting for a password.
#[derive(Debug, Clone)]
pub struct ProcessBuilder {
    pub(super) program: OsString,
    pub(super) args: Vec<OsString>,
    pub(super) envs: Vec<(OsString, OsString)>,
    pub(super) capture: Capture,
    pub(super) timeout: Option<Duration>,
}

impl ProcessBuilder {
    /// A bare program name is looked up in `PATH` when the command runs.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            envs: Vec::new(),
            capture: Capture::empty(),
            timeout: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Adds a variable on top of the inherited environment.
    #[must_use]
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    #[must_use]
    pub const fn capture(mut self, capture: Capture) -> Self {
        self.capture = capture;
        self
    }

    /// Keeps both stdout and stderr.
    #[must_use]
    pub const fn capture_output(self) -> Self {
        self.capture(Capture::all())
    }

    /// Kills the command once `timeout` has passed. `None` waits forever.
    #[must_use]
    pub const fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Program and arguments as one line, for logs and error messages.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.program.to_string_lossy().into_owned();
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                let _ = write!(line, " \"{arg}\"");
            } else {
                let _ = write!(line, " {arg}");
            }
        }
        line
    }

    /// Short name used in log fields.
    pub(super) fn display_name(&self) -> String {
        Path::new(&self.program)
            .file_stem()
            .map_or_else(|| "process".to_string(), |s| s.to_string_lossy().into_owned())
    }

    /// The executable to spawn. Names without a directory part go through
    /// `PATH`.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::ExecutableNotFound` if a bare name is not in
    /// `PATH`.
    pub fn resolve_program(&self) -> Result<PathBuf, ProcessError> {
        let program = Path::new(&self.program);
        if program.components().count() > 1 {
            return Ok(program.to_path_buf());
        }
        which::which(program).map_err(|_| ProcessError::ExecutableNotFound {
            name: self.program.to_string_lossy().into_owned(),
        })
    }
}
