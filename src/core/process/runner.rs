// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Running a [`ProcessBuilder`].
//!
//! ```text
//! cancelled? --> Interrupted
//! resolve_program --> ExecutableNotFound
//! spawn --> SpawnFailed
//! select { exit | deadline --> Timeout | token --> Interrupted }
//! exit != 0 --> NonZeroExit (with captured stderr)
//! ```

use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use super::builder::{Capture, ProcessBuilder, ProcessOutput};
use super::io::{Drain, deadline};
use crate::error::{GickupResult, ProcessError};

enum Wait {
    Exited(std::io::Result<ExitStatus>),
    TimedOut,
    Cancelled,
}

impl ProcessBuilder {
    /// Runs to completion without a cancellation source.
    ///
    /// # Errors
    ///
    /// Returns a [`ProcessError`] if the program is missing, cannot be
    /// spawned, times out or exits non-zero.
    pub async fn run(self) -> GickupResult<ProcessOutput> {
        self.run_with_cancellation(CancellationToken::new()).await
    }

    /// Runs to completion, killing the child when `token` is cancelled. A
    /// token that is already cancelled prevents the spawn.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run), plus `ProcessError::Interrupted`.
    pub async fn run_with_cancellation(
        self,
        token: CancellationToken,
    ) -> GickupResult<ProcessOutput> {
        let command = self.command_line();
        if token.is_cancelled() {
            return Err(ProcessError::Interrupted { command }.into());
        }

        let program = self.resolve_program()?;
        let name = self.display_name();
        debug!(cmd = %command, "exec");

        let mut child = Command::new(&program)
            .args(&self.args)
            .envs(self.envs.iter().cloned())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProcessError::SpawnFailed {
                command: command.clone(),
                source,
            })?;
        trace!(process = %name, pid = ?child.id(), "spawned");

        let stdout = Drain::start(
            child.stdout.take(),
            self.capture.contains(Capture::STDOUT),
            &name,
            "stdout",
        );
        let stderr = Drain::start(
            child.stderr.take(),
            self.capture.contains(Capture::STDERR),
            &name,
            "stderr",
        );

        let wait = tokio::select! {
            status = child.wait() => Wait::Exited(status),
            () = deadline(self.timeout) => Wait::TimedOut,
            () = token.cancelled() => Wait::Cancelled,
        };

        let status = match wait {
            Wait::Exited(status) => {
                status.map_err(|source| ProcessError::WaitFailed {
                    command: command.clone(),
                    source,
                })?
            }
            Wait::TimedOut => {
                let timeout_secs = self.timeout.unwrap_or_default().as_secs();
                warn!(process = %name, timeout_secs, "timed out, killing");
                child.kill().await.ok();
                return Err(ProcessError::Timeout {
                    command,
                    timeout_secs,
                }
                .into());
            }
            Wait::Cancelled => {
                warn!(process = %name, "interrupted, killing");
                child.kill().await.ok();
                return Err(ProcessError::Interrupted { command }.into());
            }
        };

        let output = ProcessOutput {
            code: status.code(),
            stdout: stdout.finish().await,
            stderr: stderr.finish().await,
        };
        if !status.success() {
            return Err(ProcessError::NonZeroExit {
                command,
                code: output.code.unwrap_or(-1),
                stderr: output.stderr.trim().to_string(),
            }
            .into());
        }

        trace!(process = %name, "completed");
        Ok(output)
    }
}
