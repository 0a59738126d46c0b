// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Draining child output.
//!
//! Both pipes are always read to the end, otherwise a chatty `find` over a
//! large tree would fill the pipe and stall.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::{trace, warn};

/// A background reader for one pipe.
pub(super) struct Drain(Option<JoinHandle<String>>);

impl Drain {
    /// Starts reading `stream`. Lines are returned by [`finish`](Self::finish)
    /// when `keep` is set and only traced otherwise.
    pub(super) fn start<R>(stream: Option<R>, keep: bool, program: &str, stream_name: &'static str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let program = program.to_string();
        Self(stream.map(|stream| {
            tokio::spawn(async move { read_lines(stream, keep, &program, stream_name).await })
        }))
    }

    pub(super) async fn finish(self) -> String {
        match self.0 {
            Some(handle) => handle.await.unwrap_or_default(),
            None => String::new(),
        }
    }
}

/// Resolves after `timeout`, never when there is none.
pub(super) async fn deadline(timeout: Option<Duration>) {
    match timeout {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending().await,
    }
}

/// Reads `stream` line by line until EOF. Bytes that are not UTF-8 are
/// replaced rather than ending the read.
async fn read_lines<R>(stream: R, keep: bool, program: &str, stream_name: &str) -> String
where
    R: AsyncRead + Unpin,
{
    let mut kept = Vec::new();
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                while matches!(buf.last(), Some(b'\n' | b'\r')) {
                    buf.pop();
                }
                let line = String::from_utf8_lossy(&buf);
                if keep {
                    kept.push(line.into_owned());
                } else {
                    trace!(process = %program, stream = stream_name, %line);
                }
            }
            Err(e) => {
                warn!(process = %program, stream = stream_name, error = %e, "output not readable");
                break;
            }
        }
    }
    kept.join("\n")
}
