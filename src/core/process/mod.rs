// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning.
//!
//! ```text
//! ProcessBuilder::new("git")
//!   .args() .env() .capture_output() .timeout()
//!   .run() / .run_with_cancellation(token)
//!       --> tokio::process::Command (stdin closed)
//!       --> ProcessOutput { code, stdout, stderr }
//! ```
//!
//! `git` and `ssh` are the only programs this crate spawns. Both talk to
//! remote hosts that may hang, so every invocation can be bounded by a
//! timeout and interrupted through a `CancellationToken`.

pub mod builder;
mod io;
mod runner;
