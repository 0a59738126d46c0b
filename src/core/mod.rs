// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core runtime services.
//!
//! ```text
//!        core
//!         |
//!         v
//!      process
//!   ProcessBuilder --> tokio::process
//!   timeout + CancellationToken
//! ```

pub mod process;
