// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git operations module.
//!
//! ```text
//!      query.rs          registry / backup
//!         |                     |
//!         v                     v
//!      ,------------------------------,
//!      |       backend (traits)       |
//!      '--+------------------------+--'
//!         |                        |
//!         v                        v
//!    GitQuery                 GitMutation
//!   (gix, read)            (CLI, write, async)
//!         |                        |
//!         v                        v
//!    GixBackend               ShellBackend
//!    .is_git_repo             .init_bare
//!    .remote_url              .add_remote
//!                             .fetch
//! ```
//!
//! **`GixBackend`**: pure Rust, no subprocess, read-only.
//! **`ShellBackend`**: git CLI, so ssh agents, credential helpers and
//! `~/.ssh/config` behave exactly as they do for the user.

pub mod backend;
pub mod query;

pub use backend::{GitMutation, ShellBackend};

#[cfg(test)]
pub(crate) mod testing;
