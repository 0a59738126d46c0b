// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git query operations using gix backend.
//!
//! ```text
//! query.rs --> GixBackend --> <repo>.git/ (no subprocess)
//! ```

use std::path::Path;

use crate::error::GickupResult;

use super::backend::{GitQuery, GixBackend};

#[must_use]
pub fn is_git_repo(path: &Path) -> bool {
    GixBackend::is_git_repo(path)
}

/// Fetch URL of the `origin` remote.
///
/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened.
pub fn origin_url(path: &Path) -> GickupResult<Option<String>> {
    GixBackend::remote_url(path, "origin")
}

/// Whether the repository at `path` has a reference under `prefix`.
///
/// # Errors
///
/// Returns a `GitError` if the repository cannot be opened or its refs
/// cannot be listed.
pub fn has_refs_under(path: &Path, prefix: &str) -> GickupResult<bool> {
    GixBackend::has_refs_under(path, prefix)
}
