// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! List command implementation for gickup.

use std::path::Path;

use anyhow::bail;

use super::Session;
use crate::cli::repo::ListArgs;
use crate::error::Result;
use crate::git::query;

/// State of one backup repository on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupHealth {
    Ok,
    Missing,
    NotARepository,
    NoOrigin,
    OriginMismatch(String),
    Unreadable(String),
}

impl BackupHealth {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    fn describe(&self) -> String {
        match self {
            Self::Ok => "ok".to_string(),
            Self::Missing => "missing".to_string(),
            Self::NotARepository => "not a git repository".to_string(),
            Self::NoOrigin => "no origin remote".to_string(),
            Self::OriginMismatch(found) => format!("origin points to {found}"),
            Self::Unreadable(e) => format!("unreadable: {e}"),
        }
    }
}

/// Checks that `path` is a repository whose `origin` is `url`.
#[must_use]
pub fn verify_backup(url: &str, path: &Path) -> BackupHealth {
    if !path.exists() {
        return BackupHealth::Missing;
    }
    if !query::is_git_repo(path) {
        return BackupHealth::NotARepository;
    }
    match query::origin_url(path) {
        Ok(Some(origin)) if origin == url => BackupHealth::Ok,
        Ok(Some(origin)) => BackupHealth::OriginMismatch(origin),
        Ok(None) => BackupHealth::NoOrigin,
        Err(e) => BackupHealth::Unreadable(e.to_string()),
    }
}

/// Main handler for list command.
///
/// # Errors
///
/// With `--verify`, returns an error if any backup is unhealthy.
pub fn run_list_command(args: &ListArgs, session: &Session) -> Result<()> {
    let registry = &session.registry;

    if registry.sources().is_empty() {
        println!("No repository indices configured");
    } else {
        println!("Repository indices:");
        for source in registry.sources() {
            println!("  {source}");
        }
    }

    if registry.repos().is_empty() {
        println!("No repositories registered");
        return Ok(());
    }

    println!("Repositories:");
    let mut unhealthy = 0usize;
    for (url, path) in registry.repos() {
        if args.verify {
            let health = verify_backup(url, path);
            if !health.is_ok() {
                unhealthy += 1;
            }
            println!("  {url} -> {} [{}]", path.display(), health.describe());
        } else {
            println!("  {url} -> {}", path.display());
        }
    }

    for (path, urls) in registry.path_collisions() {
        eprintln!(
            "Warning: {} is shared by {}",
            path.display(),
            urls.join(", ")
        );
    }

    if unhealthy > 0 {
        bail!("{unhealthy} backup(s) failed verification");
    }
    Ok(())
}
