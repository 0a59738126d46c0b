// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup orchestration.
//!
//! ```text
//! BackupStamp::now(dateformat)            (one per run)
//!   timestamp  2026-10-19/14-03-59
//!   refspec    refs/heads/*:refs/heads/backup/<timestamp>/*
//!
//! plan_backup(registry, explicit paths)
//!   explicit   --> deduplicated, in order
//!   registry   --> every path, colliding ones rejected
//!
//! BackupOrchestrator::run_backup(targets)
//!   --buffered(n)--> is_git_repo? --> git fetch origin <refspec>
//!   --> BackupReport { outcome per path, input order }
//! ```
//!
//! Fetches only ever add refs under `refs/heads/backup/`. A failing
//! repository is recorded and the run moves on.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone};
use futures_util::StreamExt;
use futures_util::stream;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::error::{ConfigError, GickupError, GickupResult, GitError, RegistryError};
use crate::git::GitMutation;
use crate::git::query;
use crate::registry::Registry;

/// Timestamp layout used when the registry does not set one.
pub const DEFAULT_DATEFORMAT: &str = "%Y-%m-%d/%H-%M-%S";

/// Remote every backup fetches from.
pub const BACKUP_REMOTE: &str = "origin";

/// The timestamp and refspec shared by all repositories of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupStamp {
    timestamp: String,
    refspec: String,
}

impl BackupStamp {
    /// Formats `at` with `dateformat`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if the format is not a valid
    /// strftime string or does not produce a valid ref name fragment.
    pub fn new<Tz: TimeZone>(dateformat: &str, at: &DateTime<Tz>) -> Result<Self, ConfigError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let timestamp = format_timestamp(dateformat, at)?;
        let refspec = format!("refs/heads/*:refs/heads/backup/{timestamp}/*");
        Ok(Self { timestamp, refspec })
    }

    /// Stamp for the current local time.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new).
    pub fn now(dateformat: &str) -> Result<Self, ConfigError> {
        Self::new(dateformat, &Local::now())
    }

    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    #[must_use]
    pub fn refspec(&self) -> &str {
        &self.refspec
    }

    /// Namespace the fetch writes into, with a trailing slash.
    #[must_use]
    pub fn ref_prefix(&self) -> String {
        format!("refs/heads/backup/{}/", self.timestamp)
    }
}

fn invalid_dateformat(message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: "dateformat".to_string(),
        message: message.into(),
    }
}

fn format_timestamp<Tz: TimeZone>(dateformat: &str, at: &DateTime<Tz>) -> Result<String, ConfigError>
where
    Tz::Offset: std::fmt::Display,
{
    if StrftimeItems::new(dateformat).any(|item| matches!(item, Item::Error)) {
        return Err(invalid_dateformat(format!(
            "'{dateformat}' is not a valid strftime format"
        )));
    }

    let mut timestamp = String::new();
    write!(timestamp, "{}", at.format(dateformat))
        .map_err(|_| invalid_dateformat(format!("'{dateformat}' cannot be formatted")))?;

    if !is_valid_ref_fragment(&timestamp) {
        return Err(invalid_dateformat(format!(
            "'{dateformat}' produces '{timestamp}', which is not usable in a git ref name"
        )));
    }
    Ok(timestamp)
}

/// Checks a date format against a fixed sample time.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` if stamps built from it would be
/// rejected by git.
pub fn check_dateformat(dateformat: &str) -> Result<(), ConfigError> {
    // 2001-02-03 04:05:06 UTC
    let sample = DateTime::from_timestamp(981_173_106, 0)
        .ok_or_else(|| invalid_dateformat("sample time out of range"))?;
    format_timestamp(dateformat, &sample).map(|_| ())
}

/// Rules of `git check-ref-format` for the part we insert into a ref.
fn is_valid_ref_fragment(fragment: &str) -> bool {
    const FORBIDDEN: &[char] = &[' ', '~', '^', ':', '?', '*', '[', '\\'];

    !fragment.is_empty()
        && !fragment.contains("..")
        && !fragment.contains("@{")
        && !fragment.chars().any(|c| c.is_control() || FORBIDDEN.contains(&c))
        && fragment.split('/').all(|component| {
            !component.is_empty()
                && !component.starts_with('.')
                && !component.ends_with(".lock")
                && !component.ends_with('.')
        })
}

/// Result for one repository.
#[derive(Debug)]
pub struct RepositoryOutcome {
    pub path: PathBuf,
    pub result: GickupResult<()>,
}

impl RepositoryOutcome {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Result of one backup run.
#[derive(Debug)]
pub struct BackupReport {
    pub stamp: BackupStamp,
    /// One entry per target, in input order.
    pub outcomes: Vec<RepositoryOutcome>,
}

impl BackupReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &RepositoryOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &RepositoryOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(RepositoryOutcome::is_success)
    }
}

/// What a run will fetch, and what it refuses to.
#[derive(Debug, Default)]
pub struct BackupPlan {
    pub targets: Vec<PathBuf>,
    pub rejected: Vec<RepositoryOutcome>,
}

/// Selects backup targets.
///
/// With explicit paths those are used (deduplicated, order kept). Otherwise
/// every registered repository is a target, except paths shared by more
/// than one URL, which are rejected with `RegistryError::PathCollision`.
#[must_use]
pub fn plan_backup(registry: &Registry, explicit: &[PathBuf]) -> BackupPlan {
    if !explicit.is_empty() {
        let mut seen = BTreeSet::new();
        let targets = explicit
            .iter()
            .filter(|p| seen.insert(p.as_path()))
            .cloned()
            .collect();
        return BackupPlan {
            targets,
            rejected: Vec::new(),
        };
    }

    let collisions = registry.path_collisions();
    let mut plan = BackupPlan::default();
    let mut seen = BTreeSet::new();
    for path in registry.repos().values() {
        if !seen.insert(path.as_path()) {
            continue;
        }
        match collisions.iter().find(|(p, _)| p == path) {
            Some((_, urls)) => plan.rejected.push(RepositoryOutcome {
                path: path.clone(),
                result: Err(RegistryError::PathCollision {
                    path: path.clone(),
                    existing_url: urls.first().cloned().unwrap_or_default(),
                    url: urls.get(1).cloned().unwrap_or_default(),
                }
                .into()),
            }),
            None => plan.targets.push(path.clone()),
        }
    }
    plan
}

/// Fetches registered repositories into their backups.
pub struct BackupOrchestrator<G> {
    git: G,
    concurrency: usize,
    token: CancellationToken,
}

impl<G: GitMutation> BackupOrchestrator<G> {
    #[must_use]
    pub fn new(git: G) -> Self {
        Self {
            git,
            concurrency: 1,
            token: CancellationToken::new(),
        }
    }

    /// Number of repositories fetched at the same time (minimum 1).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    #[must_use]
    pub const fn git(&self) -> &G {
        &self.git
    }

    /// Fetches every target with one shared stamp.
    pub async fn run_backup(&self, targets: &[PathBuf], stamp: &BackupStamp) -> BackupReport {
        self.run_backup_with_progress(targets, stamp, |_| {}).await
    }

    /// Like [`run_backup`](Self::run_backup), calling `on_done` as each
    /// repository finishes.
    pub async fn run_backup_with_progress<F>(
        &self,
        targets: &[PathBuf],
        stamp: &BackupStamp,
        mut on_done: F,
    ) -> BackupReport
    where
        F: FnMut(&RepositoryOutcome),
    {
        info!(
            repos = targets.len(),
            timestamp = %stamp.timestamp(),
            "starting backup"
        );

        let mut results = stream::iter(targets)
            .map(|path| async move {
                RepositoryOutcome {
                    path: path.clone(),
                    result: self.backup_one(path, stamp).await,
                }
            })
            .buffered(self.concurrency);

        let mut outcomes = Vec::with_capacity(targets.len());
        while let Some(outcome) = results.next().await {
            on_done(&outcome);
            outcomes.push(outcome);
        }

        BackupReport {
            stamp: stamp.clone(),
            outcomes,
        }
    }

    async fn backup_one(&self, path: &Path, stamp: &BackupStamp) -> GickupResult<()> {
        if self.token.is_cancelled() {
            return Err(GitError::Interrupted {
                path: path.to_path_buf(),
            }
            .into());
        }
        if !query::is_git_repo(path) {
            warn!(repo = %path.display(), "not a git repository");
            return Err(GitError::RepoNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        // A second run with the same stamp would fast-forward the older snapshot
        let prefix = stamp.ref_prefix();
        if query::has_refs_under(path, &prefix)? {
            warn!(repo = %path.display(), %prefix, "snapshot already exists");
            return Err(GitError::SnapshotExists {
                path: path.to_path_buf(),
                prefix,
            }
            .into());
        }

        info!(repo = %path.display(), "fetching");
        match self
            .git
            .fetch(path, BACKUP_REMOTE, stamp.refspec(), &self.token)
            .await
        {
            Ok(()) => Ok(()),
            Err(err) => {
                log_failure(path, &err);
                Err(err)
            }
        }
    }
}

fn log_failure(path: &Path, err: &GickupError) {
    if err.is_interrupted() {
        warn!(repo = %path.display(), "fetch interrupted");
    } else {
        warn!(repo = %path.display(), error = %err, "fetch failed");
    }
}
