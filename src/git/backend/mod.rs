// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! GitQuery (read)     --> GixBackend (pure Rust gix)
//! GitMutation (write) --> ShellBackend (git CLI via ProcessBuilder)
//! ```

use std::path::Path;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::process::builder::ProcessBuilder;
use crate::error::{GickupError, GickupResult, GitError};

// --- Query Trait (Read-only operations) ---

/// Read-only git query operations.
pub trait GitQuery {
    /// Check if path holds a git repository (bare or not).
    fn is_git_repo(path: &Path) -> bool;

    /// Fetch URL of a remote, `None` if the remote does not exist.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened or its
    /// remote configuration is invalid.
    fn remote_url(path: &Path, name: &str) -> GickupResult<Option<String>>;

    /// Whether any reference starts with `prefix`, e.g. `refs/heads/backup/x/`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository or its refs cannot be read.
    fn has_refs_under(path: &Path, prefix: &str) -> GickupResult<bool>;
}

// --- Mutation Trait (Write operations) ---

/// Git mutation operations used to create and update backups.
///
/// Methods take `&self` and return boxed futures so an orchestrator can be
/// generic over the backend and tests can substitute a recording fake.
pub trait GitMutation: Send + Sync {
    /// Initialize a bare repository at `path`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if `git init` fails.
    fn init_bare<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, GickupResult<()>>;

    /// Add a remote to the repository at `path`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the remote cannot be added.
    fn add_remote<'a>(
        &'a self,
        path: &'a Path,
        name: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, GickupResult<()>>;

    /// Fetch `refspec` from `remote` into the repository at `path`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::FetchFailed` if git fails or times out and
    /// `GitError::Interrupted` if the token is cancelled.
    fn fetch<'a>(
        &'a self,
        path: &'a Path,
        remote: &'a str,
        refspec: &'a str,
        token: &'a CancellationToken,
    ) -> BoxFuture<'a, GickupResult<()>>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
pub struct GixBackend;

impl GitQuery for GixBackend {
    fn is_git_repo(path: &Path) -> bool {
        gix::open(path).is_ok()
    }

    fn remote_url(path: &Path, name: &str) -> GickupResult<Option<String>> {
        let repo = gix::open(path).map_err(|e| GitError::Gix(e.to_string()))?;
        match repo.try_find_remote(name) {
            None => Ok(None),
            Some(Ok(remote)) => Ok(remote
                .url(gix::remote::Direction::Fetch)
                .map(|url| url.to_bstring().to_string())),
            Some(Err(e)) => Err(GitError::Gix(e.to_string()).into()),
        }
    }

    fn has_refs_under(path: &Path, prefix: &str) -> GickupResult<bool> {
        let repo = gix::open(path).map_err(|e| GitError::Gix(e.to_string()))?;
        let platform = repo
            .references()
            .map_err(|e| GitError::Gix(e.to_string()))?;
        let mut refs = platform
            .prefixed(prefix)
            .map_err(|e| GitError::Gix(e.to_string()))?;
        Ok(refs.next().is_some())
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using the git CLI.
///
/// Every command runs as `git --git-dir <path> ...` with
/// `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
#[derive(Debug, Clone, Default)]
pub struct ShellBackend {
    fetch_timeout: Option<Duration>,
}

impl ShellBackend {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            fetch_timeout: None,
        }
    }

    /// Bounds every fetch by `timeout`.
    #[must_use]
    pub const fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    fn git(git_dir: &Path) -> ProcessBuilder {
        ProcessBuilder::new("git")
            .arg("--git-dir")
            .arg(git_dir)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0")
            .capture_output()
    }

    async fn run_simple(git_dir: &Path, args: &[&str]) -> GickupResult<()> {
        let builder = Self::git(git_dir).args(args);
        let command = builder.command_line();
        builder.run().await.map_err(|err| {
            GickupError::from(GitError::CommandFailed {
                command,
                message: err.to_string(),
            })
        })?;
        Ok(())
    }
}

impl GitMutation for ShellBackend {
    fn init_bare<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, GickupResult<()>> {
        Box::pin(async move {
            debug!(repo = %path.display(), "initializing bare repository");
            Self::run_simple(path, &["init", "--bare", "--quiet"]).await
        })
    }

    fn add_remote<'a>(
        &'a self,
        path: &'a Path,
        name: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, GickupResult<()>> {
        Box::pin(async move { Self::run_simple(path, &["remote", "add", name, url]).await })
    }

    fn fetch<'a>(
        &'a self,
        path: &'a Path,
        remote: &'a str,
        refspec: &'a str,
        token: &'a CancellationToken,
    ) -> BoxFuture<'a, GickupResult<()>> {
        Box::pin(async move {
            let result = Self::git(path)
                .args(["fetch", "--quiet", remote, refspec])
                .timeout(self.fetch_timeout)
                .run_with_cancellation(token.clone())
                .await;

            match result {
                Ok(_) => Ok(()),
                Err(err) if err.is_interrupted() => Err(GitError::Interrupted {
                    path: path.to_path_buf(),
                }
                .into()),
                Err(err) => Err(GitError::FetchFailed {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                }
                .into()),
            }
        })
    }
}
