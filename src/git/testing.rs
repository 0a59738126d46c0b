// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Recording git backend for tests.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use super::GitMutation;
use crate::error::{GickupResult, GitError};

/// Creates real bare repositories with gix and records every call.
/// Fetches never touch the network.
#[derive(Debug, Default)]
pub(crate) struct RecordingGit {
    calls: Mutex<Vec<String>>,
    fail_init: bool,
    failing_fetches: BTreeSet<PathBuf>,
}

impl RecordingGit {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every `init_bare` fails after creating nothing.
    pub(crate) fn failing_init() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }

    /// `fetch` fails for this path.
    pub(crate) fn fail_fetch_for(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing_fetches.insert(path.into());
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl GitMutation for RecordingGit {
    fn init_bare<'a>(&'a self, path: &'a Path) -> BoxFuture<'a, GickupResult<()>> {
        Box::pin(async move {
            self.record(format!("init {}", path.display()));
            if self.fail_init {
                return Err(GitError::CommandFailed {
                    command: "git init --bare".to_string(),
                    message: "refused by test".to_string(),
                }
                .into());
            }
            gix::init_bare(path).map_err(|e| GitError::Gix(e.to_string()))?;
            Ok(())
        })
    }

    fn add_remote<'a>(
        &'a self,
        path: &'a Path,
        name: &'a str,
        url: &'a str,
    ) -> BoxFuture<'a, GickupResult<()>> {
        Box::pin(async move {
            self.record(format!("remote {} {name} {url}", path.display()));
            Ok(())
        })
    }

    fn fetch<'a>(
        &'a self,
        path: &'a Path,
        remote: &'a str,
        refspec: &'a str,
        token: &'a CancellationToken,
    ) -> BoxFuture<'a, GickupResult<()>> {
        Box::pin(async move {
            self.record(format!("fetch {} {remote} {refspec}", path.display()));
            if token.is_cancelled() {
                return Err(GitError::Interrupted {
                    path: path.to_path_buf(),
                }
                .into());
            }
            if self.failing_fetches.contains(path) {
                return Err(GitError::FetchFailed {
                    path: path.to_path_buf(),
                    message: "remote hung up".to_string(),
                }
                .into());
            }
            Ok(())
        })
    }
}
