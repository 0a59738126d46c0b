// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Discovery runs over several index sources.
//!
//! ```text
//! indices --buffered(n)--> list_repositories
//!    |  ok:  merge in source order
//!    |         already registered url    --> skipped
//!    |         path taken by another url --> collision
//!    |  err: --> failures
//!    v
//! DiscoveryReport { found, failures, collisions }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;

use futures_util::StreamExt;
use futures_util::stream;
use tracing::{info, warn};

use super::{DiscoveredRepos, DiscoveryContext, IndexSource, RepositoryIndex};
use crate::error::GickupError;

/// A discovered repository whose local path is already claimed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConflict {
    pub url: String,
    pub path: PathBuf,
    pub existing_url: String,
}

/// Result of querying a set of index sources.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    /// New repositories, not yet registered.
    pub found: DiscoveredRepos,
    /// Sources whose listing failed.
    pub failures: Vec<(IndexSource, GickupError)>,
    /// New repositories excluded because their path is taken.
    pub collisions: Vec<PathConflict>,
    /// Number of listed repositories that were already registered.
    pub already_registered: usize,
}

impl DiscoveryReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Queries every index and merges the results against `registered`.
///
/// At most `concurrency` sources are queried at the same time. Results are
/// merged in the order of `indices`, so the first source to claim a path
/// wins.
pub async fn discover(
    indices: &[Box<dyn RepositoryIndex>],
    registered: &BTreeMap<String, PathBuf>,
    ctx: &DiscoveryContext,
    concurrency: usize,
) -> DiscoveryReport {
    let results: Vec<_> = stream::iter(indices)
        .map(|index| async move {
            let source = index.source();
            info!(source = %source, "listing repositories");
            (source, index.list_repositories(ctx).await)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut path_owners: BTreeMap<PathBuf, String> = registered
        .iter()
        .map(|(url, path)| (path.clone(), url.clone()))
        .collect();
    let mut report = DiscoveryReport::default();

    for (source, result) in results {
        let repos = match result {
            Ok(repos) => repos,
            Err(err) => {
                warn!(source = %source, error = %err, "listing failed");
                report.failures.push((source, err));
                continue;
            }
        };

        for (url, path) in repos {
            if registered.contains_key(&url) || report.found.contains_key(&url) {
                report.already_registered += usize::from(registered.contains_key(&url));
                continue;
            }
            if let Some(existing_url) = path_owners.get(&path) {
                warn!(url = %url, path = %path.display(), existing = %existing_url, "path collision");
                report.collisions.push(PathConflict {
                    url,
                    path,
                    existing_url: existing_url.clone(),
                });
                continue;
            }
            path_owners.insert(path.clone(), url.clone());
            report.found.insert(url, path);
        }
    }

    report
}
