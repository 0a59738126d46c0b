// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository index backends.
//!
//! An index source is a `(kind, target)` pair that can enumerate remote
//! repositories, e.g. `("ssh", "user@host:/srv/git")` or
//! `("github", "octocat")`.
//!
//! ```text
//! IndexRegistry (kind --> factory)
//!   "ssh"    --> SshIndex     ssh <host> find <base> -type d
//!   "github" --> GithubIndex  GET /users/<user>/repos (paged)
//!       |
//!       | create(kind, target) / create_from_locator(locator)
//!       v
//! Box<dyn RepositoryIndex>
//!   .list_repositories(ctx) --> { remote_url: local_path }
//!       |
//!       v
//! discover::discover(indices, registered, ctx) --> DiscoveryReport
//! ```
//!
//! New kinds are added with [`IndexRegistry::register`]; nothing else needs
//! to know about them.

pub mod discover;
pub mod github;
pub mod ssh;

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::config::types::DiscoveryConfig;
use crate::error::{DiscoveryError, GickupError, GickupResult, RegistryError};
use crate::locator::classify;

/// Discovered repositories: remote URL to suggested local backup path.
pub type DiscoveredRepos = BTreeMap<String, PathBuf>;

/// A configured index source, persisted as `["kind", "target"]`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndexSource(pub String, pub String);

impl IndexSource {
    #[must_use]
    pub fn new(kind: impl Into<String>, target: impl Into<String>) -> Self {
        Self(kind.into(), target.into())
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.1
    }
}

impl fmt::Display for IndexSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.0, self.1)
    }
}

/// Everything a backend needs while listing.
#[derive(Debug, Clone)]
pub struct DiscoveryContext {
    /// Root under which suggested local paths are placed.
    pub backup_root: PathBuf,
    pub token: CancellationToken,
}

impl DiscoveryContext {
    #[must_use]
    pub fn new(backup_root: impl Into<PathBuf>, token: CancellationToken) -> Self {
        Self {
            backup_root: backup_root.into(),
            token,
        }
    }
}

/// A source of remote repositories.
pub trait RepositoryIndex: Send + Sync {
    /// Backend name, e.g. `"ssh"`.
    fn kind(&self) -> &str;

    /// Backend-specific target, e.g. `"user@host:/srv/git"`.
    fn target(&self) -> &str;

    fn source(&self) -> IndexSource {
        IndexSource::new(self.kind(), self.target())
    }

    /// Enumerates the repositories of this source.
    ///
    /// # Errors
    ///
    /// Returns a `DiscoveryError` when the listing cannot be obtained. A
    /// failed listing is never reported as an empty one.
    fn list_repositories<'a>(
        &'a self,
        ctx: &'a DiscoveryContext,
    ) -> BoxFuture<'a, GickupResult<DiscoveredRepos>>;
}

/// Wraps a transport failure into `DiscoveryError::Backend`.
pub(crate) fn backend_error(kind: &str, target: &str, err: GickupError) -> GickupError {
    match err {
        GickupError::Discovery(_) => err,
        source => DiscoveryError::Backend {
            kind: kind.to_string(),
            target: target.to_string(),
            source,
        }
        .into(),
    }
}

/// Constructor for one index kind.
pub type IndexFactory =
    Box<dyn Fn(&str, &DiscoveryConfig) -> GickupResult<Box<dyn RepositoryIndex>> + Send + Sync>;

/// Maps kind names to index constructors.
pub struct IndexRegistry {
    factories: BTreeMap<String, IndexFactory>,
    config: DiscoveryConfig,
}

impl IndexRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            factories: BTreeMap::new(),
            config,
        }
    }

    /// A registry with the `ssh` and `github` backends.
    #[must_use]
    pub fn with_builtin(config: DiscoveryConfig) -> Self {
        let mut registry = Self::new(config);
        registry.register(ssh::KIND, |target, config| {
            Ok(Box::new(ssh::SshIndex::new(target, config)?))
        });
        registry.register(github::KIND, |target, config| {
            Ok(Box::new(github::GithubIndex::new(target, config)?))
        });
        registry
    }

    /// Registers (or replaces) the constructor for `kind`.
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&str, &DiscoveryConfig) -> GickupResult<Box<dyn RepositoryIndex>>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(kind.into(), Box::new(factory));
    }

    /// Registered kind names, sorted.
    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Creates the index for `kind`/`target`.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownIndexType` for an unregistered kind, or
    /// the backend's own error if the target is unusable.
    pub fn create(&self, kind: &str, target: &str) -> GickupResult<Box<dyn RepositoryIndex>> {
        let factory = self
            .factories
            .get(kind)
            .ok_or_else(|| RegistryError::UnknownIndexType {
                kind: kind.to_string(),
                target: target.to_string(),
            })?;
        factory(target, &self.config)
    }

    /// Creates the index for a configured source.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create).
    pub fn create_from_source(&self, source: &IndexSource) -> GickupResult<Box<dyn RepositoryIndex>> {
        self.create(source.kind(), source.target())
    }

    /// Classifies `locator` and creates the index for its scheme.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create).
    pub fn create_from_locator(&self, locator: &str) -> GickupResult<Box<dyn RepositoryIndex>> {
        let classified = classify(locator);
        self.create(classified.scheme.as_str(), &classified.target)
    }

    /// Resolves a user-supplied `(type, target)` pair into a source. A type
    /// of `None` (or `"auto"`) classifies the target.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create); the index is constructed so an
    /// unusable target is rejected before it is stored.
    pub fn resolve_source(&self, kind: Option<&str>, target: &str) -> GickupResult<IndexSource> {
        let index = match kind {
            None | Some("auto") => self.create_from_locator(target)?,
            Some(kind) => self.create(kind, target)?,
        };
        Ok(index.source())
    }
}

impl fmt::Debug for IndexRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexRegistry")
            .field("kinds", &self.kinds())
            .field("config", &self.config)
            .finish()
    }
}
