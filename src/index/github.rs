// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub user index.
//!
//! ```text
//! target "octocat"
//!    GET {api}/users/octocat/repos?per_page=N   (follows Link rel="next")
//!    [{ "name": "hello", "git_url": "git://github.com/octocat/hello.git" }]
//!    --> git_url : <root>/github.com/octocat/hello
//! ```

use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::Deserialize;
use tracing::debug;

use super::{DiscoveredRepos, DiscoveryContext, RepositoryIndex, backend_error};
use crate::config::types::DiscoveryConfig;
use crate::error::{DiscoveryError, GickupResult};
use crate::net::JsonPager;

pub const KIND: &str = "github";

/// The fields we read from the repository listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Repo {
    pub name: String,
    pub git_url: String,
}

/// Lists the public repositories of a GitHub user.
#[derive(Debug, Clone)]
pub struct GithubIndex {
    user: String,
    api_url: String,
    per_page: u32,
    timeout: Option<Duration>,
}

impl GithubIndex {
    /// # Errors
    ///
    /// Returns `DiscoveryError::InvalidTarget` if the user name is empty or
    /// contains characters that cannot appear in a GitHub login.
    pub fn new(target: &str, config: &DiscoveryConfig) -> GickupResult<Self> {
        let valid = !target.is_empty()
            && target
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(DiscoveryError::InvalidTarget {
                kind: KIND.to_string(),
                target: target.to_string(),
                message: "expected a GitHub user name".to_string(),
            }
            .into());
        }

        Ok(Self {
            user: target.to_string(),
            api_url: config.github_api_url.trim_end_matches('/').to_string(),
            per_page: config.github_per_page,
            timeout: config.timeout(),
        })
    }

    fn first_page_url(&self) -> String {
        format!(
            "{}/users/{}/repos?per_page={}",
            self.api_url, self.user, self.per_page
        )
    }

    async fn list(&self, ctx: &DiscoveryContext) -> GickupResult<DiscoveredRepos> {
        let repos: Vec<Repo> = JsonPager::new()
            .url(self.first_page_url())
            .header("Accept", "application/vnd.github+json")
            .timeout(self.timeout)
            .fetch_all(&ctx.token)
            .await?;

        debug!(source = %self.user, count = repos.len(), "github listing fetched");

        let base = ctx.backup_root.join("github.com").join(&self.user);
        Ok(repos
            .into_iter()
            .map(|repo| {
                let local = base.join(&repo.name);
                (repo.git_url, local)
            })
            .collect())
    }
}

impl RepositoryIndex for GithubIndex {
    fn kind(&self) -> &str {
        KIND
    }

    fn target(&self) -> &str {
        &self.user
    }

    fn list_repositories<'a>(
        &'a self,
        ctx: &'a DiscoveryContext,
    ) -> BoxFuture<'a, GickupResult<DiscoveredRepos>> {
        Box::pin(async move {
            self.list(ctx)
                .await
                .map_err(|err| backend_error(KIND, &self.user, err))
        })
    }
}
