// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! SSH tree-walk index.
//!
//! ```text
//! target "user@host:/srv/git"
//!    ssh user@host find '/srv/git' -type d
//!    /srv/git/a.git/objects        --> user@host:/srv/git/a.git
//!    /srv/git/team/b/.git/objects  --> user@host:/srv/git/team/b/.git
//!    local path = <root>/user@host/<path relative to /srv/git>
//! ```

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use futures_util::future::BoxFuture;
use tracing::debug;

use super::{DiscoveredRepos, DiscoveryContext, RepositoryIndex, backend_error};
use crate::config::types::DiscoveryConfig;
use crate::core::process::builder::ProcessBuilder;
use crate::error::{DiscoveryError, GickupResult};

pub const KIND: &str = "ssh";

const OBJECTS_SUFFIX: &str = "/objects";

/// Lists repositories below a directory on an SSH host.
#[derive(Debug, Clone)]
pub struct SshIndex {
    target: String,
    host: String,
    base_path: String,
    program: String,
    timeout: Option<Duration>,
}

impl SshIndex {
    /// Parses `host:base_path`.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::InvalidTarget` if the target has no colon or
    /// an empty host or path.
    pub fn new(target: &str, config: &DiscoveryConfig) -> GickupResult<Self> {
        let invalid = |message: &str| DiscoveryError::InvalidTarget {
            kind: KIND.to_string(),
            target: target.to_string(),
            message: message.to_string(),
        };
        let (host, base_path) = target
            .split_once(':')
            .ok_or_else(|| invalid("expected <host>:<path>"))?;
        if host.is_empty() {
            return Err(invalid("host is empty").into());
        }
        if base_path.is_empty() {
            return Err(invalid("path is empty").into());
        }

        Ok(Self {
            target: target.to_string(),
            host: host.to_string(),
            base_path: base_path.to_string(),
            program: config.ssh_program.clone(),
            timeout: config.timeout(),
        })
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    async fn list(&self, ctx: &DiscoveryContext) -> GickupResult<DiscoveredRepos> {
        let output = ProcessBuilder::new(&self.program)
            .arg(&self.host)
            .arg("find")
            .arg(shell_quote(&self.base_path))
            .args(["-type", "d"])
            .capture_output()
            .timeout(self.timeout)
            .run_with_cancellation(ctx.token.clone())
            .await?;

        let repos = parse_find_output(output.stdout(), &self.host, &self.base_path, &ctx.backup_root);
        debug!(source = %self.target, count = repos.len(), "ssh listing parsed");
        Ok(repos)
    }
}

impl RepositoryIndex for SshIndex {
    fn kind(&self) -> &str {
        KIND
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn list_repositories<'a>(
        &'a self,
        ctx: &'a DiscoveryContext,
    ) -> BoxFuture<'a, GickupResult<DiscoveredRepos>> {
        Box::pin(async move {
            self.list(ctx)
                .await
                .map_err(|err| backend_error(KIND, &self.target, err))
        })
    }
}

/// Quotes a path for the remote shell that runs `find`.
fn shell_quote(path: &str) -> String {
    format!("'{}'", path.replace('\'', r"'\''"))
}

/// Turns `find <base> -type d` output into discovered repositories.
///
/// Every directory ending in `/objects` marks the repository containing it.
#[must_use]
pub fn parse_find_output(
    output: &str,
    host: &str,
    base_path: &str,
    backup_root: &Path,
) -> DiscoveredRepos {
    output
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter_map(|line| line.strip_suffix(OBJECTS_SUFFIX))
        .filter(|repo_path| !repo_path.is_empty())
        .map(|repo_path| {
            let url = format!("{host}:{repo_path}");
            let local = backup_root
                .join(host)
                .join(relative_to_base(repo_path, base_path));
            (url, local)
        })
        .collect()
}

/// Path of `repo_path` below `base_path`, keeping normal components only.
fn relative_to_base(repo_path: &str, base_path: &str) -> PathBuf {
    let repo = Path::new(repo_path);
    let relative = match repo.strip_prefix(base_path) {
        Ok(rel) if rel.as_os_str().is_empty() => repo.file_name().map(Path::new).unwrap_or(rel),
        Ok(rel) => rel,
        Err(_) => repo,
    };
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}
