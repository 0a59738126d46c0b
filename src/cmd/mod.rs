// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> Session::open (options + registry + backup root)
//!          --> cmd::run_* handlers
//!   update_index, backup, repo, index, config, list
//! ```
//!
//! Handlers print results to stdout and return an error when any part of
//! the operation failed, so the process exits non-zero.

pub mod backup;
pub mod config;
pub mod index;
pub mod list;
pub mod prompt;
pub mod repo;
pub mod update_index;


use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio_util::sync::CancellationToken;

use crate::cli::global::GlobalOptions;
use crate::config::Config;
use crate::config::paths::{PathEnv, absolute};
use crate::error::Result;
use crate::git::ShellBackend;
use crate::index::IndexRegistry;
use crate::registry::Registry;

/// State shared by the registry commands of one invocation.
#[derive(Debug)]
pub struct Session {
    pub config: Config,
    pub env: PathEnv,
    pub registry: Registry,
    /// Root for derived and relative backup paths.
    pub backup_root: PathBuf,
    pub assume_yes: bool,
}

impl Session {
    /// Loads the registry named by `--config-file`, or the default one.
    ///
    /// # Errors
    ///
    /// Returns an error if no registry location can be determined or the
    /// registry file cannot be parsed.
    pub fn open(config: Config, global: &GlobalOptions, env: PathEnv) -> Result<Self> {
        let registry_path = match &global.config_file {
            Some(path) => env.expand_tilde(&path.to_string_lossy()),
            None => env.settings_file()?,
        };
        let registry = Registry::load(&registry_path)
            .with_context(|| format!("failed to load registry {}", registry_path.display()))?;

        let backup_root = registry.backup_root_or_else(|| env.backup_root())?;
        tracing::debug!(
            registry = %registry_path.display(),
            backup_root = %backup_root.display(),
            "session opened"
        );

        Ok(Self {
            config,
            env,
            registry,
            backup_root,
            assume_yes: global.assume_yes,
        })
    }

    /// Index backends configured from the `[discovery]` options.
    #[must_use]
    pub fn index_registry(&self) -> IndexRegistry {
        IndexRegistry::with_builtin(self.config.discovery.clone())
    }

    /// Git backend configured from the `[backup]` options.
    #[must_use]
    pub fn git(&self) -> ShellBackend {
        ShellBackend::new().with_fetch_timeout(self.config.backup.fetch_timeout())
    }

    /// Expands `~`, resolves relative paths against the backup root and
    /// makes the result absolute.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read.
    pub fn resolve_backup_path(&self, path: &Path) -> Result<PathBuf> {
        let expanded = self.env.expand_tilde(&path.to_string_lossy());
        let joined = if expanded.is_absolute() {
            expanded
        } else {
            self.backup_root.join(expanded)
        };
        Ok(absolute(&joined)?)
    }

    /// Asks `question` unless `--assume-yes` was given.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin cannot be read.
    pub fn confirm(&self, question: &str) -> Result<bool> {
        prompt::confirm(question, self.assume_yes)
    }
}

/// A token cancelled by the first Ctrl+C.
#[must_use]
pub fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let cancel_token = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, interrupting...");
            cancel_token.cancel();
        }
    });
    token
}
