// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository registry, persisted as a JSON settings file.
//!
//! ```text
//! {
//!     "dateformat": "%Y-%m-%d/%H-%M-%S",
//!     "localbasepath": "/home/u/.gickup/backup",   (or null)
//!     "repo_indices": [["ssh", "u@host:/srv/git"]],
//!     "repos": { "<remote url>": "<local backup path>" },
//!     "settings_version": 1
//! }
//!
//! mutation            on disk
//! add/remove source   save
//! register repo       mkdir + git init --bare + remote add, then save
//! unregister repo     save, then (optionally) delete the directory
//! set option          save
//! ```
//!
//! One process owns the registry at a time. Every mutation is persisted
//! before it returns; saving writes a temporary file next to the target and
//! renames it over the old one.

use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::backup::{BACKUP_REMOTE, DEFAULT_DATEFORMAT, check_dateformat};
use crate::config::paths::{PathEnv, absolute};
use crate::error::{ConfigError, GickupError, GickupResult, RegistryError};
use crate::git::GitMutation;
use crate::index::IndexSource;

/// Only version of the settings document.
pub const SETTINGS_VERSION: u32 = 1;

fn default_dateformat() -> String {
    DEFAULT_DATEFORMAT.to_string()
}

const fn default_settings_version() -> u32 {
    SETTINGS_VERSION
}

/// The persisted document. Fields are declared in key order so the file is
/// written with sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_dateformat")]
    pub dateformat: String,
    #[serde(default)]
    pub localbasepath: Option<PathBuf>,
    #[serde(default)]
    pub repo_indices: Vec<IndexSource>,
    #[serde(default)]
    pub repos: BTreeMap<String, PathBuf>,
    #[serde(default = "default_settings_version")]
    pub settings_version: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dateformat: default_dateformat(),
            localbasepath: None,
            repo_indices: Vec::new(),
            repos: BTreeMap::new(),
            settings_version: SETTINGS_VERSION,
        }
    }
}

impl Settings {
    /// Parses a settings document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ParseError` for invalid JSON or an unsupported
    /// `settings_version`.
    pub fn from_json(origin: &str, content: &str) -> Result<Self, ConfigError> {
        let settings: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        if settings.settings_version != SETTINGS_VERSION {
            return Err(ConfigError::ParseError {
                path: origin.to_string(),
                message: format!(
                    "unsupported settings_version {} (expected {SETTINGS_VERSION})",
                    settings.settings_version
                ),
            });
        }
        Ok(settings)
    }

    /// Serializes with 4-space indentation and a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> GickupResult<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)
            .map_err(|e| GickupError::other(format!("failed to serialize settings: {e}")))?;
        buf.push(b'\n');
        String::from_utf8(buf)
            .map_err(|e| GickupError::other(format!("settings are not UTF-8: {e}")))
    }
}

/// Registered repositories and index sources.
#[derive(Debug, Clone)]
pub struct Registry {
    settings: Settings,
    store: Option<PathBuf>,
}

impl Registry {
    /// Loads the registry from `path`. A missing file yields an empty
    /// registry that will be created on the first save.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file exists but cannot be read or parsed.
    pub fn load(path: impl Into<PathBuf>) -> GickupResult<Self> {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(content) => Settings::from_json(&path.display().to_string(), &content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no registry file yet, starting empty");
                Settings::default()
            }
            Err(source) => {
                return Err(ConfigError::ReadError {
                    path: path.display().to_string(),
                    source,
                }
                .into());
            }
        };
        debug!(
            path = %path.display(),
            repos = settings.repos.len(),
            sources = settings.repo_indices.len(),
            "registry loaded"
        );
        Ok(Self {
            settings,
            store: Some(path),
        })
    }

    /// A registry that is never written to disk.
    #[must_use]
    pub const fn in_memory(settings: Settings) -> Self {
        Self {
            settings,
            store: None,
        }
    }

    /// Writes the registry atomically. No-op for in-memory registries.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::WriteError` if the file cannot be written.
    pub fn save(&self) -> GickupResult<()> {
        let Some(path) = &self.store else {
            return Ok(());
        };
        let write_error = |source: std::io::Error| ConfigError::WriteError {
            path: path.display().to_string(),
            source,
        };

        let json = self.settings.to_json()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(write_error)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
        tmp.write_all(json.as_bytes()).map_err(write_error)?;
        tmp.as_file().sync_all().map_err(write_error)?;
        tmp.persist(path).map_err(|e| write_error(e.error))?;

        debug!(path = %path.display(), "registry saved");
        Ok(())
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn store_path(&self) -> Option<&Path> {
        self.store.as_deref()
    }

    /// Registered repositories: remote URL to local path.
    #[must_use]
    pub const fn repos(&self) -> &BTreeMap<String, PathBuf> {
        &self.settings.repos
    }

    #[must_use]
    pub fn sources(&self) -> &[IndexSource] {
        &self.settings.repo_indices
    }

    #[must_use]
    pub fn dateformat(&self) -> &str {
        &self.settings.dateformat
    }

    /// The configured backup root, or the result of `default` when unset.
    ///
    /// # Errors
    ///
    /// Returns whatever `default` returns; it is only called when no
    /// `localbasepath` is set.
    pub fn backup_root_or_else<F>(&self, default: F) -> GickupResult<PathBuf>
    where
        F: FnOnce() -> GickupResult<PathBuf>,
    {
        match &self.settings.localbasepath {
            Some(path) => Ok(path.clone()),
            None => default(),
        }
    }

    // --- index sources ---

    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateSource` if the pair is already present.
    pub fn add_source(&mut self, source: IndexSource) -> GickupResult<()> {
        if self.settings.repo_indices.contains(&source) {
            return Err(RegistryError::DuplicateSource {
                kind: source.kind().to_string(),
                target: source.target().to_string(),
            }
            .into());
        }
        info!(source = %source, "adding repository index");
        self.settings.repo_indices.push(source);
        self.save()
    }

    /// # Errors
    ///
    /// Returns `RegistryError::SourceNotFound` if the pair is not present.
    pub fn remove_source(&mut self, source: &IndexSource) -> GickupResult<()> {
        let Some(position) = self.settings.repo_indices.iter().position(|s| s == source) else {
            return Err(RegistryError::SourceNotFound {
                kind: source.kind().to_string(),
                target: source.target().to_string(),
            }
            .into());
        };
        info!(source = %source, "removing repository index");
        self.settings.repo_indices.remove(position);
        self.save()
    }

    // --- repositories ---

    /// Creates the backup repository for `url` at `local_path` and records it.
    ///
    /// The directory is created, initialized as a bare repository and given
    /// an `origin` remote before the entry is stored. If git fails the
    /// directory is cleaned up and the registry is left unchanged.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` if `local_path` is relative.
    /// - `DuplicateRepository` if `url` is already registered.
    /// - `PathCollision` if `local_path` backs up another URL.
    /// - `AlreadyInitialized` if `local_path` exists and is not empty.
    /// - A `GitError` if initialization fails.
    pub async fn register_repository<G>(
        &mut self,
        git: &G,
        url: &str,
        local_path: &Path,
    ) -> GickupResult<()>
    where
        G: GitMutation + ?Sized,
    {
        if !local_path.is_absolute() {
            return Err(RegistryError::InvalidPath {
                path: local_path.to_path_buf(),
            }
            .into());
        }
        if let Some(existing) = self.settings.repos.get(url) {
            return Err(RegistryError::DuplicateRepository {
                url: url.to_string(),
                path: existing.clone(),
            }
            .into());
        }
        if let Some((existing_url, _)) = self.settings.repos.iter().find(|(_, p)| *p == local_path)
        {
            return Err(RegistryError::PathCollision {
                path: local_path.to_path_buf(),
                existing_url: existing_url.clone(),
                url: url.to_string(),
            }
            .into());
        }

        if local_path.exists() && !is_empty_dir(local_path) {
            return Err(RegistryError::AlreadyInitialized {
                path: local_path.to_path_buf(),
            }
            .into());
        }

        info!(url = %url, repo = %local_path.display(), "registering repository");
        let created = first_missing_ancestor(local_path).map(Path::to_path_buf);
        std::fs::create_dir_all(local_path)?;
        if let Err(err) = init_backup_repository(git, url, local_path).await {
            discard_directory(local_path, created.as_deref());
            return Err(err);
        }

        self.settings
            .repos
            .insert(url.to_string(), local_path.to_path_buf());
        self.save()
    }

    /// Removes the repository backed up at `local_path` and returns its URL.
    ///
    /// The registry is saved before any file is deleted, so an interrupted
    /// removal leaves an orphaned directory rather than a dangling entry.
    ///
    /// # Errors
    ///
    /// - `InvalidPath` if `local_path` is relative.
    /// - `RepositoryNotFound` if no entry uses `local_path`.
    /// - `AmbiguousPath` if several entries use it.
    /// - An I/O error if the files cannot be deleted (the entry is gone).
    pub fn unregister_repository(
        &mut self,
        local_path: &Path,
        delete_files: bool,
    ) -> GickupResult<String> {
        if !local_path.is_absolute() {
            return Err(RegistryError::InvalidPath {
                path: local_path.to_path_buf(),
            }
            .into());
        }

        let urls: Vec<String> = self
            .settings
            .repos
            .iter()
            .filter(|(_, p)| *p == local_path)
            .map(|(url, _)| url.clone())
            .collect();
        let url = match urls.as_slice() {
            [] => {
                return Err(RegistryError::RepositoryNotFound {
                    path: local_path.to_path_buf(),
                }
                .into());
            }
            [url] => url.clone(),
            _ => {
                return Err(RegistryError::AmbiguousPath {
                    path: local_path.to_path_buf(),
                    urls,
                }
                .into());
            }
        };

        info!(url = %url, repo = %local_path.display(), "unregistering repository");
        self.settings.repos.remove(&url);
        self.save()?;

        if delete_files && local_path.exists() {
            info!(repo = %local_path.display(), "deleting backup files");
            std::fs::remove_dir_all(local_path)?;
        }
        Ok(url)
    }

    /// Paths used by more than one URL, with those URLs (sorted).
    #[must_use]
    pub fn path_collisions(&self) -> Vec<(PathBuf, Vec<String>)> {
        let mut by_path: BTreeMap<&Path, Vec<String>> = BTreeMap::new();
        for (url, path) in &self.settings.repos {
            by_path.entry(path.as_path()).or_default().push(url.clone());
        }
        by_path
            .into_iter()
            .filter(|(_, urls)| urls.len() > 1)
            .map(|(path, urls)| (path.to_path_buf(), urls))
            .collect()
    }

    // --- options ---

    /// Sets `dateformat` or `localbasepath`.
    ///
    /// # Errors
    ///
    /// - `ConfigError::UnknownKey` for any other key.
    /// - `ConfigError::InvalidValue` for a date format git cannot use.
    pub fn set_option(&mut self, key: &str, value: &str, env: &PathEnv) -> GickupResult<()> {
        match key {
            "dateformat" => {
                check_dateformat(value)?;
                self.settings.dateformat = value.to_string();
            }
            "localbasepath" => {
                let path = absolute(&env.expand_tilde(value))?;
                self.settings.localbasepath = Some(path);
            }
            other => return Err(ConfigError::UnknownKey(other.to_string()).into()),
        }
        info!(key = %key, value = %value, "option updated");
        self.save()
    }
}

async fn init_backup_repository<G>(git: &G, url: &str, local_path: &Path) -> GickupResult<()>
where
    G: GitMutation + ?Sized,
{
    git.init_bare(local_path).await?;
    git.add_remote(local_path, BACKUP_REMOTE, url).await
}

fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_none())
}

/// Outermost directory of `path` that does not exist yet, if any.
fn first_missing_ancestor(path: &Path) -> Option<&Path> {
    path.ancestors().take_while(|dir| !dir.exists()).last()
}

/// Best-effort rollback of a failed registration.
///
/// `created` is the outermost directory the registration created. Without
/// one, `path` existed before and is left behind empty.
fn discard_directory(path: &Path, created: Option<&Path>) {
    let target = created.unwrap_or(path);
    if let Err(e) = std::fs::remove_dir_all(target) {
        warn!(repo = %target.display(), error = %e, "failed to clean up after failed registration");
        return;
    }
    if created.is_none() && let Err(e) = std::fs::create_dir(path) {
        warn!(repo = %path.display(), error = %e, "failed to restore empty directory");
    }
}

#[cfg(test)]
mod tests;
