// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered loading of application options.
//!
//! ```text
//! defaults
//!   < user file   ($XDG_CONFIG_HOME/gickup/gickup.toml, optional)
//!   < --ini files (in order, required)
//!   < GICKUP_<SECTION>__<KEY>
//!   < CLI overrides
//!        |
//!        v
//!    build() --> Config (validated)
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Environment, File, FileFormat};

use super::Config;
use crate::error::Result;

/// A TOML layer that took part in loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionSource {
    /// The per-user options file.
    User(PathBuf),
    /// A file given with `--ini`.
    Ini(PathBuf),
    /// TOML passed in directly.
    Inline,
}

impl fmt::Display for OptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(path) => write!(f, "[user] {}", path.display()),
            Self::Ini(path) => write!(f, "[ini] {}", path.display()),
            Self::Inline => f.write_str("[inline]"),
        }
    }
}

/// Collects option layers; later layers win.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: Option<String>,
    sources: Vec<OptionSource>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env_prefix: None,
            sources: Vec::new(),
        }
    }

    /// The per-user options file. A missing file is skipped.
    #[must_use]
    pub fn user_file(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(false));
        if path.is_file() {
            self.sources.push(OptionSource::User(path.to_path_buf()));
        }
        self
    }

    /// An options file named on the command line; `build` fails if it is
    /// missing or malformed.
    #[must_use]
    pub fn ini(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(path).format(FileFormat::Toml).required(true));
        self.sources.push(OptionSource::Ini(path.to_path_buf()));
        self
    }

    #[must_use]
    pub fn toml_str(mut self, content: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self.sources.push(OptionSource::Inline);
        self
    }

    /// Reads `<PREFIX>_<SECTION>__<KEY>` variables, applied after every file.
    #[must_use]
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Overrides one dotted key, e.g. `global.log_level`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is not a valid path expression.
    pub fn set(mut self, key: &str, value: impl Into<config::Value>) -> Result<Self> {
        self.builder = self
            .builder
            .set_override(key, value)
            .with_context(|| format!("invalid option override '{key}'"))?;
        Ok(self)
    }

    /// Merges all layers into a validated [`Config`].
    ///
    /// # Errors
    ///
    /// Returns an error if an `--ini` file is missing, any layer is not valid
    /// TOML, a value has the wrong type, or a value is out of range.
    pub fn build(self) -> Result<Config> {
        let mut builder = self.builder;
        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }
        let config: Config = builder
            .build()
            .and_then(|merged| merged.try_deserialize())
            .context("failed to load options")?;
        config.validate()?;
        Ok(config)
    }

    /// TOML layers in load order.
    #[must_use]
    pub fn sources(&self) -> &[OptionSource] {
        &self.sources
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
