// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Locator classification and backup path derivation.
//!
//! ```text
//! classify("...")
//!   ^\w+://(.*)$   --> Scheme from prefix
//!   existing path  --> File
//!   contains ':'   --> Ssh
//!   otherwise      --> Http
//!
//! derive_backup_path(locator)
//!   file   /abs/repo.git         --> abs/repo.git
//!   ssh    host:/srv/git/foo     --> host/srv/git/foo
//!   other  target                --> target
//! ```
//!
//! Classification is total. The only side effect is a filesystem existence
//! check for locators without an explicit scheme.

use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static SCHEME_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(\w+)://(.*)$").ok());

/// Transport scheme of a locator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scheme {
    File,
    Ssh,
    Http,
    Https,
    /// Any other explicit scheme, e.g. the name of an index backend.
    Named(String),
}

impl Scheme {
    /// Parses a scheme name. Names are case-sensitive, like the prefix match.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "file" => Self::File,
            "ssh" => Self::Ssh,
            "http" => Self::Http,
            "https" => Self::Https,
            other => Self::Named(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::File => "file",
            Self::Ssh => "ssh",
            Self::Http => "http",
            Self::Https => "https",
            Self::Named(name) => name,
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub scheme: Scheme,
    pub target: String,
}

impl Locator {
    #[must_use]
    pub fn new(scheme: Scheme, target: impl Into<String>) -> Self {
        Self {
            scheme,
            target: target.into(),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.target)
    }
}

/// Classifies a locator string.
///
/// An explicit `scheme://` prefix wins. Otherwise an existing local path is
/// `file`, anything with a colon is `ssh` (scp-like `host:path`), and the
/// rest is `http`.
#[must_use]
pub fn classify(locator: &str) -> Locator {
    if let Some(caps) = SCHEME_PREFIX.as_ref().and_then(|re| re.captures(locator))
        && let (Some(scheme), Some(target)) = (caps.get(1), caps.get(2))
    {
        return Locator::new(Scheme::from_name(scheme.as_str()), target.as_str());
    }

    if Path::new(locator).exists() {
        Locator::new(Scheme::File, locator)
    } else if locator.contains(':') {
        Locator::new(Scheme::Ssh, locator)
    } else {
        Locator::new(Scheme::Http, locator)
    }
}

/// Derives the backup path of a locator, relative to the backup root.
///
/// Only normal components survive, so joining the result onto the backup
/// root never leaves it.
#[must_use]
pub fn derive_backup_path(locator: &str) -> PathBuf {
    let Locator { scheme, target } = classify(locator);
    let raw = match scheme {
        Scheme::Ssh => match target.split_once(':') {
            Some((host, path)) => Path::new(host).join(path.trim_start_matches('/')),
            None => PathBuf::from(target),
        },
        _ => PathBuf::from(target),
    };
    relative_components(&raw)
}

/// Keeps the normal components of a path, dropping root, `.` and `..`.
fn relative_components(path: &Path) -> PathBuf {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect()
}
