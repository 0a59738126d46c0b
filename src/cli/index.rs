// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository index command arguments.

use clap::{Args, ValueEnum};

/// How an index target is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum IndexType {
    /// Classify the target: `host:path` is ssh, `kind://target` names the kind.
    #[default]
    Auto,
    /// `[user@]host:path`, walked over ssh.
    Ssh,
    /// A GitHub user name.
    Github,
}

impl IndexType {
    /// Backend kind, `None` for automatic classification.
    #[must_use]
    pub const fn as_kind(self) -> Option<&'static str> {
        match self {
            Self::Auto => None,
            Self::Ssh => Some(crate::index::ssh::KIND),
            Self::Github => Some(crate::index::github::KIND),
        }
    }
}

/// Arguments for the `update-index-list` command.
#[derive(Debug, Clone, Default, Args)]
pub struct UpdateIndexArgs {
    /// Index to check, e.g. `user@example.com:/srv/git` or `github://octocat`.
    /// All configured indices are checked when omitted.
    #[arg(value_name = "TARGET")]
    pub target: Option<String>,

    /// Forces how the target is interpreted.
    #[arg(long = "type", value_enum, default_value_t = IndexType::Auto)]
    pub kind: IndexType,
}

/// Arguments for `add-index` and `remove-index`.
#[derive(Debug, Clone, Args)]
pub struct IndexArgs {
    /// Index target, same format as for `update-index-list`.
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Forces how the target is interpreted.
    #[arg(long = "type", value_enum, default_value_t = IndexType::Auto)]
    pub kind: IndexType,
}
