// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Repository and registry command arguments.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

/// Arguments for the `backup` command.
#[derive(Debug, Clone, Default, Args)]
pub struct BackupArgs {
    /// Local backup paths to fetch. Every registered repository when omitted.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,
}

/// Arguments for the `add-repo` command.
#[derive(Debug, Clone, Args)]
pub struct AddRepoArgs {
    /// URL of the repository to back up.
    #[arg(value_name = "URL")]
    pub url: String,

    /// Where the backup is kept. Relative paths are resolved against the
    /// backup root; derived from the URL when omitted.
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,
}

/// Arguments for the `remove-repo` command.
#[derive(Debug, Clone, Args)]
pub struct RemoveRepoArgs {
    /// Local backup path of the repository. Relative paths are resolved
    /// against the backup root.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Also deletes the backup repository from disk.
    #[arg(long = "delete-files")]
    pub delete_files: bool,
}

/// Registry options settable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigKey {
    /// strftime format of the backup timestamp.
    Dateformat,
    /// Root directory for derived backup paths.
    Localbasepath,
}

impl ConfigKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dateformat => "dateformat",
            Self::Localbasepath => "localbasepath",
        }
    }
}

/// Arguments for the `set-config` command.
#[derive(Debug, Clone, Args)]
pub struct SetConfigArgs {
    #[arg(value_name = "KEY", value_enum)]
    pub key: ConfigKey,

    #[arg(value_name = "VALUE")]
    pub value: String,
}

/// Arguments for the `list` command.
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Checks that every backup is a git repository whose `origin` matches
    /// the registered URL.
    #[arg(long)]
    pub verify: bool,
}
