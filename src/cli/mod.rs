// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for gickup using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! gickup [global options] <command>
//! update-index-list [target] [--type auto|ssh|github]
//! backup [paths...]
//! add-repo <url> [path]
//! add-index <target> [--type ...]
//! remove-repo <path> [--delete-files]
//! remove-index <target> [--type ...]
//! set-config <dateformat|localbasepath> <value>
//! list [--verify]
//! options | inis
//! ```

pub mod global;
pub mod index;
pub mod repo;


use clap::{Parser, Subcommand};

use crate::cli::global::GlobalOptions;
use crate::cli::index::{IndexArgs, UpdateIndexArgs};
use crate::cli::repo::{AddRepoArgs, BackupArgs, ListArgs, RemoveRepoArgs, SetConfigArgs};

/// Git Backup Tool - Rust Port
///
/// Discovers git repositories and mirrors them into timestamped local
/// backups.
#[derive(Debug, Parser)]
#[command(
    name = "gickup",
    author,
    version,
    about = "Git Backup Tool",
    long_about = "gickup-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Discovers git repositories on ssh hosts and GitHub accounts,\n\
                  keeps a bare backup repository for each one and fetches every\n\
                  branch into refs/heads/backup/<timestamp>/ on each run.\n\
                  Nothing is ever deleted from a backup.",
    after_help = "FILES:\n\n\
                  The registry of repositories and indices is a JSON file, by\n\
                  default $XDG_CONFIG_HOME/gickup.conf or ~/.gickup/settings\n\
                  (whichever exists, the first otherwise). Use --config-file to\n\
                  pick another one. Application options (timeouts, concurrency,\n\
                  logging) are read from gickup/gickup.toml in the same config\n\
                  directories, then from every --ini file, then from GICKUP_*\n\
                  environment variables such as GICKUP_BACKUP__CONCURRENCY=4."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Checks repository indices for unknown repositories and offers to add them.
    #[command(visible_alias = "updaterepolist")]
    UpdateIndexList(UpdateIndexArgs),

    /// Fetches registered repositories into their backups.
    #[command(visible_alias = "dobackup")]
    Backup(BackupArgs),

    /// Adds a repository to the backup list.
    #[command(visible_alias = "addrepo")]
    AddRepo(AddRepoArgs),

    /// Adds a repository index to be checked for new repositories.
    #[command(visible_alias = "addindex")]
    AddIndex(IndexArgs),

    /// Removes a registered repository.
    #[command(visible_alias = "removerepo")]
    RemoveRepo(RemoveRepoArgs),

    /// Removes a configured repository index.
    #[command(visible_alias = "removeindex")]
    RemoveIndex(IndexArgs),

    /// Sets a registry option.
    #[command(visible_alias = "setconfig")]
    SetConfig(SetConfigArgs),

    /// Lists registered repositories and indices.
    List(ListArgs),

    /// Lists all application options and their values.
    Options,

    /// Lists the option files that were loaded.
    Inis,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version
/// information was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
