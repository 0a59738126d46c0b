// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `add-repo` and `remove-repo`.

use super::Session;
use crate::cli::repo::{AddRepoArgs, RemoveRepoArgs};
use crate::config::paths::absolute;
use crate::error::Result;
use crate::locator::{Scheme, classify, derive_backup_path};

/// The URL stored for `url`: local repositories are recorded by absolute
/// path, everything else verbatim.
///
/// # Errors
///
/// Returns an error if the current directory cannot be read.
pub fn registered_url(session: &Session, url: &str) -> Result<String> {
    let locator = classify(url);
    if locator.scheme == Scheme::File {
        let path = absolute(&session.env.expand_tilde(&locator.target))?;
        return Ok(path.to_string_lossy().into_owned());
    }
    Ok(url.to_string())
}

/// Main handler for the add-repo command.
///
/// # Errors
///
/// Returns an error if the repository cannot be registered.
pub async fn run_add_repo_command(args: &AddRepoArgs, session: &mut Session) -> Result<()> {
    let path = match &args.path {
        Some(path) => path.clone(),
        None => derive_backup_path(&args.url),
    };
    let local_path = session.resolve_backup_path(&path)?;
    let url = registered_url(session, &args.url)?;

    let git = session.git();
    session
        .registry
        .register_repository(&git, &url, &local_path)
        .await?;
    println!("Repo {url} backed up in {}", local_path.display());
    Ok(())
}

/// Main handler for the remove-repo command.
///
/// # Errors
///
/// Returns an error if no single repository is registered at the path, or
/// its files cannot be deleted.
pub fn run_remove_repo_command(args: &RemoveRepoArgs, session: &mut Session) -> Result<()> {
    let local_path = session.resolve_backup_path(&args.path)?;

    if args.delete_files
        && !session.confirm(&format!(
            "Delete {} and all of its backups?",
            local_path.display()
        ))?
    {
        println!("Not removing {}.", local_path.display());
        return Ok(());
    }

    let url = session
        .registry
        .unregister_repository(&local_path, args.delete_files)?;
    if args.delete_files {
        println!("Removed {url} and deleted {}", local_path.display());
    } else {
        println!("Removed {url}, files kept in {}", local_path.display());
    }
    Ok(())
}
