// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `add-index` and `remove-index`.

use super::Session;
use crate::cli::index::IndexArgs;
use crate::error::Result;

/// Main handler for the add-index command.
///
/// # Errors
///
/// Returns an error if the target is unusable or already configured.
pub fn run_add_index_command(args: &IndexArgs, session: &mut Session) -> Result<()> {
    let source = session
        .index_registry()
        .resolve_source(args.kind.as_kind(), &args.target)?;
    session.registry.add_source(source.clone())?;
    println!("Added repository index {source}");
    Ok(())
}

/// Main handler for the remove-index command.
///
/// # Errors
///
/// Returns an error if the target is unusable or not configured.
pub fn run_remove_index_command(args: &IndexArgs, session: &mut Session) -> Result<()> {
    let source = session
        .index_registry()
        .resolve_source(args.kind.as_kind(), &args.target)?;
    session.registry.remove_source(&source)?;
    println!("Removed repository index {source}");
    Ok(())
}
