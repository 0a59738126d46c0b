// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `update-index-list`: discover, confirm, register.

use anyhow::bail;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::Session;
use crate::cli::index::UpdateIndexArgs;
use crate::error::Result;
use crate::index::discover::discover;
use crate::index::{DiscoveryContext, IndexSource, RepositoryIndex};

/// Main handler for the update-index-list command.
///
/// # Errors
///
/// Returns an error if a source could not be listed or a new repository
/// could not be registered. Everything that did succeed is kept.
pub async fn run_update_index_command(
    args: &UpdateIndexArgs,
    session: &mut Session,
    token: CancellationToken,
) -> Result<()> {
    let backends = session.index_registry();

    let sources: Vec<IndexSource> = match &args.target {
        Some(target) => vec![backends.resolve_source(args.kind.as_kind(), target)?],
        None => session.registry.sources().to_vec(),
    };
    if sources.is_empty() {
        println!("No repository indices configured.");
        return Ok(());
    }

    let mut failures = 0usize;
    let mut indices: Vec<Box<dyn RepositoryIndex>> = Vec::with_capacity(sources.len());
    for source in &sources {
        match backends.create_from_source(source) {
            Ok(index) => {
                println!("Checking {source}");
                indices.push(index);
            }
            Err(e) => {
                eprintln!("Skipping {source}: {e}");
                failures += 1;
            }
        }
    }

    let ctx = DiscoveryContext::new(&session.backup_root, token);
    let report = discover(
        &indices,
        session.registry.repos(),
        &ctx,
        session.config.discovery.concurrency,
    )
    .await;

    for (source, err) in &report.failures {
        eprintln!("Failed to check {source}: {err}");
    }
    failures += report.failures.len();
    for conflict in &report.collisions {
        println!(
            "Skipping {}: {} is already used by {}",
            conflict.url,
            conflict.path.display(),
            conflict.existing_url
        );
    }

    if report.found.is_empty() {
        println!("No unknown repos found.");
    } else {
        println!("New repos:");
        for (url, path) in &report.found {
            println!("Repo {url} backed up in {}", path.display());
        }

        if session.confirm("Add and initialize new repos?")? {
            println!("Saving new repos.");
            let git = session.git();
            for (url, path) in &report.found {
                if let Err(e) = session
                    .registry
                    .register_repository(&git, url, path)
                    .await
                {
                    warn!(url = %url, error = %e, "registration failed");
                    eprintln!("Failed to add {url}: {e}");
                    failures += 1;
                }
            }
        } else {
            println!("Not saving new repos.");
        }
    }

    if failures > 0 {
        bail!("{failures} operation(s) failed while updating the repository list");
    }
    Ok(())
}
