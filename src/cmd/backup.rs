// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `backup`: fetch every target into a fresh timestamped namespace.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::{Context, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

use super::Session;
use crate::backup::{BackupOrchestrator, BackupStamp, RepositoryOutcome, plan_backup};
use crate::cli::repo::BackupArgs;
use crate::error::Result;

fn bar_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-")
        })
        .clone()
}

fn progress_bar(len: usize) -> Option<ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(bar_style());
    Some(pb)
}

fn report_line(outcome: &RepositoryOutcome) -> String {
    match &outcome.result {
        Ok(()) => format!("Synced {}", outcome.path.display()),
        Err(e) => format!("FAILED {}: {e}", outcome.path.display()),
    }
}

/// Main handler for the backup command.
///
/// # Errors
///
/// Returns an error if the date format is unusable or any repository failed.
pub async fn run_backup_command(
    args: &BackupArgs,
    session: &Session,
    token: CancellationToken,
) -> Result<()> {
    let stamp = BackupStamp::now(session.registry.dateformat())
        .context("cannot build the backup timestamp")?;

    let explicit = args
        .paths
        .iter()
        .map(|p| session.resolve_backup_path(p))
        .collect::<Result<Vec<PathBuf>>>()?;
    let plan = plan_backup(&session.registry, &explicit);

    for rejected in &plan.rejected {
        eprintln!("{}", report_line(rejected));
    }
    if plan.targets.is_empty() && plan.rejected.is_empty() {
        println!("No repositories to back up.");
        return Ok(());
    }

    let orchestrator = BackupOrchestrator::new(session.git())
        .with_concurrency(session.config.backup.concurrency)
        .with_cancellation(token);

    let pb = progress_bar(plan.targets.len());
    let report = orchestrator
        .run_backup_with_progress(&plan.targets, &stamp, |outcome| {
            let line = report_line(outcome);
            match &pb {
                Some(pb) => {
                    pb.println(line);
                    pb.inc(1);
                }
                None => println!("{line}"),
            }
        })
        .await;
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let failed = report.failed().count() + plan.rejected.len();
    let total = report.outcomes.len() + plan.rejected.len();
    println!(
        "Backed up {} of {total} repositories into backup/{}",
        report.succeeded().count(),
        stamp.timestamp()
    );

    if failed > 0 {
        bail!("{failed} of {total} repositories failed to back up");
    }
    Ok(())
}
