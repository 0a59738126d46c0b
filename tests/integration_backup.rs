// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Integration tests for registration and backup runs against real git.

use std::path::Path;
use std::process::Command;

use chrono::DateTime;
use gickup::backup::{BackupOrchestrator, BackupStamp, DEFAULT_DATEFORMAT, plan_backup};
use gickup::error::{GickupError, GitError};
use gickup::git::ShellBackend;
use gickup::git::query;
use gickup::registry::{Registry, Settings};

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git should run");
    assert!(
        output.status.success(),
        "git {args:?}: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn source_repo(path: &Path) -> String {
    std::fs::create_dir_all(path).unwrap();
    git(path, &["init", "--quiet"]);
    git(path, &["config", "user.email", "test@example.com"]);
    git(path, &["config", "user.name", "Test"]);
    git(path, &["commit", "--allow-empty", "-m", "first", "--quiet"]);
    git(path, &["branch", "--show-current"])
}

fn refs(git_dir: &Path) -> Vec<String> {
    let out = git(
        git_dir,
        &["--git-dir", ".", "for-each-ref", "--format=%(refname)"],
    );
    out.lines().map(str::to_string).collect()
}

fn stamp_at(secs: i64) -> BackupStamp {
    let at = DateTime::from_timestamp(secs, 0).unwrap();
    BackupStamp::new(DEFAULT_DATEFORMAT, &at).unwrap()
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn register_creates_bare_repo_with_origin() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("source");
    source_repo(&source);
    let url = source.to_string_lossy().into_owned();
    let backup = temp.path().join("backup/source");

    let mut registry = Registry::in_memory(Settings::default());
    registry
        .register_repository(&ShellBackend::new(), &url, &backup)
        .await
        .unwrap();

    assert!(query::is_git_repo(&backup));
    assert_eq!(query::origin_url(&backup).unwrap(), Some(url.clone()));
    assert_eq!(registry.repos().get(&url), Some(&backup));

    // the same URL cannot be registered twice
    assert!(
        registry
            .register_repository(&ShellBackend::new(), &url, &temp.path().join("other"))
            .await
            .is_err()
    );
}

// =============================================================================
// Backup runs
// =============================================================================

#[tokio::test]
async fn backups_are_additive() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("source");
    let branch = source_repo(&source);
    let backup = temp.path().join("backup/source");

    let mut registry = Registry::in_memory(Settings::default());
    registry
        .register_repository(&ShellBackend::new(), &source.to_string_lossy(), &backup)
        .await
        .unwrap();

    let plan = plan_backup(&registry, &[]);
    assert_eq!(plan.targets, [backup.clone()]);
    let orchestrator = BackupOrchestrator::new(ShellBackend::new());

    // 2023-11-14 22:13:20 UTC
    let first = orchestrator.run_backup(&plan.targets, &stamp_at(1_700_000_000)).await;
    assert!(first.is_success(), "{:?}", first.outcomes);

    git(&source, &["commit", "--allow-empty", "-m", "second", "--quiet"]);
    git(&source, &["branch", "feature"]);

    // one hour later
    let second = orchestrator.run_backup(&plan.targets, &stamp_at(1_700_003_600)).await;
    assert!(second.is_success(), "{:?}", second.outcomes);

    let mut expected = vec![
        format!("refs/heads/backup/2023-11-14/22-13-20/{branch}"),
        format!("refs/heads/backup/2023-11-14/23-13-20/{branch}"),
        "refs/heads/backup/2023-11-14/23-13-20/feature".to_string(),
    ];
    expected.sort();
    assert_eq!(refs(&backup), expected);
}

#[tokio::test]
async fn repeated_stamp_leaves_existing_snapshot_untouched() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("source");
    let branch = source_repo(&source);
    let backup = temp.path().join("backup/source");

    let mut registry = Registry::in_memory(Settings::default());
    registry
        .register_repository(&ShellBackend::new(), &source.to_string_lossy(), &backup)
        .await
        .unwrap();
    let orchestrator = BackupOrchestrator::new(ShellBackend::new());

    // a day-granular format gives every run of that day the same namespace
    let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let stamp = BackupStamp::new("%Y-%m-%d", &at).unwrap();
    let snapshot_ref = format!("refs/heads/backup/2023-11-14/{branch}");

    let first = orchestrator.run_backup(&[backup.clone()], &stamp).await;
    assert!(first.is_success(), "{:?}", first.outcomes);
    let before = git(&backup, &["--git-dir", ".", "rev-parse", &snapshot_ref]);

    git(&source, &["commit", "--allow-empty", "-m", "second", "--quiet"]);

    let second = orchestrator.run_backup(&[backup.clone()], &stamp).await;
    assert!(!second.is_success());
    let err = second.outcomes[0].result.as_ref().unwrap_err();
    assert!(matches!(
        err,
        GickupError::Git(e) if matches!(**e, GitError::SnapshotExists { .. })
    ));

    let after = git(&backup, &["--git-dir", ".", "rev-parse", &snapshot_ref]);
    assert_eq!(before, after);
    assert_eq!(refs(&backup), [snapshot_ref]);
}

#[tokio::test]
async fn failing_repository_does_not_stop_the_run() {
    let temp = tempfile::tempdir().unwrap();
    let source = temp.path().join("source");
    source_repo(&source);

    let mut registry = Registry::in_memory(Settings::default());
    let git = ShellBackend::new();
    let gone = temp.path().join("gone");
    source_repo(&gone);
    registry
        .register_repository(&git, &gone.to_string_lossy(), &temp.path().join("backup/a-gone"))
        .await
        .unwrap();
    registry
        .register_repository(&git, &source.to_string_lossy(), &temp.path().join("backup/b-source"))
        .await
        .unwrap();
    std::fs::remove_dir_all(&gone).unwrap();

    let plan = plan_backup(&registry, &[]);
    let report = BackupOrchestrator::new(git)
        .run_backup(&plan.targets, &stamp_at(1_700_000_000))
        .await;

    assert_eq!(report.outcomes.len(), 2);
    assert!(report.outcomes[0].result.is_err());
    assert!(report.outcomes[1].result.is_ok());
    assert!(!report.is_success());
}
