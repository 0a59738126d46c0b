// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};

use super::{Registry, Settings};
use crate::config::paths::PathEnv;
use crate::error::{ConfigError, GickupError, RegistryError};
use crate::git::testing::RecordingGit;
use crate::index::IndexSource;

fn registry_error(err: &GickupError) -> &RegistryError {
    err.as_registry()
        .unwrap_or_else(|| panic!("expected a registry error, got {err}"))
}

fn temp_registry() -> (tempfile::TempDir, Registry) {
    let temp = tempfile::tempdir().unwrap();
    let registry = Registry::load(temp.path().join("gickup.conf")).unwrap();
    (temp, registry)
}

// --- Settings document ---

#[test]
fn test_settings_json_layout() {
    let mut settings = Settings::default();
    settings
        .repos
        .insert("h:/srv/a.git".to_string(), PathBuf::from("/b/h/a.git"));
    settings
        .repo_indices
        .push(IndexSource::new("ssh", "h:/srv"));

    insta::assert_snapshot!(settings.to_json().unwrap(), @r#"
    {
        "dateformat": "%Y-%m-%d/%H-%M-%S",
        "localbasepath": null,
        "repo_indices": [
            [
                "ssh",
                "h:/srv"
            ]
        ],
        "repos": {
            "h:/srv/a.git": "/b/h/a.git"
        },
        "settings_version": 1
    }
    "#);
}

#[test]
fn test_settings_ignore_unknown_keys_and_fill_defaults() {
    let settings = Settings::from_json("test", r#"{"repos": {}, "colour": "blue"}"#).unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_settings_reject_other_versions() {
    let err = Settings::from_json("test", r#"{"settings_version": 2}"#).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { ref message, .. } if message.contains("settings_version 2")));
}

#[test]
fn test_settings_reject_invalid_json() {
    assert!(matches!(
        Settings::from_json("test", "{ not json"),
        Err(ConfigError::ParseError { .. })
    ));
}

// --- load / save ---

#[test]
fn test_missing_file_is_empty_registry() {
    let (temp, registry) = temp_registry();
    assert!(registry.repos().is_empty());
    assert!(registry.sources().is_empty());
    assert_eq!(registry.dateformat(), "%Y-%m-%d/%H-%M-%S");
    assert!(!temp.path().join("gickup.conf").exists());
}

#[test]
fn test_sources_persist_across_loads() {
    let (temp, mut registry) = temp_registry();
    registry
        .add_source(IndexSource::new("github", "octocat"))
        .unwrap();
    registry
        .add_source(IndexSource::new("ssh", "h:/srv"))
        .unwrap();

    let reloaded = Registry::load(temp.path().join("gickup.conf")).unwrap();
    assert_eq!(
        reloaded.sources(),
        [
            IndexSource::new("github", "octocat"),
            IndexSource::new("ssh", "h:/srv")
        ]
    );
}

#[test]
fn test_save_creates_parent_directories() {
    let temp = tempfile::tempdir().unwrap();
    let path = temp.path().join("nested/dir/settings");
    let mut registry = Registry::load(&path).unwrap();
    registry.add_source(IndexSource::new("ssh", "h:/x")).unwrap();
    assert!(path.is_file());
}

#[test]
fn test_in_memory_registry_never_writes() {
    let mut registry = Registry::in_memory(Settings::default());
    registry.add_source(IndexSource::new("ssh", "h:/x")).unwrap();
    assert!(registry.store_path().is_none());
    assert_eq!(registry.sources().len(), 1);
}

// --- index sources ---

#[test]
fn test_duplicate_source_rejected() {
    let mut registry = Registry::in_memory(Settings::default());
    registry.add_source(IndexSource::new("ssh", "h:/x")).unwrap();
    let err = registry
        .add_source(IndexSource::new("ssh", "h:/x"))
        .unwrap_err();
    assert!(matches!(
        registry_error(&err),
        RegistryError::DuplicateSource { .. }
    ));
    assert_eq!(registry.sources().len(), 1);
}

#[test]
fn test_remove_source() {
    let mut registry = Registry::in_memory(Settings::default());
    registry.add_source(IndexSource::new("ssh", "h:/x")).unwrap();
    registry
        .remove_source(&IndexSource::new("ssh", "h:/x"))
        .unwrap();
    assert!(registry.sources().is_empty());

    let err = registry
        .remove_source(&IndexSource::new("ssh", "h:/x"))
        .unwrap_err();
    assert!(matches!(
        registry_error(&err),
        RegistryError::SourceNotFound { .. }
    ));
}

// --- repositories ---

#[tokio::test]
async fn test_register_repository() {
    let (temp, mut registry) = temp_registry();
    let git = RecordingGit::new();
    let local = temp.path().join("backup/h/a.git");

    registry
        .register_repository(&git, "h:/srv/a.git", &local)
        .await
        .unwrap();

    assert!(crate::git::query::is_git_repo(&local));
    assert_eq!(
        git.calls(),
        [
            format!("init {}", local.display()),
            format!("remote {} origin h:/srv/a.git", local.display()),
        ]
    );

    let reloaded = Registry::load(temp.path().join("gickup.conf")).unwrap();
    assert_eq!(reloaded.repos().get("h:/srv/a.git"), Some(&local));
}

#[tokio::test]
async fn test_register_into_existing_empty_directory() {
    let (temp, mut registry) = temp_registry();
    let local = temp.path().join("empty");
    std::fs::create_dir(&local).unwrap();

    registry
        .register_repository(&RecordingGit::new(), "h:/e", &local)
        .await
        .unwrap();
    assert_eq!(registry.repos().len(), 1);
}

#[tokio::test]
async fn test_register_rejections() {
    let (temp, mut registry) = temp_registry();
    let git = RecordingGit::new();
    let taken = temp.path().join("taken");
    registry
        .register_repository(&git, "h:/one", &taken)
        .await
        .unwrap();

    let err = registry
        .register_repository(&git, "h:/two", Path::new("relative/path"))
        .await
        .unwrap_err();
    assert!(matches!(registry_error(&err), RegistryError::InvalidPath { .. }));

    let err = registry
        .register_repository(&git, "h:/one", &temp.path().join("elsewhere"))
        .await
        .unwrap_err();
    assert!(matches!(
        registry_error(&err),
        RegistryError::DuplicateRepository { .. }
    ));

    let err = registry
        .register_repository(&git, "h:/two", &taken)
        .await
        .unwrap_err();
    assert!(matches!(
        registry_error(&err),
        RegistryError::PathCollision { existing_url, .. } if existing_url == "h:/one"
    ));

    let occupied = temp.path().join("occupied");
    std::fs::create_dir(&occupied).unwrap();
    std::fs::write(occupied.join("file"), "data").unwrap();
    let err = registry
        .register_repository(&git, "h:/three", &occupied)
        .await
        .unwrap_err();
    assert!(matches!(
        registry_error(&err),
        RegistryError::AlreadyInitialized { .. }
    ));

    assert_eq!(registry.repos().len(), 1);
}

#[tokio::test]
async fn test_failed_registration_cleans_up() {
    let (temp, mut registry) = temp_registry();
    let local = temp.path().join("never/created");

    let err = registry
        .register_repository(&RecordingGit::failing_init(), "h:/x", &local)
        .await
        .unwrap_err();

    assert!(matches!(err, GickupError::Git(_)));
    assert!(!local.exists());
    // the parent made for it goes too
    assert!(!temp.path().join("never").exists());
    assert!(temp.path().is_dir());
    assert!(registry.repos().is_empty());
    assert!(!temp.path().join("gickup.conf").exists());
}

#[tokio::test]
async fn test_failed_registration_keeps_existing_parents() {
    let (temp, mut registry) = temp_registry();
    let parent = temp.path().join("host");
    std::fs::create_dir(&parent).unwrap();
    std::fs::write(parent.join("other.txt"), "keep").unwrap();

    registry
        .register_repository(&RecordingGit::failing_init(), "h:/x", &parent.join("a/b.git"))
        .await
        .unwrap_err();

    assert!(!parent.join("a").exists());
    assert!(parent.join("other.txt").is_file());
}

#[tokio::test]
async fn test_failed_registration_keeps_preexisting_empty_dir() {
    let (temp, mut registry) = temp_registry();
    let local = temp.path().join("empty");
    std::fs::create_dir(&local).unwrap();

    registry
        .register_repository(&RecordingGit::failing_init(), "h:/x", &local)
        .await
        .unwrap_err();

    assert!(local.is_dir());
    assert!(std::fs::read_dir(&local).unwrap().next().is_none());
}

#[tokio::test]
async fn test_unregister_repository() {
    let (temp, mut registry) = temp_registry();
    let git = RecordingGit::new();
    let keep = temp.path().join("keep");
    let gone = temp.path().join("gone");
    registry.register_repository(&git, "h:/keep", &keep).await.unwrap();
    registry.register_repository(&git, "h:/drop", &gone).await.unwrap();

    assert_eq!(registry.unregister_repository(&keep, false).unwrap(), "h:/keep");
    assert!(keep.exists());

    assert_eq!(registry.unregister_repository(&gone, true).unwrap(), "h:/drop");
    assert!(!gone.exists());

    let reloaded = Registry::load(temp.path().join("gickup.conf")).unwrap();
    assert!(reloaded.repos().is_empty());
}

#[test]
fn test_unregister_unknown_or_relative_path() {
    let mut registry = Registry::in_memory(Settings::default());

    let err = registry
        .unregister_repository(Path::new("/nowhere"), false)
        .unwrap_err();
    assert!(matches!(
        registry_error(&err),
        RegistryError::RepositoryNotFound { .. }
    ));

    let err = registry
        .unregister_repository(Path::new("rel"), false)
        .unwrap_err();
    assert!(matches!(registry_error(&err), RegistryError::InvalidPath { .. }));
}

#[test]
fn test_unregister_ambiguous_path() {
    let mut settings = Settings::default();
    settings.repos.insert("h:/a".to_string(), PathBuf::from("/b/same"));
    settings.repos.insert("h:/b".to_string(), PathBuf::from("/b/same"));
    let mut registry = Registry::in_memory(settings);

    let err = registry
        .unregister_repository(Path::new("/b/same"), false)
        .unwrap_err();
    assert!(matches!(
        registry_error(&err),
        RegistryError::AmbiguousPath { urls, .. } if urls == &["h:/a", "h:/b"]
    ));
    assert_eq!(registry.repos().len(), 2);

    assert_eq!(
        registry.path_collisions(),
        [(
            PathBuf::from("/b/same"),
            vec!["h:/a".to_string(), "h:/b".to_string()]
        )]
    );
}

// --- options ---

#[test]
fn test_set_dateformat() {
    let mut registry = Registry::in_memory(Settings::default());
    let env = PathEnv::default();

    registry.set_option("dateformat", "%Y%m%d", &env).unwrap();
    assert_eq!(registry.dateformat(), "%Y%m%d");

    let err = registry.set_option("dateformat", "%H:%M", &env).unwrap_err();
    assert!(matches!(err, GickupError::Config(ref e) if matches!(**e, ConfigError::InvalidValue { .. })));
    assert_eq!(registry.dateformat(), "%Y%m%d");
}

#[test]
fn test_set_localbasepath_expands_tilde() {
    let mut registry = Registry::in_memory(Settings::default());
    let env = PathEnv {
        home: Some(PathBuf::from("/home/u")),
        ..PathEnv::default()
    };

    registry
        .set_option("localbasepath", "~/backups", &env)
        .unwrap();
    assert_eq!(
        registry.settings().localbasepath,
        Some(PathBuf::from("/home/u/backups"))
    );
    assert_eq!(
        registry
            .backup_root_or_else(|| panic!("fallback used while localbasepath is set"))
            .unwrap(),
        PathBuf::from("/home/u/backups")
    );
}

#[test]
fn test_backup_root_falls_back_when_unset() {
    let registry = Registry::in_memory(Settings::default());
    assert_eq!(
        registry
            .backup_root_or_else(|| Ok(PathBuf::from("/default")))
            .unwrap(),
        PathBuf::from("/default")
    );
    assert!(
        registry
            .backup_root_or_else(|| Err(GickupError::other("no home")))
            .is_err()
    );
}

#[test]
fn test_set_unknown_key() {
    let mut registry = Registry::in_memory(Settings::default());
    let err = registry
        .set_option("colour", "blue", &PathEnv::default())
        .unwrap_err();
    assert!(matches!(err, GickupError::Config(ref e) if matches!(**e, ConfigError::UnknownKey(ref k) if k == "colour")));
}
