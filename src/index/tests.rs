// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use super::discover::{PathConflict, discover};
use super::ssh::parse_find_output;
use super::{
    DiscoveredRepos, DiscoveryContext, IndexRegistry, IndexSource, RepositoryIndex,
};
use crate::config::types::DiscoveryConfig;
use crate::error::{DiscoveryError, GickupError, GickupResult, RegistryError};

/// Index that returns a fixed listing, or fails.
struct FixedIndex {
    target: String,
    repos: Option<DiscoveredRepos>,
}

impl FixedIndex {
    fn ok(target: &str, repos: &[(&str, &str)]) -> Box<dyn RepositoryIndex> {
        Box::new(Self {
            target: target.to_string(),
            repos: Some(
                repos
                    .iter()
                    .map(|(url, path)| ((*url).to_string(), PathBuf::from(path)))
                    .collect(),
            ),
        })
    }

    fn failing(target: &str) -> Box<dyn RepositoryIndex> {
        Box::new(Self {
            target: target.to_string(),
            repos: None,
        })
    }
}

impl RepositoryIndex for FixedIndex {
    fn kind(&self) -> &str {
        "fixed"
    }

    fn target(&self) -> &str {
        &self.target
    }

    fn list_repositories<'a>(
        &'a self,
        _ctx: &'a DiscoveryContext,
    ) -> BoxFuture<'a, GickupResult<DiscoveredRepos>> {
        Box::pin(async move {
            self.repos
                .clone()
                .ok_or_else(|| GickupError::other("listing unavailable"))
        })
    }
}

fn ctx(root: &Path) -> DiscoveryContext {
    DiscoveryContext::new(root, CancellationToken::new())
}

// --- IndexSource ---

#[test]
fn test_index_source_serializes_as_pair() {
    let source = IndexSource::new("ssh", "user@host:/srv/git");
    let json = serde_json::to_string(&source).unwrap();
    insta::assert_snapshot!(json, @r#"["ssh","user@host:/srv/git"]"#);

    let back: IndexSource = serde_json::from_str(&json).unwrap();
    assert_eq!(back, source);
    assert_eq!(source.to_string(), "ssh://user@host:/srv/git");
}

// --- IndexRegistry ---

#[test]
fn test_builtin_kinds() {
    let registry = IndexRegistry::with_builtin(DiscoveryConfig::default());
    assert_eq!(registry.kinds(), ["github", "ssh"]);
}

#[test]
fn test_create_unknown_kind() {
    let registry = IndexRegistry::with_builtin(DiscoveryConfig::default());
    let err = registry.create("gitlab", "someone").err().unwrap();
    assert!(matches!(
        err.as_registry(),
        Some(RegistryError::UnknownIndexType { kind, .. }) if kind == "gitlab"
    ));
}

#[test]
fn test_create_from_locator() {
    let registry = IndexRegistry::with_builtin(DiscoveryConfig::default());

    let index = registry.create_from_locator("github://octocat").unwrap();
    assert_eq!(index.source(), IndexSource::new("github", "octocat"));

    let index = registry.create_from_locator("user@host:/srv/git").unwrap();
    assert_eq!(index.source(), IndexSource::new("ssh", "user@host:/srv/git"));
}

#[test]
fn test_resolve_source_auto_and_explicit() {
    let registry = IndexRegistry::with_builtin(DiscoveryConfig::default());
    assert_eq!(
        registry.resolve_source(None, "host:/srv").unwrap(),
        IndexSource::new("ssh", "host:/srv")
    );
    assert_eq!(
        registry.resolve_source(Some("github"), "octocat").unwrap(),
        IndexSource::new("github", "octocat")
    );
    // "octocat" alone classifies as http, which is no index kind
    assert!(registry.resolve_source(Some("auto"), "octocat").is_err());
}

#[test]
fn test_register_custom_kind() {
    let mut registry = IndexRegistry::new(DiscoveryConfig::default());
    registry.register("fixed", |target, _config| Ok(FixedIndex::ok(target, &[])));

    let index = registry.create("fixed", "anything").unwrap();
    assert_eq!(index.kind(), "fixed");
    assert_eq!(index.target(), "anything");
}

#[test]
fn test_invalid_targets_rejected() {
    let registry = IndexRegistry::with_builtin(DiscoveryConfig::default());
    for (kind, target) in [("ssh", "no-colon"), ("ssh", ":/srv"), ("ssh", "host:"), ("github", "a/b")] {
        let err = registry.create(kind, target).err().unwrap();
        assert!(
            matches!(err, GickupError::Discovery(ref e) if matches!(**e, DiscoveryError::InvalidTarget { .. })),
            "{kind} {target}: {err}"
        );
    }
}

// --- SSH listing ---

#[test]
fn test_parse_find_output() {
    let output = "\
/srv/git
/srv/git/a.git
/srv/git/a.git/objects
/srv/git/a.git/objects/pack
/srv/git/team/b/.git
/srv/git/team/b/.git/objects
/srv/git/notes
";
    let repos = parse_find_output(output, "user@host", "/srv/git", Path::new("/backup"));
    insta::assert_debug_snapshot!(repos, @r#"
    {
        "user@host:/srv/git/a.git": "/backup/user@host/a.git",
        "user@host:/srv/git/team/b/.git": "/backup/user@host/team/b/.git",
    }
    "#);
}

#[test]
fn test_parse_find_output_trailing_slash_base() {
    let repos = parse_find_output("/srv/git/x.git/objects\n", "h", "/srv/git/", Path::new("/b"));
    assert_eq!(repos["h:/srv/git/x.git"], PathBuf::from("/b/h/x.git"));
}

#[test]
fn test_parse_find_output_base_is_repo() {
    let repos = parse_find_output("/srv/only.git/objects\n", "h", "/srv/only.git", Path::new("/b"));
    assert_eq!(repos["h:/srv/only.git"], PathBuf::from("/b/h/only.git"));
}

#[cfg(unix)]
#[tokio::test]
async fn test_ssh_listing_through_fake_ssh() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempfile::tempdir().unwrap();
    let tree = temp.path().join("srv");
    std::fs::create_dir_all(tree.join("one.git/objects/pack")).unwrap();
    std::fs::create_dir_all(tree.join("nested/two.git/objects")).unwrap();

    // Drops the host and hands the rest to a shell, like sshd does
    let fake_ssh = temp.path().join("fake-ssh");
    std::fs::write(&fake_ssh, "#!/bin/sh\nshift\nexec sh -c \"$*\"\n").unwrap();
    std::fs::set_permissions(&fake_ssh, std::fs::Permissions::from_mode(0o755)).unwrap();

    let config = DiscoveryConfig {
        ssh_program: fake_ssh.to_string_lossy().into_owned(),
        ..DiscoveryConfig::default()
    };
    let registry = IndexRegistry::with_builtin(config);
    let target = format!("backup@host:{}", tree.display());
    let index = registry.create("ssh", &target).unwrap();

    let root = temp.path().join("backup");
    let repos = index.list_repositories(&ctx(&root)).await.unwrap();

    let expected: DiscoveredRepos = [
        (
            format!("backup@host:{}", tree.join("nested/two.git").display()),
            root.join("backup@host/nested/two.git"),
        ),
        (
            format!("backup@host:{}", tree.join("one.git").display()),
            root.join("backup@host/one.git"),
        ),
    ]
    .into_iter()
    .collect();
    assert_eq!(repos, expected);
}

#[cfg(unix)]
#[tokio::test]
async fn test_ssh_listing_survives_non_utf8_paths() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempfile::tempdir().unwrap();
    // Latin-1 directory name listed before a real repository
    let fake_ssh = temp.path().join("fake-ssh");
    std::fs::write(
        &fake_ssh,
        "#!/bin/sh\nprintf '/srv/git/caf\\351\\n/srv/git/z.git/objects\\n'\n",
    )
    .unwrap();
    std::fs::set_permissions(&fake_ssh, std::fs::Permissions::from_mode(0o755)).unwrap();

    let config = DiscoveryConfig {
        ssh_program: fake_ssh.to_string_lossy().into_owned(),
        ..DiscoveryConfig::default()
    };
    let index = IndexRegistry::with_builtin(config)
        .create("ssh", "host:/srv/git")
        .unwrap();

    let repos = index
        .list_repositories(&ctx(Path::new("/backup")))
        .await
        .unwrap();
    assert_eq!(
        repos.get("host:/srv/git/z.git"),
        Some(&PathBuf::from("/backup/host/z.git"))
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_ssh_failure_is_an_error_not_empty() {
    let config = DiscoveryConfig {
        ssh_program: "false".to_string(),
        ..DiscoveryConfig::default()
    };
    let index = IndexRegistry::with_builtin(config)
        .create("ssh", "host:/srv")
        .unwrap();

    let err = index
        .list_repositories(&ctx(Path::new("/backup")))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GickupError::Discovery(ref e) if matches!(**e, DiscoveryError::Backend { .. })
    ));
}

// --- discover ---

#[tokio::test]
async fn test_discover_merges_and_filters() {
    let registered: BTreeMap<String, PathBuf> = [
        ("h:/srv/known".to_string(), PathBuf::from("/b/h/known")),
        ("h:/srv/owner".to_string(), PathBuf::from("/b/h/taken")),
    ]
    .into_iter()
    .collect();

    let indices = vec![
        FixedIndex::ok(
            "first",
            &[
                ("h:/srv/known", "/b/h/known"),
                ("h:/srv/new", "/b/h/new"),
                ("h:/srv/other", "/b/h/taken"),
            ],
        ),
        FixedIndex::failing("broken"),
        FixedIndex::ok("second", &[("mirror:/srv/new", "/b/h/new"), ("h:/srv/new", "/b/h/new")]),
    ];

    let report = discover(&indices, &registered, &ctx(Path::new("/b")), 2).await;

    assert_eq!(
        report.found.keys().collect::<Vec<_>>(),
        ["h:/srv/new"]
    );
    assert_eq!(report.already_registered, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].0, IndexSource::new("fixed", "broken"));
    assert_eq!(
        report.collisions,
        [
            PathConflict {
                url: "h:/srv/other".to_string(),
                path: PathBuf::from("/b/h/taken"),
                existing_url: "h:/srv/owner".to_string(),
            },
            PathConflict {
                url: "mirror:/srv/new".to_string(),
                path: PathBuf::from("/b/h/new"),
                existing_url: "h:/srv/new".to_string(),
            },
        ]
    );
    assert!(!report.is_success());
}

#[tokio::test]
async fn test_discover_is_idempotent_against_registry() {
    let indices = vec![FixedIndex::ok("one", &[("h:/a", "/b/a"), ("h:/b", "/b/b")])];
    let first = discover(&indices, &BTreeMap::new(), &ctx(Path::new("/b")), 1).await;
    assert_eq!(first.found.len(), 2);

    let second = discover(&indices, &first.found, &ctx(Path::new("/b")), 1).await;
    assert!(second.found.is_empty());
    assert!(second.collisions.is_empty());
    assert_eq!(second.already_registered, 2);
}
