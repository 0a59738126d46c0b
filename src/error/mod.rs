// gickup-rs: Git Backup Tool - Rust Port
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!               GickupError (~24 bytes)
//!                      |
//!   +--------+--------+-----+-----+--------+----+-------+
//!   |        |        |     |     |        |    |       |
//!   v        v        v     v     v        v    v       v
//! Registry Discovery Git   Net   Cfg    Proc   Io    Other
//!   Box      Box     Box   Box   Box     Box   Box  Box<str>
//!
//! Sub-errors:
//!   Registry  DuplicateSource, AlreadyInitialized, InvalidPath,
//!             RepositoryNotFound, AmbiguousPath, PathCollision
//!   Discovery Backend (wraps ssh/http failure), InvalidTarget
//!   Git       CommandFailed, RepoNotFound, FetchFailed, Interrupted
//!   Network   Reqwest, HttpError, Interrupted
//!   Config    ReadError, ParseError, InvalidValue, UnknownKey
//!   Process   ExecutableNotFound, SpawnFailed, WaitFailed, NonZeroExit,
//!             Timeout, Interrupted
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`GickupError`].
pub type GickupResult<T> = std::result::Result<T, GickupError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum GickupError {
    /// Registry mutation was rejected.
    #[error("registry error: {0}")]
    Registry(#[from] Box<RegistryError>),

    /// Repository discovery failed for one index source.
    #[error("discovery error: {0}")]
    Discovery(#[from] Box<DiscoveryError>),

    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl GickupError {
    /// Create a [`GickupError::Other`] from a message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into().into_boxed_str())
    }

    /// Returns the registry error, if this is one.
    #[must_use]
    pub fn as_registry(&self) -> Option<&RegistryError> {
        match self {
            Self::Registry(e) => Some(e),
            _ => None,
        }
    }

    /// Returns true if the failure was caused by cancellation.
    #[must_use]
    pub fn is_interrupted(&self) -> bool {
        match self {
            Self::Git(e) => matches!(**e, GitError::Interrupted { .. }),
            Self::Process(e) => matches!(**e, ProcessError::Interrupted { .. }),
            Self::Network(e) => matches!(**e, NetworkError::Interrupted),
            Self::Discovery(e) => match &**e {
                DiscoveryError::Backend { source, .. } => source.is_interrupted(),
                _ => false,
            },
            _ => false,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for GickupError {
                fn from(err: $error) -> Self {
                    GickupError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    RegistryError => Registry,
    DiscoveryError => Discovery,
    GitError => Git,
    NetworkError => Network,
    ConfigError => Config,
    ProcessError => Process,
    std::io::Error => Io,
}

// --- Registry Errors ---

/// Errors raised by registry mutations. Each one aborts the single
/// operation that caused it.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The `(kind, target)` pair is already configured.
    #[error("repository index {kind}://{target} is already configured")]
    DuplicateSource { kind: String, target: String },

    /// The `(kind, target)` pair is not configured.
    #[error("repository index {kind}://{target} is not configured")]
    SourceNotFound { kind: String, target: String },

    /// No registered repository is backed up at this path.
    #[error("no repository is configured for {}", path.display())]
    RepositoryNotFound { path: PathBuf },

    /// The backup directory already holds data.
    #[error("{} already exists and is not empty", path.display())]
    AlreadyInitialized { path: PathBuf },

    /// A local backup path must be absolute.
    #[error("backup path must be absolute: {}", path.display())]
    InvalidPath { path: PathBuf },

    /// More than one repository is registered for the same path.
    #[error("multiple repositories are configured for {}: {}", path.display(), urls.join(", "))]
    AmbiguousPath { path: PathBuf, urls: Vec<String> },

    /// The repository URL is already registered.
    #[error("repository {url} is already registered at {}", path.display())]
    DuplicateRepository { url: String, path: PathBuf },

    /// Another URL already backs up into this path.
    #[error("{} is already used by {existing_url}, refusing to add {url}", path.display())]
    PathCollision {
        path: PathBuf,
        existing_url: String,
        url: String,
    },

    /// No backend is registered under this kind.
    #[error("unknown repository index type '{kind}' for \"{target}\"")]
    UnknownIndexType { kind: String, target: String },
}

// --- Discovery Errors ---

/// Errors raised while enumerating an index source.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The backend's subprocess or HTTP request failed.
    #[error("failed to list {kind}://{target}: {source}")]
    Backend {
        kind: String,
        target: String,
        #[source]
        source: GickupError,
    },

    /// The target cannot be used with this backend.
    #[error("invalid {kind} index target \"{target}\": {message}")]
    InvalidTarget {
        kind: String,
        target: String,
        message: String,
    },

    /// The remote answered with something we cannot interpret.
    #[error("malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// No repository at the given path.
    #[error("repository not found: {}", path.display())]
    RepoNotFound { path: PathBuf },

    /// Fetching the `origin` remote failed.
    #[error("failed to fetch into {}: {message}", path.display())]
    FetchFailed { path: PathBuf, message: String },

    /// A previous backup already wrote refs under this snapshot prefix.
    #[error("snapshot {prefix} already exists in {}", path.display())]
    SnapshotExists { path: PathBuf, prefix: String },

    /// The operation was cancelled before it finished.
    #[error("git operation on {} was interrupted", path.display())]
    Interrupted { path: PathBuf },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(String),
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Request was interrupted by user or signal.
    #[error("request interrupted")]
    Interrupted,
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write configuration file.
    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The key cannot be set.
    #[error("unknown config key '{0}'")]
    UnknownKey(String),
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with a status outside the success set.
    #[error("process '{command}' exited with code {code}: {stderr}")]
    NonZeroExit {
        command: String,
        code: i32,
        stderr: String,
    },

    /// Process timed out.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Process was killed because the run was cancelled.
    #[error("process '{command}' was interrupted")]
    Interrupted { command: String },

    /// Waiting on the process failed.
    #[error("failed to wait for process '{command}': {source}")]
    WaitFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}
