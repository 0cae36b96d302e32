// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use std::path::PathBuf;
use std::result;
use thiserror::Error;

use crate::git_auth::types::GitAuthField;

#[derive(Error, Debug)]
pub enum GitAuthError {
    #[error("secrets \"{name}\" not found in namespace \"{namespace}\"")]
    SecretNotFound { namespace: String, name: String },
    #[error("No key {key} found in secret {namespace}/{name}")]
    MissingSecretKey { namespace: String, name: String, key: String },
    #[error("open {}: {source}", .path.display())]
    FileRead { path: PathBuf, source: std::io::Error },
    #[error("read {}: file exceeds {limit} bytes", .path.display())]
    FileTooLarge { path: PathBuf, limit: u64 },
    #[error("missing value for environment variable: {0}")]
    MissingEnvVar(String),
    #[error("missing 'password' secret entry")]
    MissingPasswordEntry,
    #[error("gitAuth config must specify exactly one of 'personalAccessToken', 'sshPrivateKey' or 'basicAuth'")]
    InvalidConfig,
    #[error("resolving gitAuth {field}: {source}")]
    Resolve { field: GitAuthField, source: Box<GitAuthError> },
    #[error("failed to fetch secret: {0}")]
    Kube(#[from] kube::Error),
}

impl GitAuthError {
    /// Wrap a resolver failure with the logical field being resolved
    pub fn resolving(field: GitAuthField) -> impl FnOnce(GitAuthError) -> GitAuthError {
        move |source| GitAuthError::Resolve { field, source: Box::new(source) }
    }

    /// Whether a Secret, Secret key, file or environment variable was absent
    pub fn is_not_found(&self) -> bool {
        match self {
            GitAuthError::SecretNotFound { .. }
            | GitAuthError::MissingSecretKey { .. }
            | GitAuthError::MissingEnvVar(_) => true,
            GitAuthError::FileRead { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            GitAuthError::Resolve { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// Whether the configuration itself is invalid, independent of cluster state
    pub fn is_validation(&self) -> bool {
        match self {
            GitAuthError::InvalidConfig | GitAuthError::MissingPasswordEntry => true,
            GitAuthError::Resolve { source, .. } => source.is_validation(),
            _ => false,
        }
    }
}

pub type GitAuthResult<T> = result::Result<T, GitAuthError>;
