// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use std::path::Path;
use tokio::io::AsyncReadExt;

use gitauth_operator_common::telemetry::debug;

use crate::crd::v1alpha1::common::{ResourceRef, SecretSelector};
use crate::git_auth::error::{GitAuthError, GitAuthResult};
use crate::git_auth::fetcher::{secret_value, SecretFetcher};

/// Resolves a single `ResourceRef` to the plaintext value it designates
pub struct SelectorResolver<'a, F: SecretFetcher + ?Sized> {
    fetcher: &'a F,
    namespace: &'a str,
}

impl<'a, F: SecretFetcher + ?Sized> SelectorResolver<'a, F> {
    /// # Arguments
    /// * `fetcher` - Source of Kubernetes Secrets
    /// * `namespace` - Namespace used for Secret selectors that omit one
    pub fn new(fetcher: &'a F, namespace: &'a str) -> Self {
        Self { fetcher, namespace }
    }

    pub fn fetcher(&self) -> &'a F {
        self.fetcher
    }

    pub fn namespace(&self) -> &'a str {
        self.namespace
    }

    /// Resolve a reference to its value
    ///
    /// # Arguments
    /// * `resource_ref` - The reference to resolve
    ///
    /// # Returns
    /// The referenced value, or a not-found error naming the missing Secret,
    /// key, file or environment variable
    pub async fn resolve(&self, resource_ref: &ResourceRef) -> GitAuthResult<String> {
        match resource_ref {
            ResourceRef::Secret { secret } => self.read_secret(secret).await,
            ResourceRef::FileSystem { filesystem } => read_file(&filesystem.path).await,
            ResourceRef::Env { env } => read_env(&env.name),
        }
    }

    async fn read_secret(&self, selector: &SecretSelector) -> GitAuthResult<String> {
        let namespace = selector
            .namespace
            .as_deref()
            .filter(|namespace| !namespace.is_empty())
            .unwrap_or(self.namespace);

        debug!(
            event = "ReadingSecretKey",
            namespace = namespace,
            secret = selector.name.as_str(),
            key = selector.key.as_str(),
        );

        let secret = self.fetcher.get_secret(namespace, &selector.name).await?;

        secret_value(&secret, &selector.key).ok_or_else(|| GitAuthError::MissingSecretKey {
            namespace: namespace.to_string(),
            name: selector.name.clone(),
            key: selector.key.clone(),
        })
    }
}

/// Largest file accepted as a credential
pub const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Read a whole file as text, refusing files larger than `MAX_FILE_SIZE`
pub async fn read_file(path: &Path) -> GitAuthResult<String> {
    debug!(event = "ReadingFile", path = %path.display());

    let file_error = |source| GitAuthError::FileRead { path: path.to_path_buf(), source };
    let file = tokio::fs::File::open(path).await.map_err(file_error)?;

    // Character devices report a zero length, so the read itself is bounded too
    let mut bytes = Vec::new();
    file.take(MAX_FILE_SIZE + 1)
        .read_to_end(&mut bytes)
        .await
        .map_err(file_error)?;

    if bytes.len() as u64 > MAX_FILE_SIZE {
        return Err(GitAuthError::FileTooLarge { path: path.to_path_buf(), limit: MAX_FILE_SIZE });
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read an environment variable, an empty but set variable is a valid value
pub fn read_env(name: &str) -> GitAuthResult<String> {
    debug!(event = "ReadingEnvVar", name = name);

    std::env::var_os(name)
        .map(|value| value.to_string_lossy().into_owned())
        .ok_or_else(|| GitAuthError::MissingEnvVar(name.to_string()))
}
