// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Secret;
use kube::{Api, Client};

use crate::git_auth::error::{GitAuthError, GitAuthResult};

/// Read access to Kubernetes Secrets
#[async_trait]
pub trait SecretFetcher: Send + Sync {
    /// Fetch the Secret `namespace/name`
    ///
    /// # Errors
    /// Returns `GitAuthError::SecretNotFound` if the Secret does not exist
    async fn get_secret(&self, namespace: &str, name: &str) -> GitAuthResult<Secret>;
}

#[async_trait]
impl SecretFetcher for Client {
    async fn get_secret(&self, namespace: &str, name: &str) -> GitAuthResult<Secret> {
        Api::<Secret>::namespaced(self.clone(), namespace)
            .get_opt(name)
            .await?
            .ok_or_else(|| GitAuthError::SecretNotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }
}

/// Decode the value stored under `key` in a Secret's data
pub fn secret_value(secret: &Secret, key: &str) -> Option<String> {
    secret
        .data
        .as_ref()
        .and_then(|data| data.get(key))
        .map(|value| String::from_utf8_lossy(&value.0).into_owned())
}
