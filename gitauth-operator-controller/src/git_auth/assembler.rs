// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use gitauth_operator_common::telemetry::{debug, Instrument, Span};

use crate::crd::v1alpha1::common::GitAuthConfig;
use crate::git_auth::error::{GitAuthError, GitAuthResult};
use crate::git_auth::fetcher::{secret_value, SecretFetcher};
use crate::git_auth::selector::SelectorResolver;
use crate::git_auth::types::{GitAuth, GitAuthField, GitAuthMethod, GitAuthSource};

pub const SSH_PRIVATE_KEY_ENTRY: &str = "sshPrivateKey";
pub const PASSWORD_ENTRY: &str = "password";
pub const ACCESS_TOKEN_ENTRY: &str = "accessToken";
pub const USERNAME_ENTRY: &str = "username";

/// Assembles the git credentials of one resource
///
/// A session is created per reconciliation with the caller's span, every event
/// emitted while resolving is recorded under it.
pub struct GitAuthSession<'a, F: SecretFetcher + ?Sized> {
    resolver: SelectorResolver<'a, F>,
    span: Span,
}

impl<'a, F: SecretFetcher + ?Sized> GitAuthSession<'a, F> {
    /// Create a new session
    ///
    /// # Arguments
    /// * `fetcher` - Source of Kubernetes Secrets
    /// * `namespace` - Namespace of the resource, used for the legacy Secret and
    ///   for Secret selectors without a namespace
    /// * `span` - Span to record resolution events under
    pub fn new(fetcher: &'a F, namespace: &'a str, span: Span) -> Self {
        Self {
            resolver: SelectorResolver::new(fetcher, namespace),
            span,
        }
    }

    /// Resolve the credentials described by `source`
    ///
    /// # Arguments
    /// * `source` - The structured config, the legacy Secret name, or nothing
    ///
    /// # Returns
    /// The credential bundle, empty when no authentication is configured
    pub async fn setup_git_auth(&self, source: GitAuthSource<'_>) -> GitAuthResult<GitAuth> {
        async move {
            match source {
                GitAuthSource::Config(config) => self.resolve_config(config).await,
                GitAuthSource::LegacySecret(name) => self.resolve_legacy_secret(name).await,
                GitAuthSource::None => Ok(GitAuth::default()),
            }
        }
        .instrument(self.span.clone())
        .await
    }

    async fn resolve_config(&self, config: &GitAuthConfig) -> GitAuthResult<GitAuth> {
        match GitAuthMethod::try_from(config)? {
            GitAuthMethod::PersonalAccessToken(token) => {
                debug!(event = "ResolvingGitAuth", method = "accessToken");

                Ok(GitAuth {
                    personal_access_token: Some(
                        self.resolver
                            .resolve(&token)
                            .await
                            .map_err(GitAuthError::resolving(GitAuthField::PersonalAccessToken))?
                    ),
                    ..Default::default()
                })
            },
            GitAuthMethod::SshAuth { private_key, password } => {
                debug!(event = "ResolvingGitAuth", method = "sshAuth", with_password = password.is_some());

                let ssh_private_key = self.resolver
                    .resolve(&private_key)
                    .await
                    .map_err(GitAuthError::resolving(GitAuthField::SshPrivateKey))?;
                let password = match password {
                    Some(password) => Some(
                        self.resolver
                            .resolve(&password)
                            .await
                            .map_err(GitAuthError::resolving(GitAuthField::SshPassword))?
                    ),
                    None => None,
                };

                Ok(GitAuth {
                    ssh_private_key: Some(ssh_private_key),
                    password,
                    ..Default::default()
                })
            },
            GitAuthMethod::BasicAuth { username, password } => {
                debug!(event = "ResolvingGitAuth", method = "basicAuth");

                let username = self.resolver
                    .resolve(&username)
                    .await
                    .map_err(GitAuthError::resolving(GitAuthField::Username))?;
                let password = self.resolver
                    .resolve(&password)
                    .await
                    .map_err(GitAuthError::resolving(GitAuthField::Password))?;

                Ok(GitAuth {
                    username: Some(username),
                    password: Some(password),
                    ..Default::default()
                })
            },
        }
    }

    async fn resolve_legacy_secret(&self, name: &str) -> GitAuthResult<GitAuth> {
        debug!(event = "ResolvingGitAuth", method = "gitAuthSecret", secret = name);

        let secret = self.resolver
            .fetcher()
            .get_secret(self.resolver.namespace(), name)
            .await?;
        let entry = |key: &str| secret_value(&secret, key);

        if let Some(ssh_private_key) = entry(SSH_PRIVATE_KEY_ENTRY) {
            return Ok(GitAuth {
                ssh_private_key: Some(ssh_private_key),
                password: entry(PASSWORD_ENTRY),
                ..Default::default()
            });
        }

        if let Some(access_token) = entry(ACCESS_TOKEN_ENTRY) {
            return Ok(GitAuth {
                personal_access_token: Some(access_token),
                ..Default::default()
            });
        }

        if let Some(username) = entry(USERNAME_ENTRY) {
            let password = entry(PASSWORD_ENTRY).ok_or(GitAuthError::MissingPasswordEntry)?;

            return Ok(GitAuth {
                username: Some(username),
                password: Some(password),
                ..Default::default()
            });
        }

        // A Secret without any recognized entry yields no credentials
        Ok(GitAuth::default())
    }
}
