// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use serde::Serialize;
use std::fmt::{self, Debug, Display, Formatter};

use crate::crd::v1alpha1::common::{GitAuthConfig, ResourceRef};
use crate::crd::v1alpha1::stack::StackSpec;
use crate::git_auth::error::GitAuthError;

const REDACTED: &str = "[REDACTED]";

/// Resolved git credentials handed to the git client.
///
/// `Debug` never prints the values, only which of them are set.
#[derive(Serialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GitAuth {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_private_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl GitAuth {
    pub fn is_empty(&self) -> bool {
        self.ssh_private_key.is_none()
            && self.password.is_none()
            && self.personal_access_token.is_none()
            && self.username.is_none()
    }

    /// Name of the credential family carried by this bundle
    pub fn method(&self) -> Option<&'static str> {
        if self.ssh_private_key.is_some() {
            Some("sshAuth")
        } else if self.personal_access_token.is_some() {
            Some("accessToken")
        } else if self.username.is_some() {
            Some("basicAuth")
        } else {
            None
        }
    }
}

impl Debug for GitAuth {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let redact = |value: &Option<String>| value.as_ref().map(|_| REDACTED);

        f.debug_struct("GitAuth")
            .field("ssh_private_key", &redact(&self.ssh_private_key))
            .field("password", &redact(&self.password))
            .field("personal_access_token", &redact(&self.personal_access_token))
            .field("username", &redact(&self.username))
            .finish()
    }
}

/// The logical credential field a reference is resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GitAuthField {
    PersonalAccessToken,
    SshPrivateKey,
    SshPassword,
    Username,
    Password,
}

impl Display for GitAuthField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            GitAuthField::PersonalAccessToken => write!(f, "personal access token"),
            GitAuthField::SshPrivateKey => write!(f, "SSH private key"),
            GitAuthField::SshPassword => write!(f, "SSH password"),
            GitAuthField::Username => write!(f, "username"),
            GitAuthField::Password => write!(f, "password"),
        }
    }
}

/// A validated `gitAuth` config with exactly one credential shape
#[derive(Debug, Clone, PartialEq)]
pub enum GitAuthMethod {
    PersonalAccessToken(ResourceRef),
    SshAuth {
        private_key: ResourceRef,
        password: Option<ResourceRef>,
    },
    BasicAuth {
        username: ResourceRef,
        password: ResourceRef,
    },
}

impl TryFrom<&GitAuthConfig> for GitAuthMethod {
    type Error = GitAuthError;

    fn try_from(config: &GitAuthConfig) -> Result<Self, Self::Error> {
        match (&config.access_token, &config.ssh_auth, &config.basic_auth) {
            (Some(token), None, None) => Ok(GitAuthMethod::PersonalAccessToken(token.clone())),
            (None, Some(ssh), None) => Ok(GitAuthMethod::SshAuth {
                private_key: ssh.ssh_private_key.clone(),
                password: ssh.password.clone(),
            }),
            (None, None, Some(basic)) => Ok(GitAuthMethod::BasicAuth {
                username: basic.user_name.clone(),
                password: basic.password.clone(),
            }),
            _ => Err(GitAuthError::InvalidConfig),
        }
    }
}

/// Where the credentials of a resource come from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GitAuthSource<'a> {
    /// Structured `gitAuth` config
    Config(&'a GitAuthConfig),
    /// Legacy `gitAuthSecret` name
    LegacySecret(&'a str),
    None,
}

impl<'a> From<&'a StackSpec> for GitAuthSource<'a> {
    fn from(spec: &'a StackSpec) -> Self {
        match (&spec.git_auth, spec.git_auth_secret.as_deref()) {
            (Some(config), _) => GitAuthSource::Config(config),
            (None, Some(name)) if !name.is_empty() => GitAuthSource::LegacySecret(name),
            _ => GitAuthSource::None,
        }
    }
}
