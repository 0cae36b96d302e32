// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use schemars::JsonSchema;


/// A reference to a single value held outside of the resource spec.
///
/// The `type` field selects which selector is read, so a reference
/// always designates exactly one source.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(tag = "type")]
pub enum ResourceRef {
    /// A key within a Kubernetes Secret
    Secret { secret: SecretSelector },
    /// A file on the operator's local filesystem
    #[serde(rename = "FS")]
    FileSystem { filesystem: FileSystemSelector },
    /// An environment variable of the operator process
    Env { env: EnvSelector },
}

impl ResourceRef {
    pub fn secret(namespace: Option<&str>, name: &str, key: &str) -> Self {
        ResourceRef::Secret {
            secret: SecretSelector {
                namespace: namespace.map(str::to_string),
                name: name.to_string(),
                key: key.to_string(),
            },
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        ResourceRef::FileSystem {
            filesystem: FileSystemSelector { path: path.into() },
        }
    }

    pub fn env(name: &str) -> Self {
        ResourceRef::Env {
            env: EnvSelector { name: name.to_string() },
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct SecretSelector {
    /// Namespace of the Secret, defaults to the namespace of the referencing resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// The name of the Secret to reference
    pub name: String,
    /// The key in the Secret to reference
    pub key: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct FileSystemSelector {
    /// Path of the file to read
    pub path: PathBuf,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
pub struct EnvSelector {
    /// Name of the environment variable to read
    pub name: String,
}

/// Git credentials for a Stack. Exactly one member must be set.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GitAuthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Personal access token to authenticate with
    pub access_token: Option<ResourceRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// SSH private key, with an optional passphrase
    pub ssh_auth: Option<SshAuth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Username and password
    pub basic_auth: Option<BasicAuth>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SshAuth {
    /// The SSH private key
    pub ssh_private_key: ResourceRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Passphrase protecting the private key
    pub password: Option<ResourceRef>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BasicAuth {
    pub user_name: ResourceRef,
    pub password: ResourceRef,
}
