// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use kube::CustomResource;
use std::fmt::{Display, Formatter, Result as FmtResult};
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::crd::v1alpha1::common::GitAuthConfig;

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema)]
#[kube(
    kind = "Stack",
    group = "gitauth.io",
    version = "v1alpha1",
    status = "StackStatus",
    doc = "Stack is a project sourced from a git repository whose credentials are resolved by the operator.",
    derive = "PartialEq",
    printcolumn = r#"{"name":"Phase", "type":"string", "description":"Current phase of the resource", "jsonPath":".status.phase"}"#,
    printcolumn = r#"{"name":"Auth", "type":"string", "description":"Resolved git authentication method", "jsonPath":".status.authMethod"}"#,
    printcolumn = r#"{"name":"Last Updated", "type":"date", "description":"Last time the resource was updated", "jsonPath":".status.lastUpdated"}"#,
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct StackSpec {
    /// Git repository containing the project
    pub project_repo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Branch to check out
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Commit to check out, takes precedence over the branch
    pub commit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Directory within the repository holding the project
    pub repo_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Name of a Secret in the Stack's namespace holding git credentials under
    /// the conventional keys `sshPrivateKey`, `password`, `accessToken` and `username`.
    /// Ignored when `gitAuth` is set.
    pub git_auth_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Git credentials assembled from Secrets, files or environment variables
    pub git_auth: Option<GitAuthConfig>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StackStatus {
    pub phase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_method: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackPhase {
    // Credentials have not been resolved yet
    Pending,
    // Credentials resolved
    Ready,
    // Credentials could not be resolved
    Failed,
}

impl Display for StackPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StackPhase::Pending => write!(f, "pending"),
            StackPhase::Ready => write!(f, "ready"),
            StackPhase::Failed => write!(f, "failed"),
        }
    }
}
