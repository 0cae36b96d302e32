// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use std::result;
use thiserror::Error;

use crate::git_auth::error::GitAuthError;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("kube error: {0}")]
    KubeError(#[from] kube::Error),
    #[error("missing object key: {0}")]
    MissingObjectKeyError(&'static str),
    #[error("git auth error: {0}")]
    GitAuthError(#[from] GitAuthError),
    #[error("crd error: {0}")]
    CrdError(String),
}

pub type Result<T> = result::Result<T, ControllerError>;
