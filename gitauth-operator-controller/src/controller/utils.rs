// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use kube::{runtime::controller::Action, Client};
use std::sync::Arc;
use tokio::time::Duration;

use gitauth_operator_common::telemetry::error;

use crate::controller::context::Context;
use crate::error::{ControllerError, Result};

pub static FIELD_MANAGER: &str = "operator.gitauth.io";


/// Create a new kube client by inferring the kubeconfig from the environment
/// or the default service account
///
/// # Returns
/// A Result containing the kube Client or an error
pub async fn create_k8s_client() -> Result<Client> {
    Client::try_default().await.map_err(ControllerError::from)
}

/// Error policy to log the error and requeue the object
///
/// # Arguments
/// * `_object`: The object that caused the error
/// * `error`: The error that occurred
/// * `ctx`: The context of the controller
///
/// # Returns
/// An Action to requeue the object after the configured error interval
pub fn error_policy<T>(_object: Arc<T>, error: &ControllerError, ctx: Arc<Context>) -> Action {
    error!(
        event = "Error",
        error = %error,
    );
    Action::requeue(Duration::from_secs(ctx.controller_config().error_requeue_seconds))
}
