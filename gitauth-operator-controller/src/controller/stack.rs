// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use kube::{
    api::{Api, Patch, PatchParams, ResourceExt},
    runtime::{
        controller::{Action, Controller},
        watcher,
    },
};
use std::sync::Arc;
use chrono::Utc;
use tokio::time::Duration;
use serde_json::json;

use gitauth_operator_common::telemetry::{info, info_span};

use crate::controller::{context::Context, utils::FIELD_MANAGER};
use crate::crd::{NamespacedCustomResource, v1alpha1::stack::{Stack, StackPhase, StackStatus}};
use crate::error::{Result, ControllerError};
use crate::git_auth::{GitAuth, GitAuthResult, GitAuthSession, GitAuthSource};


pub struct StackController;

impl StackController {
    /// Create a new controller for the Stack resource
    ///
    /// # Arguments
    /// * `ctx` - The controller context
    ///
    /// # Returns
    /// The controller for the Stack resource
    pub async fn create_controller<T>(ctx: Arc<Context>) -> Controller<T>
    where
        T: NamespacedCustomResource
    {
        let stack = Api::<T>::all(ctx.client.clone());

        Controller::new(stack, watcher::Config::default())
    }

    /// Reconcile the Stack resource
    ///
    /// Resolves the git credentials of the Stack and records the outcome on its
    /// status. Resolved values are never logged or stored.
    ///
    /// # Arguments
    /// * `stack` - The Stack resource to reconcile
    /// * `ctx` - The controller context
    ///
    /// # Returns
    /// An action to take after reconciling the Stack resource
    pub async fn reconcile<T>(stack: Arc<T>, ctx: Arc<Context>) -> Result<Action>
    where
        T: NamespacedCustomResource,
        Stack: From<T>,
    {
        // The Stack resource is namespaced, so we need to verify that it is specified
        let namespace = match stack.namespace() {
            Some(namespace) => namespace,
            None => return Err(
                ControllerError::MissingObjectKeyError(
                    "Expected Stack to be namespaced via metadata.namespace"
                )
            )
        };
        let name = stack.name_any();
        let hub = Stack::from((*stack).clone());

        if let Some(pending) = initial_status(hub.status.as_ref()) {
            info!(
                event = "UpdatingStackStatus",
                stack = name.as_str(),
                phase = pending.phase.as_str(),
            );
            update_status::<T>(&ctx, &namespace, &name, &pending).await?;
        }

        let session = GitAuthSession::new(
            &ctx.client,
            &namespace,
            info_span!("git_auth", stack = name.as_str(), namespace = namespace.as_str()),
        );
        let outcome = session.setup_git_auth(GitAuthSource::from(&hub.spec)).await;

        let status = resolution_status(&outcome);
        if status_has_drifted(hub.status.as_ref(), &status) {
            info!(
                event = "UpdatingStackStatus",
                stack = name.as_str(),
                phase = status.phase.as_str(),
            );
            update_status::<T>(&ctx, &namespace, &name, &status).await?;
        }

        let auth = outcome?;
        info!(
            event = "GitAuthResolved",
            stack = name.as_str(),
            method = auth.method().unwrap_or("none"),
        );

        Ok(Action::requeue(Duration::from_secs(ctx.controller_config().requeue_seconds)))
    }
}

/// Status to record before the first resolution of a Stack
///
/// # Arguments
/// * `current` - The current status of the Stack
///
/// # Returns
/// A pending status when the Stack has none yet
pub fn initial_status(current: Option<&StackStatus>) -> Option<StackStatus> {
    current.is_none().then(|| StackStatus {
        phase: StackPhase::Pending.to_string(),
        ..Default::default()
    })
}

/// Build the status describing the outcome of a resolution
///
/// Only the credential family is recorded, nothing derived from the values.
///
/// # Arguments
/// * `outcome` - The resolved credentials or the resolution error
///
/// # Returns
/// The status without a timestamp
pub fn resolution_status(outcome: &GitAuthResult<GitAuth>) -> StackStatus {
    match outcome {
        Ok(auth) => StackStatus {
            phase: StackPhase::Ready.to_string(),
            message: None,
            auth_method: auth.method().map(str::to_string),
            last_updated: None,
        },
        Err(error) => StackStatus {
            phase: StackPhase::Failed.to_string(),
            message: Some(error.to_string()),
            auth_method: None,
            last_updated: None,
        },
    }
}

/// Determine if the incoming status differs from the current one, ignoring timestamps
pub fn status_has_drifted(current: Option<&StackStatus>, incoming: &StackStatus) -> bool {
    match current {
        Some(current) => {
            current.phase != incoming.phase
                || current.message != incoming.message
                || current.auth_method != incoming.auth_method
        },
        None => true,
    }
}

/// Update the status of the Stack resource
///
/// # Arguments
/// * `ctx` - The controller context
/// * `namespace` - The namespace of the Stack resource
/// * `name` - The name of the Stack resource
/// * `status` - The status to record
///
/// # Returns
/// A result indicating success or failure
async fn update_status<T>(ctx: &Context, namespace: &str, name: &str, status: &StackStatus) -> Result<()>
where
    T: NamespacedCustomResource,
{
    let api = Api::<T>::namespaced(ctx.client.clone(), namespace);

    // Unset members are sent as null so the merge patch clears them
    api.patch_status(
        name,
        &PatchParams::apply(FIELD_MANAGER),
        &Patch::Merge(json!({
            "status": {
                "phase": status.phase,
                "message": status.message,
                "authMethod": status.auth_method,
                "lastUpdated": Utc::now(),
            }
        })),
    ).await?;

    Ok(())
}
