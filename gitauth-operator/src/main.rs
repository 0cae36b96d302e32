// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

mod cli;

use std::sync::Arc;
use futures::StreamExt;
use std::process;
use clap::Parser;
use clap::CommandFactory;
use rustls::crypto::aws_lc_rs;

use gitauth_operator_common::config::{AppConfig, AppConfigBuilder};
use gitauth_operator_common::state::State;
use gitauth_operator_common::telemetry::{error, info, setup_logging};
use gitauth_operator_controller::controller::{context::Context, utils::{error_policy, create_k8s_client}, stack::StackController};
use gitauth_operator_controller::crd::{v1alpha1::stack::Stack as V1Alpha1Stack, utils as crd_utils};

use crate::cli::{CliArgs, Commands};

fn load_config(args: &CliArgs) -> AppConfig {
    let mut builder = AppConfigBuilder::default();
    if let Some(path) = args.config.as_deref() {
        builder.with_file(path);
    }

    builder
        .with_env()
        .with_override_option("controller.requeue_seconds", args.requeue_seconds)
        .with_override_option("controller.error_requeue_seconds", args.error_requeue_seconds)
        .build()
        .unwrap_or_else(|e| {
            error!(
                event = "Error",
                error = %e,
            );
            process::exit(1);
        })
}

#[tokio::main]
async fn main() {
    // Install the default aws_lc_rs crypto provider
    let _ = aws_lc_rs::default_provider().install_default();

    let args = CliArgs::parse();

    setup_logging();

    match &args.cmd {
        Some(Commands::Crds) => crd_utils::generate_crds().unwrap_or_else(|e| {
            error!(
                event = "Error",
                error = %e,
            );
            process::exit(1);
        }),
        Some(Commands::Controller) => {
            info!(
                event = "Starting",
                version = env!("CARGO_PKG_VERSION"),
            );

            // Load configuration
            let config = load_config(&args);

            // Create necessary resources
            let state = Arc::new(State::new(config));
            let client = create_k8s_client().await.unwrap_or_else(|e| {
                error!(
                    event = "Error",
                    error = %e,
                );
                process::exit(1);
            });
            let controller_ctx = Arc::new(Context::new(client).with_state(state.clone()));

            // Create CRD controllers
            let v1alpha1_stack_controller = StackController::create_controller::<V1Alpha1Stack>(controller_ctx.clone()).await;

            // Run CRD controllers
            info!(event = "ControllerStarted", kind = "Stack", version = "v1alpha1");
            let v1alpha1_stack_handle = tokio::spawn(async move {
                v1alpha1_stack_controller
                    .shutdown_on_signal()
                    .run(StackController::reconcile::<V1Alpha1Stack>, error_policy::<V1Alpha1Stack>, controller_ctx.clone())
                    .for_each(|r| async move {
                        match r {
                            Ok(_) => info!(event = "Reconciled", kind = "Stack", version = "v1alpha1"),
                            Err(e) => error!(event = "ReconcileError", error = %e),
                        }
                    })
                    .await
            });

            // Wait for all controllers to finish
            match tokio::try_join!(v1alpha1_stack_handle) {
                Ok(_) => info!(event = "Stopped"),
                Err(e) => error!(event = "Error", error = %e),
            }
        },
        None => {
            let mut cmd = CliArgs::command();
            let _ = cmd.print_help();
            process::exit(1);
        },
    }
}
