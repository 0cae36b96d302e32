// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[
    clap(
        name = "gitauth-operator",
        version,
        author,
        about = "Operator resolving git credentials for Stack resources"
    )
]
pub struct CliArgs {
    #[clap(long, global = true, env = "GITAUTH_OPERATOR_CONFIG", help = "Path to a JSON or YAML config file")]
    pub config: Option<String>,
    #[clap(long, global = true, help = "Seconds between resolutions of a healthy Stack")]
    pub requeue_seconds: Option<u64>,
    #[clap(long, global = true, help = "Seconds before retrying a Stack that failed to resolve")]
    pub error_requeue_seconds: Option<u64>,
    #[clap(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[
        clap(
            name = "crds",
            about = "Generate Custom Resource Definitions (CRDs) for the operator"
        )
    ]
    Crds,
    #[
        clap(
            name = "controller",
            about = "Run the controller"
        )
    ]
    Controller,
}
