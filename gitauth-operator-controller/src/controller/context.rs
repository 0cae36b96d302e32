// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use kube::Client;
use std::sync::Arc;

use gitauth_operator_common::config::ControllerConfig;
use gitauth_operator_common::state::State;

// Context struct to hold the kube client and the state
#[derive(Clone)]
pub struct Context {
    pub client: Client,
    pub state: Option<Arc<State>>,
}

impl Context {
    pub fn new(client: Client) -> Self {
        Self { client, state: None }
    }

    pub fn with_state(mut self, state: Arc<State>) -> Self {
        self.state = Some(state);
        self
    }

    /// Controller settings from the state, or the defaults when no state is attached
    pub fn controller_config(&self) -> ControllerConfig {
        self.state
            .as_ref()
            .map(|state| state.config.controller.clone())
            .unwrap_or_default()
    }
}
