// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use std::path::Path;
use serde::{Serialize, Deserialize};
use figment::{Figment, Error, providers::{Format, Json, Yaml, Env, Serialized}};

use crate::constant::ENV_PREFIX;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub controller: ControllerConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ControllerConfig {
    /// Seconds to wait before re-resolving credentials of a healthy Stack
    #[serde(default)]
    pub requeue_seconds: u64,
    /// Seconds to wait before retrying a Stack whose credentials failed to resolve
    #[serde(default)]
    pub error_requeue_seconds: u64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        ControllerConfig {
            requeue_seconds: 300,
            error_requeue_seconds: 30,
        }
    }
}

pub struct AppConfigBuilder {
    figment: Figment,
}

impl AppConfigBuilder {
    pub fn with_file(&mut self, path: &str) -> &mut Self {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        self.figment = match extension {
            "json" => self.figment.clone().merge(Json::file(path)),
            "yaml" | "yml" => self.figment.clone().merge(Yaml::file(path)),
            _ => self.figment.clone(),
        };
        self
    }

    pub fn with_env(&mut self) -> &mut Self {
        self.figment = self.figment.clone().merge(Env::prefixed(&format!("{}__", ENV_PREFIX)).split("__"));
        self
    }

    pub fn with_override_option<V: Serialize>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.figment = self.figment.clone().merge(Serialized::default(key, value));
        }
        self
    }

    pub fn build(&self) -> Result<AppConfig, Error> {
        self.figment.extract()
    }
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        AppConfigBuilder {
            figment: Figment::from(Serialized::defaults(AppConfig::default()))
        }
    }
}
