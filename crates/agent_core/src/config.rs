//! Widget configuration: defaults, then `me-agent.toml`, then environment.

use std::{fs, path::Path};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shared::domain::{Environment, SupportedNetwork};
use tracing::warn;
use url::Url;

use crate::{error::AgentError, views::OfferLinks};

pub const DEFAULT_CONFIG_FILE: &str = "me-agent.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeAgentConfig {
    pub partner_id: String,
    pub environment: Environment,
    pub network: SupportedNetwork,
    /// Id of the host element the widget mounts into.
    pub container_id: String,
    pub callback_url: String,
    pub locale: String,
}

impl Default for MeAgentConfig {
    fn default() -> Self {
        Self {
            partner_id: String::new(),
            environment: Environment::Production,
            network: SupportedNetwork::Ethereum,
            container_id: "me-agent".into(),
            callback_url: String::new(),
            locale: "en-US".into(),
        }
    }
}

impl MeAgentConfig {
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.partner_id.trim().is_empty() {
            return Err(AgentError::Config("partner_id must not be empty".into()));
        }
        if self.container_id.trim().is_empty() {
            return Err(AgentError::Config("container_id must not be empty".into()));
        }
        if self.locale.trim().is_empty() {
            return Err(AgentError::Config("locale must not be empty".into()));
        }
        self.callback()?;
        Ok(())
    }

    pub fn callback(&self) -> Result<Url, AgentError> {
        let url = Url::parse(self.callback_url.trim()).map_err(|err| {
            AgentError::Config(format!("callback_url '{}': {err}", self.callback_url))
        })?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(AgentError::Config(format!(
                "callback_url must be http(s), got scheme '{other}'"
            ))),
        }
    }

    pub fn offer_links(&self) -> Result<OfferLinks, AgentError> {
        let callback = self.callback()?;
        OfferLinks::new(
            self.environment,
            callback.as_str(),
            self.partner_id.clone(),
            self.locale.clone(),
        )
    }
}

/// Loads configuration from `path` (or [`DEFAULT_CONFIG_FILE`] if it exists)
/// and applies `ME_AGENT_*` / `APP__*` environment overrides.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<MeAgentConfig> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            read_config_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => MeAgentConfig::default(),
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn read_config_file(path: &Path) -> anyhow::Result<MeAgentConfig> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

/// Later keys win, so `APP__*` overrides `ME_AGENT_*`.
pub fn apply_env_overrides(config: &mut MeAgentConfig, lookup: impl Fn(&str) -> Option<String>) {
    let read = |suffix: &str| {
        [format!("ME_AGENT_{suffix}"), format!("APP__{suffix}")]
            .iter()
            .filter_map(|key| lookup(key.as_str()))
            .last()
    };

    if let Some(v) = read("PARTNER_ID") {
        config.partner_id = v;
    }
    if let Some(v) = read("CONTAINER_ID") {
        config.container_id = v;
    }
    if let Some(v) = read("CALLBACK_URL") {
        config.callback_url = v;
    }
    if let Some(v) = read("LOCALE") {
        config.locale = v;
    }
    if let Some(v) = read("ENVIRONMENT") {
        match v.parse::<Environment>() {
            Ok(environment) => config.environment = environment,
            Err(err) => warn!(error = %err, "ignoring environment override"),
        }
    }
    if let Some(v) = read("NETWORK") {
        match v.parse::<SupportedNetwork>() {
            Ok(network) => config.network = network,
            Err(err) => warn!(error = %err, "ignoring network override"),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
