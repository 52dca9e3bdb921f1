//! Complete engine configuration assembled from settings and nodes.

use std::collections::HashSet;

use log::info;
use serde::Serialize;

use super::inbounds::build_inbounds;
use crate::error::{ConfigError, Result};
use crate::models::{Inbound, Outbound, RuntimeOutbound, Settings};
use crate::normalize::build_for_runtime;

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct LogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
}

/// Top-level document handed to the engine.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub log: LogConfig,
    pub inbounds: Vec<Inbound>,
    pub outbounds: Vec<RuntimeOutbound>,
}

impl EngineConfig {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build the engine configuration
///
/// Every outbound goes through the fixer and the runtime projection; the
/// inbound list comes from `settings` and its TUN stack.
///
/// # Errors
///
/// [`ConfigError::DuplicateTag`] when two outbounds share a tag, since the
/// engine refuses to start on such a config.
pub fn build_engine_config(settings: &Settings, outbounds: &[Outbound]) -> Result<EngineConfig> {
    let mut seen = HashSet::new();
    for outbound in outbounds {
        if !seen.insert(outbound.tag.as_str()) {
            return Err(ConfigError::DuplicateTag(outbound.tag.clone()));
        }
    }

    let inbounds = build_inbounds(settings, settings.tun_stack);
    let outbounds: Vec<RuntimeOutbound> = outbounds.iter().map(build_for_runtime).collect();
    info!(
        "Built engine config with {} inbounds and {} outbounds",
        inbounds.len(),
        outbounds.len()
    );

    Ok(EngineConfig {
        log: LogConfig {
            level: Some("info".to_string()),
        },
        inbounds,
        outbounds,
    })
}
