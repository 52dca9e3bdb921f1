//! App-side settings consumed by the inbound builder.

use std::fmt;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// TUN network stack implementation.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TunStack {
    #[default]
    #[serde(alias = "system", alias = "SYSTEM")]
    System,
    #[serde(alias = "gvisor", alias = "GVISOR", alias = "gVisor")]
    GVisor,
    #[serde(alias = "mixed", alias = "MIXED")]
    Mixed,
}

impl TunStack {
    /// Name as the engine's `stack` field expects it.
    pub fn engine_name(self) -> String {
        self.to_string().to_lowercase()
    }
}

impl fmt::Display for TunStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TunStack::System => "System",
            TunStack::GVisor => "GVisor",
            TunStack::Mixed => "Mixed",
        };
        f.write_str(name)
    }
}

pub fn default_tun_interface_name() -> String {
    "tun0".to_string()
}

pub fn default_tun_mtu() -> u32 {
    9000
}

/// Settings record persisted by the app. Keys are camelCase on disk.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Local proxy port; zero or negative means unset
    pub proxy_port: i32,
    pub allow_lan: bool,
    pub tun_enabled: bool,
    pub tun_interface_name: String,
    pub tun_mtu: u32,
    pub endpoint_independent_nat: bool,
    pub tun_stack: TunStack,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            proxy_port: 0,
            allow_lan: false,
            tun_enabled: false,
            tun_interface_name: default_tun_interface_name(),
            tun_mtu: default_tun_mtu(),
            endpoint_independent_nat: false,
            tun_stack: TunStack::default(),
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Parses settings, detecting JSON, TOML or YAML from the content.
    pub fn load_from_content(content: &str) -> Result<Self> {
        let trimmed = content.trim_start();
        if trimmed.is_empty() {
            return Ok(Settings::default());
        }

        if trimmed.starts_with('{') {
            return Self::from_json_str(content);
        }

        if toml::from_str::<toml::Value>(content).is_ok() {
            return Self::from_toml_str(content);
        }

        match serde_yaml::from_str::<serde_yaml::Value>(content) {
            Ok(serde_yaml::Value::Mapping(_)) => Self::from_yaml_str(content),
            _ => Err(ConfigError::UnknownFormat),
        }
    }

    /// Loads settings from a file. The extension picks the format when it is
    /// one of `json`, `toml`, `yaml`/`yml`; otherwise the content decides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        debug!("Loading settings from {}", path.display());

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("toml") => Self::from_toml_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Self::load_from_content(&content),
        }
    }
}
