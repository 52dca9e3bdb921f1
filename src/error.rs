use thiserror::Error;

/// Errors raised by the fallible edges of the crate: loading settings and
/// assembling a full engine config. Normalization and link export never fail.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unrecognized settings format")]
    UnknownFormat,

    #[error("duplicate outbound tag: {0}")]
    DuplicateTag(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
