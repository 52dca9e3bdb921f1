//! Core data models for the crate
//!
//! This module contains the data structures the normalizer, the inbound
//! builder and the link exporters operate on, separated from the logic itself.
//!
//! # Usage
//!
//! ```rust
//! use boxnode::models::{Outbound, TlsConfig};
//!
//! let mut outbound = Outbound::new("trojan", "JP-01");
//! outbound.server = Some("jp.example.com".to_string());
//! outbound.server_port = Some(443);
//! outbound.password = Some("secret".to_string());
//! outbound.tls = Some(TlsConfig {
//!     enabled: true,
//!     ..Default::default()
//! });
//! ```
//!
//! # Working with Option fields
//!
//! Nearly every field of `Outbound` is optional because only a subset is
//! meaningful for a given `type`:
//!
//! ```rust
//! use boxnode::Outbound;
//!
//! let outbound = Outbound::new("vmess", "node");
//! let security = outbound.security.as_deref().unwrap_or("auto");
//! assert_eq!(security, "auto");
//! ```

mod inbound;
mod outbound;
mod runtime;
pub(crate) mod serde_helpers;
mod settings;

pub use inbound::*;
pub use outbound::*;
pub use runtime::*;
pub use settings::*;
