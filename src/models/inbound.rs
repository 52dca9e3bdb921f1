//! Local listener descriptors handed to the engine.

use serde::{Deserialize, Serialize};

/// Inbound listener, tagged by `type` the way the engine schema expects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Inbound {
    /// SOCKS and HTTP proxy on one port
    Mixed(MixedInbound),
    /// Virtual network interface
    Tun(TunInbound),
}

impl Inbound {
    pub fn tag(&self) -> &str {
        match self {
            Inbound::Mixed(mixed) => &mixed.tag,
            Inbound::Tun(tun) => &tun.tag,
        }
    }
}

/// Sniffing options shared by every inbound the builder emits.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SniffFields {
    pub sniff: bool,

    pub sniff_override_destination: bool,

    /// Go duration string, e.g. `300ms`
    pub sniff_timeout: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MixedInbound {
    pub tag: String,

    pub listen: String,

    pub listen_port: u16,

    #[serde(flatten)]
    pub sniff: SniffFields,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TunInbound {
    pub tag: String,

    pub interface_name: String,

    pub inet4_address: Vec<String>,

    pub mtu: u32,

    pub auto_route: bool,

    pub strict_route: bool,

    /// system, gvisor or mixed
    pub stack: String,

    pub endpoint_independent_nat: bool,

    pub gso: bool,

    #[serde(flatten)]
    pub sniff: SniffFields,
}
