//! Wide outbound descriptor.
//!
//! `Outbound` is the generic node shape shared by editors and importers. Every
//! protocol-specific field lives side by side in one struct and `type` decides
//! which of them mean anything. Use [`crate::normalize::build_for_runtime`] to
//! obtain the strict per-protocol form the engine accepts.

use linked_hash_map::LinkedHashMap;
use serde::{Deserialize, Serialize};

use super::serde_helpers::{is_false, string_or_seq};

/// Known outbound protocol types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutboundType {
    Shadowsocks,
    VMess,
    VLess,
    Trojan,
    Hysteria,
    Hysteria2,
    Tuic,
    AnyTls,
    WireGuard,
    Ssh,
    ShadowTls,
    Socks,
    Http,
    Selector,
    UrlTest,
    Direct,
    Block,
    Dns,
}

impl OutboundType {
    /// Resolves an engine type name. `url-test` is accepted as an alias of
    /// `urltest`; matching is exact otherwise.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name {
            "shadowsocks" => OutboundType::Shadowsocks,
            "vmess" => OutboundType::VMess,
            "vless" => OutboundType::VLess,
            "trojan" => OutboundType::Trojan,
            "hysteria" => OutboundType::Hysteria,
            "hysteria2" => OutboundType::Hysteria2,
            "tuic" => OutboundType::Tuic,
            "anytls" => OutboundType::AnyTls,
            "wireguard" => OutboundType::WireGuard,
            "ssh" => OutboundType::Ssh,
            "shadowtls" => OutboundType::ShadowTls,
            "socks" => OutboundType::Socks,
            "http" => OutboundType::Http,
            "selector" => OutboundType::Selector,
            "urltest" | "url-test" => OutboundType::UrlTest,
            "direct" => OutboundType::Direct,
            "block" => OutboundType::Block,
            "dns" => OutboundType::Dns,
            _ => return None,
        };
        Some(kind)
    }

    /// Canonical engine type name.
    pub fn as_str(self) -> &'static str {
        match self {
            OutboundType::Shadowsocks => "shadowsocks",
            OutboundType::VMess => "vmess",
            OutboundType::VLess => "vless",
            OutboundType::Trojan => "trojan",
            OutboundType::Hysteria => "hysteria",
            OutboundType::Hysteria2 => "hysteria2",
            OutboundType::Tuic => "tuic",
            OutboundType::AnyTls => "anytls",
            OutboundType::WireGuard => "wireguard",
            OutboundType::Ssh => "ssh",
            OutboundType::ShadowTls => "shadowtls",
            OutboundType::Socks => "socks",
            OutboundType::Http => "http",
            OutboundType::Selector => "selector",
            OutboundType::UrlTest => "urltest",
            OutboundType::Direct => "direct",
            OutboundType::Block => "block",
            OutboundType::Dns => "dns",
        }
    }

    /// Group types pick among other outbounds instead of dialing a server.
    pub fn is_group(self) -> bool {
        matches!(self, OutboundType::Selector | OutboundType::UrlTest)
    }
}

/// Protocol version, numeric for ShadowTLS and textual for SOCKS (`4a`).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum Version {
    Number(u8),
    Text(String),
}

/// Generic descriptor of one proxy node.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Outbound {
    #[serde(rename = "type", default)]
    pub outbound_type: String,

    #[serde(default)]
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    // Groups (selector / urltest)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outbounds: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Probe interval, a Go duration string such as `"3m"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupt_exist_connections: Option<bool>,

    // Credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// SSH login user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Shadowsocks cipher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// VMess cipher; also the legacy VLESS field the engine rejects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alter_id: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_padding: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticated_length: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packet_encoding: Option<String>,

    /// Enabled network: tcp, udp, or both when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,

    // Shadowsocks / SOCKS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin_opts: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_over_tcp: Option<bool>,

    // Hysteria / Hysteria2
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_mbps: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_mbps: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfs: Option<ObfsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_str: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recv_window_conn: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recv_window: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_mtu_discovery: Option<bool>,

    /// Port hopping ranges such as `"20000:30000"`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_ports: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hop_interval: Option<String>,

    // TUIC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub congestion_control: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_relay_mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_over_stream: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zero_rtt_handshake: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat: Option<String>,

    // AnyTLS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_session_check_interval: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_session_timeout: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_idle_session: Option<u32>,

    // WireGuard
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub local_address: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_public_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_shared_key: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reserved: Vec<u8>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub peers: Vec<WireGuardPeer>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,

    // SSH
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key_passphrase: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host_key: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host_key_algorithms: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_version: Option<String>,

    // HTTP proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "LinkedHashMap::is_empty")]
    pub headers: LinkedHashMap<String, String>,

    // Shared sub-descriptors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transport: Option<TransportConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplex: Option<MultiplexConfig>,

    #[serde(flatten)]
    pub dial: DialFields,
}

impl Outbound {
    pub fn new(outbound_type: impl Into<String>, tag: impl Into<String>) -> Self {
        Outbound {
            outbound_type: outbound_type.into(),
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Resolved protocol type, `None` for types this crate does not model.
    pub fn kind(&self) -> Option<OutboundType> {
        OutboundType::from_name(&self.outbound_type)
    }

    /// Server address with IPv6 brackets removed.
    pub fn bare_server(&self) -> Option<&str> {
        self.server.as_deref().map(str::trim).map(|server| {
            server
                .strip_prefix('[')
                .and_then(|s| s.strip_suffix(']'))
                .unwrap_or(server)
                .trim()
        })
    }

    pub fn tls_enabled(&self) -> bool {
        self.tls.as_ref().map_or(false, |tls| tls.enabled)
    }

    /// Transport type name, lower-cased.
    pub fn transport_type(&self) -> Option<String> {
        self.transport
            .as_ref()
            .map(|t| t.transport_type.trim().to_lowercase())
            .filter(|t| !t.is_empty())
    }

    pub fn is_websocket(&self) -> bool {
        self.transport_type().as_deref() == Some("ws")
    }
}

/// Dial fields valid for every proxy protocol.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct DialFields {
    /// Tag of the upstream outbound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detour: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_interface: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub tcp_fast_open: bool,

    /// prefer_ipv4, prefer_ipv6, ipv4_only, ipv6_only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_strategy: Option<String>,
}

/// Client TLS settings.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TlsConfig {
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub disable_sni: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub insecure: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alpn: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_version: Option<String>,

    /// Pinned server certificate (PEM)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_path: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub client_certificate: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub client_key: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utls: Option<UtlsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reality: Option<RealityConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ech: Option<EchConfig>,
}

impl TlsConfig {
    /// uTLS fingerprint name when uTLS is on.
    pub fn fingerprint(&self) -> Option<&str> {
        self.utls
            .as_ref()
            .filter(|utls| utls.enabled)
            .and_then(|utls| utls.fingerprint.as_deref())
            .filter(|fp| !fp.trim().is_empty())
    }

    pub fn reality_enabled(&self) -> bool {
        self.reality.as_ref().map_or(false, |r| r.enabled)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct UtlsConfig {
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct RealityConfig {
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_id: Option<String>,
}

/// Encrypted Client Hello
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct EchConfig {
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub config: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

/// V2Ray-style transport, all transport kinds in one struct.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TransportConfig {
    /// tcp, ws, grpc, http, h2, httpupgrade, quic, xhttp, splithttp
    #[serde(rename = "type", default)]
    pub transport_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "LinkedHashMap::is_empty")]
    pub headers: LinkedHashMap<String, String>,

    #[serde(
        default,
        deserialize_with = "string_or_seq",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub host: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_timeout: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ping_timeout: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub permit_without_stream: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_early_data: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_data_header_name: Option<String>,

    // xhttp / splithttp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_padding_bytes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sc_max_each_post_bytes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sc_min_posts_interval_ms: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sc_max_buffered_posts: Option<u32>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub no_grpc_header: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub no_sse_header: bool,
}

impl TransportConfig {
    pub fn new(transport_type: impl Into<String>) -> Self {
        TransportConfig {
            transport_type: transport_type.into(),
            ..Default::default()
        }
    }

    /// Non-blank header value, name matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// First non-blank entry of the host list.
    pub fn first_host(&self) -> Option<&str> {
        self.host
            .iter()
            .map(|h| h.trim())
            .find(|h| !h.is_empty())
    }

    /// Host a WebSocket handshake would carry: the `Host` header, else the
    /// transport host list.
    pub fn ws_host(&self) -> Option<&str> {
        self.header("Host").or_else(|| self.first_host())
    }

    /// Sets a header, replacing any existing entry whose name matches
    /// case-insensitively.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let existing: Vec<String> = self
            .headers
            .keys()
            .filter(|key| key.eq_ignore_ascii_case(name))
            .cloned()
            .collect();
        for key in existing {
            self.headers.remove(&key);
        }
        self.headers.insert(name.to_string(), value.into());
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct MultiplexConfig {
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,

    /// smux, yamux or h2mux
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_connections: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_streams: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_streams: Option<u32>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub padding: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brutal: Option<BrutalConfig>,
}

/// TCP Brutal congestion settings for multiplexed streams.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BrutalConfig {
    #[serde(default, skip_serializing_if = "is_false")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_mbps: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_mbps: Option<u32>,
}

/// Obfuscation settings.
///
/// Hysteria v1 configs carry `obfs` as a bare password string, Hysteria2 as
/// an object; both deserialize into this struct.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(from = "ObfsRepr")]
pub struct ObfsConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub obfs_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ObfsRepr {
    Password(String),
    Full {
        #[serde(rename = "type", default)]
        obfs_type: Option<String>,
        #[serde(default)]
        password: Option<String>,
    },
}

impl From<ObfsRepr> for ObfsConfig {
    fn from(repr: ObfsRepr) -> Self {
        match repr {
            ObfsRepr::Password(password) => ObfsConfig {
                obfs_type: None,
                password: Some(password),
            },
            ObfsRepr::Full {
                obfs_type,
                password,
            } => ObfsConfig {
                obfs_type,
                password,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WireGuardPeer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_shared_key: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_ips: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reserved: Vec<u8>,
}
