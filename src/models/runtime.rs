//! Strict per-protocol outbound shapes.
//!
//! Every variant of [`Protocol`] carries only the fields the engine accepts
//! for that protocol, so a value built from a wide [`Outbound`] can never
//! carry a field that belongs to another protocol.

use linked_hash_map::LinkedHashMap;
use serde::Serialize;

use super::outbound::{
    DialFields, MultiplexConfig, Outbound, TlsConfig, TransportConfig, Version, WireGuardPeer,
};
use super::serde_helpers::is_false;

/// Outbound ready for the engine.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum RuntimeOutbound {
    Typed(Protocol),
    /// Types this crate does not model are forwarded as they are.
    Passthrough(Outbound),
}

impl RuntimeOutbound {
    pub fn tag(&self) -> &str {
        match self {
            RuntimeOutbound::Typed(protocol) => protocol.tag(),
            RuntimeOutbound::Passthrough(outbound) => &outbound.tag,
        }
    }

    pub fn protocol(&self) -> Option<&Protocol> {
        match self {
            RuntimeOutbound::Typed(protocol) => Some(protocol),
            RuntimeOutbound::Passthrough(_) => None,
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Protocol {
    Selector(SelectorOutbound),
    Direct(DirectOutbound),
    Block(BlockOutbound),
    Dns(DnsOutbound),
    #[serde(rename = "vmess")]
    VMess(VMessOutbound),
    #[serde(rename = "vless")]
    VLess(VLessOutbound),
    Trojan(TrojanOutbound),
    Shadowsocks(ShadowsocksOutbound),
    Hysteria(HysteriaOutbound),
    Hysteria2(Hysteria2Outbound),
    Tuic(TuicOutbound),
    #[serde(rename = "anytls")]
    AnyTls(AnyTlsOutbound),
    #[serde(rename = "wireguard")]
    WireGuard(WireGuardOutbound),
    Ssh(SshOutbound),
    #[serde(rename = "shadowtls")]
    ShadowTls(ShadowTlsOutbound),
    Socks(SocksOutbound),
    Http(HttpOutbound),
}

impl Protocol {
    pub fn tag(&self) -> &str {
        match self {
            Protocol::Selector(o) => &o.tag,
            Protocol::Direct(o) => &o.tag,
            Protocol::Block(o) => &o.tag,
            Protocol::Dns(o) => &o.tag,
            Protocol::VMess(o) => &o.tag,
            Protocol::VLess(o) => &o.tag,
            Protocol::Trojan(o) => &o.tag,
            Protocol::Shadowsocks(o) => &o.tag,
            Protocol::Hysteria(o) => &o.tag,
            Protocol::Hysteria2(o) => &o.tag,
            Protocol::Tuic(o) => &o.tag,
            Protocol::AnyTls(o) => &o.tag,
            Protocol::WireGuard(o) => &o.tag,
            Protocol::Ssh(o) => &o.tag,
            Protocol::ShadowTls(o) => &o.tag,
            Protocol::Socks(o) => &o.tag,
            Protocol::Http(o) => &o.tag,
        }
    }
}

// ============================================================================
// Transports
// ============================================================================

/// Transport as the engine accepts it.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum RuntimeTransport {
    Typed(V2RayTransport),
    /// xhttp and other transports only some engine builds understand
    Passthrough(TransportConfig),
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum V2RayTransport {
    Http(HttpTransport),
    #[serde(rename = "ws")]
    WebSocket(WebSocketTransport),
    Quic(QuicTransport),
    #[serde(rename = "grpc")]
    Grpc(GrpcTransport),
    #[serde(rename = "httpupgrade")]
    HttpUpgrade(HttpUpgradeTransport),
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct HttpTransport {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub host: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(skip_serializing_if = "LinkedHashMap::is_empty")]
    pub headers: LinkedHashMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_timeout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping_timeout: Option<String>,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct WebSocketTransport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "LinkedHashMap::is_empty")]
    pub headers: LinkedHashMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_early_data: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub early_data_header_name: Option<String>,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct QuicTransport {}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct GrpcTransport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_timeout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ping_timeout: Option<String>,

    #[serde(skip_serializing_if = "is_false")]
    pub permit_without_stream: bool,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct HttpUpgradeTransport {
    /// Single host, unlike the HTTP transport's list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "LinkedHashMap::is_empty")]
    pub headers: LinkedHashMap<String, String>,
}

// ============================================================================
// Groups and built-ins
// ============================================================================

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct SelectorOutbound {
    pub tag: String,

    pub outbounds: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    #[serde(skip_serializing_if = "is_false")]
    pub interrupt_exist_connections: bool,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct DirectOutbound {
    pub tag: String,

    #[serde(flatten)]
    pub dial: DialFields,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct BlockOutbound {
    pub tag: String,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct DnsOutbound {
    pub tag: String,
}

// ============================================================================
// Proxy protocols
// ============================================================================

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct VMessOutbound {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    /// auto, none, zero, aes-128-gcm, chacha20-poly1305
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alter_id: Option<u32>,

    #[serde(skip_serializing_if = "is_false")]
    pub global_padding: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub authenticated_length: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet_encoding: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<RuntimeTransport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplex: Option<MultiplexConfig>,

    #[serde(flatten)]
    pub dial: DialFields,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct VLessOutbound {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet_encoding: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<RuntimeTransport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplex: Option<MultiplexConfig>,

    #[serde(flatten)]
    pub dial: DialFields,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct TrojanOutbound {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport: Option<RuntimeTransport>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplex: Option<MultiplexConfig>,

    #[serde(flatten)]
    pub dial: DialFields,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct ShadowsocksOutbound {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// SIP003 plugin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub plugin_opts: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(skip_serializing_if = "is_false")]
    pub udp_over_tcp: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiplex: Option<MultiplexConfig>,

    #[serde(flatten)]
    pub dial: DialFields,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct HysteriaOutbound {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub server_ports: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hop_interval: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_mbps: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_mbps: Option<u32>,

    /// Obfuscation password; v1 has no obfuscation type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub obfs: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_str: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recv_window_conn: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recv_window: Option<u64>,

    #[serde(skip_serializing_if = "is_false")]
    pub disable_mtu_discovery: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,

    #[serde(flatten)]
    pub dial: DialFields,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct Hysteria2Obfs {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub obfs_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct Hysteria2Outbound {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub server_ports: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub hop_interval: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_mbps: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub down_mbps: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub obfs: Option<Hysteria2Obfs>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,

    #[serde(flatten)]
    pub dial: DialFields,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct TuicOutbound {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// cubic, new_reno or bbr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub congestion_control: Option<String>,

    /// native or quic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub udp_relay_mode: Option<String>,

    #[serde(skip_serializing_if = "is_false")]
    pub udp_over_stream: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub zero_rtt_handshake: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartbeat: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,

    #[serde(flatten)]
    pub dial: DialFields,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct AnyTlsOutbound {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_session_check_interval: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub idle_session_timeout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_idle_session: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,

    #[serde(flatten)]
    pub dial: DialFields,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct WireGuardOutbound {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub local_address: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_public_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_shared_key: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reserved: Vec<u8>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub peers: Vec<WireGuardPeer>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(flatten)]
    pub dial: DialFields,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct SshOutbound {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key_passphrase: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub host_key: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub host_key_algorithms: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_version: Option<String>,

    #[serde(flatten)]
    pub dial: DialFields,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct ShadowTlsOutbound {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,

    #[serde(flatten)]
    pub dial: DialFields,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct SocksOutbound {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    /// 4, 4a or 5
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<Version>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,

    #[serde(skip_serializing_if = "is_false")]
    pub udp_over_tcp: bool,

    #[serde(flatten)]
    pub dial: DialFields,
}

#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct HttpOutbound {
    pub tag: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_port: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(skip_serializing_if = "LinkedHashMap::is_empty")]
    pub headers: LinkedHashMap<String, String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tls: Option<TlsConfig>,

    #[serde(flatten)]
    pub dial: DialFields,
}
