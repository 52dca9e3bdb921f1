//! Projection of a fixed wide descriptor onto its strict engine shape.

use log::{debug, warn};

use super::fixer::fix_outbound;
use crate::models::*;

/// Fixes `outbound` and keeps only the fields valid for its type.
///
/// Editors reuse one wide struct for every protocol, so switching a node from
/// TUIC to VLESS leaves `congestion_control` behind. The engine schema is
/// strict per type; the projection drops everything the target protocol does
/// not define. Types this crate does not model are passed through fixed but
/// otherwise untouched.
pub fn build_for_runtime(outbound: &Outbound) -> RuntimeOutbound {
    let fixed = fix_outbound(outbound);

    let Some(kind) = fixed.kind() else {
        debug!(
            "Outbound '{}' has unmodeled type '{}', passing through",
            fixed.tag, fixed.outbound_type
        );
        return RuntimeOutbound::Passthrough(fixed);
    };

    RuntimeOutbound::Typed(project(kind, fixed))
}

fn project(kind: OutboundType, o: Outbound) -> Protocol {
    let transport = o.transport.as_ref().and_then(project_transport);

    match kind {
        OutboundType::Selector | OutboundType::UrlTest => Protocol::Selector(SelectorOutbound {
            tag: o.tag,
            outbounds: o.outbounds,
            default: o.default,
            interrupt_exist_connections: o.interrupt_exist_connections.unwrap_or(false),
        }),
        OutboundType::Direct => Protocol::Direct(DirectOutbound {
            tag: o.tag,
            dial: o.dial,
        }),
        OutboundType::Block => Protocol::Block(BlockOutbound { tag: o.tag }),
        OutboundType::Dns => Protocol::Dns(DnsOutbound { tag: o.tag }),
        OutboundType::VMess => Protocol::VMess(VMessOutbound {
            tag: o.tag,
            server: o.server,
            server_port: o.server_port,
            uuid: o.uuid,
            security: o.security,
            alter_id: o.alter_id,
            global_padding: o.global_padding.unwrap_or(false),
            authenticated_length: o.authenticated_length.unwrap_or(false),
            network: o.network,
            packet_encoding: o.packet_encoding,
            tls: o.tls,
            transport,
            multiplex: o.multiplex,
            dial: o.dial,
        }),
        OutboundType::VLess => Protocol::VLess(VLessOutbound {
            tag: o.tag,
            server: o.server,
            server_port: o.server_port,
            uuid: o.uuid,
            flow: o.flow,
            network: o.network,
            packet_encoding: o.packet_encoding,
            tls: o.tls,
            transport,
            multiplex: o.multiplex,
            dial: o.dial,
        }),
        OutboundType::Trojan => Protocol::Trojan(TrojanOutbound {
            tag: o.tag,
            server: o.server,
            server_port: o.server_port,
            password: o.password,
            network: o.network,
            tls: o.tls,
            transport,
            multiplex: o.multiplex,
            dial: o.dial,
        }),
        OutboundType::Shadowsocks => Protocol::Shadowsocks(ShadowsocksOutbound {
            tag: o.tag,
            server: o.server,
            server_port: o.server_port,
            method: o.method,
            password: o.password,
            plugin: o.plugin,
            plugin_opts: o.plugin_opts,
            network: o.network,
            udp_over_tcp: o.udp_over_tcp.unwrap_or(false),
            multiplex: o.multiplex,
            dial: o.dial,
        }),
        OutboundType::Hysteria => Protocol::Hysteria(HysteriaOutbound {
            tag: o.tag,
            server: o.server,
            server_port: o.server_port,
            server_ports: o.server_ports,
            hop_interval: o.hop_interval,
            up_mbps: o.up_mbps,
            down_mbps: o.down_mbps,
            obfs: o.obfs.and_then(|obfs| obfs.password),
            auth_str: o.auth_str,
            recv_window_conn: o.recv_window_conn,
            recv_window: o.recv_window,
            disable_mtu_discovery: o.disable_mtu_discovery.unwrap_or(false),
            network: o.network,
            tls: o.tls,
            dial: o.dial,
        }),
        OutboundType::Hysteria2 => Protocol::Hysteria2(Hysteria2Outbound {
            tag: o.tag,
            server: o.server,
            server_port: o.server_port,
            server_ports: o.server_ports,
            hop_interval: o.hop_interval,
            up_mbps: o.up_mbps,
            down_mbps: o.down_mbps,
            obfs: o.obfs.map(|obfs| Hysteria2Obfs {
                obfs_type: obfs.obfs_type,
                password: obfs.password,
            }),
            password: o.password,
            network: o.network,
            tls: o.tls,
            dial: o.dial,
        }),
        OutboundType::Tuic => Protocol::Tuic(TuicOutbound {
            tag: o.tag,
            server: o.server,
            server_port: o.server_port,
            uuid: o.uuid,
            password: o.password,
            congestion_control: o.congestion_control,
            udp_relay_mode: o.udp_relay_mode,
            udp_over_stream: o.udp_over_stream.unwrap_or(false),
            zero_rtt_handshake: o.zero_rtt_handshake.unwrap_or(false),
            heartbeat: o.heartbeat,
            network: o.network,
            tls: o.tls,
            dial: o.dial,
        }),
        OutboundType::AnyTls => Protocol::AnyTls(AnyTlsOutbound {
            tag: o.tag,
            server: o.server,
            server_port: o.server_port,
            password: o.password,
            idle_session_check_interval: o.idle_session_check_interval,
            idle_session_timeout: o.idle_session_timeout,
            min_idle_session: o.min_idle_session,
            tls: o.tls,
            dial: o.dial,
        }),
        OutboundType::WireGuard => Protocol::WireGuard(WireGuardOutbound {
            tag: o.tag,
            server: o.server,
            server_port: o.server_port,
            local_address: o.local_address,
            private_key: o.private_key,
            peer_public_key: o.peer_public_key,
            pre_shared_key: o.pre_shared_key,
            reserved: o.reserved,
            peers: o.peers,
            mtu: o.mtu,
            network: o.network,
            dial: o.dial,
        }),
        OutboundType::Ssh => Protocol::Ssh(SshOutbound {
            tag: o.tag,
            server: o.server,
            server_port: o.server_port,
            user: o.user,
            password: o.password,
            private_key: o.private_key,
            private_key_path: o.private_key_path,
            private_key_passphrase: o.private_key_passphrase,
            host_key: o.host_key,
            host_key_algorithms: o.host_key_algorithms,
            client_version: o.client_version,
            dial: o.dial,
        }),
        OutboundType::ShadowTls => Protocol::ShadowTls(ShadowTlsOutbound {
            tag: o.tag,
            server: o.server,
            server_port: o.server_port,
            version: o.version,
            password: o.password,
            tls: o.tls,
            dial: o.dial,
        }),
        OutboundType::Socks => Protocol::Socks(SocksOutbound {
            tag: o.tag,
            server: o.server,
            server_port: o.server_port,
            version: o.version,
            username: o.username,
            password: o.password,
            network: o.network,
            udp_over_tcp: o.udp_over_tcp.unwrap_or(false),
            dial: o.dial,
        }),
        OutboundType::Http => Protocol::Http(HttpOutbound {
            tag: o.tag,
            server: o.server,
            server_port: o.server_port,
            username: o.username,
            password: o.password,
            path: o.path,
            headers: o.headers,
            tls: o.tls,
            dial: o.dial,
        }),
    }
}

/// Keeps only the fields valid for the transport type. Plain TCP means no
/// transport at all; `h2` is the engine's `http`.
pub fn project_transport(transport: &TransportConfig) -> Option<RuntimeTransport> {
    let t = transport.clone();
    let typed = match t.transport_type.trim().to_lowercase().as_str() {
        "" | "tcp" | "none" => return None,
        "ws" | "websocket" => V2RayTransport::WebSocket(WebSocketTransport {
            path: t.path,
            headers: t.headers,
            max_early_data: t.max_early_data,
            early_data_header_name: t.early_data_header_name,
        }),
        "grpc" => V2RayTransport::Grpc(GrpcTransport {
            service_name: t.service_name,
            idle_timeout: t.idle_timeout,
            ping_timeout: t.ping_timeout,
            permit_without_stream: t.permit_without_stream,
        }),
        "http" | "h2" => V2RayTransport::Http(HttpTransport {
            host: t.host,
            path: t.path,
            method: t.method,
            headers: t.headers,
            idle_timeout: t.idle_timeout,
            ping_timeout: t.ping_timeout,
        }),
        "httpupgrade" => V2RayTransport::HttpUpgrade(HttpUpgradeTransport {
            host: transport
                .first_host()
                .or_else(|| transport.header("Host"))
                .map(str::to_string),
            path: t.path,
            headers: t.headers,
        }),
        "quic" => V2RayTransport::Quic(QuicTransport {}),
        other => {
            warn!("Transport '{}' is not a standard engine transport", other);
            return Some(RuntimeTransport::Passthrough(t));
        }
    };

    Some(RuntimeTransport::Typed(typed))
}
