//! Local listeners derived from the app settings.

use log::debug;

use crate::models::{Inbound, MixedInbound, Settings, SniffFields, TunInbound, TunStack};

pub const MIXED_TAG: &str = "mixed-in";
pub const TUN_TAG: &str = "tun-in";

/// Port of the listener emitted when nothing else is configured.
pub const FALLBACK_PORT: u16 = 2080;

pub const TUN_INET4_ADDRESS: &str = "172.19.0.1/30";

const LOOPBACK: &str = "127.0.0.1";
const ANY_ADDRESS: &str = "0.0.0.0";

fn sniffing() -> SniffFields {
    SniffFields {
        sniff: true,
        sniff_override_destination: true,
        sniff_timeout: "300ms".to_string(),
    }
}

fn mixed(listen: &str, listen_port: u16) -> Inbound {
    Inbound::Mixed(MixedInbound {
        tag: MIXED_TAG.to_string(),
        listen: listen.to_string(),
        listen_port,
        sniff: sniffing(),
    })
}

/// Build the inbound list for the engine
///
/// # Arguments
///
/// * `settings` - Proxy port, LAN sharing and TUN options
/// * `tun_stack` - Network stack the TUN inbound runs on
///
/// # Returns
///
/// A mixed listener when a proxy port is set, a TUN inbound when TUN is on,
/// and a loopback listener on port 2080 when neither applies
pub fn build_inbounds(settings: &Settings, tun_stack: TunStack) -> Vec<Inbound> {
    let mut inbounds = Vec::new();

    // Ports above u16 range are treated as unset, like non-positive ones.
    let proxy_port = u16::try_from(settings.proxy_port).ok().filter(|p| *p > 0);

    if let Some(port) = proxy_port {
        let listen = if settings.allow_lan { ANY_ADDRESS } else { LOOPBACK };
        debug!("Mixed inbound on {}:{}", listen, port);
        inbounds.push(mixed(listen, port));
    }

    if settings.tun_enabled {
        debug!(
            "TUN inbound on {} ({} stack)",
            settings.tun_interface_name, tun_stack
        );
        // Routing belongs to the platform VPN layer, never to the engine.
        inbounds.push(Inbound::Tun(TunInbound {
            tag: TUN_TAG.to_string(),
            interface_name: settings.tun_interface_name.clone(),
            inet4_address: vec![TUN_INET4_ADDRESS.to_string()],
            mtu: settings.tun_mtu,
            auto_route: false,
            strict_route: false,
            stack: tun_stack.engine_name(),
            endpoint_independent_nat: settings.endpoint_independent_nat,
            gso: true,
            sniff: sniffing(),
        }));
    } else if proxy_port.is_none() {
        debug!("No listener configured, falling back to {}:{}", LOOPBACK, FALLBACK_PORT);
        inbounds.push(mixed(LOOPBACK, FALLBACK_PORT));
    }

    inbounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fallback_listener() {
        let settings = Settings::default();
        let inbounds = build_inbounds(&settings, TunStack::System);
        assert_eq!(inbounds, vec![mixed(LOOPBACK, FALLBACK_PORT)]);
    }

    #[test]
    fn test_lan_listener() {
        let settings = Settings {
            proxy_port: 7890,
            allow_lan: true,
            ..Default::default()
        };
        let inbounds = build_inbounds(&settings, TunStack::System);
        assert_eq!(
            serde_json::to_value(&inbounds).unwrap(),
            json!([{
                "type": "mixed",
                "tag": "mixed-in",
                "listen": "0.0.0.0",
                "listen_port": 7890,
                "sniff": true,
                "sniff_override_destination": true,
                "sniff_timeout": "300ms"
            }])
        );
    }

    #[test]
    fn test_tun_only() {
        let settings = Settings {
            tun_enabled: true,
            endpoint_independent_nat: true,
            ..Default::default()
        };
        let inbounds = build_inbounds(&settings, TunStack::GVisor);
        assert_eq!(inbounds.len(), 1);
        assert_eq!(
            serde_json::to_value(&inbounds[0]).unwrap(),
            json!({
                "type": "tun",
                "tag": "tun-in",
                "interface_name": "tun0",
                "inet4_address": ["172.19.0.1/30"],
                "mtu": 9000,
                "auto_route": false,
                "strict_route": false,
                "stack": "gvisor",
                "endpoint_independent_nat": true,
                "gso": true,
                "sniff": true,
                "sniff_override_destination": true,
                "sniff_timeout": "300ms"
            })
        );
    }

    #[test]
    fn test_mixed_and_tun() {
        let settings = Settings {
            proxy_port: 1080,
            tun_enabled: true,
            ..Default::default()
        };
        let inbounds = build_inbounds(&settings, TunStack::Mixed);
        let tags: Vec<&str> = inbounds.iter().map(|i| i.tag()).collect();
        assert_eq!(tags, vec![MIXED_TAG, TUN_TAG]);
    }

    #[test]
    fn test_out_of_range_port_is_unset() {
        let settings = Settings {
            proxy_port: 70000,
            ..Default::default()
        };
        assert_eq!(
            build_inbounds(&settings, TunStack::System),
            vec![mixed(LOOPBACK, FALLBACK_PORT)]
        );
    }
}
