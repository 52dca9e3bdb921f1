use log::debug;

use super::common::*;
use crate::models::Outbound;
use crate::utils::string::non_blank;
use crate::utils::url::url_encode;

/// Convert a VLESS outbound to a `vless://` link
///
/// Format: `vless://uuid@server:port?type=..&encryption=none&security=..#tag`
pub fn vless_to_link(outbound: &Outbound) -> Option<String> {
    let authority = authority(outbound)?;
    let Some(uuid) = non_blank(outbound.uuid.as_deref()) else {
        debug!("VLESS outbound '{}' has no uuid, not exported", outbound.tag);
        return None;
    };

    let mut params = vec![
        format!("type={}", transport_name(outbound)),
        "encryption=none".to_string(),
        param("flow", outbound.flow.as_deref()),
    ];

    let tls = enabled_tls(outbound);
    if let Some(tls) = tls {
        if tls.reality_enabled() {
            let reality = tls.reality.as_ref();
            params.push("security=reality".to_string());
            params.push(param(
                "pbk",
                reality.and_then(|reality| reality.public_key.as_deref()),
            ));
            params.push(param(
                "sid",
                reality.and_then(|reality| reality.short_id.as_deref()),
            ));
        } else {
            params.push("security=tls".to_string());
        }
        params.push(param("sni", tls.server_name.as_deref()));
        params.push(param("fp", tls.fingerprint()));
        params.push(flag("allowInsecure", tls.insecure));
        params.push(param("alpn", joined_alpn(tls).as_deref()));
    }

    params.push(param("packetEncoding", outbound.packet_encoding.as_deref()));

    if let Some(transport) = outbound.transport.as_ref() {
        params.extend(transport_params(transport));
    }

    Some(assemble(
        "vless",
        Some(&url_encode(uuid)),
        &authority,
        &params,
        &outbound.tag,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RealityConfig, TlsConfig, TransportConfig, UtlsConfig};

    fn vless() -> Outbound {
        let mut outbound = Outbound::new("vless", "SG 01");
        outbound.server = Some("sg.example.com".to_string());
        outbound.server_port = Some(443);
        outbound.uuid = Some("b831381d-6324-4d53-ad4f-8cda48b30811".to_string());
        outbound
    }

    #[test]
    fn test_plain_tcp() {
        assert_eq!(
            vless_to_link(&vless()).as_deref(),
            Some("vless://b831381d-6324-4d53-ad4f-8cda48b30811@sg.example.com:443?type=tcp&encryption=none#SG%2001")
        );
    }

    #[test]
    fn test_reality_vision() {
        let mut outbound = vless();
        outbound.flow = Some("xtls-rprx-vision".to_string());
        outbound.tls = Some(TlsConfig {
            enabled: true,
            server_name: Some("www.microsoft.com".to_string()),
            utls: Some(UtlsConfig {
                enabled: true,
                fingerprint: Some("chrome".to_string()),
            }),
            reality: Some(RealityConfig {
                enabled: true,
                public_key: Some("pubkey".to_string()),
                short_id: Some("0123abcd".to_string()),
            }),
            ..Default::default()
        });

        let link = vless_to_link(&outbound).unwrap();
        assert!(link.contains(
            "?type=tcp&encryption=none&flow=xtls-rprx-vision&security=reality&pbk=pubkey&sid=0123abcd&sni=www.microsoft.com&fp=chrome#"
        ));
    }

    #[test]
    fn test_ws_tls_with_early_data() {
        let mut outbound = vless();
        outbound.tls = Some(TlsConfig {
            enabled: true,
            server_name: Some("cdn.example.com".to_string()),
            alpn: vec!["h2".to_string(), "http/1.1".to_string()],
            insecure: true,
            ..Default::default()
        });
        let mut transport = TransportConfig::new("ws");
        transport.path = Some("/ray".to_string());
        transport.max_early_data = Some(2048);
        transport.set_header("Host", "cdn.example.com");
        outbound.transport = Some(transport);

        let link = vless_to_link(&outbound).unwrap();
        assert!(link.contains("type=ws"));
        assert!(link.contains("security=tls&sni=cdn.example.com&allowInsecure=1&alpn=h2%2Chttp%2F1.1"));
        assert!(link.contains("host=cdn.example.com&path=%2Fray%3Fed%3D2048"));
    }

    #[test]
    fn test_missing_uuid() {
        let mut outbound = vless();
        outbound.uuid = None;
        assert_eq!(vless_to_link(&outbound), None);
    }
}
