//! WebSocket transport fix-ups.
//!
//! Share links and subscription generators are sloppy about WebSocket nodes:
//! SNI pinned to the connect IP, no ALPN, no `Host` header, Xray-style `?ed=`
//! early-data markers left inside the path. These passes repair the common
//! cases.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::models::Outbound;
use crate::utils::string::non_blank;
use crate::utils::url::{format_host, is_ip_literal};

lazy_static! {
    static ref EARLY_DATA_REGEX: Regex = Regex::new(r"[?&]ed=(\d+)$").unwrap();
}

pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
pub const FIREFOX_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:125.0) Gecko/20100101 Firefox/125.0";

/// Header Xray clients put early data into.
pub const EARLY_DATA_HEADER: &str = "Sec-WebSocket-Protocol";

fn is_websocket_tls(outbound: &Outbound) -> bool {
    outbound.is_websocket() && outbound.tls_enabled()
}

/// Points SNI at the WebSocket host when the current value is missing, an IP
/// literal, or just the server address repeated.
pub(super) fn infer_server_name(outbound: &mut Outbound) {
    if !is_websocket_tls(outbound) {
        return;
    }

    let server = outbound.bare_server().map(str::to_string);
    // A host equal to the server adds nothing over the engine's own SNI default.
    let ws_host = match outbound
        .transport
        .as_ref()
        .and_then(|transport| transport.ws_host())
        .filter(|host| !is_ip_literal(host))
        .filter(|host| {
            server
                .as_deref()
                .map_or(true, |server| !server.eq_ignore_ascii_case(host))
        }) {
        Some(host) => host.to_string(),
        None => return,
    };

    let Some(tls) = outbound.tls.as_mut() else {
        return;
    };

    let replace = match non_blank(tls.server_name.as_deref()) {
        None => true,
        Some(sni) => {
            is_ip_literal(sni)
                || server
                    .as_deref()
                    .map_or(false, |server| server.eq_ignore_ascii_case(sni))
        }
    };

    if replace && tls.server_name.as_deref() != Some(ws_host.as_str()) {
        debug!(
            "Outbound '{}': server_name {:?} -> {}",
            outbound.tag, tls.server_name, ws_host
        );
        tls.server_name = Some(ws_host);
    }
}

pub(super) fn default_alpn(outbound: &mut Outbound) {
    if !is_websocket_tls(outbound) {
        return;
    }

    if let Some(tls) = outbound.tls.as_mut() {
        if tls.alpn.iter().all(|alpn| alpn.trim().is_empty()) {
            tls.alpn = vec!["http/1.1".to_string()];
        }
    }
}

/// Fills in `Host` and `User-Agent` and strips early-data markers from the
/// path.
///
/// A stripped `ed=N` becomes `max_early_data` unless one is already set, so
/// the early-data setting survives in the form the engine understands.
pub(super) fn fix_headers_and_path(outbound: &mut Outbound) {
    if !outbound.is_websocket() {
        return;
    }

    let tls_server_name = outbound
        .tls
        .as_ref()
        .and_then(|tls| non_blank(tls.server_name.as_deref()))
        .map(str::to_string);
    let fingerprint = outbound
        .tls
        .as_ref()
        .and_then(|tls| tls.fingerprint())
        .map(str::to_lowercase);
    let server = non_blank(outbound.bare_server()).map(format_host);

    let Some(transport) = outbound.transport.as_mut() else {
        return;
    };

    if transport.header("Host").is_none() {
        let host = transport
            .first_host()
            .map(str::to_string)
            .or(tls_server_name)
            .or(server);
        if let Some(host) = host {
            transport.set_header("Host", host);
        }
    }

    if transport.header("User-Agent").is_none() {
        let user_agent = if fingerprint.map_or(false, |fp| fp.contains("chrome")) {
            CHROME_USER_AGENT
        } else {
            FIREFOX_USER_AGENT
        };
        transport.set_header("User-Agent", user_agent);
    }

    // Markers can be stacked (`/ws?ed=1&ed=2048`); strip until none is left.
    let mut path = transport.path.clone().unwrap_or_default();
    let mut early_data = None;
    loop {
        let end = path.trim_end_matches(&['?', '&'][..]).len();
        path.truncate(end);

        let Some((start, value)) = EARLY_DATA_REGEX.captures(&path).map(|captures| {
            let start = captures.get(0).map_or(path.len(), |m| m.start());
            let value = captures.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            (start, value)
        }) else {
            break;
        };
        early_data = early_data.or(value.filter(|n| *n > 0));
        path.truncate(start);
    }

    if let Some(early_data) = early_data {
        if transport.max_early_data.is_none() {
            transport.max_early_data = Some(early_data);
            if transport.early_data_header_name.is_none() {
                transport.early_data_header_name = Some(EARLY_DATA_HEADER.to_string());
            }
        }
    }

    transport.path = Some(if path.is_empty() {
        "/".to_string()
    } else {
        path
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TlsConfig, TransportConfig, UtlsConfig};
    use crate::normalize::fix_outbound;

    fn ws_outbound(server: &str) -> Outbound {
        let mut outbound = Outbound::new("vless", "ws");
        outbound.server = Some(server.to_string());
        outbound.server_port = Some(443);
        outbound.transport = Some(TransportConfig::new("ws"));
        outbound.tls = Some(TlsConfig {
            enabled: true,
            ..Default::default()
        });
        outbound
    }

    fn set_host_header(outbound: &mut Outbound, host: &str) {
        outbound
            .transport
            .as_mut()
            .unwrap()
            .headers
            .insert("Host".to_string(), host.to_string());
    }

    fn server_name(outbound: &Outbound) -> Option<&str> {
        outbound.tls.as_ref().unwrap().server_name.as_deref()
    }

    #[test]
    fn test_sni_inferred_from_host_header() {
        let mut outbound = ws_outbound("1.2.3.4");
        set_host_header(&mut outbound, "cdn.example.com");

        let fixed = fix_outbound(&outbound);
        assert_eq!(server_name(&fixed), Some("cdn.example.com"));
    }

    #[test]
    fn test_sni_inferred_from_transport_host() {
        let mut outbound = ws_outbound("1.2.3.4");
        outbound.transport.as_mut().unwrap().host = vec!["edge.example.com".to_string()];

        let fixed = fix_outbound(&outbound);
        assert_eq!(server_name(&fixed), Some("edge.example.com"));
    }

    #[test]
    fn test_sni_replaces_ip_and_server_echo() {
        let mut outbound = ws_outbound("Origin.Example.com");
        set_host_header(&mut outbound, "cdn.example.com");
        outbound.tls.as_mut().unwrap().server_name = Some("origin.example.com".to_string());
        assert_eq!(server_name(&fix_outbound(&outbound)), Some("cdn.example.com"));

        outbound.tls.as_mut().unwrap().server_name = Some("9.9.9.9".to_string());
        assert_eq!(server_name(&fix_outbound(&outbound)), Some("cdn.example.com"));
    }

    #[test]
    fn test_sni_kept_when_deliberate() {
        let mut outbound = ws_outbound("1.2.3.4");
        set_host_header(&mut outbound, "cdn.example.com");
        outbound.tls.as_mut().unwrap().server_name = Some("front.example.org".to_string());

        assert_eq!(
            server_name(&fix_outbound(&outbound)),
            Some("front.example.org")
        );
    }

    #[test]
    fn test_sni_not_inferred_from_ip_host_or_without_tls() {
        let mut outbound = ws_outbound("1.2.3.4");
        set_host_header(&mut outbound, "5.6.7.8");
        assert_eq!(server_name(&fix_outbound(&outbound)), None);

        let mut plain = ws_outbound("1.2.3.4");
        set_host_header(&mut plain, "cdn.example.com");
        plain.tls.as_mut().unwrap().enabled = false;
        assert_eq!(server_name(&fix_outbound(&plain)), None);
    }

    #[test]
    fn test_alpn_default() {
        let fixed = fix_outbound(&ws_outbound("example.com"));
        assert_eq!(fixed.tls.as_ref().unwrap().alpn, vec!["http/1.1"]);

        let mut outbound = ws_outbound("example.com");
        outbound.tls.as_mut().unwrap().alpn = vec!["h2".to_string()];
        assert_eq!(fix_outbound(&outbound).tls.unwrap().alpn, vec!["h2"]);
    }

    #[test]
    fn test_host_header_fallback_chain() {
        let mut outbound = ws_outbound("1.2.3.4");
        outbound.tls.as_mut().unwrap().server_name = Some("sni.example.com".to_string());
        let fixed = fix_outbound(&outbound);
        assert_eq!(
            fixed.transport.as_ref().unwrap().header("Host"),
            Some("sni.example.com")
        );

        for server in ["[2001:db8::1]", "2001:db8::1"] {
            let mut bare = ws_outbound(server);
            bare.tls = None;
            let fixed = fix_outbound(&bare);
            assert_eq!(
                fixed.transport.as_ref().unwrap().header("Host"),
                Some("[2001:db8::1]")
            );
            assert_eq!(fix_outbound(&fixed), fixed);
        }
    }

    #[test]
    fn test_user_agent_follows_fingerprint() {
        let mut outbound = ws_outbound("example.com");
        outbound.tls.as_mut().unwrap().utls = Some(UtlsConfig {
            enabled: true,
            fingerprint: Some("chrome".to_string()),
        });
        let fixed = fix_outbound(&outbound);
        assert_eq!(
            fixed.transport.as_ref().unwrap().header("User-Agent"),
            Some(CHROME_USER_AGENT)
        );

        let fixed = fix_outbound(&ws_outbound("example.com"));
        assert_eq!(
            fixed.transport.as_ref().unwrap().header("User-Agent"),
            Some(FIREFOX_USER_AGENT)
        );

        let mut custom = ws_outbound("example.com");
        custom
            .transport
            .as_mut()
            .unwrap()
            .headers
            .insert("user-agent".to_string(), "curl/8".to_string());
        let fixed = fix_outbound(&custom);
        assert_eq!(
            fixed.transport.as_ref().unwrap().header("User-Agent"),
            Some("curl/8")
        );
    }

    #[test]
    fn test_path_cleanup() {
        let cases = [
            (Some("/ws?ed=2048"), "/ws"),
            (Some("/ws?x=1&ed=2560"), "/ws?x=1"),
            (Some("/ws?"), "/ws"),
            (Some("?ed=2048"), "/"),
            (Some(""), "/"),
            (None, "/"),
            (Some("/ws?ed=2048&x=1"), "/ws?ed=2048&x=1"),
            (Some("/ws?ed=1&ed=2048&"), "/ws"),
        ];

        for (input, expected) in cases {
            let mut outbound = ws_outbound("example.com");
            outbound.transport.as_mut().unwrap().path = input.map(str::to_string);
            let fixed = fix_outbound(&outbound);
            assert_eq!(
                fixed.transport.as_ref().unwrap().path.as_deref(),
                Some(expected),
                "path {:?}",
                input
            );
        }
    }

    #[test]
    fn test_early_data_moves_to_transport() {
        let mut outbound = ws_outbound("example.com");
        outbound.transport.as_mut().unwrap().path = Some("/ws?ed=2048".to_string());

        let fixed = fix_outbound(&outbound);
        let transport = fixed.transport.as_ref().unwrap();
        assert_eq!(transport.max_early_data, Some(2048));
        assert_eq!(
            transport.early_data_header_name.as_deref(),
            Some(EARLY_DATA_HEADER)
        );
    }

    #[test]
    fn test_non_websocket_untouched() {
        let mut outbound = ws_outbound("1.2.3.4");
        outbound.transport = Some(TransportConfig::new("grpc"));
        let fixed = fix_outbound(&outbound);
        assert_eq!(fixed.transport, outbound.transport);
        assert_eq!(fixed.tls, outbound.tls);
    }
}
