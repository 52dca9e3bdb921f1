//! Pieces shared by the query-string link encoders.

use crate::models::{Outbound, TlsConfig, TransportConfig};
use crate::utils::string::non_blank;
use crate::utils::url::{format_host, url_encode};

/// Formats a `key=value` fragment, or an empty string when the value is blank
///
/// # Arguments
///
/// * `key` - Query parameter name, emitted as-is
/// * `value` - Raw value, percent-encoded here
pub fn param(key: &str, value: Option<&str>) -> String {
    match non_blank(value) {
        Some(value) => format!("{}={}", key, url_encode(value)),
        None => String::new(),
    }
}

/// Formats `key=1` when `flag` is set
pub fn flag(key: &str, flag: bool) -> String {
    if flag {
        format!("{}=1", key)
    } else {
        String::new()
    }
}

/// Joins fragments with `&`, dropping blank ones; `?` is prepended only when
/// something is left.
pub fn build_query(params: &[String]) -> String {
    let kept: Vec<&str> = params
        .iter()
        .map(|p| p.as_str())
        .filter(|p| !p.trim().is_empty())
        .collect();

    if kept.is_empty() {
        String::new()
    } else {
        format!("?{}", kept.join("&"))
    }
}

/// Display name fragment.
pub fn fragment(tag: &str) -> String {
    format!("#{}", url_encode(tag))
}

/// `host:port` with IPv6 literals bracketed, or `None` when either half is
/// missing.
pub fn authority(outbound: &Outbound) -> Option<String> {
    let server = non_blank(outbound.bare_server())?;
    let port = outbound.server_port.filter(|port| *port > 0)?;
    Some(format!("{}:{}", format_host(server), port))
}

/// Assembles `scheme://[userinfo@]host:port[?query]#tag`.
pub fn assemble(
    scheme: &str,
    userinfo: Option<&str>,
    authority: &str,
    params: &[String],
    tag: &str,
) -> String {
    let mut uri = format!("{}://", scheme);
    if let Some(userinfo) = userinfo {
        uri.push_str(userinfo);
        uri.push('@');
    }
    uri.push_str(authority);
    uri.push_str(&build_query(params));
    uri.push_str(&fragment(tag));
    uri
}

/// TLS settings of an outbound, when TLS is on.
pub fn enabled_tls(outbound: &Outbound) -> Option<&TlsConfig> {
    outbound.tls.as_ref().filter(|tls| tls.enabled)
}

pub fn joined_alpn(tls: &TlsConfig) -> Option<String> {
    let alpn: Vec<&str> = tls
        .alpn
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .collect();
    if alpn.is_empty() {
        None
    } else {
        Some(alpn.join(","))
    }
}

/// `sni`, insecure flag and `alpn`, plus `fp` when `with_fingerprint` is set.
///
/// Clients disagree on the insecure key, so the caller names it.
pub fn tls_params(
    tls: Option<&TlsConfig>,
    insecure_key: &str,
    with_fingerprint: bool,
) -> Vec<String> {
    let Some(tls) = tls else {
        return Vec::new();
    };

    let mut params = vec![
        param("sni", tls.server_name.as_deref()),
        flag(insecure_key, tls.insecure),
        param("alpn", joined_alpn(tls).as_deref()),
    ];
    if with_fingerprint {
        params.push(param("fp", tls.fingerprint()));
    }
    params
}

/// WebSocket path with the early-data marker put back, the form Xray-style
/// clients read it in.
pub fn path_with_early_data(transport: &TransportConfig) -> Option<String> {
    let path = non_blank(transport.path.as_deref()).unwrap_or("/");
    match transport.max_early_data.filter(|n| *n > 0) {
        Some(early_data) => {
            let separator = if path.contains('?') { '&' } else { '?' };
            Some(format!("{}{}ed={}", path, separator, early_data))
        }
        None => non_blank(transport.path.as_deref()).map(str::to_string),
    }
}

/// Transport parameters shared by the VLESS and Trojan encoders, `type`
/// excluded.
pub fn transport_params(transport: &TransportConfig) -> Vec<String> {
    let mut params = Vec::new();

    match transport.transport_type.trim().to_lowercase().as_str() {
        "ws" | "websocket" => {
            params.push(param("host", transport.ws_host()));
            params.push(param("path", path_with_early_data(transport).as_deref()));
        }
        "grpc" => {
            params.push(param("serviceName", transport.service_name.as_deref()));
            params.push("mode=gun".to_string());
        }
        "http" | "h2" | "httpupgrade" => {
            params.push(param("path", transport.path.as_deref()));
            params.push(param(
                "host",
                transport.first_host().or_else(|| transport.header("Host")),
            ));
        }
        "xhttp" | "splithttp" => {
            params.push(param("path", transport.path.as_deref()));
            params.push(param("host", transport.ws_host()));
            params.push(param("mode", transport.mode.as_deref()));
            params.push(param("xPaddingBytes", transport.x_padding_bytes.as_deref()));
            params.push(param(
                "scMaxEachPostBytes",
                transport.sc_max_each_post_bytes.as_deref(),
            ));
            params.push(param(
                "scMinPostsIntervalMs",
                transport.sc_min_posts_interval_ms.as_deref(),
            ));
            params.push(param(
                "scMaxBufferedPosts",
                transport
                    .sc_max_buffered_posts
                    .map(|n| n.to_string())
                    .as_deref(),
            ));
            if transport.no_grpc_header {
                params.push("noGRPCHeader=true".to_string());
            }
            if transport.no_sse_header {
                params.push("noSSEHeader=true".to_string());
            }
        }
        _ => {}
    }

    params
}

/// Transport type for the `type` parameter, `tcp` when unset.
pub fn transport_name(outbound: &Outbound) -> String {
    outbound
        .transport_type()
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "tcp".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_query() {
        assert_eq!(build_query(&[]), "");
        assert_eq!(build_query(&[String::new(), " ".to_string()]), "");
        assert_eq!(
            build_query(&["a=1".to_string(), String::new(), "b=2".to_string()]),
            "?a=1&b=2"
        );
    }

    #[test]
    fn test_param_encodes_value() {
        assert_eq!(param("path", Some("/a b")), "path=%2Fa%20b");
        assert_eq!(param("sni", Some("  ")), "");
        assert_eq!(param("sni", None), "");
        assert_eq!(flag("insecure", true), "insecure=1");
        assert_eq!(flag("insecure", false), "");
    }

    #[test]
    fn test_fragment() {
        assert_eq!(fragment("HK 01"), "#HK%2001");
    }

    #[test]
    fn test_authority_brackets_ipv6() {
        let mut outbound = Outbound::new("trojan", "t");
        outbound.server = Some("2001:db8::1".to_string());
        outbound.server_port = Some(443);
        assert_eq!(authority(&outbound).as_deref(), Some("[2001:db8::1]:443"));

        outbound.server = Some("[2001:db8::1]".to_string());
        assert_eq!(authority(&outbound).as_deref(), Some("[2001:db8::1]:443"));

        outbound.server_port = None;
        assert_eq!(authority(&outbound), None);
    }

    #[test]
    fn test_path_with_early_data() {
        let mut transport = TransportConfig::new("ws");
        transport.path = Some("/ws".to_string());
        assert_eq!(path_with_early_data(&transport).as_deref(), Some("/ws"));

        transport.max_early_data = Some(2048);
        assert_eq!(
            path_with_early_data(&transport).as_deref(),
            Some("/ws?ed=2048")
        );

        transport.path = Some("/ws?x=1".to_string());
        assert_eq!(
            path_with_early_data(&transport).as_deref(),
            Some("/ws?x=1&ed=2048")
        );
    }

    #[test]
    fn test_grpc_params() {
        let mut transport = TransportConfig::new("grpc");
        transport.service_name = Some("svc".to_string());
        assert_eq!(
            build_query(&transport_params(&transport)),
            "?serviceName=svc&mode=gun"
        );
    }
}
