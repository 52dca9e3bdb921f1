use log::{debug, warn};
use serde::Serialize;

use super::common::{enabled_tls, joined_alpn, transport_name};
use crate::models::Outbound;
use crate::utils::base64::base64_encode;
use crate::utils::string::non_blank;

/// The v2rayN share object. Field order is kept stable for reproducible
/// links.
#[derive(Serialize, Debug)]
struct VmessShare<'a> {
    v: &'static str,
    ps: &'a str,
    add: &'a str,
    port: String,
    id: &'a str,
    aid: &'static str,
    scy: &'a str,
    net: String,
    #[serde(rename = "type")]
    header_type: &'static str,
    host: &'a str,
    path: &'a str,
    tls: &'static str,
    sni: &'a str,
    alpn: String,
    fp: &'a str,
}

/// Convert a VMess outbound to a `vmess://` link
///
/// Unlike the other schemes the payload is a base64 encoded JSON object.
pub fn vmess_to_link(outbound: &Outbound) -> Option<String> {
    let server = non_blank(outbound.bare_server())?;
    let port = outbound.server_port.filter(|port| *port > 0)?;
    let Some(uuid) = non_blank(outbound.uuid.as_deref()) else {
        debug!("VMess outbound '{}' has no uuid, not exported", outbound.tag);
        return None;
    };

    let net = transport_name(outbound);
    let transport = outbound.transport.as_ref();
    let host = transport
        .and_then(|transport| transport.ws_host())
        .unwrap_or_default();
    let path = transport
        .and_then(|transport| {
            if net == "grpc" {
                transport.service_name.as_deref()
            } else {
                transport.path.as_deref()
            }
        })
        .unwrap_or_default();

    let tls = enabled_tls(outbound);
    let share = VmessShare {
        v: "2",
        ps: &outbound.tag,
        add: server,
        port: port.to_string(),
        id: uuid,
        aid: "0",
        scy: non_blank(outbound.security.as_deref()).unwrap_or("auto"),
        net,
        header_type: "none",
        host,
        path,
        tls: if tls.is_some() { "tls" } else { "" },
        sni: tls
            .and_then(|tls| tls.server_name.as_deref())
            .unwrap_or_default(),
        alpn: tls.and_then(joined_alpn).unwrap_or_default(),
        fp: tls.and_then(|tls| tls.fingerprint()).unwrap_or_default(),
    };

    match serde_json::to_string(&share) {
        Ok(json) => Some(format!("vmess://{}", base64_encode(&json))),
        Err(e) => {
            warn!("Failed to encode VMess link for '{}': {}", outbound.tag, e);
            None
        }
    }
}
