use log::debug;

use super::common::*;
use crate::models::Outbound;
use crate::utils::url::url_encode;

/// Convert a Trojan outbound to a `trojan://` link
///
/// Format: `trojan://password@server:port?sni=..&allowInsecure=1&type=ws..#tag`
pub fn trojan_to_link(outbound: &Outbound) -> Option<String> {
    let authority = authority(outbound)?;
    let Some(password) = outbound.password.as_deref().filter(|p| !p.is_empty()) else {
        debug!("Trojan outbound '{}' has no password, not exported", outbound.tag);
        return None;
    };

    let mut params = tls_params(enabled_tls(outbound), "allowInsecure", true);

    let transport_type = transport_name(outbound);
    if transport_type != "tcp" {
        params.push(format!("type={}", url_encode(&transport_type)));
        if let Some(transport) = outbound.transport.as_ref() {
            params.extend(transport_params(transport));
        }
    }

    Some(assemble(
        "trojan",
        Some(&url_encode(password)),
        &authority,
        &params,
        &outbound.tag,
    ))
}
