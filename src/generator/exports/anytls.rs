use log::debug;

use super::common::*;
use crate::models::Outbound;
use crate::utils::url::url_encode;

/// Convert an AnyTLS outbound to an `anytls://` link
pub fn anytls_to_link(outbound: &Outbound) -> Option<String> {
    let authority = authority(outbound)?;
    let Some(password) = outbound.password.as_deref().filter(|p| !p.is_empty()) else {
        debug!("AnyTLS outbound '{}' has no password, not exported", outbound.tag);
        return None;
    };

    let mut params = tls_params(enabled_tls(outbound), "insecure", true);
    params.push(param(
        "idle_session_check_interval",
        outbound.idle_session_check_interval.as_deref(),
    ));
    params.push(param(
        "idle_session_timeout",
        outbound.idle_session_timeout.as_deref(),
    ));
    params.push(param(
        "min_idle_session",
        outbound.min_idle_session.map(|n| n.to_string()).as_deref(),
    ));

    Some(assemble(
        "anytls",
        Some(&url_encode(password)),
        &authority,
        &params,
        &outbound.tag,
    ))
}
