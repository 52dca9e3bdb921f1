//! Outbound repair passes.
//!
//! [`fix_outbound`] runs a fixed sequence of independent passes over a copy of
//! the descriptor. A pass whose precondition does not hold leaves the value
//! alone, so fixing never fails and fixing twice changes nothing.

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;

use super::websocket;
use crate::models::{Outbound, OutboundType};
use crate::utils::is_blank;

lazy_static! {
    static ref BARE_INTERVAL_REGEX: Regex = Regex::new(r"^\d+(\.\d+)?$").unwrap();
    static ref UNIT_INTERVAL_REGEX: Regex = Regex::new(r"^\d+(\.\d+)?[smhSMH]$").unwrap();
}

/// Canonical XTLS Vision flow name.
pub const VISION_FLOW: &str = "xtls-rprx-vision";

/// Outbound a group falls back to when it has no members.
pub const FALLBACK_OUTBOUND: &str = "direct";

/// Hysteria bandwidth used when a side is unset, in Mbps.
pub const DEFAULT_BANDWIDTH_MBPS: u32 = 50;

pub const DEFAULT_PACKET_ENCODING: &str = "xudp";

/// Returns a corrected copy of `outbound`.
///
/// Passes, in order:
/// 1. interval normalization
/// 2. flow normalization
/// 3. urltest rewritten to selector
/// 4. selector members defaulted
/// 5. WebSocket SNI inference
/// 6. WebSocket ALPN default
/// 7. WebSocket `Host`/`User-Agent` headers and path clean-up
/// 8. legacy VLESS `security` dropped
/// 9. Hysteria bandwidth defaults
/// 10. VMess packet encoding default
pub fn fix_outbound(outbound: &Outbound) -> Outbound {
    let mut fixed = outbound.clone();
    trace!("Fixing outbound '{}' ({})", fixed.tag, fixed.outbound_type);

    if let Some(interval) = fixed.interval.as_deref() {
        fixed.interval = Some(normalize_interval(interval));
    }
    fixed.flow = normalize_flow(fixed.flow.as_deref());

    rewrite_urltest(&mut fixed);
    default_selector_members(&mut fixed);

    websocket::infer_server_name(&mut fixed);
    websocket::default_alpn(&mut fixed);
    websocket::fix_headers_and_path(&mut fixed);

    clear_vless_security(&mut fixed);
    default_hysteria_bandwidth(&mut fixed);
    default_packet_encoding(&mut fixed);

    fixed
}

/// Makes an interval a valid engine duration.
///
/// `"30"` and `"1.5"` gain an `s` suffix, `"10S"` is lower-cased and anything
/// else is returned unchanged.
pub fn normalize_interval(interval: &str) -> String {
    if BARE_INTERVAL_REGEX.is_match(interval) {
        format!("{}s", interval)
    } else if UNIT_INTERVAL_REGEX.is_match(interval) {
        interval.to_lowercase()
    } else {
        interval.to_string()
    }
}

/// Blank flows disappear and any Vision variant (generators like to append
/// `-udp443` and similar) collapses to the canonical name.
pub fn normalize_flow(flow: Option<&str>) -> Option<String> {
    match flow {
        _ if is_blank(flow) => None,
        Some(flow) if flow.contains(VISION_FLOW) => Some(VISION_FLOW.to_string()),
        other => other.map(str::to_string),
    }
}

/// Turns a urltest group into a selector.
///
/// The engine's urltest supervisor misbehaves on some interface change events
/// delivered by the VPN layer, so automatic groups run as manual ones with the
/// first member preselected.
fn rewrite_urltest(outbound: &mut Outbound) {
    if outbound.kind() != Some(OutboundType::UrlTest) {
        return;
    }

    debug!("Rewriting urltest group '{}' as selector", outbound.tag);
    outbound.outbound_type = OutboundType::Selector.as_str().to_string();
    if outbound.outbounds.is_empty() {
        outbound.outbounds = vec![FALLBACK_OUTBOUND.to_string()];
    }
    outbound.default = outbound.outbounds.first().cloned();
    outbound.interrupt_exist_connections = Some(false);
    outbound.url = None;
    outbound.interval = None;
    outbound.tolerance = None;
}

fn default_selector_members(outbound: &mut Outbound) {
    if outbound.kind() == Some(OutboundType::Selector) && outbound.outbounds.is_empty() {
        debug!("Selector '{}' has no members, using direct", outbound.tag);
        outbound.outbounds = vec![FALLBACK_OUTBOUND.to_string()];
    }
}

/// The engine rejects VLESS outbounds that carry `security`.
fn clear_vless_security(outbound: &mut Outbound) {
    if outbound.kind() == Some(OutboundType::VLess) {
        outbound.security = None;
    }
}

fn default_hysteria_bandwidth(outbound: &mut Outbound) {
    if !matches!(
        outbound.kind(),
        Some(OutboundType::Hysteria) | Some(OutboundType::Hysteria2)
    ) {
        return;
    }

    outbound.up_mbps = outbound.up_mbps.or(Some(DEFAULT_BANDWIDTH_MBPS));
    outbound.down_mbps = outbound.down_mbps.or(Some(DEFAULT_BANDWIDTH_MBPS));
}

fn default_packet_encoding(outbound: &mut Outbound) {
    if outbound.kind() == Some(OutboundType::VMess) && is_blank(outbound.packet_encoding.as_deref())
    {
        outbound.packet_encoding = Some(DEFAULT_PACKET_ENCODING.to_string());
    }
}
