//! Share link encoders.
//!
//! [`export_link`] turns a node into the URI other clients import. Only
//! schemes with a broadly recognized URI convention are emitted; every other
//! type yields `None` rather than a link nobody can read back.

mod anytls;
pub mod common;
mod hysteria;
mod hysteria2;
mod shadowsocks;
mod trojan;
mod tuic;
mod vless;
mod vmess;

use log::debug;

use crate::models::{Outbound, OutboundType};

pub use anytls::anytls_to_link;
pub use hysteria::hysteria_to_link;
pub use hysteria2::hysteria2_to_link;
pub use shadowsocks::shadowsocks_to_link;
pub use trojan::trojan_to_link;
pub use tuic::tuic_to_link;
pub use vless::vless_to_link;
pub use vmess::vmess_to_link;

/// Convert an outbound to its share link
///
/// # Arguments
///
/// * `outbound` - The node to export, usually already fixed
///
/// # Returns
///
/// The link, or `None` when the type has no link format or the server,
/// port or credential is missing
pub fn export_link(outbound: &Outbound) -> Option<String> {
    let link = match outbound.kind() {
        Some(OutboundType::VLess) => vless_to_link(outbound),
        Some(OutboundType::VMess) => vmess_to_link(outbound),
        Some(OutboundType::Shadowsocks) => shadowsocks_to_link(outbound),
        Some(OutboundType::Trojan) => trojan_to_link(outbound),
        Some(OutboundType::Hysteria) => hysteria_to_link(outbound),
        Some(OutboundType::Hysteria2) => hysteria2_to_link(outbound),
        Some(OutboundType::AnyTls) => anytls_to_link(outbound),
        Some(OutboundType::Tuic) => tuic_to_link(outbound),
        _ => {
            debug!(
                "No link format for '{}' ({})",
                outbound.tag, outbound.outbound_type
            );
            return None;
        }
    };

    if link.is_none() {
        debug!("Outbound '{}' is incomplete, no link", outbound.tag);
    }
    link
}

/// Exports every exportable node, one link per line.
pub fn export_links(outbounds: &[Outbound]) -> String {
    outbounds
        .iter()
        .filter_map(export_link)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_types() {
        for kind in [
            "wireguard",
            "ssh",
            "socks",
            "http",
            "shadowtls",
            "selector",
            "urltest",
            "direct",
            "block",
            "dns",
            "naive",
        ] {
            let mut outbound = Outbound::new(kind, "x");
            outbound.server = Some("example.com".to_string());
            outbound.server_port = Some(443);
            outbound.password = Some("pw".to_string());
            assert_eq!(export_link(&outbound), None, "{}", kind);
        }
    }

    #[test]
    fn test_missing_address() {
        let mut outbound = Outbound::new("trojan", "t");
        outbound.password = Some("pw".to_string());
        outbound.server_port = Some(443);
        assert_eq!(export_link(&outbound), None);

        outbound.server = Some("  ".to_string());
        assert_eq!(export_link(&outbound), None);
    }

    #[test]
    fn test_export_links_skips_unexportable() {
        let mut trojan = Outbound::new("trojan", "a");
        trojan.server = Some("a.example.com".to_string());
        trojan.server_port = Some(443);
        trojan.password = Some("pw".to_string());
        let mut ss = Outbound::new("shadowsocks", "b");
        ss.server = Some("b.example.com".to_string());
        ss.server_port = Some(8388);
        ss.method = Some("aes-128-gcm".to_string());
        ss.password = Some("pw".to_string());

        let links = export_links(&[trojan, Outbound::new("direct", "direct"), ss]);
        let lines: Vec<&str> = links.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("trojan://pw@a.example.com:443"));
        assert!(lines[1].starts_with("ss://"));
        assert_eq!(export_links(&[]), "");
    }
}
