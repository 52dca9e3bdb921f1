use log::debug;

use super::common::*;
use crate::models::Outbound;
use crate::utils::string::{is_blank, non_blank};

/// Convert a Hysteria (v1) outbound to a `hysteria://` link
///
/// v1 links carry no userinfo; the auth string travels as `auth`.
pub fn hysteria_to_link(outbound: &Outbound) -> Option<String> {
    let Some(authority) = authority(outbound) else {
        debug!("Hysteria outbound '{}' has no address, not exported", outbound.tag);
        return None;
    };

    let mut params = vec![
        param("auth", outbound.auth_str.as_deref()),
        param("upmbps", outbound.up_mbps.map(|n| n.to_string()).as_deref()),
        param(
            "downmbps",
            outbound.down_mbps.map(|n| n.to_string()).as_deref(),
        ),
    ];
    params.extend(tls_params(enabled_tls(outbound), "insecure", false));

    if let Some(obfs) = outbound.obfs.as_ref() {
        if !is_blank(obfs.password.as_deref()) {
            // v1 knows one obfuscation scheme
            params.push(param(
                "obfs",
                Some(non_blank(obfs.obfs_type.as_deref()).unwrap_or("xplus")),
            ));
            params.push(param("obfsParam", obfs.password.as_deref()));
        }
    }

    Some(assemble("hysteria", None, &authority, &params, &outbound.tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ObfsConfig, TlsConfig};

    #[test]
    fn test_hysteria_link() {
        let mut outbound = Outbound::new("hysteria", "hy");
        outbound.server = Some("hy.example.com".to_string());
        outbound.server_port = Some(36712);
        outbound.auth_str = Some("token".to_string());
        outbound.up_mbps = Some(20);
        outbound.down_mbps = Some(100);
        outbound.obfs = Some(ObfsConfig {
            obfs_type: None,
            password: Some("mask".to_string()),
        });
        outbound.tls = Some(TlsConfig {
            enabled: true,
            server_name: Some("hy.example.com".to_string()),
            ..Default::default()
        });

        assert_eq!(
            hysteria_to_link(&outbound).as_deref(),
            Some("hysteria://hy.example.com:36712?auth=token&upmbps=20&downmbps=100&sni=hy.example.com&obfs=xplus&obfsParam=mask#hy")
        );
    }

    #[test]
    fn test_hysteria_obfs_needs_password() {
        let mut outbound = Outbound::new("hysteria", "h");
        outbound.server = Some("h.example.com".to_string());
        outbound.server_port = Some(443);
        outbound.obfs = Some(ObfsConfig {
            obfs_type: Some("x plus".to_string()),
            password: None,
        });
        assert_eq!(
            hysteria_to_link(&outbound).as_deref(),
            Some("hysteria://h.example.com:443#h")
        );

        outbound.obfs.as_mut().unwrap().password = Some("mask".to_string());
        assert_eq!(
            hysteria_to_link(&outbound).as_deref(),
            Some("hysteria://h.example.com:443?obfs=x%20plus&obfsParam=mask#h")
        );
    }
}
