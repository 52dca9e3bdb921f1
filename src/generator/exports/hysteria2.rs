use log::debug;

use super::common::*;
use crate::models::Outbound;
use crate::utils::url::url_encode;

/// Convert a Hysteria2 outbound to a `hysteria2://` link
///
/// Port hopping ranges go to `mport`, comma separated.
pub fn hysteria2_to_link(outbound: &Outbound) -> Option<String> {
    let authority = authority(outbound)?;
    let Some(password) = outbound.password.as_deref().filter(|p| !p.is_empty()) else {
        debug!("Hysteria2 outbound '{}' has no password, not exported", outbound.tag);
        return None;
    };

    let mut params = tls_params(enabled_tls(outbound), "insecure", true);

    if let Some(obfs) = outbound.obfs.as_ref() {
        params.push(param("obfs", obfs.obfs_type.as_deref()));
        params.push(param("obfs-password", obfs.password.as_deref()));
    }

    let ports: Vec<&str> = outbound
        .server_ports
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();
    if !ports.is_empty() {
        params.push(param("mport", Some(ports.join(",").as_str())));
    }

    Some(assemble(
        "hysteria2",
        Some(&url_encode(password)),
        &authority,
        &params,
        &outbound.tag,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ObfsConfig, TlsConfig};

    #[test]
    fn test_hysteria2_link() {
        let mut outbound = Outbound::new("hysteria2", "hy2");
        outbound.server = Some("hy.example.com".to_string());
        outbound.server_port = Some(443);
        outbound.password = Some("secret".to_string());
        outbound.tls = Some(TlsConfig {
            enabled: true,
            server_name: Some("hy.example.com".to_string()),
            alpn: vec!["h3".to_string()],
            ..Default::default()
        });
        outbound.obfs = Some(ObfsConfig {
            obfs_type: Some("salamander".to_string()),
            password: Some("cry".to_string()),
        });
        outbound.server_ports = vec!["20000:30000".to_string()];

        assert_eq!(
            hysteria2_to_link(&outbound).as_deref(),
            Some("hysteria2://secret@hy.example.com:443?sni=hy.example.com&alpn=h3&obfs=salamander&obfs-password=cry&mport=20000%3A30000#hy2")
        );
    }
}
