use log::debug;

use super::common::{assemble, authority};
use crate::models::Outbound;
use crate::utils::base64::base64_encode;
use crate::utils::string::non_blank;

/// Convert a Shadowsocks outbound to an `ss://` link
///
/// Format: `ss://BASE64(method:password)@server:port#tag` (SIP002, unpadded)
pub fn shadowsocks_to_link(outbound: &Outbound) -> Option<String> {
    let authority = authority(outbound)?;
    let (Some(method), Some(password)) = (
        non_blank(outbound.method.as_deref()),
        outbound.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        debug!(
            "Shadowsocks outbound '{}' lacks method or password, not exported",
            outbound.tag
        );
        return None;
    };

    let userinfo = base64_encode(&format!("{}:{}", method, password));
    Some(assemble("ss", Some(&userinfo), &authority, &[], &outbound.tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadowsocks_link() {
        let mut outbound = Outbound::new("shadowsocks", "HK 01");
        outbound.server = Some("hk.example.com".to_string());
        outbound.server_port = Some(8388);
        outbound.method = Some("aes-256-gcm".to_string());
        outbound.password = Some("p@ss".to_string());

        assert_eq!(
            shadowsocks_to_link(&outbound).as_deref(),
            Some("ss://YWVzLTI1Ni1nY206cEBzcw@hk.example.com:8388#HK%2001")
        );
    }

    #[test]
    fn test_shadowsocks_requires_method() {
        let mut outbound = Outbound::new("shadowsocks", "s");
        outbound.server = Some("example.com".to_string());
        outbound.server_port = Some(8388);
        outbound.password = Some("pw".to_string());
        assert_eq!(shadowsocks_to_link(&outbound), None);
    }
}
