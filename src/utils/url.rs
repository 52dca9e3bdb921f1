//! URL encoding utilities

use std::net::{IpAddr, Ipv6Addr};

/// Encodes a string using URL encoding
///
/// Everything outside the unreserved set is percent-encoded, a space becomes
/// `%20` (never `+`).
///
/// # Examples
/// ```
/// use boxnode::utils::url::url_encode;
///
/// let encoded = url_encode("Hello World!");
/// assert_eq!(encoded, "Hello%20World%21");
/// ```
pub fn url_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// Whether `host` is an IPv4 or IPv6 literal. Bracketed IPv6 is accepted.
pub fn is_ip_literal(host: &str) -> bool {
    let host = host.trim();
    let unbracketed = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    unbracketed.parse::<IpAddr>().is_ok()
}

/// Wraps an IPv6 literal in brackets for use in a URI authority. Every other
/// host, including an already bracketed one, is returned unchanged.
///
/// # Examples
/// ```
/// use boxnode::utils::url::format_host;
///
/// assert_eq!(format_host("::1"), "[::1]");
/// assert_eq!(format_host("example.com"), "example.com");
/// ```
pub fn format_host(host: &str) -> String {
    if host.parse::<Ipv6Addr>().is_ok() {
        format!("[{}]", host)
    } else {
        host.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encode() {
        assert_eq!(url_encode("a b"), "a%20b");
        assert_eq!(url_encode("/path?x=1&y"), "%2Fpath%3Fx%3D1%26y");
        assert_eq!(url_encode("香港 01"), "%E9%A6%99%E6%B8%AF%2001");
        assert_eq!(url_encode("A-z_0.9~"), "A-z_0.9~");
    }

    #[test]
    fn test_is_ip_literal() {
        assert!(is_ip_literal("1.2.3.4"));
        assert!(is_ip_literal("2001:db8::1"));
        assert!(is_ip_literal("[2001:db8::1]"));
        assert!(!is_ip_literal("example.com"));
        assert!(!is_ip_literal(""));
        assert!(!is_ip_literal("1.2.3.4.5"));
    }

    #[test]
    fn test_format_host() {
        assert_eq!(format_host("::1"), "[::1]");
        assert_eq!(format_host("2001:db8::1"), "[2001:db8::1]");
        assert_eq!(format_host("[::1]"), "[::1]");
        assert_eq!(format_host("10.0.0.1"), "10.0.0.1");
        assert_eq!(format_host("example.com"), "example.com");
    }
}
