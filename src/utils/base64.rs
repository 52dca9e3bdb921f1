use base64::{engine::general_purpose, Engine as _};

/// Encodes a string to Base64 with the standard alphabet, no padding and no
/// line wrapping, the form share links carry.
pub fn base64_encode(input: &str) -> String {
    general_purpose::STANDARD_NO_PAD.encode(input)
}

/// Decodes a Base64 string to its original form.
///
/// Padding is optional. When `accept_urlsafe` is set, `-` and `_` are read as
/// `+` and `/`.
///
/// # Returns
/// The decoded string, or an empty string if the input is invalid.
pub fn base64_decode(input: &str, accept_urlsafe: bool) -> String {
    let input = input.trim().trim_end_matches('=');
    let normalized = if accept_urlsafe {
        url_safe_base64_reverse(input)
    } else {
        input.to_string()
    };

    match general_purpose::STANDARD_NO_PAD.decode(normalized) {
        Ok(decoded) => String::from_utf8_lossy(&decoded).to_string(),
        Err(_) => String::new(),
    }
}

/// Reverses a URL-safe Base64 string to standard Base64 format.
pub fn url_safe_base64_reverse(input: &str) -> String {
    input.replace('-', "+").replace('_', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_has_no_padding() {
        assert_eq!(base64_encode("a"), "YQ");
        assert_eq!(base64_encode("aes-256-gcm:p@ss"), "YWVzLTI1Ni1nY206cEBzcw");
    }

    #[test]
    fn test_decode_padded_and_unpadded() {
        assert_eq!(base64_decode("YQ==", false), "a");
        assert_eq!(base64_decode("YQ", false), "a");
        assert_eq!(base64_decode("-_8", true), base64_decode("+/8", false));
        assert_eq!(base64_decode("!!!", false), "");
    }
}
