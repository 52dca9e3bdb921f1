pub mod base64;
pub mod string;
pub mod url;

// Re-export common utilities
pub use string::is_blank;
pub use url::{format_host, is_ip_literal, url_encode};
