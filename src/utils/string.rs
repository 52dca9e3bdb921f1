//! String utility functions for optional text fields

/// Check if an optional string is missing or whitespace only
///
/// # Arguments
///
/// * `s` - The optional string to check
///
/// # Returns
///
/// True if the value is `None` or trims to nothing
pub fn is_blank(s: Option<&str>) -> bool {
    s.map_or(true, |s| s.trim().is_empty())
}

/// Keep an optional string only when it has visible content
///
/// # Arguments
///
/// * `s` - The optional string
///
/// # Returns
///
/// The trimmed value, or `None` if it was blank
pub fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}
