//! Key prefix normalization.

/// Trim the prefix and make it end with `.` unless it is empty.
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.ends_with('.') {
        trimmed.to_string()
    } else {
        format!("{}.", trimmed)
    }
}

/// Store key for `key` under an already normalized prefix.
pub fn effective_key(prefix: &str, key: &str) -> String {
    format!("{}{}", prefix, key)
}
