//! Log sanitization utilities
//!
//! Keeps long record payloads (DKIM keys, SPF chains) and TSIG secrets
//! out of debug/error logs.

/// Maximum number of bytes of a payload to include in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Number of leading characters of a secret that may be shown.
const SECRET_VISIBLE_PREFIX: usize = 4;

/// Truncate a string for safe logging.
///
/// Returns the original string if it's within the limit, otherwise the
/// longest prefix that fits on a char boundary, followed by the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }

    let cut = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= TRUNCATE_LIMIT)
        .last()
        .unwrap_or(0);

    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}

/// Mask a secret, keeping only a short prefix for correlation.
pub fn redact_secret(secret: &str) -> String {
    if secret.chars().count() <= SECRET_VISIBLE_PREFIX * 2 {
        return "****".to_string();
    }
    let prefix: String = secret.chars().take(SECRET_VISIBLE_PREFIX).collect();
    format!("{prefix}****")
}
