//! Log sanitization utilities
//!
//! Console pages are large HTML documents and the login form carries a
//! password, so neither may reach the logs verbatim.

/// Maximum number of bytes of a response body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Truncate a response body for logging.
///
/// Bodies within the limit are returned unchanged; longer ones are cut at the
/// last character boundary before `TRUNCATE_LIMIT` bytes and report the
/// total length.
pub fn truncate_for_log(body: &str) -> String {
    if body.len() <= TRUNCATE_LIMIT {
        return body.to_string();
    }
    let cut = (0..=TRUNCATE_LIMIT)
        .rev()
        .find(|&i| body.is_char_boundary(i))
        .unwrap_or(0);
    format!("{}... [truncated, total {} bytes]", &body[..cut], body.len())
}

/// Mask a password or API key.
///
/// Nothing of the secret is kept; only an empty value is distinguishable.
pub fn mask_secret(secret: &str) -> &'static str {
    if secret.is_empty() { "<empty>" } else { "***" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_unchanged() {
        let s = "<html><body>ok</body></html>";
        assert_eq!(truncate_for_log(s), s);
    }

    #[test]
    fn long_body_truncated() {
        let s = "<tr>".repeat(TRUNCATE_LIMIT);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total"));
        assert!(result.contains(&format!("{} bytes]", TRUNCATE_LIMIT * 4)));
        assert!(result.len() < s.len());
    }

    #[test]
    fn multibyte_chars_safe() {
        let s = "é".repeat(300);
        let result = truncate_for_log(&s);
        assert!(result.contains("... [truncated, total 600 bytes]"));
    }

    #[test]
    fn secret_masked() {
        assert_eq!(mask_secret("hunter22"), "***");
        assert_eq!(mask_secret("h"), "***");
        assert_eq!(mask_secret(""), "<empty>");
    }
}
