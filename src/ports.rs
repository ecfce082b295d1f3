//! The default-port registry consulted for string-form elision and `port()` fallback.
//! Never consulted for validation.

/// Returns the well-known default port for `scheme`, if any.
#[must_use]
pub fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" | "ws" => Some(80),
        "https" | "wss" => Some(443),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_schemes() {
        assert_eq!(default_port("http"), Some(80));
        assert_eq!(default_port("https"), Some(443));
        assert_eq!(default_port("ws"), Some(80));
        assert_eq!(default_port("wss"), Some(443));
    }

    #[test]
    fn unknown_scheme_has_no_default() {
        assert_eq!(default_port("ftp"), None);
        assert_eq!(default_port(""), None);
    }
}
