//! RFC 3986 section 3 structural split of a URI-reference into its five raw
//! (unvalidated, still percent-encoded) components, plus the further splits of an
//! authority into userinfo/host/port.
//!
//! Each function here only cuts a `&str` at delimiter bytes; it never quotes,
//! unquotes, or validates a component's alphabet. `crate::url` runs each extracted
//! piece through the appropriate `Quoter`/host codec afterward.

/// The five components of a URI-reference, as raw substrings of the input.
#[derive(Debug, Eq, PartialEq)]
pub struct RawParts<'a> {
    pub scheme: Option<&'a str>,
    pub authority: Option<&'a str>,
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub fragment: Option<&'a str>,
}

/// Splits `s` into scheme / authority / path / query / fragment, per RFC 3986
/// section 3's extraction order: fragment first (first `#`), then query (first `?`
/// in what remains), then scheme (a leading `ALPHA *( ALPHA / DIGIT / "+" / "-" /
/// "." ) ":"`), then authority (after a leading `//`, up to the next `/`).
#[must_use]
pub fn split_uri_reference(s: &str) -> RawParts<'_> {
    let (before_fragment, fragment) = match s.find('#') {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    };
    let (before_query, query) = match before_fragment.find('?') {
        Some(i) => (&before_fragment[..i], Some(&before_fragment[i + 1..])),
        None => (before_fragment, None),
    };
    let (scheme, rest) = split_scheme(before_query);
    let (authority, path) = if let Some(after_slashes) = rest.strip_prefix("//") {
        let end = after_slashes.find('/').unwrap_or(after_slashes.len());
        (Some(&after_slashes[..end]), &after_slashes[end..])
    } else {
        (None, rest)
    };
    RawParts { scheme, authority, path, query, fragment }
}

/// Splits a leading `scheme:` off `s`, per `scheme = ALPHA *( ALPHA / DIGIT / "+" /
/// "-" / "." )`. Returns `(None, s)` unchanged when `s` does not start with a valid
/// scheme followed by `:`.
fn split_scheme(s: &str) -> (Option<&str>, &str) {
    let bytes = s.as_bytes();
    if bytes.first().is_none_or(|b| !b.is_ascii_alphabetic()) {
        return (None, s);
    }
    let mut i = 1;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'+' | b'-' | b'.')) {
        i += 1;
    }
    if bytes.get(i) == Some(&b':') {
        (Some(&s[..i]), &s[i + 1..])
    } else {
        (None, s)
    }
}

/// The pieces of a raw authority string: `[userinfo@]host[:port]`.
#[derive(Debug, Eq, PartialEq)]
pub struct RawAuthority<'a> {
    pub user: Option<&'a str>,
    pub password: Option<&'a str>,
    pub host_port: &'a str,
}

/// Splits an authority at the rightmost `@` into userinfo/host-port, then the
/// userinfo at its first `:` into user/password.
#[must_use]
pub fn split_authority(s: &str) -> RawAuthority<'_> {
    let (userinfo, host_port) = match s.rfind('@') {
        Some(i) => (Some(&s[..i]), &s[i + 1..]),
        None => (None, s),
    };
    let (user, password) = match userinfo {
        Some(u) => match u.find(':') {
            Some(i) => (Some(&u[..i]), Some(&u[i + 1..])),
            None => (Some(u), None),
        },
        None => (None, None),
    };
    RawAuthority { user, password, host_port }
}

/// Splits `host[:port]` at the rightmost `:` that is not inside a bracketed IPv6
/// literal. "No colon" and "colon with empty value" are both represented as
/// `(host, Some(""))` / `(host, None)`; the caller treats both as "no explicit port".
#[must_use]
pub fn split_host_port(s: &str) -> (&str, Option<&str>) {
    if s.starts_with('[') {
        return match s.find(']') {
            Some(end) => {
                let after = &s[end + 1..];
                match after.strip_prefix(':') {
                    Some(port) => (&s[..=end], Some(port)),
                    None => (s, None),
                }
            }
            None => (s, None),
        };
    }
    match s.rfind(':') {
        Some(i) => (&s[..i], Some(&s[i + 1..])),
        None => (s, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_all_five_components() {
        let p = split_uri_reference("http://u:p@h:8080/a/b?q=1#frag");
        assert_eq!(p.scheme, Some("http"));
        assert_eq!(p.authority, Some("u:p@h:8080"));
        assert_eq!(p.path, "/a/b");
        assert_eq!(p.query, Some("q=1"));
        assert_eq!(p.fragment, Some("frag"));
    }

    #[test]
    fn relative_reference_no_scheme_no_authority() {
        let p = split_uri_reference("a/b?q#f");
        assert_eq!(p.scheme, None);
        assert_eq!(p.authority, None);
        assert_eq!(p.path, "a/b");
        assert_eq!(p.query, Some("q"));
        assert_eq!(p.fragment, Some("f"));
    }

    #[test]
    fn protocol_relative_authority_without_scheme() {
        let p = split_uri_reference("//other/y");
        assert_eq!(p.scheme, None);
        assert_eq!(p.authority, Some("other"));
        assert_eq!(p.path, "/y");
    }

    #[test]
    fn empty_string() {
        let p = split_uri_reference("");
        assert_eq!(p.scheme, None);
        assert_eq!(p.authority, None);
        assert_eq!(p.path, "");
        assert_eq!(p.query, None);
        assert_eq!(p.fragment, None);
    }

    #[test]
    fn scheme_requires_leading_letter() {
        // A leading digit cannot start a scheme, so "2http://x" has no scheme.
        let p = split_uri_reference("2http://x");
        assert_eq!(p.scheme, None);
    }

    #[test]
    fn dot_relative_path_is_not_mistaken_for_a_scheme() {
        let p = split_uri_reference("./https://github.com/");
        assert_eq!(p.scheme, None);
        assert_eq!(p.path, "./https://github.com/");
    }

    #[test]
    fn split_authority_userinfo_and_host_port() {
        let a = split_authority("user:pass@example.com:80");
        assert_eq!(a.user, Some("user"));
        assert_eq!(a.password, Some("pass"));
        assert_eq!(a.host_port, "example.com:80");
    }

    #[test]
    fn split_authority_password_without_host_rightmost_at() {
        // The rightmost '@' separates userinfo from host, per RFC 3986 section 3.2.
        let a = split_authority("a@b@example.com");
        assert_eq!(a.user, Some("a@b"));
        assert_eq!(a.host_port, "example.com");
    }

    #[test]
    fn split_authority_no_userinfo() {
        let a = split_authority("example.com");
        assert_eq!(a.user, None);
        assert_eq!(a.password, None);
    }

    #[test]
    fn split_host_port_plain() {
        assert_eq!(split_host_port("example.com:80"), ("example.com", Some("80")));
        assert_eq!(split_host_port("example.com"), ("example.com", None));
        assert_eq!(split_host_port("example.com:"), ("example.com", Some("")));
    }

    #[test]
    fn split_host_port_bracketed_ipv6_colon_not_mistaken_for_port() {
        assert_eq!(split_host_port("[::1]"), ("[::1]", None));
        assert_eq!(split_host_port("[::1]:8080"), ("[::1]", Some("8080")));
    }
}
