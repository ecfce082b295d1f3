use crate::util::escape_and_elide;
use core::fmt::{Display, Formatter};

/// The error taxonomy for this crate.
///
/// Every fallible constructor, builder field, and derivation method returns
/// `Result<_, Error>`. No public entry point panics on bad input; panics are reserved
/// for internal invariant violations (see each function's `# Panics` section, where
/// present).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// An argument has an unacceptable shape, e.g. a boolean where a string was expected.
    ///
    /// Rust's static typing rejects most of these at compile time (a builder field
    /// that wants a port takes a `u16`, not an `Any`), so this crate never constructs
    /// this variant itself. It stays part of the taxonomy for callers layering a
    /// dynamically-typed boundary (FFI, a generic config format) on top of `Url`.
    TypeMismatch { component: &'static str, detail: String },
    /// A value is structurally wrong: non-ASCII in a `safe`/`protected` set, a port out
    /// of range, an absolute-path rule violated, `host: None` combined with other
    /// authority parts, an unpermitted scheme change on a relative URL, etc.
    InvalidArgument { component: &'static str, detail: String },
    /// The ASCII host contains characters forbidden by RFC 3986 §3.2.2.
    InvalidHost { host: String, looks_like_authority: bool },
    /// The hostname was rejected by both IDNA 2008 and the IDNA 2003 fallback.
    Idna { host: String, detail: String },
    /// A `%` was not followed by two hex digits, and the caller asked for strict
    /// parsing instead of the default repair-in-place policy.
    MalformedPercent { component: &'static str, at: usize },
    /// Both `query` and `query_string` were passed to `Url::build`.
    AmbiguousQuery,
}

impl Error {
    #[must_use]
    pub fn type_mismatch(component: &'static str, detail: impl Into<String>) -> Self {
        Self::TypeMismatch { component, detail: detail.into() }
    }

    #[must_use]
    pub fn invalid_argument(component: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidArgument { component, detail: detail.into() }
    }

    #[must_use]
    pub fn invalid_host(host: impl AsRef<[u8]>) -> Self {
        let host_bytes = host.as_ref();
        let looks_like_authority = host_bytes.contains(&b'@') || host_bytes.contains(&b':');
        Self::InvalidHost {
            host: escape_and_elide(host_bytes, 200),
            looks_like_authority,
        }
    }

    #[must_use]
    pub fn idna(host: impl AsRef<[u8]>, detail: impl Into<String>) -> Self {
        Self::Idna {
            host: escape_and_elide(host.as_ref(), 200),
            detail: detail.into(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::TypeMismatch { component, detail } => {
                write!(f, "invalid type for `{component}`: {detail}")
            }
            Error::InvalidArgument { component, detail } => {
                write!(f, "invalid value for `{component}`: {detail}")
            }
            Error::InvalidHost { host, looks_like_authority } => {
                write!(f, "invalid host \"{host}\": contains characters forbidden by RFC 3986 section 3.2.2")?;
                if *looks_like_authority {
                    write!(
                        f,
                        " (this looks like a full `user@host:port` authority; did you mean to pass it as `authority` instead of `host`?)"
                    )?;
                }
                Ok(())
            }
            Error::Idna { host, detail } => {
                write!(f, "invalid IDNA host \"{host}\": {detail}")
            }
            Error::MalformedPercent { component, at } => {
                write!(f, "malformed percent-escape in `{component}` at byte offset {at}")
            }
            Error::AmbiguousQuery => {
                write!(f, "`query` and `query_string` cannot both be given to Url::build")
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_host_hints_at_authority() {
        let e = Error::invalid_host("user@host:80");
        assert!(e.to_string().contains("did you mean"));
    }

    #[test]
    fn invalid_host_plain() {
        let e = Error::invalid_host("h^");
        assert!(!e.to_string().contains("did you mean"));
        assert!(e.to_string().contains("h^"));
    }

    #[test]
    fn ambiguous_query_message() {
        assert_eq!(
            Error::AmbiguousQuery.to_string(),
            "`query` and `query_string` cannot both be given to Url::build"
        );
    }
}
