//! The immutable [`Url`] value type: canonical percent-encoded storage, lazily
//! memoized decoded views, and the derivation surface (`with_*`, `joinpath`, `join`,
//! `origin`, `relative`, query mutators) described by the component design.

use crate::ascii_string::AsciiString;
use crate::error::Error;
use crate::host::{self, Host};
use crate::path;
use crate::ports;
use crate::query::Query;
use crate::quoter::Quoter;
use crate::split;
use crate::unquoter::Unquoter;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

/// Schemes that do not require a host/authority, used by [`Url::with_scheme`]'s
/// relative-URL guard. Not exhaustive of every such scheme in existence; callers with
/// an unlisted one can still reach it by building a new `Url` from scratch.
const SCHEMES_WITHOUT_HOST: &[&str] =
    &["mailto", "data", "tel", "urn", "sms", "geo", "news", "javascript", "about"];

fn scheme_requires_host(scheme: &str) -> bool {
    !SCHEMES_WITHOUT_HOST.contains(&scheme)
}

fn default_unquoter() -> &'static Unquoter {
    static U: OnceLock<Unquoter> = OnceLock::new();
    U.get_or_init(|| Unquoter::new("", false).unwrap())
}

fn qs_unquoter() -> &'static Unquoter {
    static U: OnceLock<Unquoter> = OnceLock::new();
    U.get_or_init(|| Unquoter::new("", true).unwrap())
}

fn validate_scheme(s: &str) -> Result<AsciiString, Error> {
    if s.is_empty() {
        return Ok(AsciiString::new());
    }
    let bytes = s.as_bytes();
    if !bytes[0].is_ascii_alphabetic() {
        return Err(Error::invalid_argument(
            "scheme",
            format!("scheme must start with a letter: {s:?}"),
        ));
    }
    if !bytes[1..]
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
    {
        return Err(Error::invalid_argument(
            "scheme",
            format!("invalid character in scheme: {s:?}"),
        ));
    }
    Ok(AsciiString::try_from(s.to_ascii_lowercase()).expect("scheme is ASCII"))
}

/// An already-percent-encoded piece of input is only structurally checked (every `%`
/// starts a valid `%HH` triplet, and the whole string is ASCII) rather than re-quoted,
/// per the `encoded=true` escape hatch.
fn validate_encoded_ascii(s: &str, component: &'static str) -> Result<(), Error> {
    if !s.is_ascii() {
        return Err(Error::invalid_argument(
            component,
            format!("non-ASCII byte in `encoded` input: {s:?}"),
        ));
    }
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
            if !valid {
                return Err(Error::MalformedPercent { component, at: i });
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

fn quote_component(
    input: &str,
    quoter: &Quoter,
    encoded: bool,
    component: &'static str,
) -> Result<AsciiString, Error> {
    let s = if encoded {
        validate_encoded_ascii(input, component)?;
        input.to_owned()
    } else {
        quoter.quote(input).into_owned()
    };
    Ok(AsciiString::try_from(s).expect("quoted/validated component is ASCII"))
}

/// Lazily computed, memoized decoded views. Never influences equality, hashing, or
/// ordering (those are defined purely over the canonical encoded fields); see
/// `Url`'s hand-written `PartialEq`/`Hash`/`Ord` impls.
#[derive(Default)]
struct DecodedCache {
    path: OnceLock<String>,
    query: OnceLock<Query>,
}

/// An immutable URL, stored internally in canonical percent-encoded form.
///
/// See the crate documentation for the full accessor/derivation surface. Every
/// `with_*`/`join*` method returns a new `Url`; none mutate `self`.
pub struct Url {
    scheme: AsciiString,
    /// Whether the string form has an authority component at all (`scheme://...` or
    /// `//...`), independent of whether that authority's host ended up empty.
    has_authority: bool,
    user: Option<AsciiString>,
    password: Option<AsciiString>,
    host: Host,
    explicit_port: Option<u16>,
    path: AsciiString,
    query: Option<AsciiString>,
    fragment: Option<AsciiString>,
    cache: DecodedCache,
}

/// The mutable working copy of a `Url`'s core fields, shared by the constructor, the
/// builder, and every derivation method. [`Fields::finish`] is the single place that
/// re-checks the cross-field invariants and normalizes a default-valued explicit port.
#[derive(Clone)]
struct Fields {
    scheme: AsciiString,
    has_authority: bool,
    user: Option<AsciiString>,
    password: Option<AsciiString>,
    host: Host,
    explicit_port: Option<u16>,
    path: AsciiString,
    query: Option<AsciiString>,
    fragment: Option<AsciiString>,
}

impl Fields {
    fn finish(mut self) -> Result<Url, Error> {
        if let Some(p) = self.explicit_port {
            if ports::default_port(self.scheme.as_str()) == Some(p) {
                self.explicit_port = None;
            }
        }
        if self.has_authority && !self.path.is_empty() && !self.path.as_str().starts_with('/') {
            return Err(Error::invalid_argument(
                "path",
                "the path of a URL with an authority must be empty or start with '/'",
            ));
        }
        if self.host.is_none()
            && (self.user.is_some() || self.password.is_some() || self.explicit_port.is_some())
        {
            return Err(Error::invalid_argument(
                "host",
                "`user`/`password`/`port` require a `host`",
            ));
        }
        Ok(Url {
            scheme: self.scheme,
            has_authority: self.has_authority,
            user: self.user,
            password: self.password,
            host: self.host,
            explicit_port: self.explicit_port,
            path: self.path,
            query: self.query,
            fragment: self.fragment,
            cache: DecodedCache::default(),
        })
    }
}

impl Url {
    fn fields(&self) -> Fields {
        Fields {
            scheme: self.scheme.clone(),
            has_authority: self.has_authority,
            user: self.user.clone(),
            password: self.password.clone(),
            host: self.host.clone(),
            explicit_port: self.explicit_port,
            path: self.path.clone(),
            query: self.query.clone(),
            fragment: self.fragment.clone(),
        }
    }

    fn parse_impl(s: &str, encoded: bool) -> Result<Self, Error> {
        let raw = split::split_uri_reference(s);
        let scheme = match raw.scheme {
            Some(sch) => validate_scheme(sch)?,
            None => AsciiString::new(),
        };
        let (has_authority, user, password, host, explicit_port) = match raw.authority {
            Some(auth) => {
                let a = split::split_authority(auth);
                let (host_str, port_str) = split::split_host_port(a.host_port);
                let user = a
                    .user
                    .map(|u| quote_component(u, &Quoter::user_info(), encoded, "user"))
                    .transpose()?;
                let password = a
                    .password
                    .map(|p| quote_component(p, &Quoter::user_info(), encoded, "password"))
                    .transpose()?;
                let host = host::parse_host(host_str)?;
                let explicit_port = parse_port_str(port_str)?;
                (true, user, password, host, explicit_port)
            }
            None => (false, None, None, Host::None, None),
        };
        let quoted_path = quote_component(raw.path, &Quoter::path(), encoded, "path")?;
        let path = AsciiString::try_from(path::remove_dot_segments(quoted_path.as_str()))
            .expect("normalized path is ASCII");
        let query = raw
            .query
            .map(|q| quote_component(q, &Quoter::query_string(), encoded, "query"))
            .transpose()?;
        let fragment = raw
            .fragment
            .map(|f| quote_component(f, &Quoter::fragment(), encoded, "fragment"))
            .transpose()?;
        Fields { scheme, has_authority, user, password, host, explicit_port, path, query, fragment }
            .finish()
    }

    /// Parses `s`, percent-(re)quoting every extracted component.
    ///
    /// # Errors
    /// See the crate's [`Error`] taxonomy: an invalid scheme, port, or host, or a
    /// relative-URL/absolute-path invariant violation.
    pub fn parse(s: &str) -> Result<Self, Error> {
        Self::parse_impl(s, false)
    }

    /// Parses `s` without re-quoting its components: each piece is only checked for
    /// being ASCII with well-formed `%HH` triplets. Per section 9's open question 3,
    /// this is a best-effort optimization, not a correctness guarantee — later
    /// derivations may still re-quote.
    ///
    /// # Errors
    /// Same as [`Url::parse`], plus [`Error::MalformedPercent`] for a malformed `%`.
    pub fn parse_encoded(s: &str) -> Result<Self, Error> {
        Self::parse_impl(s, true)
    }

    #[must_use]
    pub fn builder() -> UrlBuilder {
        UrlBuilder::default()
    }

    // ---- accessors -----------------------------------------------------------

    #[must_use]
    pub fn scheme(&self) -> &str {
        self.scheme.as_str()
    }

    #[must_use]
    pub fn raw_user(&self) -> Option<&str> {
        self.user.as_ref().map(AsciiString::as_str)
    }

    #[must_use]
    pub fn user(&self) -> Option<String> {
        self.raw_user().map(|u| default_unquoter().unquote(u))
    }

    #[must_use]
    pub fn raw_password(&self) -> Option<&str> {
        self.password.as_ref().map(AsciiString::as_str)
    }

    #[must_use]
    pub fn password(&self) -> Option<String> {
        self.raw_password().map(|p| default_unquoter().unquote(p))
    }

    /// The bare (un-bracketed) host, ASCII A-label form.
    #[must_use]
    pub fn raw_host(&self) -> String {
        self.host.to_plain_string()
    }

    /// The decoded host: IDNA A-labels are converted back to their Unicode U-label.
    #[must_use]
    pub fn host(&self) -> String {
        match &self.host {
            Host::Domain(d) => host::domain_to_unicode(d),
            other => other.to_plain_string(),
        }
    }

    /// The host formatted for use as an HTTP `Host` header subcomponent: IPv6 is
    /// bracketed, everything else is identical to `raw_host`.
    #[must_use]
    pub fn host_subcomponent(&self) -> String {
        self.host.to_host_string()
    }

    #[must_use]
    pub fn host_is_none(&self) -> bool {
        self.host.is_none()
    }

    /// The effective port: the explicit one if set, else the scheme's default.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.explicit_port
            .or_else(|| ports::default_port(self.scheme.as_str()))
    }

    /// The port exactly as it would appear in the string form, or `None` if elided
    /// (because it was never given, or because it equals the scheme's default).
    #[must_use]
    pub fn explicit_port(&self) -> Option<u16> {
        self.explicit_port
    }

    #[must_use]
    pub fn is_default_port(&self) -> bool {
        self.port() == ports::default_port(self.scheme.as_str())
    }

    #[must_use]
    pub fn raw_authority(&self) -> String {
        let mut out = String::new();
        self.write_authority(&mut out, false);
        out
    }

    #[must_use]
    pub fn authority(&self) -> String {
        let mut out = String::new();
        self.write_authority(&mut out, true);
        out
    }

    fn write_authority(&self, out: &mut String, human: bool) {
        if !self.has_authority {
            return;
        }
        if self.user.is_some() || self.password.is_some() {
            if let Some(u) = &self.user {
                out.push_str(&if human { default_unquoter().unquote(u.as_str()) } else { u.as_str().to_owned() });
            }
            if let Some(p) = &self.password {
                out.push(':');
                out.push_str(&if human { default_unquoter().unquote(p.as_str()) } else { p.as_str().to_owned() });
            }
            out.push('@');
        }
        out.push_str(&if human { self.host() } else { self.host_subcomponent() });
        if let Some(p) = self.explicit_port {
            out.push(':');
            out.push_str(&p.to_string());
        }
    }

    #[must_use]
    pub fn raw_path(&self) -> &str {
        self.path.as_str()
    }

    /// The decoded path: a `%2F` triplet is decoded back to a literal `/`.
    #[must_use]
    pub fn path(&self) -> String {
        self.cache
            .path
            .get_or_init(|| default_unquoter().unquote(self.path.as_str()))
            .clone()
    }

    /// The path with `%2F` and `%25` left percent-encoded, so a decoded separator can
    /// never be confused with a structural one; used to round-trip paths containing
    /// literal `/` bytes inside a single logical segment.
    #[must_use]
    pub fn path_safe(&self) -> String {
        path::decode_path_safe(self.path.as_str())
    }

    #[must_use]
    pub fn raw_query_string(&self) -> &str {
        self.query.as_ref().map_or("", AsciiString::as_str)
    }

    /// The whole query string, decoded as one blob (not split into pairs); `+`
    /// decodes to space.
    #[must_use]
    pub fn query_string(&self) -> String {
        qs_unquoter().unquote(self.raw_query_string())
    }

    #[must_use]
    pub fn raw_path_qs(&self) -> String {
        match &self.query {
            Some(q) => format!("{}?{}", self.path.as_str(), q.as_str()),
            None => self.path.as_str().to_owned(),
        }
    }

    #[must_use]
    pub fn path_qs(&self) -> String {
        match &self.query {
            Some(_) => format!("{}?{}", self.path(), self.query_string()),
            None => self.path(),
        }
    }

    /// The parsed, decoded query multi-map.
    #[must_use]
    pub fn query(&self) -> Query {
        self.cache
            .query
            .get_or_init(|| Query::parse(self.raw_query_string()))
            .clone()
    }

    #[must_use]
    pub fn raw_fragment(&self) -> &str {
        self.fragment.as_ref().map_or("", AsciiString::as_str)
    }

    #[must_use]
    pub fn fragment(&self) -> String {
        default_unquoter().unquote(self.raw_fragment())
    }

    #[must_use]
    pub fn raw_parts(&self) -> Vec<&str> {
        path::split_segments(self.path.as_str())
    }

    #[must_use]
    pub fn parts(&self) -> Vec<String> {
        self.raw_parts()
            .into_iter()
            .map(|s| default_unquoter().unquote(s))
            .collect()
    }

    #[must_use]
    pub fn raw_name(&self) -> &str {
        path::name(self.path.as_str())
    }

    #[must_use]
    pub fn name(&self) -> String {
        default_unquoter().unquote(self.raw_name())
    }

    #[must_use]
    pub fn raw_suffix(&self) -> &str {
        path::suffix(self.raw_name())
    }

    #[must_use]
    pub fn suffix(&self) -> String {
        path::suffix(&self.name()).to_owned()
    }

    #[must_use]
    pub fn raw_suffixes(&self) -> Vec<&str> {
        path::suffixes(self.raw_name())
    }

    #[must_use]
    pub fn suffixes(&self) -> Vec<String> {
        let name = self.name();
        path::suffixes(&name).into_iter().map(str::to_owned).collect()
    }

    /// `true` iff this URL has a scheme, or an authority (including a
    /// scheme-less, protocol-relative `//host/path`).
    #[must_use]
    pub fn absolute(&self) -> bool {
        !self.scheme.as_str().is_empty() || self.has_authority
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scheme.as_str().is_empty()
            && !self.has_authority
            && self.path.as_str().is_empty()
            && self.query.is_none()
            && self.fragment.is_none()
    }

    /// Pops the last path segment and clears query/fragment, like `with_name`.
    #[must_use]
    pub fn parent(&self) -> Self {
        let mut f = self.fields();
        f.path = AsciiString::try_from(path::parent(f.path.as_str())).expect("ASCII");
        f.query = None;
        f.fragment = None;
        f.finish().expect("popping a segment cannot violate an invariant")
    }

    // ---- derivations -----------------------------------------------------------

    /// # Errors
    /// [`Error::InvalidArgument`] for a malformed scheme, or for changing the scheme
    /// of a relative URL to one that requires a host.
    pub fn with_scheme(&self, scheme: &str) -> Result<Self, Error> {
        let new_scheme = validate_scheme(scheme)?;
        let is_relative = self.scheme.as_str().is_empty() && !self.has_authority;
        if is_relative && scheme_requires_host(new_scheme.as_str()) {
            return Err(Error::invalid_argument(
                "scheme",
                format!("cannot set scheme {scheme:?} on a relative URL, since it requires a host"),
            ));
        }
        let mut f = self.fields();
        f.scheme = new_scheme;
        f.finish()
    }

    /// # Errors
    /// [`Error::InvalidArgument`] if `user` is set but this URL has no host.
    pub fn with_user(&self, user: Option<&str>) -> Result<Self, Error> {
        let mut f = self.fields();
        f.user = user
            .map(|u| quote_component(u, &Quoter::user_info(), false, "user"))
            .transpose()?;
        f.finish()
    }

    /// # Errors
    /// [`Error::InvalidArgument`] if `password` is set but this URL has no host.
    pub fn with_password(&self, password: Option<&str>) -> Result<Self, Error> {
        let mut f = self.fields();
        f.password = password
            .map(|p| quote_component(p, &Quoter::user_info(), false, "password"))
            .transpose()?;
        f.finish()
    }

    /// # Errors
    /// [`Error::InvalidArgument`] when changing the host on a relative URL, or when
    /// clearing/emptying the host of a scheme that requires one.
    pub fn with_host(&self, host: Option<&str>) -> Result<Self, Error> {
        if !self.absolute() {
            return Err(Error::invalid_argument("host", "cannot set `host` on a relative URL"));
        }
        let mut f = self.fields();
        match host {
            None => {
                if !f.scheme.as_str().is_empty() && scheme_requires_host(f.scheme.as_str()) {
                    return Err(Error::invalid_argument(
                        "host",
                        "cannot clear `host` for a scheme that requires one",
                    ));
                }
                f.host = Host::None;
                f.has_authority = false;
                f.user = None;
                f.password = None;
                f.explicit_port = None;
            }
            Some(h) => {
                let parsed = host::parse_host(h)?;
                if parsed.is_none() && scheme_requires_host(f.scheme.as_str()) {
                    return Err(Error::invalid_argument(
                        "host",
                        "empty host is not allowed for a scheme that requires one",
                    ));
                }
                f.has_authority = true;
                f.host = parsed;
            }
        }
        f.finish()
    }

    /// # Errors
    /// [`Error::InvalidArgument`] for port `0`, or if set but this URL has no host.
    pub fn with_port(&self, port: Option<u16>) -> Result<Self, Error> {
        if port == Some(0) {
            return Err(Error::invalid_argument("port", "port 0 is not a valid explicit port"));
        }
        let mut f = self.fields();
        f.explicit_port = port;
        f.finish()
    }

    /// Replaces the path. Keeps query and fragment (only `with_name`/`with_suffix`
    /// and the joining operations clear them).
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if the result would violate the absolute-path rule,
    /// or [`Error::MalformedPercent`] when `encoded` is set and `path` has a bad `%`.
    pub fn with_path(&self, new_path: &str, encoded: bool) -> Result<Self, Error> {
        let quoted = quote_component(new_path, &Quoter::path(), encoded, "path")?;
        let normalized = path::remove_dot_segments(quoted.as_str());
        let mut f = self.fields();
        f.path = AsciiString::try_from(normalized).expect("normalized path is ASCII");
        f.finish()
    }

    /// Replaces the entire query string. `None` clears it.
    ///
    /// # Errors
    /// [`Error::MalformedPercent`] only arises via `parse_encoded`-style callers;
    /// this method always re-quotes `query`, so it cannot fail on well-formed input.
    pub fn with_query(&self, query: Option<&str>) -> Result<Self, Error> {
        let mut f = self.fields();
        f.query = query
            .map(|q| quote_component(q, &Quoter::query_string(), false, "query"))
            .transpose()?;
        f.finish()
    }

    /// # Errors
    /// See [`Error`]; fragment quoting is total, so this effectively cannot fail.
    pub fn with_fragment(&self, fragment: Option<&str>) -> Result<Self, Error> {
        let mut f = self.fields();
        f.fragment = fragment
            .map(|fr| quote_component(fr, &Quoter::fragment(), false, "fragment"))
            .transpose()?;
        f.finish()
    }

    /// Replaces the last path segment and clears query/fragment.
    ///
    /// # Errors
    /// See [`Error`]; segment quoting is total, so this effectively cannot fail.
    pub fn with_name(&self, new_name: &str) -> Result<Self, Error> {
        let quoted_name = path::quote_segment(new_name);
        let mut f = self.fields();
        f.path = AsciiString::try_from(path::with_name(f.path.as_str(), &quoted_name)).expect("ASCII");
        f.query = None;
        f.fragment = None;
        f.finish()
    }

    /// Replaces `name`'s suffix and clears query/fragment. `new_suffix` must start
    /// with `.`, or be empty to drop the extension.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if `new_suffix` is non-empty and does not start
    /// with `.`.
    pub fn with_suffix(&self, new_suffix: &str) -> Result<Self, Error> {
        if !new_suffix.is_empty() && !new_suffix.starts_with('.') {
            return Err(Error::invalid_argument(
                "suffix",
                format!("suffix must start with '.': {new_suffix:?}"),
            ));
        }
        let quoted_suffix = path::quote_segment(new_suffix);
        let new_name = path::with_suffix(self.raw_name(), &quoted_suffix);
        let mut f = self.fields();
        f.path = AsciiString::try_from(path::with_name(f.path.as_str(), &new_name)).expect("ASCII");
        f.query = None;
        f.fragment = None;
        f.finish()
    }

    /// Appends a single percent-encoded (unless `encoded`) segment.
    ///
    /// # Errors
    /// See [`Error`]; only reachable via a malformed `encoded=true` segment.
    pub fn joinpath_one(&self, seg: &str, encoded: bool) -> Result<Self, Error> {
        self.joinpath(&[seg], encoded)
    }

    /// Appends one or more percent-encoded (unless `encoded`) segments. Drops query
    /// and fragment, per section 4.6.
    ///
    /// # Errors
    /// [`Error::MalformedPercent`] when `encoded` is set and a segment has a bad `%`.
    pub fn joinpath(&self, segs: &[&str], encoded: bool) -> Result<Self, Error> {
        let mut encoded_segs = Vec::with_capacity(segs.len());
        for seg in segs {
            encoded_segs.push(String::from(quote_component(seg, &Quoter::path(), encoded, "path")?));
        }
        let encoded_segs_ref: Vec<&str> = encoded_segs.iter().map(String::as_str).collect();
        let joined = path::join_segments(self.path.as_str(), &encoded_segs_ref, true);
        let normalized = path::remove_dot_segments(&joined);
        let mut f = self.fields();
        f.path = AsciiString::try_from(normalized).expect("ASCII");
        f.query = None;
        f.fragment = None;
        f.finish()
    }

    /// RFC 3986 section 5.2 reference resolution: `self` is the base, `reference`
    /// supplies the components missing from it.
    ///
    /// # Errors
    /// See [`Error`]; only reachable if the resolved path/host combination would
    /// violate an invariant (extremely unlikely given two already-valid `Url`s).
    pub fn join(&self, reference: &Url) -> Result<Self, Error> {
        let base = self;
        let (scheme, has_authority, user, password, host, explicit_port, path, query) =
            if !reference.scheme.as_str().is_empty() {
                (
                    reference.scheme.clone(),
                    reference.has_authority,
                    reference.user.clone(),
                    reference.password.clone(),
                    reference.host.clone(),
                    reference.explicit_port,
                    path::remove_dot_segments(reference.path.as_str()),
                    reference.query.clone(),
                )
            } else if reference.has_authority {
                (
                    base.scheme.clone(),
                    true,
                    reference.user.clone(),
                    reference.password.clone(),
                    reference.host.clone(),
                    reference.explicit_port,
                    path::remove_dot_segments(reference.path.as_str()),
                    reference.query.clone(),
                )
            } else if reference.path.as_str().is_empty() {
                (
                    base.scheme.clone(),
                    base.has_authority,
                    base.user.clone(),
                    base.password.clone(),
                    base.host.clone(),
                    base.explicit_port,
                    base.path.as_str().to_owned(),
                    reference.query.clone().or_else(|| base.query.clone()),
                )
            } else {
                let merged = if reference.path.as_str().starts_with('/') {
                    reference.path.as_str().to_owned()
                } else {
                    path::merge(base.has_authority, base.path.as_str(), reference.path.as_str())
                };
                (
                    base.scheme.clone(),
                    base.has_authority,
                    base.user.clone(),
                    base.password.clone(),
                    base.host.clone(),
                    base.explicit_port,
                    path::remove_dot_segments(&merged),
                    reference.query.clone(),
                )
            };
        Fields {
            scheme,
            has_authority,
            user,
            password,
            host,
            explicit_port,
            path: AsciiString::try_from(path).expect("ASCII"),
            query,
            fragment: reference.fragment.clone(),
        }
        .finish()
    }

    /// A new URL with just scheme, host, and non-default port.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if this URL has no scheme or no host: origin is
    /// defined only for URLs with a network authority.
    pub fn origin(&self) -> Result<Self, Error> {
        if !self.absolute() || self.host.is_none() {
            return Err(Error::invalid_argument(
                "origin",
                "origin() requires an absolute URL with a host",
            ));
        }
        Fields {
            scheme: self.scheme.clone(),
            has_authority: true,
            user: None,
            password: None,
            host: self.host.clone(),
            explicit_port: self.explicit_port,
            path: AsciiString::new(),
            query: None,
            fragment: None,
        }
        .finish()
    }

    /// A new URL with just path, query, and fragment (scheme and authority dropped).
    #[must_use]
    pub fn relative(&self) -> Self {
        Fields {
            scheme: AsciiString::new(),
            has_authority: false,
            user: None,
            password: None,
            host: Host::None,
            explicit_port: None,
            path: self.path.clone(),
            query: self.query.clone(),
            fragment: self.fragment.clone(),
        }
        .finish()
        .expect("dropping scheme/authority cannot violate an invariant")
    }

    /// # Errors
    /// See [`Error`]; query re-serialization is total, so this effectively cannot
    /// fail.
    pub fn update_query(&self, q: &Query) -> Result<Self, Error> {
        let mut query = self.query();
        query.update(q);
        self.with_query_map(query)
    }

    /// # Errors
    /// See [`update_query`](Self::update_query).
    pub fn extend_query(&self, q: &Query) -> Result<Self, Error> {
        let mut query = self.query();
        query.extend(q);
        self.with_query_map(query)
    }

    /// # Errors
    /// See [`update_query`](Self::update_query).
    pub fn without_query_params(&self, keys: &[&str]) -> Result<Self, Error> {
        let mut query = self.query();
        query.without_params(keys);
        self.with_query_map(query)
    }

    fn with_query_map(&self, query: Query) -> Result<Self, Error> {
        let mut f = self.fields();
        f.query = if query.is_empty() {
            None
        } else {
            Some(AsciiString::try_from(query.to_raw_string()).expect("ASCII"))
        };
        f.finish()
    }

    /// A human-readable, generally non-reparsable, fully decoded string form.
    #[must_use]
    pub fn human_repr(&self) -> String {
        let mut out = String::new();
        if !self.scheme.as_str().is_empty() {
            out.push_str(self.scheme.as_str());
            out.push(':');
        }
        if self.has_authority {
            out.push_str("//");
            self.write_authority(&mut out, true);
        }
        out.push_str(&self.path());
        if self.query.is_some() {
            out.push('?');
            out.push_str(&self.query_string());
        }
        if self.fragment.is_some() {
            out.push('#');
            out.push_str(&self.fragment());
        }
        out
    }

    /// The ASCII bytes of the canonical string form.
    #[must_use]
    pub fn as_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

fn parse_port_str(port_str: Option<&str>) -> Result<Option<u16>, Error> {
    match port_str {
        None | Some("") => Ok(None),
        Some(s) => {
            let n: u32 = s
                .parse()
                .map_err(|_| Error::invalid_argument("port", format!("not a valid port number: {s:?}")))?;
            if n > u32::from(u16::MAX) {
                return Err(Error::invalid_argument("port", format!("port out of range: {n}")));
            }
            Ok(Some(n as u16))
        }
    }
}

impl Display for Url {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.scheme.as_str().is_empty() {
            write!(f, "{}:", self.scheme.as_str())?;
        }
        if self.has_authority {
            f.write_str("//")?;
            let mut authority = String::new();
            self.write_authority(&mut authority, false);
            f.write_str(&authority)?;
        }
        f.write_str(self.path.as_str())?;
        if let Some(q) = &self.query {
            write!(f, "?{}", q.as_str())?;
        }
        if let Some(fr) = &self.fragment {
            write!(f, "#{}", fr.as_str())?;
        }
        Ok(())
    }
}

impl Debug for Url {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Url").field(&self.to_string()).finish()
    }
}

impl Clone for Url {
    fn clone(&self) -> Self {
        self.fields().finish().expect("a valid Url's fields remain valid")
    }
}

impl PartialEq for Url {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
impl Eq for Url {}

impl Hash for Url {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

/// Lexicographic on the canonical string form, per the external-interfaces contract.
impl PartialOrd for Url {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Url {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_string().cmp(&other.to_string())
    }
}

impl Default for Url {
    fn default() -> Self {
        Url::parse("").expect("the empty string always parses")
    }
}

impl FromStr for Url {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        Url::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Url {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Url {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Url::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl std::ops::Div<&str> for &Url {
    type Output = Result<Url, Error>;

    /// Single-segment `joinpath`.
    fn div(self, seg: &str) -> Self::Output {
        self.joinpath(&[seg], false)
    }
}

impl std::ops::Rem<&Query> for &Url {
    type Output = Result<Url, Error>;

    /// Alias for `update_query`.
    fn rem(self, q: &Query) -> Self::Output {
        self.update_query(q)
    }
}

/// Builds a [`Url`] from discrete components, mirroring `Url::build(**parts)`.
#[derive(Clone, Debug, Default)]
pub struct UrlBuilder {
    scheme: Option<String>,
    authority: Option<String>,
    user: Option<String>,
    password: Option<String>,
    host: Option<Option<String>>,
    port: Option<u16>,
    path: Option<String>,
    query: Option<Query>,
    query_string: Option<String>,
    fragment: Option<String>,
    encoded: bool,
}

impl UrlBuilder {
    #[must_use]
    pub fn scheme(mut self, s: impl Into<String>) -> Self {
        self.scheme = Some(s.into());
        self
    }

    #[must_use]
    pub fn authority(mut self, s: impl Into<String>) -> Self {
        self.authority = Some(s.into());
        self
    }

    #[must_use]
    pub fn user(mut self, s: impl Into<String>) -> Self {
        self.user = Some(s.into());
        self
    }

    #[must_use]
    pub fn password(mut self, s: impl Into<String>) -> Self {
        self.password = Some(s.into());
        self
    }

    /// `host(None)` explicitly requests a hostless authority (e.g. `file:///path`);
    /// it is rejected at `build()` time if combined with `user`/`password`/`port`.
    #[must_use]
    pub fn host(mut self, s: Option<impl Into<String>>) -> Self {
        self.host = Some(s.map(Into::into));
        self
    }

    #[must_use]
    pub fn port(mut self, p: u16) -> Self {
        self.port = Some(p);
        self
    }

    #[must_use]
    pub fn path(mut self, s: impl Into<String>) -> Self {
        self.path = Some(s.into());
        self
    }

    #[must_use]
    pub fn query(mut self, q: Query) -> Self {
        self.query = Some(q);
        self
    }

    #[must_use]
    pub fn query_string(mut self, s: impl Into<String>) -> Self {
        self.query_string = Some(s.into());
        self
    }

    #[must_use]
    pub fn fragment(mut self, s: impl Into<String>) -> Self {
        self.fragment = Some(s.into());
        self
    }

    #[must_use]
    pub fn encoded(mut self, yes: bool) -> Self {
        self.encoded = yes;
        self
    }

    /// # Errors
    /// [`Error::InvalidArgument`] for conflicting/ill-formed components, or
    /// [`Error::AmbiguousQuery`] if both `query` and `query_string` were given.
    pub fn build(self) -> Result<Url, Error> {
        if self.authority.is_some()
            && (self.user.is_some() || self.password.is_some() || self.host.is_some() || self.port.is_some())
        {
            return Err(Error::invalid_argument(
                "authority",
                "cannot combine `authority` with `user`/`password`/`host`/`port`",
            ));
        }
        if self.query.is_some() && self.query_string.is_some() {
            return Err(Error::AmbiguousQuery);
        }
        if let Some(None) = &self.host {
            if self.user.is_some() || self.password.is_some() || self.port.is_some() {
                return Err(Error::invalid_argument(
                    "host",
                    "`host: None` cannot be combined with `user`/`password`/`port`",
                ));
            }
        }
        if self.port == Some(0) {
            return Err(Error::invalid_argument("port", "port 0 is not a valid explicit port"));
        }

        let scheme = match &self.scheme {
            Some(s) => validate_scheme(s)?,
            None => AsciiString::new(),
        };

        let (has_authority, user, password, host, explicit_port) = if let Some(authority_str) = &self.authority
        {
            let a = split::split_authority(authority_str);
            let (host_str, port_str) = split::split_host_port(a.host_port);
            let user = a
                .user
                .map(|u| quote_component(u, &Quoter::user_info(), self.encoded, "user"))
                .transpose()?;
            let password = a
                .password
                .map(|p| quote_component(p, &Quoter::user_info(), self.encoded, "password"))
                .transpose()?;
            let host = host::parse_host(host_str)?;
            let explicit_port = parse_port_str(port_str)?;
            (true, user, password, host, explicit_port)
        } else if self.host.is_some() || self.user.is_some() || self.password.is_some() || self.port.is_some()
        {
            let host = match &self.host {
                Some(Some(h)) => host::parse_host(h)?,
                Some(None) | None => Host::None,
            };
            let user = self
                .user
                .as_deref()
                .map(|u| quote_component(u, &Quoter::user_info(), self.encoded, "user"))
                .transpose()?;
            let password = self
                .password
                .as_deref()
                .map(|p| quote_component(p, &Quoter::user_info(), self.encoded, "password"))
                .transpose()?;
            (true, user, password, host, self.port)
        } else {
            (false, None, None, Host::None, None)
        };

        let raw_path_input = self.path.unwrap_or_default();
        let quoted_path = quote_component(&raw_path_input, &Quoter::path(), self.encoded, "path")?;
        let path = AsciiString::try_from(path::remove_dot_segments(quoted_path.as_str()))
            .expect("normalized path is ASCII");

        let query = if let Some(q) = &self.query {
            if q.is_empty() {
                None
            } else {
                Some(AsciiString::try_from(q.to_raw_string()).expect("ASCII"))
            }
        } else if let Some(qs) = &self.query_string {
            Some(quote_component(qs, &Quoter::query_string(), self.encoded, "query")?)
        } else {
            None
        };

        let fragment = self
            .fragment
            .as_deref()
            .map(|fr| quote_component(fr, &Quoter::fragment(), self.encoded, "fragment"))
            .transpose()?;

        Fields { scheme, has_authority, user, password, host, explicit_port, path, query, fragment }.finish()
    }
}
