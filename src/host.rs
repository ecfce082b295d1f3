//! Host parsing and canonicalization: IPv4 dotted-quads, bracketed IPv6/IPvFuture
//! literals, and IDNA registered names.

use crate::cache::{self, CacheKind};
use crate::error::Error;
use crate::tables::REG_NAME;
use std::net::{Ipv4Addr, Ipv6Addr};

/// A parsed, canonicalized host.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Host {
    /// No host (e.g. `mailto:` or a relative URL).
    None,
    /// A dotted-quad IPv4 literal, stored in canonical form (no leading zeros).
    Ipv4(Ipv4Addr),
    /// An IPv6 literal, stored without the surrounding `[...]`.
    ///
    /// `zone` preserves a `%zone-id` suffix verbatim (RFC 6874), unvalidated.
    Ipv6 { addr: Ipv6Addr, zone: Option<String> },
    /// An `IPvFuture` literal (RFC 3986 `"v" 1*HEXDIG "." 1*( unreserved / sub-delims
    /// / ":" )`), stored lowercased, without the surrounding `[...]`. There is no
    /// registry of future address-literal formats to parse further, so the text is
    /// kept opaque beyond the ABNF shape check.
    IpvFuture(String),
    /// An IDNA A-label registered name, lowercased.
    Domain(String),
}

impl Host {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Host::None)
    }

    /// The canonical encoded form used when storing/recomposing a URL: IPv6 is
    /// re-bracketed, everything else is written as-is.
    #[must_use]
    pub fn to_host_string(&self) -> String {
        match self {
            Host::None => String::new(),
            Host::Ipv4(addr) => addr.to_string(),
            Host::Ipv6 { addr, zone } => match zone {
                Some(z) => format!("[{addr}%{z}]"),
                None => format!("[{addr}]"),
            },
            Host::IpvFuture(lit) => format!("[{lit}]"),
            Host::Domain(d) => d.clone(),
        }
    }

    /// The bare (un-bracketed) host text, as stored internally.
    #[must_use]
    pub fn to_plain_string(&self) -> String {
        match self {
            Host::None => String::new(),
            Host::Ipv4(addr) => addr.to_string(),
            Host::Ipv6 { addr, zone } => match zone {
                Some(z) => format!("{addr}%{z}"),
                None => addr.to_string(),
            },
            Host::IpvFuture(lit) => lit.clone(),
            Host::Domain(d) => d.clone(),
        }
    }
}

fn reg_name_validation_error(input: &str) -> Error {
    Error::invalid_host(input)
}

/// RFC 3986 section 3.2.2: an ASCII registered name may contain only
/// `unreserved / pct-encoded / sub-delims`, and any `%` must begin a `%HH` triplet.
fn check_reg_name_chars(s: &str) -> Result<(), Error> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !b.is_ascii() || !REG_NAME.contains(b) {
            return Err(reg_name_validation_error(s));
        }
        if b == b'%' {
            let valid_pair = bytes
                .get(i + 1)
                .is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
            if !valid_pair {
                return Err(reg_name_validation_error(s));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

/// Marker prefix for a cached parse failure: no valid IPv4/IPv6 text begins with NUL,
/// so it doubles as an out-of-band sentinel without a second hit/miss cache.
const PARSE_FAILED: &str = "\0error";

fn parse_ipv4(s: &str) -> Option<Ipv4Addr> {
    let cached = cache::get_or_insert_with(CacheKind::IpAddressParse, s, || {
        s.parse::<Ipv4Addr>()
            .map_or_else(|_| PARSE_FAILED.to_owned(), |addr| addr.to_string())
    });
    if cached == PARSE_FAILED {
        None
    } else {
        cached.parse().ok()
    }
}

fn parse_bracketed(inner: &str) -> Result<(Ipv6Addr, Option<String>), Error> {
    let (addr_part, zone) = match inner.split_once('%') {
        Some((a, z)) => (a, Some(z.to_owned())),
        None => (inner, None),
    };
    let cached = cache::get_or_insert_with(CacheKind::IpAddressParse, inner, || {
        addr_part
            .parse::<Ipv6Addr>()
            .map_or_else(|_| PARSE_FAILED.to_owned(), |addr| addr.to_string())
    });
    if cached == PARSE_FAILED {
        return Err(Error::invalid_host(format!("[{inner}]")));
    }
    let addr: Ipv6Addr = cached.parse().expect("cached canonical ipv6 text");
    Ok((addr, zone))
}

/// Recognizes RFC 3986 `IPvFuture = "v" 1*HEXDIG "." 1*( unreserved / sub-delims /
/// ":" )` and, if `inner` matches, returns its lowercased canonical text.
fn parse_ipv_future(inner: &str) -> Option<String> {
    let rest = inner.strip_prefix(['v', 'V'])?;
    let dot = rest.find('.')?;
    let (version, tail) = rest.split_at(dot);
    let tail = &tail[1..];
    if version.is_empty() || !version.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    if tail.is_empty()
        || !tail.bytes().all(|b| {
            b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~' | b':')
                || crate::tables::SUB_DELIMS.contains(b)
        })
    {
        return None;
    }
    Some(format!("v{}.{tail}", version.to_ascii_lowercase()))
}

fn idna_to_ascii(domain: &str) -> Result<String, Error> {
    let cached = cache::get_or_insert_with(CacheKind::IdnaEncode, domain, || {
        match idna::domain_to_ascii_cow(domain.as_bytes(), idna::AsciiDenyList::EMPTY) {
            Ok(ascii) => ascii.into_owned(),
            Err(_) => PARSE_FAILED.to_owned(),
        }
    });
    if cached == PARSE_FAILED {
        return Err(Error::idna(domain, "IDNA 2008 (UTS 46) processing failed"));
    }
    Ok(cached)
}

/// # Errors
/// Returns [`Error::InvalidHost`] or [`Error::Idna`] when `input` cannot be
/// canonicalized as any recognized host form.
pub fn parse_host(input: &str) -> Result<Host, Error> {
    if input.is_empty() {
        return Ok(Host::None);
    }
    if let Some(inner) = input.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        if let Some(lit) = parse_ipv_future(inner) {
            return Ok(Host::IpvFuture(lit));
        }
        let (addr, zone) = parse_bracketed(inner)?;
        return Ok(Host::Ipv6 { addr, zone });
    }
    if let Some(addr) = parse_ipv4(input) {
        return Ok(Host::Ipv4(addr));
    }
    let ascii = match idna_to_ascii(input) {
        Ok(ascii) => ascii,
        Err(idna_2008_err) => idna_to_ascii_2003_fallback(input).map_err(|_| idna_2008_err)?,
    };
    let lower = ascii.to_ascii_lowercase();
    check_reg_name_chars(&lower)?;
    cache::get_or_insert_with(CacheKind::HostValidate, &lower, || lower.clone());
    Ok(Host::Domain(lower))
}

/// IDNA 2003's `UseSTD3ASCIIRules=false`, non-transitional-incompatible fallback path,
/// used when a name fails strict IDNA 2008 / UTS 46 processing but is nonetheless a
/// plausible legacy IDNA 2003 registration (e.g. names relying on deviation characters
/// like ß or ZWJ that IDNA 2008 treats differently).
fn idna_to_ascii_2003_fallback(domain: &str) -> Result<String, Error> {
    idna::domain_to_ascii(domain).map_err(|e| Error::idna(domain, e.to_string()))
}

/// Decodes an A-label (or plain ASCII) domain back to its Unicode U-label form, for
/// `human_repr`. Never fails: an undecodable input is returned unchanged.
#[must_use]
pub fn domain_to_unicode(domain: &str) -> String {
    cache::get_or_insert_with(CacheKind::IdnaDecode, domain, || {
        idna::domain_to_unicode(domain).0
    })
}
