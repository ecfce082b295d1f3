//! The percent-encoding quoter: turns an arbitrary Unicode string into a canonical,
//! ASCII, percent-encoded string, per a configurable safe/protected/query-string profile.
//!
//! See `crate::unquoter` for the inverse operation.

use crate::error::Error;
use crate::tables::{AsciiSet, UNRESERVED_PLUS_QS, UNRESERVED_PLUS_SUB_DELIMS_NO_QS};
use std::borrow::Cow;

/// # Panics
/// Panics when `b` is not in `0..=15`.
#[must_use]
pub fn upper_hex_char(b: u8) -> char {
    const TABLE: [char; 16] = [
        '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
    ];
    assert!(b < 16, "cannot convert number to hex: {b}");
    TABLE[b as usize]
}

#[must_use]
pub fn from_hex_digit(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'a'..='f' => Some(10 + c as u8 - b'a'),
        'A'..='F' => Some(10 + c as u8 - b'A'),
        _ => None,
    }
}

#[must_use]
fn is_canonical_upper_hex(c: char) -> bool {
    matches!(c, '0'..='9' | 'A'..='F')
}

fn push_percent_hex(out: &mut String, b: u8) {
    out.push('%');
    out.push(upper_hex_char(b >> 4));
    out.push(upper_hex_char(b & 0xf));
}

/// A configured percent-encoding profile.
///
/// Built once and reused across many [`Quoter::quote`] calls; construction validates
/// that `safe` and `protected` are ASCII-only (RFC 3986 quoting is defined over bytes,
/// not code points, for the characters a caller is allowed to mark safe).
#[derive(Clone, Debug)]
pub struct Quoter {
    safe: AsciiSet,
    protected: AsciiSet,
    qs: bool,
}

impl Quoter {
    /// Builds a quoter that extends [`UNRESERVED_PLUS_SUB_DELIMS_NO_QS`] (or, when
    /// `qs` is set, [`UNRESERVED_PLUS_QS`]) with `safe` and `protected`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] when `safe` or `protected` contains a
    /// non-ASCII character.
    pub fn new(safe: &str, protected: &str, qs: bool) -> Result<Self, Error> {
        let base = if qs {
            UNRESERVED_PLUS_QS
        } else {
            UNRESERVED_PLUS_SUB_DELIMS_NO_QS
        };
        let extra_safe = AsciiSet::try_from_str(safe).map_err(|c| {
            Error::invalid_argument("safe", format!("non-ASCII character {c:?} in `safe`"))
        })?;
        let protected = AsciiSet::try_from_str(protected).map_err(|c| {
            Error::invalid_argument(
                "protected",
                format!("non-ASCII character {c:?} in `protected`"),
            )
        })?;
        Ok(Self {
            safe: base.union(extra_safe),
            protected,
            qs,
        })
    }

    /// The quoter used for `http(s)` paths: unreserved, sub-delims (minus qs-only
    /// chars), plus `/` and `:` and `@`, which are structural inside a path.
    #[must_use]
    pub fn path() -> Self {
        Self::new("/:@", "", false).unwrap()
    }

    /// The quoter used for query strings (`qs=true`): space encodes as `+`.
    #[must_use]
    pub fn query_string() -> Self {
        Self::new("/:@?", "", true).unwrap()
    }

    /// The quoter used for query keys/values themselves (no structural chars safe).
    #[must_use]
    pub fn query_part() -> Self {
        Self::new("", "", true).unwrap()
    }

    /// The quoter used for `user`/`password`.
    #[must_use]
    pub fn user_info() -> Self {
        Self::new("", "", false).unwrap()
    }

    /// The quoter used for `fragment`.
    #[must_use]
    pub fn fragment() -> Self {
        Self::new("/:@?", "", false).unwrap()
    }

    #[must_use]
    pub fn qs(&self) -> bool {
        self.qs
    }

    /// Converts `input` into a canonical, ASCII, percent-encoded string.
    ///
    /// Already-percent-encoded runs in `input` are requoted, not double-encoded: a
    /// `%HH` triplet whose decoded byte is safe is unescaped; one that must stay
    /// escaped is re-emitted with canonical uppercase hex; a `%` not followed by two
    /// hex digits is treated as a literal percent and escaped as `%25`, after which
    /// scanning resumes in the normal state at the very next code point.
    ///
    /// Returns a borrowed `Cow` when `input` is already canonical, avoiding an
    /// allocation on the common "already quoted" path.
    #[must_use]
    pub fn quote<'a>(&self, input: &'a str) -> Cow<'a, str> {
        let chars: Vec<char> = input.chars().collect();
        let mut out = String::with_capacity(input.len());
        let mut changed = false;
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == '%' {
                if i + 2 < chars.len() {
                    if let (Some(d1), Some(d0)) =
                        (from_hex_digit(chars[i + 1]), from_hex_digit(chars[i + 2]))
                    {
                        let b = (d1 << 4) | d0;
                        let canonical_already = is_canonical_upper_hex(chars[i + 1])
                            && is_canonical_upper_hex(chars[i + 2]);
                        if b < 128 && self.protected.contains(b) {
                            push_percent_hex(&mut out, b);
                            changed |= !canonical_already;
                        } else if b < 128 && self.safe.contains(b) {
                            out.push(b as char);
                            changed = true;
                        } else {
                            push_percent_hex(&mut out, b);
                            changed |= !canonical_already;
                        }
                        i += 3;
                        continue;
                    }
                }
                out.push_str("%25");
                changed = true;
                i += 1;
                continue;
            }
            if self.qs && c == ' ' {
                out.push('+');
                changed = true;
                i += 1;
                continue;
            }
            if c.is_ascii() && self.safe.contains(c as u8) {
                out.push(c);
                i += 1;
                continue;
            }
            // `char` can never hold a lone surrogate or an out-of-range scalar value,
            // so the "skip surrogate/over-range code point" rule is enforced by the
            // type system here rather than by an explicit check.
            let mut buf = [0u8; 4];
            for b in c.encode_utf8(&mut buf).as_bytes() {
                push_percent_hex(&mut out, *b);
            }
            changed = true;
            i += 1;
        }
        if changed {
            Cow::Owned(out)
        } else {
            Cow::Borrowed(input)
        }
    }
}
