/// Convert a byte slice into a string.
/// Includes printable ASCII characters as-is.
/// Converts non-printable or non-ASCII characters to strings like "\n" and "\x19".
///
/// Uses
/// [`core::ascii::escape_default`](https://doc.rust-lang.org/core/ascii/fn.escape_default.html)
/// internally to escape each byte.
///
/// This function is useful for printing byte slices in error messages and comparing
/// byte slices in tests.
#[must_use]
#[allow(clippy::missing_panics_doc)]
pub fn escape_ascii(input: &[u8]) -> String {
    let mut result = String::new();
    for byte in input {
        for ascii_byte in core::ascii::escape_default(*byte) {
            result.push_str(core::str::from_utf8(&[ascii_byte]).unwrap());
        }
    }
    result
}

#[must_use]
#[allow(clippy::missing_panics_doc)]
pub fn escape_and_elide(input: &[u8], max_len: usize) -> String {
    if input.len() > max_len {
        escape_ascii(&input[..max_len]) + "..."
    } else {
        escape_ascii(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_ascii_test() {
        assert_eq!("abc", escape_ascii(b"abc"));
        assert_eq!("abc\\n", escape_ascii(b"abc\n"));
        assert_eq!(
            "Euro sign: \\xe2\\x82\\xac",
            escape_ascii("Euro sign: \u{20AC}".as_bytes())
        );
        assert_eq!("\\x01\\x02\\x03", escape_ascii(&[1, 2, 3]));
    }

    #[test]
    fn escape_and_elide_test() {
        assert_eq!("abc", escape_and_elide(b"abc", 10));
        assert_eq!("abc...", escape_and_elide(b"abcdef", 3));
    }
}
