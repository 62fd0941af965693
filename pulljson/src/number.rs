//! Number-lexeme scanning shared by the text and byte reader backends.
//!
//! Both backends see ASCII-only number lexemes (digits, sign, `.`, `e`/`E`), so the scan and the
//! two parse helpers operate on raw bytes and are shared rather than duplicated per backend.

/// Scans a number lexeme starting at `start`. Returns the end offset (exclusive) and whether the
/// lexeme is a strict integer (no `.`, `e`, or `E`). Returns `None` if no digit follows an
/// optional leading sign.
pub(crate) fn scan_number_lexeme(bytes: &[u8], start: usize) -> Option<(usize, bool)> {
    let mut i = start;
    if matches!(bytes.get(i), Some(b'+' | b'-')) {
        i += 1;
    }
    let digits_start = i;
    while matches!(bytes.get(i), Some(b) if b.is_ascii_digit()) {
        i += 1;
    }
    if i == digits_start {
        return None;
    }
    let mut is_int = true;
    if bytes.get(i) == Some(&b'.') {
        is_int = false;
        i += 1;
        while matches!(bytes.get(i), Some(b) if b.is_ascii_digit()) {
            i += 1;
        }
    }
    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        is_int = false;
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        while matches!(bytes.get(i), Some(b) if b.is_ascii_digit()) {
            i += 1;
        }
    }
    Some((i, is_int))
}

/// Parses a strict-integer lexeme (as identified by [`scan_number_lexeme`]) into an `i64`,
/// tolerating a leading `+` (see the spec's `+`-sign extension). Returns `None` on overflow.
pub(crate) fn parse_int_lexeme(lexeme: &[u8]) -> Option<i64> {
    let (negative, digits) = match lexeme.first() {
        Some(b'-') => (true, &lexeme[1..]),
        Some(b'+') => (false, &lexeme[1..]),
        _ => (false, lexeme),
    };
    let digits = core::str::from_utf8(digits).ok()?;
    let magnitude: u64 = digits.parse().ok()?;
    if negative {
        if magnitude == i64::MAX as u64 + 1 {
            Some(i64::MIN)
        } else {
            i64::try_from(magnitude).ok().map(|v| -v)
        }
    } else {
        i64::try_from(magnitude).ok()
    }
}

/// Parses any number lexeme into an `f64`, tolerating a leading `+`.
pub(crate) fn parse_double_lexeme(lexeme: &[u8]) -> Option<f64> {
    let lexeme = if lexeme.first() == Some(&b'+') {
        &lexeme[1..]
    } else {
        lexeme
    };
    core::str::from_utf8(lexeme).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_plain_integer() {
        assert_eq!(scan_number_lexeme(b"123,", 0), Some((3, true)));
    }

    #[test]
    fn scans_signed_integer() {
        assert_eq!(scan_number_lexeme(b"-123]", 0), Some((4, true)));
        assert_eq!(scan_number_lexeme(b"+123]", 0), Some((4, true)));
    }

    #[test]
    fn scans_fraction_and_exponent() {
        assert_eq!(scan_number_lexeme(b"1.5e-10 ", 0), Some((7, false)));
        assert_eq!(scan_number_lexeme(b"2.5,", 0), Some((3, false)));
        assert_eq!(scan_number_lexeme(b"2e3,", 0), Some((3, false)));
    }

    #[test]
    fn rejects_missing_digits() {
        assert_eq!(scan_number_lexeme(b"-x", 0), None);
        assert_eq!(scan_number_lexeme(b"", 0), None);
    }

    #[test]
    fn parses_signed_ints_including_plus_extension() {
        assert_eq!(parse_int_lexeme(b"123"), Some(123));
        assert_eq!(parse_int_lexeme(b"-123"), Some(-123));
        assert_eq!(parse_int_lexeme(b"+123"), Some(123));
    }

    #[test]
    fn int_overflow_is_none() {
        assert_eq!(parse_int_lexeme(b"99999999999999999999"), None);
        assert_eq!(parse_int_lexeme(b"-9223372036854775808"), Some(i64::MIN));
    }

    #[test]
    fn parses_doubles() {
        assert_eq!(parse_double_lexeme(b"1.5e-10"), Some(1.5e-10));
        assert_eq!(parse_double_lexeme(b"+2.5"), Some(2.5));
    }
}
