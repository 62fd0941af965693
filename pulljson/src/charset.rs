//! Shared lexing helpers: whitespace classification and UTF-8 decoding.
//!
//! Grounded on the continuation-byte and overlong-encoding checks `rjiter` performs while
//! scanning, generalized here into a full decoder since this crate's byte backend (unlike
//! `rjiter`) must decode whole code points itself rather than delegate to `jiter`.

/// The four whitespace code points recognized between tokens: tab, newline, carriage return, space.
#[inline]
#[must_use]
pub fn is_json_whitespace(b: u8) -> bool {
    matches!(b, 0x09 | 0x0A | 0x0D | 0x20)
}

/// Decodes one UTF-8 code point starting at `bytes[pos]`.
///
/// Returns the decoded `char` and the number of bytes consumed. Validates continuation bytes,
/// rejects overlong encodings, and rejects values outside the Unicode range or inside the
/// surrogate range (which UTF-8 must never encode).
pub(crate) fn decode_utf8_char(bytes: &[u8], pos: usize) -> Option<(char, usize)> {
    let first = *bytes.get(pos)?;
    let (len, mut value, min_value) = if first < 0x80 {
        return Some((first as char, 1));
    } else if first & 0b1110_0000 == 0b1100_0000 {
        (2, u32::from(first & 0b0001_1111), 0x80)
    } else if first & 0b1111_0000 == 0b1110_0000 {
        (3, u32::from(first & 0b0000_1111), 0x800)
    } else if first & 0b1111_1000 == 0b1111_0000 {
        (4, u32::from(first & 0b0000_0111), 0x1_0000)
    } else {
        return None;
    };

    for i in 1..len {
        let cont = *bytes.get(pos + i)?;
        if cont & 0b1100_0000 != 0b1000_0000 {
            return None;
        }
        value = (value << 6) | u32::from(cont & 0b0011_1111);
    }

    if value < min_value || value > 0x10_FFFF || (0xD800..=0xDFFF).contains(&value) {
        return None;
    }

    char::from_u32(value).map(|c| (c, len))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_set_is_exactly_four_chars() {
        for b in 0u8..=255 {
            let expected = matches!(b, 0x09 | 0x0A | 0x0D | 0x20);
            assert_eq!(is_json_whitespace(b), expected, "byte {b:#x}");
        }
    }

    #[test]
    fn decodes_ascii() {
        assert_eq!(decode_utf8_char(b"a", 0), Some(('a', 1)));
    }

    #[test]
    fn decodes_two_three_four_byte_sequences() {
        let euro = "€".as_bytes(); // 3-byte
        assert_eq!(decode_utf8_char(euro, 0), Some(('€', 3)));
        let pound = "£".as_bytes(); // 2-byte
        assert_eq!(decode_utf8_char(pound, 0), Some(('£', 2)));
        let emoji = "😀".as_bytes(); // 4-byte
        assert_eq!(decode_utf8_char(emoji, 0), Some(('😀', 4)));
    }

    #[test]
    fn rejects_overlong_and_surrogate_and_truncated() {
        assert_eq!(decode_utf8_char(&[0xC0, 0x80], 0), None); // overlong NUL
        assert_eq!(decode_utf8_char(&[0xED, 0xA0, 0x80], 0), None); // surrogate
        assert_eq!(decode_utf8_char(&[0xE2, 0x82], 0), None); // truncated
    }
}
