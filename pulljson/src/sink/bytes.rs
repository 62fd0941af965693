//! Byte-oriented writer backend: writes JSON into any [`std::io::Write`] target in a chosen
//! output encoding.

use std::io::Write as IoWrite;

use crate::sink::{JsonSink, SinkError, SinkResult, SourceSlice};
use crate::value::Number;

/// The output encoding a [`ByteWriter`] targets. Controls which code points may be written
/// literally and which must fall back to a `\uXXXX` escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Only 0x00..=0x7F may be written literally.
    Ascii,
    /// Only 0x00..=0xFF may be written literally, one byte per code point.
    Latin1,
    /// Any code point may be written literally, UTF-8 encoded.
    Utf8,
}

impl Encoding {
    fn limit(self) -> u32 {
        match self {
            Encoding::Ascii => 0x7F,
            Encoding::Latin1 => 0xFF,
            Encoding::Utf8 => 0x10_FFFF,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Sep {
    Comma,
    Colon,
}

/// Writes JSON bytes into any [`std::io::Write`] target, in a chosen [`Encoding`]. Always
/// compact (no pretty-printing option, since byte-oriented consumers are rarely humans).
pub struct ByteWriter<W> {
    out: W,
    encoding: Encoding,
    pending: Option<Sep>,
    depth: usize,
}

impl<W: IoWrite> ByteWriter<W> {
    /// Creates a writer targeting `encoding`.
    pub fn new(out: W, encoding: Encoding) -> Self {
        ByteWriter { out, encoding, pending: None, depth: 0 }
    }

    /// Consumes the writer, returning the underlying target.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn before_token(&mut self) -> SinkResult<()> {
        match self.pending.take() {
            None => {}
            Some(Sep::Comma) => self.out.write_all(b",")?,
            Some(Sep::Colon) => self.out.write_all(b":")?,
        }
        Ok(())
    }

    fn after_value(&mut self) {
        self.pending = if self.depth == 0 { None } else { Some(Sep::Comma) };
    }

    fn write_quoted(&mut self, s: &str) -> SinkResult<()> {
        write_escaped_bytes(&mut self.out, s, self.encoding)
    }
}

impl<W: IoWrite> JsonSink for ByteWriter<W> {
    fn add_null(&mut self) -> SinkResult<()> {
        self.before_token()?;
        self.out.write_all(b"null")?;
        self.after_value();
        Ok(())
    }

    fn add_bool(&mut self, value: bool) -> SinkResult<()> {
        self.before_token()?;
        self.out.write_all(if value { b"true" } else { b"false" })?;
        self.after_value();
        Ok(())
    }

    fn add_number(&mut self, value: Number) -> SinkResult<()> {
        self.before_token()?;
        write!(self.out, "{value}")?;
        self.after_value();
        Ok(())
    }

    fn add_string(&mut self, value: &str) -> SinkResult<()> {
        self.before_token()?;
        self.write_quoted(value)?;
        self.after_value();
        Ok(())
    }

    fn start_array(&mut self) -> SinkResult<()> {
        self.before_token()?;
        self.out.write_all(b"[")?;
        self.depth += 1;
        self.pending = None;
        Ok(())
    }

    fn end_array(&mut self) -> SinkResult<()> {
        self.depth -= 1;
        self.out.write_all(b"]")?;
        self.after_value();
        Ok(())
    }

    fn start_object(&mut self) -> SinkResult<()> {
        self.before_token()?;
        self.out.write_all(b"{")?;
        self.depth += 1;
        self.pending = None;
        Ok(())
    }

    fn add_key(&mut self, key: &str) -> SinkResult<()> {
        self.before_token()?;
        self.write_quoted(key)?;
        self.pending = Some(Sep::Colon);
        Ok(())
    }

    fn end_object(&mut self) -> SinkResult<()> {
        self.depth -= 1;
        self.out.write_all(b"}")?;
        self.after_value();
        Ok(())
    }

    fn add_source_value(&mut self, raw: SourceSlice<'_>) -> SinkResult<()> {
        let SourceSlice::Bytes(bytes) = raw else {
            return Err(SinkError::Unsupported("add_source_value (expected Bytes)"));
        };
        self.before_token()?;
        self.out.write_all(bytes)?;
        self.after_value();
        Ok(())
    }
}

/// Encodes `s` as a quoted JSON string body into `out`, escaping control characters, `"`, `\`,
/// and any code point above `encoding`'s literal range as `\uXXXX`; code points within range are
/// written in `encoding`'s native byte form.
pub(crate) fn write_escaped_bytes(out: &mut impl IoWrite, s: &str, encoding: Encoding) -> SinkResult<()> {
    out.write_all(b"\"")?;
    let limit = encoding.limit();
    for ch in s.chars() {
        let code = ch as u32;
        if code < 0x20 || ch == '"' || ch == '\\' {
            match ch {
                '\u{8}' => out.write_all(b"\\b")?,
                '\t' => out.write_all(b"\\t")?,
                '\n' => out.write_all(b"\\n")?,
                '\u{c}' => out.write_all(b"\\f")?,
                '\r' => out.write_all(b"\\r")?,
                '"' => out.write_all(b"\\\"")?,
                '\\' => out.write_all(b"\\\\")?,
                _ => write!(out, "\\u{code:04x}")?,
            }
            continue;
        }
        if code > limit {
            if code > 0xFFFF {
                let adj = code - 0x1_0000;
                let high = 0xD800 + (adj >> 10);
                let low = 0xDC00 + (adj & 0x3FF);
                write!(out, "\\u{high:04x}\\u{low:04x}")?;
            } else {
                write!(out, "\\u{code:04x}")?;
            }
            continue;
        }
        match encoding {
            Encoding::Ascii | Encoding::Latin1 => out.write_all(&[code as u8])?,
            Encoding::Utf8 => {
                let mut buf = [0u8; 4];
                out.write_all(ch.encode_utf8(&mut buf).as_bytes())?;
            }
        }
    }
    out.write_all(b"\"")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(encoding: Encoding, build: impl FnOnce(&mut ByteWriter<Vec<u8>>) -> SinkResult<()>) -> Vec<u8> {
        let mut w = ByteWriter::new(Vec::new(), encoding);
        build(&mut w).unwrap();
        w.into_inner()
    }

    #[test]
    fn utf8_round_trips_literal_bytes() {
        let out = write(Encoding::Utf8, |w| w.add_string("café"));
        assert_eq!(out, "\"café\"".as_bytes());
    }

    #[test]
    fn ascii_escapes_anything_above_0x7f() {
        let out = write(Encoding::Ascii, |w| w.add_string("café"));
        assert_eq!(out, b"\"caf\\u00e9\"");
    }

    #[test]
    fn latin1_allows_0x80_to_0xff_literal() {
        let out = write(Encoding::Latin1, |w| w.add_string("é"));
        assert_eq!(out, &[b'"', 0xE9, b'"']);
    }

    #[test]
    fn latin1_still_escapes_above_0xff() {
        let out = write(Encoding::Latin1, |w| w.add_string("\u{1f600}"));
        assert_eq!(out, b"\"\\ud83d\\ude00\"");
    }

    #[test]
    fn object_and_array_shape() {
        let out = write(Encoding::Utf8, |w| {
            w.start_object()?;
            w.add_key("a")?;
            w.start_array()?;
            w.add_number(Number::Int(1))?;
            w.add_null()?;
            w.end_array()?;
            w.end_object()
        });
        assert_eq!(out, br#"{"a":[1,null]}"#);
    }

    #[test]
    fn add_source_value_rejects_str_variant() {
        let mut w = ByteWriter::new(Vec::new(), Encoding::Utf8);
        let err = w.add_source_value(SourceSlice::Str("123")).unwrap_err();
        assert!(matches!(err, SinkError::Unsupported(_)));
    }
}
