//! Compact and pretty string writer backends.

use core::fmt::Write as FmtWrite;

use crate::sink::{JsonSink, SinkError, SinkResult, SourceSlice};
use crate::value::Number;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Sep {
    Comma,
    Colon,
}

/// Writes JSON text into any [`core::fmt::Write`] target (a `String`, a `std::fmt::Formatter`,
/// or any other buffer). Constructed compact via [`StringWriter::compact`] or pretty via
/// [`StringWriter::pretty`].
pub struct StringWriter<W> {
    out: W,
    indent: Option<String>,
    ascii_only: bool,
    pending: Option<Sep>,
    depth: usize,
    frame_has_value: Vec<bool>,
}

impl<W: FmtWrite> StringWriter<W> {
    /// A writer that emits minimal JSON: no whitespace between tokens.
    pub fn compact(out: W) -> Self {
        StringWriter {
            out,
            indent: None,
            ascii_only: false,
            pending: None,
            depth: 0,
            frame_has_value: Vec::new(),
        }
    }

    /// A writer that inserts `\n` + N×`indent` before each composite child and `": "` after keys.
    pub fn pretty(out: W, indent: impl Into<String>) -> Self {
        StringWriter {
            out,
            indent: Some(indent.into()),
            ascii_only: false,
            pending: None,
            depth: 0,
            frame_has_value: Vec::new(),
        }
    }

    /// Escapes every code point above ASCII (0x7F) as `\uXXXX` instead of emitting it literally.
    #[must_use]
    pub fn ascii_only(mut self, ascii_only: bool) -> Self {
        self.ascii_only = ascii_only;
        self
    }

    /// Consumes the writer, returning the underlying target.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn encode_limit(&self) -> u32 {
        if self.ascii_only {
            0x7F
        } else {
            0x10_FFFF
        }
    }

    fn write_newline_indent(&mut self) -> SinkResult<()> {
        if let Some(indent) = &self.indent {
            self.out.write_char('\n')?;
            for _ in 0..self.depth {
                self.out.write_str(indent)?;
            }
        }
        Ok(())
    }

    fn before_token(&mut self) -> SinkResult<()> {
        match self.pending.take() {
            None => {
                if self.depth > 0 {
                    self.write_newline_indent()?;
                }
            }
            Some(Sep::Comma) => {
                self.out.write_char(',')?;
                self.write_newline_indent()?;
            }
            Some(Sep::Colon) => {
                self.out.write_char(':')?;
                if self.indent.is_some() {
                    self.out.write_char(' ')?;
                }
            }
        }
        if let Some(top) = self.frame_has_value.last_mut() {
            *top = true;
        }
        Ok(())
    }

    fn after_value(&mut self) {
        self.pending = if self.depth == 0 { None } else { Some(Sep::Comma) };
    }

    fn write_quoted(&mut self, s: &str) -> SinkResult<()> {
        let limit = self.encode_limit();
        write_escaped_str(&mut self.out, s, limit)
    }
}

impl<W: FmtWrite> JsonSink for StringWriter<W> {
    fn add_null(&mut self) -> SinkResult<()> {
        self.before_token()?;
        self.out.write_str("null")?;
        self.after_value();
        Ok(())
    }

    fn add_bool(&mut self, value: bool) -> SinkResult<()> {
        self.before_token()?;
        self.out.write_str(if value { "true" } else { "false" })?;
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
        self.out.write_char('[')?;
        self.depth += 1;
        self.frame_has_value.push(false);
        self.pending = None;
        Ok(())
    }

    fn end_array(&mut self) -> SinkResult<()> {
        let had_value = self.frame_has_value.pop().unwrap_or(false);
        self.depth -= 1;
        if had_value {
            self.write_newline_indent()?;
        }
        self.out.write_char(']')?;
        self.after_value();
        Ok(())
    }

    fn start_object(&mut self) -> SinkResult<()> {
        self.before_token()?;
        self.out.write_char('{')?;
        self.depth += 1;
        self.frame_has_value.push(false);
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
        let had_value = self.frame_has_value.pop().unwrap_or(false);
        self.depth -= 1;
        if had_value {
            self.write_newline_indent()?;
        }
        self.out.write_char('}')?;
        self.after_value();
        Ok(())
    }

    fn add_source_value(&mut self, raw: SourceSlice<'_>) -> SinkResult<()> {
        let SourceSlice::Str(s) = raw else {
            return Err(SinkError::Unsupported("add_source_value (expected Str)"));
        };
        self.before_token()?;
        self.out.write_str(s)?;
        self.after_value();
        Ok(())
    }
}

/// Escapes `s` as a JSON string body (including the surrounding quotes) into `out`, escaping
/// control characters, `"`, `\`, and any code point at or above `encode_limit` as `\uXXXX`.
pub(crate) fn write_escaped_str(out: &mut impl FmtWrite, s: &str, encode_limit: u32) -> SinkResult<()> {
    out.write_char('"')?;
    let mut literal_start = 0usize;
    for (idx, ch) in s.char_indices() {
        let needs_escape = (ch as u32) < 0x20 || ch == '"' || ch == '\\' || (ch as u32) > encode_limit;
        if !needs_escape {
            continue;
        }
        out.write_str(&s[literal_start..idx])?;
        match ch {
            '\u{8}' => out.write_str("\\b")?,
            '\t' => out.write_str("\\t")?,
            '\n' => out.write_str("\\n")?,
            '\u{c}' => out.write_str("\\f")?,
            '\r' => out.write_str("\\r")?,
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            _ => {
                let code = ch as u32;
                if code > 0xFFFF {
                    let code = code - 0x1_0000;
                    let high = 0xD800 + (code >> 10);
                    let low = 0xDC00 + (code & 0x3FF);
                    write!(out, "\\u{high:04x}\\u{low:04x}")?;
                } else {
                    write!(out, "\\u{code:04x}")?;
                }
            }
        }
        literal_start = idx + ch.len_utf8();
    }
    out.write_str(&s[literal_start..])?;
    out.write_char('"')?;
    Ok(())
}

impl From<core::fmt::Error> for SinkError {
    fn from(_: core::fmt::Error) -> Self {
        SinkError::Io(std::io::Error::other("formatter write failed"))
    }
}
