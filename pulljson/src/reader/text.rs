//! Text reader backend: a pull reader over a borrowed `&str`.

use crate::candidate::match_candidates;
use crate::charset::is_json_whitespace;
use crate::error::{FormatError, ReadResult};
use crate::number::{parse_double_lexeme, parse_int_lexeme, scan_number_lexeme};
use crate::reader::JsonReader;
use crate::sink::JsonSink;
use crate::value::Number;

/// A pull reader over a borrowed `&'a str`. Zero-copy for strings and keys that contain no
/// escapes; strings containing escapes are decoded into a leaked owned buffer so the reader can
/// still hand back an `&'a str` (see [`StrReader::intern`]).
pub struct StrReader<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> StrReader<'a> {
    /// Creates a reader positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'a str) -> Self {
        StrReader { source, pos: 0 }
    }

    fn bytes(&self) -> &'a [u8] {
        self.source.as_bytes()
    }

    fn skip_ws(&mut self) {
        while matches!(self.bytes().get(self.pos), Some(&b) if is_json_whitespace(b)) {
            self.pos += 1;
        }
    }

    fn peek(&mut self) -> Option<u8> {
        self.skip_ws();
        self.bytes().get(self.pos).copied()
    }

    /// Leaks a decoded string so it genuinely lives for the program's duration, which is the only
    /// way to hand back an `&'a str` for a string this reader had to decode itself (an escape
    /// forces a fresh allocation with no source-owned storage to borrow from). One leak per
    /// escaped string read; strings with no escapes never reach this path since they borrow
    /// `self.source` directly.
    fn intern(&mut self, s: String) -> &'a str {
        Box::leak(s.into_boxed_str())
    }

    fn consume_literal(&mut self, word: &str) -> ReadResult<()> {
        let end = self.pos + word.len();
        if self.bytes().get(self.pos..end) == Some(word.as_bytes()) {
            self.pos = end;
            Ok(())
        } else {
            Err(self.fail(format!("expected literal `{word}`")))
        }
    }

    /// Scans a string body starting right after its opening quote. Returns the decoded slice and
    /// the offset of the closing quote (not consumed).
    fn scan_string_body(&mut self, start: usize) -> ReadResult<(&'a str, usize)> {
        let bytes = self.bytes();
        let mut i = start;
        loop {
            match bytes.get(i) {
                None => return Err(FormatError::new("unterminated string", start)),
                Some(b'"') => return Ok((&self.source[start..i], i)),
                Some(b'\\') => break,
                Some(_) => i += 1,
            }
        }

        let mut buf = String::new();
        buf.push_str(&self.source[start..i]);
        loop {
            match self.bytes().get(i) {
                None => return Err(FormatError::new("unterminated string", start)),
                Some(b'"') => break,
                Some(b'\\') => {
                    i += 1;
                    let esc = *self.bytes().get(i).ok_or_else(|| FormatError::new("unterminated escape", i))?;
                    match esc {
                        b'"' => { buf.push('"'); i += 1; }
                        b'\\' => { buf.push('\\'); i += 1; }
                        b'/' => { buf.push('/'); i += 1; }
                        b'b' => { buf.push('\u{8}'); i += 1; }
                        b'f' => { buf.push('\u{c}'); i += 1; }
                        b'n' => { buf.push('\n'); i += 1; }
                        b'r' => { buf.push('\r'); i += 1; }
                        b't' => { buf.push('\t'); i += 1; }
                        b'u' => {
                            let (code, next_i) = self.parse_hex4(i + 1)?;
                            i = next_i;
                            if (0xD800..=0xDBFF).contains(&code)
                                && self.bytes().get(i) == Some(&b'\\')
                                && self.bytes().get(i + 1) == Some(&b'u')
                            {
                                let (low, next_i2) = self.parse_hex4(i + 2)?;
                                if (0xDC00..=0xDFFF).contains(&low) {
                                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                                    buf.push(char::from_u32(combined).unwrap_or('\u{FFFD}'));
                                    i = next_i2;
                                } else {
                                    buf.push('\u{FFFD}');
                                }
                            } else if (0xD800..=0xDFFF).contains(&code) {
                                buf.push('\u{FFFD}');
                            } else {
                                buf.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
                            }
                        }
                        _ => return Err(FormatError::new("invalid escape sequence", i)),
                    }
                }
                Some(_) => {
                    let ch = self.source[i..].chars().next().expect("valid utf8 at char boundary");
                    buf.push(ch);
                    i += ch.len_utf8();
                }
            }
        }
        let interned = self.intern(buf);
        Ok((interned, i))
    }

    fn parse_hex4(&self, i: usize) -> ReadResult<(u32, usize)> {
        let hex = self.bytes().get(i..i + 4).ok_or_else(|| FormatError::new("truncated \\u escape", i))?;
        let s = core::str::from_utf8(hex).map_err(|_| FormatError::new("invalid \\u escape", i))?;
        let code = u32::from_str_radix(s, 16).map_err(|_| FormatError::new("invalid \\u escape", i))?;
        Ok((code, i + 4))
    }

    fn sink_err(&self, e: crate::sink::SinkError) -> FormatError {
        self.fail(format!("sink rejected event: {e}"))
    }

    fn raw_string_span(&self, start: usize) -> ReadResult<usize> {
        let bytes = self.bytes();
        let mut i = start;
        loop {
            match bytes.get(i) {
                None => return Err(FormatError::new("unterminated string", start)),
                Some(b'"') => return Ok(i),
                Some(b'\\') => i += 2,
                Some(_) => i += 1,
            }
        }
    }
}

impl<'a> JsonReader<'a> for StrReader<'a> {
    type Source = str;

    fn fail(&self, message: impl Into<String>) -> FormatError {
        FormatError::new(message, self.pos)
    }

    fn check_null(&mut self) -> bool {
        self.peek() == Some(b'n')
    }

    fn try_null(&mut self) -> ReadResult<bool> {
        if self.peek() == Some(b'n') {
            self.consume_literal("null")?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_null(&mut self) -> ReadResult<()> {
        if self.try_null()? {
            Ok(())
        } else {
            Err(self.fail("expected null"))
        }
    }

    fn check_bool(&mut self) -> bool {
        matches!(self.peek(), Some(b't' | b'f'))
    }

    fn try_bool(&mut self) -> ReadResult<Option<bool>> {
        match self.peek() {
            Some(b't') => {
                self.consume_literal("true")?;
                Ok(Some(true))
            }
            Some(b'f') => {
                self.consume_literal("false")?;
                Ok(Some(false))
            }
            _ => Ok(None),
        }
    }

    fn expect_bool(&mut self) -> ReadResult<bool> {
        self.try_bool()?.ok_or_else(|| self.fail("expected a boolean"))
    }

    fn check_int(&mut self) -> bool {
        self.skip_ws();
        matches!(scan_number_lexeme(self.bytes(), self.pos), Some((_, true)))
    }

    fn try_int(&mut self) -> ReadResult<Option<i64>> {
        self.skip_ws();
        match scan_number_lexeme(self.bytes(), self.pos) {
            Some((end, true)) => {
                let v = parse_int_lexeme(&self.bytes()[self.pos..end])
                    .ok_or_else(|| FormatError::new("integer literal out of range", self.pos))?;
                self.pos = end;
                Ok(Some(v))
            }
            _ => Ok(None),
        }
    }

    fn expect_int(&mut self) -> ReadResult<i64> {
        self.try_int()?.ok_or_else(|| self.fail("expected an integer"))
    }

    fn check_double(&mut self) -> bool {
        self.skip_ws();
        scan_number_lexeme(self.bytes(), self.pos).is_some()
    }

    fn try_double(&mut self) -> ReadResult<Option<f64>> {
        self.skip_ws();
        match scan_number_lexeme(self.bytes(), self.pos) {
            Some((end, _)) => {
                let v = parse_double_lexeme(&self.bytes()[self.pos..end])
                    .ok_or_else(|| FormatError::new("invalid number literal", self.pos))?;
                self.pos = end;
                Ok(Some(v))
            }
            None => Ok(None),
        }
    }

    fn expect_double(&mut self) -> ReadResult<f64> {
        self.try_double()?.ok_or_else(|| self.fail("expected a number"))
    }

    fn check_num(&mut self) -> bool {
        self.check_double()
    }

    fn try_num(&mut self) -> ReadResult<Option<Number>> {
        self.skip_ws();
        match scan_number_lexeme(self.bytes(), self.pos) {
            Some((end, is_int)) => {
                let lexeme = &self.bytes()[self.pos..end];
                let num = if is_int {
                    Number::Int(
                        parse_int_lexeme(lexeme)
                            .ok_or_else(|| FormatError::new("integer literal out of range", self.pos))?,
                    )
                } else {
                    Number::Double(
                        parse_double_lexeme(lexeme)
                            .ok_or_else(|| FormatError::new("invalid number literal", self.pos))?,
                    )
                };
                self.pos = end;
                Ok(Some(num))
            }
            None => Ok(None),
        }
    }

    fn expect_num(&mut self) -> ReadResult<Number> {
        self.try_num()?.ok_or_else(|| self.fail("expected a number"))
    }

    fn check_string(&mut self) -> bool {
        self.peek() == Some(b'"')
    }

    fn try_string(&mut self) -> ReadResult<Option<&'a str>> {
        if self.peek() != Some(b'"') {
            return Ok(None);
        }
        let (s, end) = self.scan_string_body(self.pos + 1)?;
        self.pos = end + 1;
        Ok(Some(s))
    }

    fn expect_string(&mut self) -> ReadResult<&'a str> {
        self.try_string()?.ok_or_else(|| self.fail("expected a string"))
    }

    fn check_array(&mut self) -> bool {
        self.peek() == Some(b'[')
    }

    fn try_array(&mut self) -> ReadResult<bool> {
        if self.check_array() {
            self.pos += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_array(&mut self) -> ReadResult<()> {
        if self.try_array()? {
            Ok(())
        } else {
            Err(self.fail("expected an array"))
        }
    }

    fn check_object(&mut self) -> bool {
        self.peek() == Some(b'{')
    }

    fn try_object(&mut self) -> ReadResult<bool> {
        if self.check_object() {
            self.pos += 1;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect_object(&mut self) -> ReadResult<()> {
        if self.try_object()? {
            Ok(())
        } else {
            Err(self.fail("expected an object"))
        }
    }

    fn has_next(&mut self) -> ReadResult<bool> {
        match self.peek() {
            Some(b']') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b',') => {
                self.pos += 1;
                self.skip_ws();
                Ok(true)
            }
            Some(_) => Ok(true),
            None => Err(self.fail("unterminated array")),
        }
    }

    fn next_key(&mut self) -> ReadResult<Option<&'a str>> {
        match self.peek() {
            Some(b'}') => {
                self.pos += 1;
                return Ok(None);
            }
            Some(b',') => {
                self.pos += 1;
                self.skip_ws();
            }
            _ => {}
        }
        if self.bytes().get(self.pos) != Some(&b'"') {
            return Err(self.fail("expected an object key"));
        }
        let (key, end) = self.scan_string_body(self.pos + 1)?;
        self.pos = end + 1;
        self.skip_ws();
        if self.bytes().get(self.pos) != Some(&b':') {
            return Err(self.fail("expected ':' after object key"));
        }
        self.pos += 1;
        self.skip_ws();
        Ok(Some(key))
    }

    fn has_next_key(&mut self) -> ReadResult<Option<&'a str>> {
        match self.peek() {
            Some(b'}') => {
                self.pos += 1;
                return Ok(None);
            }
            Some(b',') => {
                self.pos += 1;
                self.skip_ws();
            }
            _ => {}
        }
        if self.bytes().get(self.pos) != Some(&b'"') {
            return Err(self.fail("expected an object key"));
        }
        let (key, _end) = self.scan_string_body(self.pos + 1)?;
        Ok(Some(key))
    }

    fn next_key_source(&mut self) -> ReadResult<Option<&'a str>> {
        self.skip_ws();
        match self.bytes().get(self.pos).copied() {
            Some(b'}') => {
                self.pos += 1;
                return Ok(None);
            }
            Some(b',') => {
                self.pos += 1;
                self.skip_ws();
            }
            _ => {}
        }
        if self.bytes().get(self.pos) != Some(&b'"') {
            return Err(self.fail("expected an object key"));
        }
        let quote_start = self.pos;
        let end = self.raw_string_span(self.pos + 1)?;
        self.pos = end + 1;
        self.skip_ws();
        if self.bytes().get(self.pos) != Some(&b':') {
            return Err(self.fail("expected ':' after object key"));
        }
        self.pos += 1;
        self.skip_ws();
        Ok(Some(&self.source[quote_start..=end]))
    }

    fn try_key<'c>(&mut self, candidates: &[&'c str]) -> ReadResult<Option<&'c str>> {
        self.try_key_index(candidates).map(|opt| opt.map(|i| candidates[i]))
    }

    fn try_key_index(&mut self, candidates: &[&str]) -> ReadResult<Option<usize>> {
        self.skip_ws();
        // Peek past an optional leading comma (left over from the previous entry) without
        // committing to it: only a genuine match advances `self.pos`, so a miss leaves the
        // cursor exactly where `next_key`/`skip_object_entry` expect to find it.
        let mut key_start = self.pos;
        if self.bytes().get(key_start) == Some(&b',') {
            key_start += 1;
            while matches!(self.bytes().get(key_start), Some(&b) if is_json_whitespace(b)) {
                key_start += 1;
            }
        }
        if self.bytes().get(key_start) != Some(&b'"') {
            return Ok(None);
        }
        match match_candidates(self.bytes(), key_start + 1, candidates) {
            None => Ok(None),
            Some((idx, end)) => {
                let mut i = end + 1;
                while matches!(self.bytes().get(i), Some(&b) if is_json_whitespace(b)) {
                    i += 1;
                }
                if self.bytes().get(i) != Some(&b':') {
                    return Err(FormatError::new("expected ':' after object key", i));
                }
                i += 1;
                while matches!(self.bytes().get(i), Some(&b) if is_json_whitespace(b)) {
                    i += 1;
                }
                self.pos = i;
                Ok(Some(idx))
            }
        }
    }

    fn try_string_matching<'c>(&mut self, candidates: &[&'c str]) -> ReadResult<Option<&'c str>> {
        self.try_string_matching_index(candidates).map(|opt| opt.map(|i| candidates[i]))
    }

    fn expect_string_matching<'c>(&mut self, candidates: &[&'c str]) -> ReadResult<&'c str> {
        self.try_string_matching(candidates)?.ok_or_else(|| self.fail("expected a matching string"))
    }

    fn try_string_matching_index(&mut self, candidates: &[&str]) -> ReadResult<Option<usize>> {
        self.skip_ws();
        if self.bytes().get(self.pos) != Some(&b'"') {
            return Ok(None);
        }
        match match_candidates(self.bytes(), self.pos + 1, candidates) {
            None => Ok(None),
            Some((idx, end)) => {
                self.pos = end + 1;
                Ok(Some(idx))
            }
        }
    }

    fn expect_string_matching_index(&mut self, candidates: &[&str]) -> ReadResult<usize> {
        self.try_string_matching_index(candidates)?.ok_or_else(|| self.fail("expected a matching string"))
    }

    fn skip_object_entry(&mut self) -> ReadResult<bool> {
        match self.next_key()? {
            None => Ok(false),
            Some(_) => {
                self.skip_any_value()?;
                Ok(true)
            }
        }
    }

    fn end_array(&mut self) -> ReadResult<()> {
        while self.has_next()? {
            self.skip_any_value()?;
        }
        Ok(())
    }

    fn end_object(&mut self) -> ReadResult<()> {
        while self.skip_object_entry()? {}
        Ok(())
    }

    fn skip_any_value(&mut self) -> ReadResult<()> {
        match self.peek() {
            Some(b'"') => {
                let (_, end) = self.scan_string_body(self.pos + 1)?;
                self.pos = end + 1;
                Ok(())
            }
            Some(b'{') => {
                self.pos += 1;
                self.end_object()
            }
            Some(b'[') => {
                self.pos += 1;
                self.end_array()
            }
            Some(b't') => self.consume_literal("true"),
            Some(b'f') => self.consume_literal("false"),
            Some(b'n') => self.consume_literal("null"),
            Some(b'-' | b'+' | b'0'..=b'9') => {
                let (end, _) = scan_number_lexeme(self.bytes(), self.pos)
                    .ok_or_else(|| FormatError::new("invalid number literal", self.pos))?;
                self.pos = end;
                Ok(())
            }
            _ => Err(self.fail("expected a value")),
        }
    }

    fn expect_any_value(&mut self, sink: &mut dyn JsonSink) -> ReadResult<()> {
        match self.peek() {
            Some(b'"') => {
                let s = self.expect_string()?;
                sink.add_string(s).map_err(|e| self.sink_err(e))
            }
            Some(b'{') => {
                self.expect_object()?;
                sink.start_object().map_err(|e| self.sink_err(e))?;
                while let Some(key) = self.next_key()? {
                    sink.add_key(key).map_err(|e| self.sink_err(e))?;
                    self.expect_any_value(sink)?;
                }
                sink.end_object().map_err(|e| self.sink_err(e))
            }
            Some(b'[') => {
                self.expect_array()?;
                sink.start_array().map_err(|e| self.sink_err(e))?;
                while self.has_next()? {
                    self.expect_any_value(sink)?;
                }
                sink.end_array().map_err(|e| self.sink_err(e))
            }
            Some(b't' | b'f') => {
                let b = self.expect_bool()?;
                sink.add_bool(b).map_err(|e| self.sink_err(e))
            }
            Some(b'n') => {
                self.expect_null()?;
                sink.add_null().map_err(|e| self.sink_err(e))
            }
            Some(b'-' | b'+' | b'0'..=b'9') => {
                let n = self.expect_num()?;
                sink.add_number(n).map_err(|e| self.sink_err(e))
            }
            _ => Err(self.fail("expected a value")),
        }
    }

    fn expect_any_value_source(&mut self) -> ReadResult<&'a str> {
        self.skip_ws();
        let start = self.pos;
        self.skip_any_value()?;
        Ok(&self.source[start..self.pos])
    }

    fn copy(&self) -> Self {
        StrReader { source: self.source, pos: self.pos }
    }

    fn at_eof(&mut self) -> bool {
        self.skip_ws();
        self.pos >= self.source.len()
    }
}
