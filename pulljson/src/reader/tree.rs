//! Tree reader backend: a pull reader over an already-parsed [`Value`].
//!
//! Unlike the text and byte backends there is no lexing to do; `check_x`/`try_x` just pattern
//! match on the staged "next" value. A `None` "next" sentinel marks the position right after a
//! primitive was consumed or a composite was skipped without being entered — the caller must call
//! `has_next`/`next_key` to stage whatever comes next inside the composite currently entered.

use crate::candidate::match_exact;
use crate::error::{FormatError, ReadResult};
use crate::reader::JsonReader;
use crate::sink::JsonSink;
use crate::value::{Number, Value};

#[derive(Clone, Copy)]
enum Frame<'a> {
    Array { items: &'a [Value], index: usize },
    Object { map: &'a indexmap::IndexMap<String, Value>, index: usize },
}

/// A pull reader over a borrowed `&'a Value`.
pub struct ValueReader<'a> {
    next: Option<&'a Value>,
    stack: Vec<Frame<'a>>,
    /// Monotonically increasing consumption count, used as the `FormatError` offset surrogate
    /// (there is no byte position to report over an already-parsed tree).
    step: usize,
}

impl<'a> ValueReader<'a> {
    /// Creates a reader staged at `value`.
    #[must_use]
    pub fn new(value: &'a Value) -> Self {
        ValueReader { next: Some(value), stack: Vec::new(), step: 0 }
    }

    fn sink_err(&self, e: crate::sink::SinkError) -> FormatError {
        self.fail(format!("sink rejected event: {e}"))
    }

    fn take_next(&mut self) -> Option<&'a Value> {
        self.step += 1;
        self.next.take()
    }

}

impl<'a> JsonReader<'a> for ValueReader<'a> {
    type Source = Value;

    fn fail(&self, message: impl Into<String>) -> FormatError {
        FormatError::new(message, self.step)
    }

    fn check_null(&mut self) -> bool {
        matches!(self.next, Some(Value::Null))
    }

    fn try_null(&mut self) -> ReadResult<bool> {
        if self.check_null() {
            self.take_next();
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
        matches!(self.next, Some(Value::Bool(_)))
    }

    fn try_bool(&mut self) -> ReadResult<Option<bool>> {
        match self.next {
            Some(Value::Bool(b)) => {
                let b = *b;
                self.take_next();
                Ok(Some(b))
            }
            _ => Ok(None),
        }
    }

    fn expect_bool(&mut self) -> ReadResult<bool> {
        self.try_bool()?.ok_or_else(|| self.fail("expected a boolean"))
    }

    fn check_int(&mut self) -> bool {
        matches!(self.next, Some(Value::Number(Number::Int(_))))
    }

    fn try_int(&mut self) -> ReadResult<Option<i64>> {
        match self.next {
            Some(Value::Number(Number::Int(v))) => {
                let v = *v;
                self.take_next();
                Ok(Some(v))
            }
            _ => Ok(None),
        }
    }

    fn expect_int(&mut self) -> ReadResult<i64> {
        self.try_int()?.ok_or_else(|| self.fail("expected an integer"))
    }

    fn check_double(&mut self) -> bool {
        matches!(self.next, Some(Value::Number(_)))
    }

    fn try_double(&mut self) -> ReadResult<Option<f64>> {
        match self.next {
            Some(Value::Number(n)) => {
                let v = n.as_f64();
                self.take_next();
                Ok(Some(v))
            }
            _ => Ok(None),
        }
    }

    fn expect_double(&mut self) -> ReadResult<f64> {
        self.try_double()?.ok_or_else(|| self.fail("expected a number"))
    }

    fn check_num(&mut self) -> bool {
        self.check_double()
    }

    fn try_num(&mut self) -> ReadResult<Option<Number>> {
        match self.next {
            Some(Value::Number(n)) => {
                let n = *n;
                self.take_next();
                Ok(Some(n))
            }
            _ => Ok(None),
        }
    }

    fn expect_num(&mut self) -> ReadResult<Number> {
        self.try_num()?.ok_or_else(|| self.fail("expected a number"))
    }

    fn check_string(&mut self) -> bool {
        matches!(self.next, Some(Value::String(_)))
    }

    fn try_string(&mut self) -> ReadResult<Option<&'a str>> {
        match self.next {
            Some(Value::String(s)) => {
                let s = s.as_str();
                self.take_next();
                Ok(Some(s))
            }
            _ => Ok(None),
        }
    }

    fn expect_string(&mut self) -> ReadResult<&'a str> {
        self.try_string()?.ok_or_else(|| self.fail("expected a string"))
    }

    fn check_array(&mut self) -> bool {
        matches!(self.next, Some(Value::Array(_)))
    }

    fn try_array(&mut self) -> ReadResult<bool> {
        match self.next {
            Some(Value::Array(items)) => {
                let items = items.as_slice();
                self.next = None;
                self.step += 1;
                self.stack.push(Frame::Array { items, index: 0 });
                Ok(true)
            }
            _ => Ok(false),
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
        matches!(self.next, Some(Value::Object(_)))
    }

    fn try_object(&mut self) -> ReadResult<bool> {
        match self.next {
            Some(Value::Object(map)) => {
                self.next = None;
                self.step += 1;
                self.stack.push(Frame::Object { map, index: 0 });
                Ok(true)
            }
            _ => Ok(false),
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
        match self.stack.last_mut() {
            Some(Frame::Array { items, index }) => {
                if *index < items.len() {
                    self.next = Some(&items[*index]);
                    *index += 1;
                    Ok(true)
                } else {
                    self.stack.pop();
                    Ok(false)
                }
            }
            _ => Err(self.fail("not positioned inside an array")),
        }
    }

    fn next_key(&mut self) -> ReadResult<Option<&'a str>> {
        match self.stack.last_mut() {
            Some(Frame::Object { map, index }) => {
                if let Some((key, value)) = map.get_index(*index) {
                    *index += 1;
                    self.next = Some(value);
                    Ok(Some(key.as_str()))
                } else {
                    self.stack.pop();
                    Ok(None)
                }
            }
            _ => Err(self.fail("not positioned inside an object")),
        }
    }

    fn has_next_key(&mut self) -> ReadResult<Option<&'a str>> {
        match self.stack.last_mut() {
            Some(Frame::Object { map, index }) => {
                if let Some((key, value)) = map.get_index(*index) {
                    self.next = Some(value);
                    Ok(Some(key.as_str()))
                } else {
                    self.stack.pop();
                    Ok(None)
                }
            }
            _ => Err(self.fail("not positioned inside an object")),
        }
    }

    fn next_key_source(&mut self) -> ReadResult<Option<&'a str>> {
        self.next_key()
    }

    fn try_key_index(&mut self, candidates: &[&str]) -> ReadResult<Option<usize>> {
        let Some(Frame::Object { map, index }) = self.stack.last() else {
            return Ok(None);
        };
        let Some((key, _)) = map.get_index(*index) else {
            return Ok(None);
        };
        match match_exact(candidates, key) {
            None => Ok(None),
            Some(found) => {
                let Some(Frame::Object { map, index }) = self.stack.last_mut() else {
                    unreachable!("checked above");
                };
                let (_, value) = map.get_index(*index).expect("checked above");
                self.next = Some(value);
                *index += 1;
                Ok(Some(found))
            }
        }
    }

    fn try_key<'c>(&mut self, candidates: &[&'c str]) -> ReadResult<Option<&'c str>> {
        self.try_key_index(candidates).map(|opt| opt.map(|i| candidates[i]))
    }

    fn try_string_matching_index(&mut self, candidates: &[&str]) -> ReadResult<Option<usize>> {
        match self.next {
            Some(Value::String(s)) => match match_exact(candidates, s) {
                Some(found) => {
                    self.take_next();
                    Ok(Some(found))
                }
                None => Ok(None),
            },
            _ => Ok(None),
        }
    }

    fn try_string_matching<'c>(&mut self, candidates: &[&'c str]) -> ReadResult<Option<&'c str>> {
        self.try_string_matching_index(candidates).map(|opt| opt.map(|i| candidates[i]))
    }

    fn expect_string_matching<'c>(&mut self, candidates: &[&'c str]) -> ReadResult<&'c str> {
        self.try_string_matching(candidates)?.ok_or_else(|| self.fail("expected a matching string"))
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
        match self.stack.pop() {
            Some(Frame::Array { .. }) => {
                self.next = None;
                Ok(())
            }
            Some(other) => {
                self.stack.push(other);
                Err(self.fail("not positioned inside an array"))
            }
            None => Err(self.fail("not positioned inside an array")),
        }
    }

    fn end_object(&mut self) -> ReadResult<()> {
        match self.stack.pop() {
            Some(Frame::Object { .. }) => {
                self.next = None;
                Ok(())
            }
            Some(other) => {
                self.stack.push(other);
                Err(self.fail("not positioned inside an object"))
            }
            None => Err(self.fail("not positioned inside an object")),
        }
    }

    fn skip_any_value(&mut self) -> ReadResult<()> {
        if self.next.is_none() {
            return Err(self.fail("expected a value"));
        }
        self.take_next();
        Ok(())
    }

    fn expect_any_value(&mut self, sink: &mut dyn JsonSink) -> ReadResult<()> {
        let value = self.next.ok_or_else(|| self.fail("expected a value"))?;
        self.take_next();
        emit_value(value, sink).map_err(|e| self.sink_err(e))
    }

    /// Unlike the text/byte backends, there is no raw lexical span to slice: the value is already
    /// fully parsed, so "its source" is the value itself.
    fn expect_any_value_source(&mut self) -> ReadResult<&'a Value> {
        let value = self.next.ok_or_else(|| self.fail("expected a value"))?;
        self.take_next();
        Ok(value)
    }

    /// Snapshots the reader's position: the returned reader continues independently of `self`.
    /// Cheap — frames reference the same underlying collections, so only indices are duplicated.
    fn copy(&self) -> Self {
        ValueReader { next: self.next, stack: self.stack.clone(), step: self.step }
    }

    fn at_eof(&mut self) -> bool {
        self.next.is_none() && self.stack.is_empty()
    }
}

fn emit_value(value: &Value, sink: &mut dyn JsonSink) -> crate::sink::SinkResult<()> {
    match value {
        Value::Null => sink.add_null(),
        Value::Bool(b) => sink.add_bool(*b),
        Value::Number(n) => sink.add_number(*n),
        Value::String(s) => sink.add_string(s),
        Value::Array(items) => {
            sink.start_array()?;
            for item in items {
                emit_value(item, sink)?;
            }
            sink.end_array()
        }
        Value::Object(map) => {
            sink.start_object()?;
            for (key, v) in map {
                sink.add_key(key)?;
                emit_value(v, sink)?;
            }
            sink.end_object()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::tree::TreeWriter;
    use indexmap::IndexMap;

    fn sample() -> Value {
        let mut map = IndexMap::new();
        map.insert("a".to_owned(), Value::Number(Number::Int(1)));
        map.insert(
            "b".to_owned(),
            Value::Array(vec![Value::Bool(true), Value::Null, Value::String("x".to_owned())]),
        );
        Value::Object(map)
    }

    #[test]
    fn walks_object_and_array() {
        let v = sample();
        let mut r = ValueReader::new(&v);
        r.expect_object().unwrap();
        assert_eq!(r.next_key().unwrap(), Some("a"));
        assert_eq!(r.expect_int().unwrap(), 1);
        assert_eq!(r.next_key().unwrap(), Some("b"));
        r.expect_array().unwrap();
        assert!(r.has_next().unwrap());
        assert!(r.expect_bool().unwrap());
        assert!(r.has_next().unwrap());
        r.expect_null().unwrap();
        assert!(r.has_next().unwrap());
        assert_eq!(r.expect_string().unwrap(), "x");
        assert!(!r.has_next().unwrap());
        assert_eq!(r.next_key().unwrap(), None);
    }

    #[test]
    fn expect_any_value_reemits_through_a_sink() {
        let v = sample();
        let mut r = ValueReader::new(&v);
        let mut sink = TreeWriter::new();
        r.expect_any_value(&mut sink).unwrap();
        assert_eq!(sink.into_value().unwrap(), v);
    }

    #[test]
    fn copy_continues_independently() {
        let v = Value::Array(vec![Value::Number(Number::Int(1)), Value::Number(Number::Int(2))]);
        let mut r = ValueReader::new(&v);
        r.expect_array().unwrap();
        r.has_next().unwrap();
        let mut snapshot = r.copy();
        assert_eq!(r.expect_int().unwrap(), 1);
        assert_eq!(snapshot.expect_int().unwrap(), 1);
        assert!(r.has_next().unwrap());
        assert_eq!(r.expect_int().unwrap(), 2);
    }

    #[test]
    fn try_key_matches_or_leaves_the_cursor_untouched() {
        let v = sample();
        let mut r = ValueReader::new(&v);
        r.expect_object().unwrap();
        assert_eq!(r.try_key(&["x", "z"]).unwrap(), None);
        assert_eq!(r.try_key(&["a", "z"]).unwrap(), Some("a"));
        assert_eq!(r.expect_int().unwrap(), 1);
        assert_eq!(r.try_key(&["b"]).unwrap(), Some("b"));
    }

    #[test]
    fn try_string_matching_consumes_only_on_match() {
        let v = Value::String("bab".to_owned());
        let mut r = ValueReader::new(&v);
        assert_eq!(r.try_string_matching(&["aab", "zzz"]).unwrap(), None);
        assert_eq!(r.try_string_matching(&["aab", "bab"]).unwrap(), Some("bab"));
        assert!(r.at_eof());
    }
}
