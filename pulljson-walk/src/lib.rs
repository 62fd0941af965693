//! A generalized value-kind dispatcher bridging a [`pulljson::JsonReader`] to per-kind hooks.
//!
//! Grounded on `scan_json::scan`'s kind-dispatch loop (peek a value's kind, branch into
//! object/array/atom handling, delegate to caller-supplied begin/end actions) but simplified:
//! `pulljson` readers already track their own nesting, so there is no context stack to thread
//! through, and hooks are plain trait methods rather than boxed closures keyed by a matcher.

use pulljson::{FormatError, JsonReader, JsonSink, Number, ReadResult, SinkError};

/// Per-kind hooks invoked while [`process_value`] walks a reader's next value.
///
/// Every method receives the reader already positioned at (but not yet past) the value it names,
/// plus the object key the value was read under (`None` at the top level or inside an array). The
/// scalar hooks must fully consume the value; `on_array`/`on_object` consume just the opening
/// bracket and return whether [`process_value`] should go on to walk the composite's children —
/// returning `false` lets an override skip a whole subtree without visiting it. The default
/// implementations walk everything without producing any output, which is only useful for
/// validating a shape; [`SinkProcessor`] is the implementation most callers want.
pub trait Hooks<'a, R: JsonReader<'a> + ?Sized> {
    /// Handles a `null` value.
    fn on_null(&mut self, reader: &mut R, key: Option<&'a str>) -> ReadResult<()> {
        let _ = key;
        reader.expect_null()
    }

    /// Handles a boolean value.
    fn on_bool(&mut self, reader: &mut R, key: Option<&'a str>) -> ReadResult<()> {
        let _ = key;
        reader.expect_bool().map(|_| ())
    }

    /// Handles a number value.
    fn on_number(&mut self, reader: &mut R, key: Option<&'a str>) -> ReadResult<()> {
        let _ = key;
        reader.expect_num().map(|_| ())
    }

    /// Handles a string value.
    fn on_string(&mut self, reader: &mut R, key: Option<&'a str>) -> ReadResult<()> {
        let _ = key;
        reader.expect_string().map(|_| ())
    }

    /// Consumes the opening bracket of an array. Returning `true` (the default) has
    /// [`process_value`] go on to walk every element; `false` skips them.
    fn on_array(&mut self, reader: &mut R, key: Option<&'a str>) -> ReadResult<bool> {
        let _ = key;
        reader.expect_array()?;
        Ok(true)
    }

    /// Called once after an array's elements (or their skip) have been walked.
    fn on_array_end(&mut self, reader: &mut R) -> ReadResult<()> {
        let _ = reader;
        Ok(())
    }

    /// Consumes the opening brace of an object. Returning `true` (the default) has
    /// [`process_value`] go on to walk every entry; `false` skips them.
    fn on_object(&mut self, reader: &mut R, key: Option<&'a str>) -> ReadResult<bool> {
        let _ = key;
        reader.expect_object()?;
        Ok(true)
    }

    /// Called once after an object's entries (or their skip) have been walked.
    fn on_object_end(&mut self, reader: &mut R) -> ReadResult<()> {
        let _ = reader;
        Ok(())
    }
}

/// Classifies `reader`'s next value with `check_x`, in the fixed order array, object, string,
/// number, bool, null, and dispatches to the matching [`Hooks`] method. Composite values recurse:
/// every element of an array and every entry of an object is itself walked through
/// `process_value`.
pub fn process_value<'a, R, H>(reader: &mut R, key: Option<&'a str>, hooks: &mut H) -> ReadResult<()>
where
    R: JsonReader<'a> + ?Sized,
    H: Hooks<'a, R> + ?Sized,
{
    if reader.check_array() {
        if hooks.on_array(reader, key)? {
            while reader.has_next()? {
                process_value(reader, None, hooks)?;
            }
        }
        hooks.on_array_end(reader)
    } else if reader.check_object() {
        if hooks.on_object(reader, key)? {
            while let Some(child_key) = reader.next_key()? {
                process_value(reader, Some(child_key), hooks)?;
            }
        }
        hooks.on_object_end(reader)
    } else if reader.check_string() {
        hooks.on_string(reader, key)
    } else if reader.check_num() {
        hooks.on_number(reader, key)
    } else if reader.check_bool() {
        hooks.on_bool(reader, key)
    } else if reader.check_null() {
        hooks.on_null(reader, key)
    } else {
        Err(reader.fail("unrecognized value"))
    }
}

fn sink_err<'a, R: JsonReader<'a> + ?Sized>(reader: &R, e: SinkError) -> FormatError {
    reader.fail(format!("sink rejected event: {e}"))
}

/// A [`Hooks`] implementation that forwards every value it walks to a paired [`JsonSink`],
/// emitting `add_key` before each entry read under a non-`None` key.
pub struct SinkProcessor<'s, S: JsonSink + ?Sized> {
    sink: &'s mut S,
}

impl<'s, S: JsonSink + ?Sized> SinkProcessor<'s, S> {
    /// Forwards walked values to `sink`.
    pub fn new(sink: &'s mut S) -> Self {
        SinkProcessor { sink }
    }

    fn emit_key<'a, R: JsonReader<'a> + ?Sized>(&mut self, reader: &R, key: Option<&'a str>) -> ReadResult<()> {
        if let Some(k) = key {
            self.sink.add_key(k).map_err(|e| sink_err(reader, e))?;
        }
        Ok(())
    }
}

impl<'a, R: JsonReader<'a> + ?Sized, S: JsonSink + ?Sized> Hooks<'a, R> for SinkProcessor<'_, S> {
    fn on_null(&mut self, reader: &mut R, key: Option<&'a str>) -> ReadResult<()> {
        reader.expect_null()?;
        self.emit_key(reader, key)?;
        self.sink.add_null().map_err(|e| sink_err(reader, e))
    }

    fn on_bool(&mut self, reader: &mut R, key: Option<&'a str>) -> ReadResult<()> {
        let value = reader.expect_bool()?;
        self.emit_key(reader, key)?;
        self.sink.add_bool(value).map_err(|e| sink_err(reader, e))
    }

    fn on_number(&mut self, reader: &mut R, key: Option<&'a str>) -> ReadResult<()> {
        let value: Number = reader.expect_num()?;
        self.emit_key(reader, key)?;
        self.sink.add_number(value).map_err(|e| sink_err(reader, e))
    }

    fn on_string(&mut self, reader: &mut R, key: Option<&'a str>) -> ReadResult<()> {
        let value = reader.expect_string()?;
        self.emit_key(reader, key)?;
        self.sink.add_string(value).map_err(|e| sink_err(reader, e))
    }

    fn on_array(&mut self, reader: &mut R, key: Option<&'a str>) -> ReadResult<bool> {
        reader.expect_array()?;
        self.emit_key(reader, key)?;
        self.sink.start_array().map_err(|e| sink_err(reader, e))?;
        Ok(true)
    }

    fn on_array_end(&mut self, reader: &mut R) -> ReadResult<()> {
        self.sink.end_array().map_err(|e| sink_err(reader, e))
    }

    fn on_object(&mut self, reader: &mut R, key: Option<&'a str>) -> ReadResult<bool> {
        reader.expect_object()?;
        self.emit_key(reader, key)?;
        self.sink.start_object().map_err(|e| sink_err(reader, e))?;
        Ok(true)
    }

    fn on_object_end(&mut self, reader: &mut R) -> ReadResult<()> {
        self.sink.end_object().map_err(|e| sink_err(reader, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulljson::{Reader, StringWriter, TreeWriter, Value};

    #[test]
    fn sink_processor_forwards_a_nested_document() {
        let source = r#"{"a":1,"b":[true,null,"x"],"c":{}}"#;
        let mut reader = Reader::from_str(source);
        let mut tree = TreeWriter::new();
        {
            let mut proc = SinkProcessor::new(&mut tree);
            process_value(&mut reader, None, &mut proc).unwrap();
        }
        let value = tree.into_value().unwrap();
        assert!(matches!(value, Value::Object(_)));

        let mut out = String::new();
        let mut writer = StringWriter::compact(&mut out);
        let mut reader = Reader::from_value(&value);
        let mut proc = SinkProcessor::new(&mut writer);
        process_value(&mut reader, None, &mut proc).unwrap();
        assert_eq!(out, r#"{"a":1,"b":[true,null,"x"],"c":{}}"#);
    }

    struct CountStrings(usize);

    impl<'a, R: JsonReader<'a> + ?Sized> Hooks<'a, R> for CountStrings {
        fn on_string(&mut self, reader: &mut R, key: Option<&'a str>) -> ReadResult<()> {
            let _ = key;
            reader.expect_string()?;
            self.0 += 1;
            Ok(())
        }
    }

    #[test]
    fn custom_hooks_override_a_single_kind() {
        let mut reader = Reader::from_str(r#"["a","b",1,"c"]"#);
        let mut counter = CountStrings(0);
        process_value(&mut reader, None, &mut counter).unwrap();
        assert_eq!(counter.0, 3);
    }

    struct SkipArrays;

    impl<'a, R: JsonReader<'a> + ?Sized> Hooks<'a, R> for SkipArrays {
        fn on_array(&mut self, reader: &mut R, key: Option<&'a str>) -> ReadResult<bool> {
            let _ = key;
            reader.expect_array()?;
            reader.end_array()?;
            Ok(false)
        }
    }

    #[test]
    fn returning_false_from_on_array_skips_its_elements() {
        let mut reader = Reader::from_str(r#"[1,2,{"x":true}]"#);
        let mut hooks = SkipArrays;
        process_value(&mut reader, None, &mut hooks).unwrap();
        assert!(reader.at_eof());
    }
}
