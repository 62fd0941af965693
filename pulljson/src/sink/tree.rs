//! Tree-builder sink backend: assembles a [`Value`] from a sequence of sink events.

use indexmap::IndexMap;

use crate::sink::{JsonSink, SinkError, SinkResult};
use crate::value::{Number, Value};

enum Frame {
    Array(Vec<Value>),
    Object { map: IndexMap<String, Value>, pending_key: Option<String> },
}

/// Builds a [`Value`] tree from sink events. Construct with [`TreeWriter::new`], feed it events
/// (directly or via [`crate::reader::JsonReader::expect_any_value`]), then call
/// [`TreeWriter::into_value`] once the top-level value is complete.
pub struct TreeWriter {
    stack: Vec<Frame>,
    finished: Option<Value>,
}

impl TreeWriter {
    /// Creates an empty tree builder.
    pub fn new() -> Self {
        TreeWriter { stack: Vec::new(), finished: None }
    }

    /// Takes the completed top-level value, or `None` if no value has been fully built yet.
    pub fn into_value(mut self) -> Option<Value> {
        self.finished.take()
    }

    fn emit(&mut self, value: Value) -> SinkResult<()> {
        match self.stack.last_mut() {
            None => {
                self.finished = Some(value);
                Ok(())
            }
            Some(Frame::Array(items)) => {
                items.push(value);
                Ok(())
            }
            Some(Frame::Object { map, pending_key }) => {
                let key = pending_key
                    .take()
                    .ok_or(SinkError::Unsupported("value without a preceding key"))?;
                map.insert(key, value);
                Ok(())
            }
        }
    }
}

impl Default for TreeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonSink for TreeWriter {
    fn add_null(&mut self) -> SinkResult<()> {
        self.emit(Value::Null)
    }

    fn add_bool(&mut self, value: bool) -> SinkResult<()> {
        self.emit(Value::Bool(value))
    }

    fn add_number(&mut self, value: Number) -> SinkResult<()> {
        self.emit(Value::Number(value))
    }

    fn add_string(&mut self, value: &str) -> SinkResult<()> {
        self.emit(Value::String(value.to_owned()))
    }

    fn start_array(&mut self) -> SinkResult<()> {
        self.stack.push(Frame::Array(Vec::new()));
        Ok(())
    }

    fn end_array(&mut self) -> SinkResult<()> {
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.emit(Value::Array(items)),
            _ => Err(SinkError::Unsupported("end_array without a matching start_array")),
        }
    }

    fn start_object(&mut self) -> SinkResult<()> {
        self.stack.push(Frame::Object { map: IndexMap::new(), pending_key: None });
        Ok(())
    }

    fn add_key(&mut self, key: &str) -> SinkResult<()> {
        match self.stack.last_mut() {
            Some(Frame::Object { pending_key, .. }) => {
                *pending_key = Some(key.to_owned());
                Ok(())
            }
            _ => Err(SinkError::Unsupported("add_key outside an object")),
        }
    }

    fn end_object(&mut self) -> SinkResult<()> {
        match self.stack.pop() {
            Some(Frame::Object { map, .. }) => self.emit(Value::Object(map)),
            _ => Err(SinkError::Unsupported("end_object without a matching start_object")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_value() {
        let mut w = TreeWriter::new();
        w.start_object().unwrap();
        w.add_key("a").unwrap();
        w.start_array().unwrap();
        w.add_number(Number::Int(1)).unwrap();
        w.add_bool(true).unwrap();
        w.end_array().unwrap();
        w.end_object().unwrap();
        let value = w.into_value().unwrap();
        let Value::Object(map) = value else { panic!("expected object") };
        assert_eq!(map.get("a"), Some(&Value::Array(vec![Value::Number(Number::Int(1)), Value::Bool(true)])));
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let mut w = TreeWriter::new();
        w.start_object().unwrap();
        w.add_key("a").unwrap();
        w.add_number(Number::Int(1)).unwrap();
        w.add_key("a").unwrap();
        w.add_number(Number::Int(2)).unwrap();
        w.end_object().unwrap();
        let Value::Object(map) = w.into_value().unwrap() else { panic!("expected object") };
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some(&Value::Number(Number::Int(2))));
    }

    #[test]
    fn scalar_top_level_value() {
        let mut w = TreeWriter::new();
        w.add_string("hi").unwrap();
        assert_eq!(w.into_value(), Some(Value::String("hi".to_owned())));
    }
}
