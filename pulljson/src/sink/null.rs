//! A sink that discards every event. Useful for "validate structure, discard content" passes,
//! or benchmarking the reader side in isolation.

use crate::sink::{JsonSink, SinkResult};
use crate::value::Number;

/// Discards every event it receives.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NullSink {
    /// Creates a new discarding sink.
    pub fn new() -> Self {
        NullSink
    }
}

impl JsonSink for NullSink {
    fn add_null(&mut self) -> SinkResult<()> {
        Ok(())
    }

    fn add_bool(&mut self, _value: bool) -> SinkResult<()> {
        Ok(())
    }

    fn add_number(&mut self, _value: Number) -> SinkResult<()> {
        Ok(())
    }

    fn add_string(&mut self, _value: &str) -> SinkResult<()> {
        Ok(())
    }

    fn start_array(&mut self) -> SinkResult<()> {
        Ok(())
    }

    fn end_array(&mut self) -> SinkResult<()> {
        Ok(())
    }

    fn start_object(&mut self) -> SinkResult<()> {
        Ok(())
    }

    fn add_key(&mut self, _key: &str) -> SinkResult<()> {
        Ok(())
    }

    fn end_object(&mut self) -> SinkResult<()> {
        Ok(())
    }
}
