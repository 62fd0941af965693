//! A sink decorator that enforces well-formed JSON structure around any inner [`JsonSink`].

use crate::error::StateError;
use crate::sink::{JsonSink, SourceSlice};
use crate::structural::Structure;
use crate::value::Number;

/// Wraps any [`JsonSink`] with a [`Structure`] finite-state machine, rejecting call sequences
/// that would produce malformed JSON (a value where a key is expected, `end_object` mid-value,
/// events after a single-use sink's one top-level value completed, and so on) before they reach
/// the inner sink.
pub struct ValidatingSink<S> {
    inner: S,
    structure: Structure,
}

impl<S: JsonSink> ValidatingSink<S> {
    /// Wraps `inner`, allowing exactly one top-level value.
    pub fn new(inner: S) -> Self {
        ValidatingSink { inner, structure: Structure::single() }
    }

    /// Wraps `inner`, allowing an unbounded sequence of top-level values (the structural state
    /// resets to its initial position after each one completes).
    pub fn reusable(inner: S) -> Self {
        ValidatingSink { inner, structure: Structure::reusable() }
    }

    /// True once a single-use sink's one top-level value has completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.structure.is_complete()
    }

    /// Consumes the decorator, returning the inner sink.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: JsonSink> JsonSink for ValidatingSink<S> {
    fn add_null(&mut self) -> crate::sink::SinkResult<()> {
        self.structure.value().map_err(state_to_sink_err)?;
        self.inner.add_null()
    }

    fn add_bool(&mut self, value: bool) -> crate::sink::SinkResult<()> {
        self.structure.value().map_err(state_to_sink_err)?;
        self.inner.add_bool(value)
    }

    fn add_number(&mut self, value: Number) -> crate::sink::SinkResult<()> {
        self.structure.value().map_err(state_to_sink_err)?;
        self.inner.add_number(value)
    }

    fn add_string(&mut self, value: &str) -> crate::sink::SinkResult<()> {
        self.structure.value().map_err(state_to_sink_err)?;
        self.inner.add_string(value)
    }

    fn start_array(&mut self) -> crate::sink::SinkResult<()> {
        self.structure.start_array().map_err(state_to_sink_err)?;
        self.inner.start_array()
    }

    fn end_array(&mut self) -> crate::sink::SinkResult<()> {
        self.structure.end_array().map_err(state_to_sink_err)?;
        self.inner.end_array()
    }

    fn start_object(&mut self) -> crate::sink::SinkResult<()> {
        self.structure.start_object().map_err(state_to_sink_err)?;
        self.inner.start_object()
    }

    fn add_key(&mut self, key: &str) -> crate::sink::SinkResult<()> {
        self.structure.key().map_err(state_to_sink_err)?;
        self.inner.add_key(key)
    }

    fn end_object(&mut self) -> crate::sink::SinkResult<()> {
        self.structure.end_object().map_err(state_to_sink_err)?;
        self.inner.end_object()
    }

    fn add_source_value(&mut self, raw: SourceSlice<'_>) -> crate::sink::SinkResult<()> {
        self.structure.value().map_err(state_to_sink_err)?;
        self.inner.add_source_value(raw)
    }
}

/// Folds a [`StateError`] into [`crate::sink::SinkError::Io`], so a `ValidatingSink` can be used
/// anywhere a plain [`JsonSink`] is expected (e.g. passed to
/// [`crate::reader::JsonReader::expect_any_value`]). Callers that need to distinguish rejected
/// sequences from inner-sink I/O failures should inspect the error message, or drive
/// [`Structure`] directly instead of going through this decorator.
fn state_to_sink_err(err: StateError) -> crate::sink::SinkError {
    crate::sink::SinkError::Io(std::io::Error::new(std::io::ErrorKind::InvalidInput, err.to_string()))
}
