//! The unified push-sink surface over four backends: compact/pretty string writer, byte writer,
//! tree builder, and a discarding null sink.

pub mod text;
pub mod bytes;
pub mod tree;
pub mod null;
pub mod validate;

use crate::value::Number;

/// A raw, already-encoded slice to splice verbatim via [`JsonSink::add_source_value`], bypassing
/// re-encoding. The variant must match the sink's own substrate: a text-family sink wants `Str`,
/// a byte-family sink wants `Bytes`.
#[derive(Debug, Clone, Copy)]
pub enum SourceSlice<'a> {
    /// A raw slice of source text (no surrounding quotes — the caller decides whether this is a
    /// string body, a number lexeme, or any other literal value).
    Str(&'a str),
    /// A raw slice of source bytes, already encoded in the sink's target encoding.
    Bytes(&'a [u8]),
}

/// Errors a sink backend can raise. Unvalidated sinks only ever raise [`SinkError::Io`] (from a
/// wrapped writer) or [`SinkError::Unsupported`] (calling `add_source_value` on a backend that
/// cannot splice raw slices); protocol-ordering mistakes are only caught by
/// [`crate::sink::validate::ValidatingSink`].
#[derive(thiserror::Error, Debug)]
pub enum SinkError {
    /// The underlying writer failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// This backend cannot splice a raw [`SourceSlice`] of the given kind.
    #[error("{0} is not supported by this sink")]
    Unsupported(&'static str),
}

/// Result alias for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// The capability set shared by all four sink backends.
pub trait JsonSink {
    /// Emits a `null` value.
    fn add_null(&mut self) -> SinkResult<()>;
    /// Emits a boolean value.
    fn add_bool(&mut self, value: bool) -> SinkResult<()>;
    /// Emits a number value.
    fn add_number(&mut self, value: Number) -> SinkResult<()>;
    /// Emits a string value.
    fn add_string(&mut self, value: &str) -> SinkResult<()>;
    /// Begins an array.
    fn start_array(&mut self) -> SinkResult<()>;
    /// Ends the innermost array.
    fn end_array(&mut self) -> SinkResult<()>;
    /// Begins an object.
    fn start_object(&mut self) -> SinkResult<()>;
    /// Emits an object key; must be followed by exactly one value event.
    fn add_key(&mut self, key: &str) -> SinkResult<()>;
    /// Ends the innermost object.
    fn end_object(&mut self) -> SinkResult<()>;

    /// Splices a raw, already-encoded value slice wherever a value is expected, bypassing
    /// re-encoding. The default implementation rejects it; backends that can splice raw slices
    /// (the text and byte writers) override it.
    fn add_source_value(&mut self, _raw: SourceSlice<'_>) -> SinkResult<()> {
        Err(SinkError::Unsupported("add_source_value"))
    }
}
