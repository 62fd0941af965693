//! A pull-based JSON reader paired with a push-based JSON sink, sharing one structural validator
//! between them.
//!
//! Readers pull values one token at a time from a text, byte, or pre-parsed source, returning
//! slices that borrow the source directly instead of allocating. Sinks accept one event at a time
//! and push it to a string, a byte stream, a value tree, or nowhere at all. Use
//! [`reader::validate::ValidatingReader`] / [`sink::validate::ValidatingSink`] when callers need
//! the well-formedness guarantee a raw reader or sink does not provide on its own.

pub mod candidate;
pub mod charset;
pub mod error;
pub mod number;
pub mod reader;
pub mod sink;
pub mod structural;
pub mod value;

pub use error::{FormatError, ReadResult, StateError, ValidationError};
pub use reader::bytes::SliceReader;
pub use reader::text::StrReader;
pub use reader::tree::ValueReader;
pub use reader::validate::ValidatingReader;
pub use reader::JsonReader;
pub use sink::bytes::{ByteWriter, Encoding};
pub use sink::null::NullSink;
pub use sink::text::StringWriter;
pub use sink::tree::TreeWriter;
pub use sink::validate::ValidatingSink;
pub use sink::{JsonSink, SinkError, SinkResult, SourceSlice};
pub use structural::Structure;
pub use value::{Number, Value};

/// Namespaced constructors for the three reader backends.
pub struct Reader;

impl Reader {
    /// A text-backed reader over `source`.
    #[must_use]
    #[allow(clippy::should_implement_trait)] // intentionally named after `serde_json::from_str`, not `FromStr`
    pub fn from_str(source: &str) -> StrReader<'_> {
        StrReader::new(source)
    }

    /// A byte-backed reader over `source`.
    #[must_use]
    pub fn from_slice(source: &[u8]) -> SliceReader<'_> {
        SliceReader::new(source)
    }

    /// A reader over an already-parsed value tree.
    #[must_use]
    pub fn from_value(value: &Value) -> ValueReader<'_> {
        ValueReader::new(value)
    }
}

/// Namespaced constructors for the text sink backend.
pub struct Writer;

impl Writer {
    /// A compact (no extra whitespace) text writer over `out`.
    pub fn compact<W: core::fmt::Write>(out: W) -> StringWriter<W> {
        StringWriter::compact(out)
    }

    /// A pretty-printing text writer over `out`, indenting nested composites with `indent`
    /// repeated once per nesting level.
    pub fn pretty<W: core::fmt::Write>(out: W, indent: impl Into<String>) -> StringWriter<W> {
        StringWriter::pretty(out, indent)
    }
}
