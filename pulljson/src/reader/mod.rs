//! The unified pull-reader surface over three backends: text, bytes, and a pre-parsed tree.
//!
//! Grounded on `rjiter::RJiter`'s method surface (`known_*` / `next_*` naming, one method per JSON
//! kind, a single `Result` type returned throughout) but without `rjiter`'s buffer-refill loop:
//! per the spec's non-goals, this whole family assumes the complete source is already in memory,
//! so there is no `loop_until_success`/chunk-boundary machinery to port.

pub mod text;
pub mod bytes;
pub mod tree;
pub mod validate;

use crate::error::{FormatError, ReadResult};
use crate::sink::JsonSink;
use crate::value::Number;

/// The capability set shared by all three reader backends.
///
/// Lifetime `'a` is the lifetime of the borrowed source (string, byte slice, or value tree); it is
/// carried by the trait rather than by individual methods so that returned slices borrow the
/// source directly and outlive the `&mut self` call that produced them.
pub trait JsonReader<'a> {
    /// The type [`JsonReader::expect_any_value_source`] borrows a slice from: `str` for the text
    /// backend, `[u8]` for the byte backend, [`crate::value::Value`] for the tree backend, which
    /// has no raw lexical form to slice and hands back the parsed value itself.
    type Source: ?Sized;

    /// Builds a `FormatError` at the reader's current position, without consuming anything.
    fn fail(&self, message: impl Into<String>) -> FormatError;

    /// Classifies the next value as `null` without consuming it.
    fn check_null(&mut self) -> bool;
    /// Consumes `null` if present, returning whether it was found.
    fn try_null(&mut self) -> ReadResult<bool>;
    /// Consumes `null`, failing if the next value is not `null`.
    fn expect_null(&mut self) -> ReadResult<()>;

    /// Classifies the next value as a boolean without consuming it.
    fn check_bool(&mut self) -> bool;
    /// Consumes a boolean if present.
    fn try_bool(&mut self) -> ReadResult<Option<bool>>;
    /// Consumes a boolean, failing if the next value is not one.
    fn expect_bool(&mut self) -> ReadResult<bool>;

    /// True if the next value is a number with no fractional part or exponent.
    fn check_int(&mut self) -> bool;
    /// Consumes a strict-integer number if present.
    fn try_int(&mut self) -> ReadResult<Option<i64>>;
    /// Consumes a strict-integer number, failing on a fractional/exponent form or a non-number.
    fn expect_int(&mut self) -> ReadResult<i64>;

    /// True if the next value is any number (a double accepts an integer-shaped lexeme too).
    fn check_double(&mut self) -> bool;
    /// Consumes any number as a double if present.
    fn try_double(&mut self) -> ReadResult<Option<f64>>;
    /// Consumes any number as a double, failing if the next value is not a number.
    fn expect_double(&mut self) -> ReadResult<f64>;

    /// True if the next value is any number.
    fn check_num(&mut self) -> bool;
    /// Consumes any number, preserving whether it was an integer or a double lexeme.
    fn try_num(&mut self) -> ReadResult<Option<Number>>;
    /// Consumes any number, failing if the next value is not a number.
    fn expect_num(&mut self) -> ReadResult<Number>;

    /// True if the next value is a string.
    fn check_string(&mut self) -> bool;
    /// Consumes a string if present.
    fn try_string(&mut self) -> ReadResult<Option<&'a str>>;
    /// Consumes a string, failing if the next value is not one.
    fn expect_string(&mut self) -> ReadResult<&'a str>;

    /// True if the next value is an array.
    fn check_array(&mut self) -> bool;
    /// Enters the next value as an array if it is one; returns whether it did.
    fn try_array(&mut self) -> ReadResult<bool>;
    /// Enters the next value as an array, failing if it is not one.
    fn expect_array(&mut self) -> ReadResult<()>;

    /// True if the next value is an object.
    fn check_object(&mut self) -> bool;
    /// Enters the next value as an object if it is one; returns whether it did.
    fn try_object(&mut self) -> ReadResult<bool>;
    /// Enters the next value as an object, failing if it is not one.
    fn expect_object(&mut self) -> ReadResult<()>;

    /// Inside an array: true if another element follows (consumes the comma); false exits the
    /// array.
    fn has_next(&mut self) -> ReadResult<bool>;

    /// Inside an object: the next key, positioning the cursor at its value; `None` when the
    /// object ends (also exits it).
    fn next_key(&mut self) -> ReadResult<Option<&'a str>>;
    /// Peek-variant of [`JsonReader::next_key`]: does not consume the key, but still exits the
    /// object when it ends.
    fn has_next_key(&mut self) -> ReadResult<Option<&'a str>>;
    /// Like [`JsonReader::next_key`] but returns the source slice of the key including its
    /// surrounding quotes, without decoding escapes.
    fn next_key_source(&mut self) -> ReadResult<Option<&'a str>>;
    /// Matches the next object key against `candidates` (sorted, non-escaping). On match, consumes
    /// the key and the following colon and returns the matched candidate; otherwise leaves the
    /// cursor at the key untouched.
    fn try_key<'c>(&mut self, candidates: &[&'c str]) -> ReadResult<Option<&'c str>>;
    /// Same as [`JsonReader::try_key`] but returns the candidate's index.
    fn try_key_index(&mut self, candidates: &[&str]) -> ReadResult<Option<usize>>;
    /// Skips one key-value pair; `false` (and exits the object) if none remains.
    fn skip_object_entry(&mut self) -> ReadResult<bool>;

    /// Fast-forwards over the remaining content of the current array.
    fn end_array(&mut self) -> ReadResult<()>;
    /// Fast-forwards over the remaining content of the current object.
    fn end_object(&mut self) -> ReadResult<()>;

    /// Matches the next string value against `candidates` (sorted, non-escaping), consuming it on
    /// a match. Named `*_matching` to avoid clashing with [`JsonReader::try_string`].
    fn try_string_matching<'c>(&mut self, candidates: &[&'c str]) -> ReadResult<Option<&'c str>>;
    /// Same as [`JsonReader::try_string_matching`] but fails if the next value is not a matching
    /// string.
    fn expect_string_matching<'c>(&mut self, candidates: &[&'c str]) -> ReadResult<&'c str>;
    /// Same as [`JsonReader::try_string_matching`] but returns the candidate's index.
    fn try_string_matching_index(&mut self, candidates: &[&str]) -> ReadResult<Option<usize>>;
    /// Same as [`JsonReader::try_string_matching_index`] but fails if the next value is not a
    /// matching string.
    fn expect_string_matching_index(&mut self, candidates: &[&str]) -> ReadResult<usize>;

    /// Discards the next value, recursing through composites.
    fn skip_any_value(&mut self) -> ReadResult<()>;
    /// Skips the next value and returns the source slice covering exactly its characters or bytes
    /// (including quotes for strings, brackets for composites) — or, for the tree backend, the
    /// value itself.
    fn expect_any_value_source(&mut self) -> ReadResult<&'a Self::Source>;
    /// Walks the next value, emitting a faithful sequence of events to `sink`.
    fn expect_any_value(&mut self, sink: &mut dyn JsonSink) -> ReadResult<()>;

    /// Snapshots the reader's cursor: the returned reader continues independently of `self`.
    fn copy(&self) -> Self
    where
        Self: Sized;

    /// True if, after skipping whitespace, the source is exhausted. Not part of the core
    /// contract (the reader never checks this on its own — see the "trailing content" open
    /// question) but offered as a caller-visible convenience.
    fn at_eof(&mut self) -> bool;
}
