//! The pre-parsed value tree backing [`crate::reader::tree::ValueReader`] and produced by
//! [`crate::sink::tree::TreeWriter`].
//!
//! Grounded on `u8pool`'s dictionary convention note in this pack (even/odd index pairs act as a
//! map) for the *idea* of a key-ordered map, implemented here with `indexmap::IndexMap` — a crate
//! this pack's sibling repository `apollo-compiler` already depends on for exactly this "preserve
//! insertion order" reason (see its `Cargo.toml`: `indexmap = "2.0.0"`).

use indexmap::IndexMap;

/// A parsed JSON number: kept as either a native integer or a double, matching the reader's
/// `expect_int`/`expect_double` split (see `DESIGN.md`, open question: number representation).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// An integer literal with no fractional or exponent part.
    Int(i64),
    /// Any number with a fractional part, exponent, or one that did not fit in `i64`.
    Double(f64),
}

impl Number {
    /// The value widened to `f64`, regardless of which variant it is.
    #[must_use]
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::Double(d) => *d,
        }
    }
}

impl core::fmt::Display for Number {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{i}"),
            Number::Double(d) => write!(f, "{d}"),
        }
    }
}

/// A fully-materialized JSON value, as produced by the tree builder sink and consumed by the tree
/// reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Any JSON number.
    Number(Number),
    /// A JSON string.
    String(String),
    /// A JSON array, in source order.
    Array(Vec<Value>),
    /// A JSON object. Duplicate keys collapse to the last-written value, per `IndexMap::insert`
    /// semantics; the remaining keys keep their first-seen order.
    Object(IndexMap<String, Value>),
}

impl Value {
    /// Convenience constructor for an empty array, used by the tree builder.
    #[must_use]
    pub fn empty_array() -> Self {
        Value::Array(Vec::new())
    }

    /// Convenience constructor for an empty object, used by the tree builder.
    #[must_use]
    pub fn empty_object() -> Self {
        Value::Object(IndexMap::new())
    }
}
