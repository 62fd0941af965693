//! A reader decorator that enforces well-formed call sequences around any inner [`JsonReader`].
//!
//! Unlike the sink decorator, a reader's `try_*` operations may decline without consuming
//! anything, so the structural transition is only committed after the inner reader confirms the
//! value was actually taken. The transition itself is validated first via a cheap dry run (the
//! [`Structure`] FSM is a plain flag word plus a small stack, so cloning it to test-and-discard a
//! transition is inexpensive).

use crate::error::{FormatError, ReadResult, StateError};
use crate::reader::JsonReader;
use crate::sink::JsonSink;
use crate::structural::Structure;
use crate::value::Number;

/// Wraps any [`JsonReader`] with a [`Structure`] finite-state machine, rejecting call sequences
/// that do not match well-formed JSON (e.g. requesting a key where a value is expected, or
/// calling `end_object` mid-value) before they reach the inner reader.
pub struct ValidatingReader<'a, R: JsonReader<'a>> {
    inner: R,
    structure: Structure,
    _source: core::marker::PhantomData<&'a ()>,
}

impl<'a, R: JsonReader<'a>> ValidatingReader<'a, R> {
    /// Wraps `inner`, allowing exactly one top-level value.
    pub fn new(inner: R) -> Self {
        ValidatingReader { inner, structure: Structure::single(), _source: core::marker::PhantomData }
    }

    /// Wraps `inner`, allowing an unbounded sequence of top-level values.
    pub fn reusable(inner: R) -> Self {
        ValidatingReader { inner, structure: Structure::reusable(), _source: core::marker::PhantomData }
    }

    /// True once a single-use reader's one top-level value has completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.structure.is_complete()
    }

    /// Consumes the decorator, returning the inner reader.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn state_err(&self, err: StateError) -> FormatError {
        self.inner.fail(err.to_string())
    }

    fn dry_value(&self) -> Result<(), StateError> {
        self.structure.clone().value()
    }

    fn dry_start_array(&self) -> Result<(), StateError> {
        self.structure.clone().start_array()
    }

    fn dry_start_object(&self) -> Result<(), StateError> {
        self.structure.clone().start_object()
    }
}

impl<'a, R: JsonReader<'a>> JsonReader<'a> for ValidatingReader<'a, R> {
    type Source = R::Source;

    fn fail(&self, message: impl Into<String>) -> FormatError {
        self.inner.fail(message)
    }

    fn check_null(&mut self) -> bool {
        self.inner.check_null()
    }

    fn try_null(&mut self) -> ReadResult<bool> {
        self.dry_value().map_err(|e| self.state_err(e))?;
        let consumed = self.inner.try_null()?;
        if consumed {
            self.structure.value().expect("validated above");
        }
        Ok(consumed)
    }

    fn expect_null(&mut self) -> ReadResult<()> {
        if self.try_null()? {
            Ok(())
        } else {
            Err(self.fail("expected null"))
        }
    }

    fn check_bool(&mut self) -> bool {
        self.inner.check_bool()
    }

    fn try_bool(&mut self) -> ReadResult<Option<bool>> {
        self.dry_value().map_err(|e| self.state_err(e))?;
        let v = self.inner.try_bool()?;
        if v.is_some() {
            self.structure.value().expect("validated above");
        }
        Ok(v)
    }

    fn expect_bool(&mut self) -> ReadResult<bool> {
        self.try_bool()?.ok_or_else(|| self.fail("expected a boolean"))
    }

    fn check_int(&mut self) -> bool {
        self.inner.check_int()
    }

    fn try_int(&mut self) -> ReadResult<Option<i64>> {
        self.dry_value().map_err(|e| self.state_err(e))?;
        let v = self.inner.try_int()?;
        if v.is_some() {
            self.structure.value().expect("validated above");
        }
        Ok(v)
    }

    fn expect_int(&mut self) -> ReadResult<i64> {
        self.try_int()?.ok_or_else(|| self.fail("expected an integer"))
    }

    fn check_double(&mut self) -> bool {
        self.inner.check_double()
    }

    fn try_double(&mut self) -> ReadResult<Option<f64>> {
        self.dry_value().map_err(|e| self.state_err(e))?;
        let v = self.inner.try_double()?;
        if v.is_some() {
            self.structure.value().expect("validated above");
        }
        Ok(v)
    }

    fn expect_double(&mut self) -> ReadResult<f64> {
        self.try_double()?.ok_or_else(|| self.fail("expected a number"))
    }

    fn check_num(&mut self) -> bool {
        self.inner.check_num()
    }

    fn try_num(&mut self) -> ReadResult<Option<Number>> {
        self.dry_value().map_err(|e| self.state_err(e))?;
        let v = self.inner.try_num()?;
        if v.is_some() {
            self.structure.value().expect("validated above");
        }
        Ok(v)
    }

    fn expect_num(&mut self) -> ReadResult<Number> {
        self.try_num()?.ok_or_else(|| self.fail("expected a number"))
    }

    fn check_string(&mut self) -> bool {
        self.inner.check_string()
    }

    fn try_string(&mut self) -> ReadResult<Option<&'a str>> {
        self.dry_value().map_err(|e| self.state_err(e))?;
        let v = self.inner.try_string()?;
        if v.is_some() {
            self.structure.value().expect("validated above");
        }
        Ok(v)
    }

    fn expect_string(&mut self) -> ReadResult<&'a str> {
        self.try_string()?.ok_or_else(|| self.fail("expected a string"))
    }

    fn try_string_matching<'c>(&mut self, candidates: &[&'c str]) -> ReadResult<Option<&'c str>> {
        self.dry_value().map_err(|e| self.state_err(e))?;
        let v = self.inner.try_string_matching(candidates)?;
        if v.is_some() {
            self.structure.value().expect("validated above");
        }
        Ok(v)
    }

    fn expect_string_matching<'c>(&mut self, candidates: &[&'c str]) -> ReadResult<&'c str> {
        self.try_string_matching(candidates)?.ok_or_else(|| self.fail("expected a matching string"))
    }

    fn try_string_matching_index(&mut self, candidates: &[&str]) -> ReadResult<Option<usize>> {
        self.dry_value().map_err(|e| self.state_err(e))?;
        let v = self.inner.try_string_matching_index(candidates)?;
        if v.is_some() {
            self.structure.value().expect("validated above");
        }
        Ok(v)
    }

    fn expect_string_matching_index(&mut self, candidates: &[&str]) -> ReadResult<usize> {
        self.try_string_matching_index(candidates)?.ok_or_else(|| self.fail("expected a matching string"))
    }

    fn check_array(&mut self) -> bool {
        self.inner.check_array()
    }

    fn try_array(&mut self) -> ReadResult<bool> {
        self.dry_start_array().map_err(|e| self.state_err(e))?;
        let entered = self.inner.try_array()?;
        if entered {
            self.structure.start_array().expect("validated above");
        }
        Ok(entered)
    }

    fn expect_array(&mut self) -> ReadResult<()> {
        if self.try_array()? {
            Ok(())
        } else {
            Err(self.fail("expected an array"))
        }
    }

    fn check_object(&mut self) -> bool {
        self.inner.check_object()
    }

    fn try_object(&mut self) -> ReadResult<bool> {
        self.dry_start_object().map_err(|e| self.state_err(e))?;
        let entered = self.inner.try_object()?;
        if entered {
            self.structure.start_object().expect("validated above");
        }
        Ok(entered)
    }

    fn expect_object(&mut self) -> ReadResult<()> {
        if self.try_object()? {
            Ok(())
        } else {
            Err(self.fail("expected an object"))
        }
    }

    fn has_next(&mut self) -> ReadResult<bool> {
        if !self.structure.is_array() {
            return Err(self.state_err(StateError::NotInArray));
        }
        let more = self.inner.has_next()?;
        if !more {
            self.structure.end_array().map_err(|e| self.state_err(e))?;
        }
        Ok(more)
    }

    fn next_key(&mut self) -> ReadResult<Option<&'a str>> {
        if !self.structure.allows_key() {
            return Err(self.state_err(StateError::KeyNotAllowed));
        }
        match self.inner.next_key()? {
            Some(k) => {
                self.structure.key().map_err(|e| self.state_err(e))?;
                Ok(Some(k))
            }
            None => {
                self.structure.end_object().map_err(|e| self.state_err(e))?;
                Ok(None)
            }
        }
    }

    fn has_next_key(&mut self) -> ReadResult<Option<&'a str>> {
        if !self.structure.allows_key() {
            return Err(self.state_err(StateError::KeyNotAllowed));
        }
        match self.inner.has_next_key()? {
            Some(k) => Ok(Some(k)),
            None => {
                self.structure.end_object().map_err(|e| self.state_err(e))?;
                Ok(None)
            }
        }
    }

    fn next_key_source(&mut self) -> ReadResult<Option<&'a str>> {
        if !self.structure.allows_key() {
            return Err(self.state_err(StateError::KeyNotAllowed));
        }
        match self.inner.next_key_source()? {
            Some(k) => {
                self.structure.key().map_err(|e| self.state_err(e))?;
                Ok(Some(k))
            }
            None => {
                self.structure.end_object().map_err(|e| self.state_err(e))?;
                Ok(None)
            }
        }
    }

    fn try_key<'c>(&mut self, candidates: &[&'c str]) -> ReadResult<Option<&'c str>> {
        if !self.structure.allows_key() {
            return Err(self.state_err(StateError::KeyNotAllowed));
        }
        let matched = self.inner.try_key(candidates)?;
        if matched.is_some() {
            self.structure.key().map_err(|e| self.state_err(e))?;
        }
        Ok(matched)
    }

    fn try_key_index(&mut self, candidates: &[&str]) -> ReadResult<Option<usize>> {
        if !self.structure.allows_key() {
            return Err(self.state_err(StateError::KeyNotAllowed));
        }
        let matched = self.inner.try_key_index(candidates)?;
        if matched.is_some() {
            self.structure.key().map_err(|e| self.state_err(e))?;
        }
        Ok(matched)
    }

    fn skip_object_entry(&mut self) -> ReadResult<bool> {
        if !self.structure.allows_key() {
            return Err(self.state_err(StateError::KeyNotAllowed));
        }
        match self.inner.skip_object_entry()? {
            false => {
                self.structure.end_object().map_err(|e| self.state_err(e))?;
                Ok(false)
            }
            true => {
                self.structure.key().expect("allows_key checked above");
                self.structure.value().expect("key just transitioned to value-allowed");
                Ok(true)
            }
        }
    }

    fn end_array(&mut self) -> ReadResult<()> {
        self.inner.end_array()?;
        self.structure.end_array().map_err(|e| self.state_err(e))
    }

    fn end_object(&mut self) -> ReadResult<()> {
        self.inner.end_object()?;
        self.structure.end_object().map_err(|e| self.state_err(e))
    }

    fn skip_any_value(&mut self) -> ReadResult<()> {
        self.dry_value().map_err(|e| self.state_err(e))?;
        self.inner.skip_any_value()?;
        self.structure.value().expect("validated above");
        Ok(())
    }

    fn expect_any_value(&mut self, sink: &mut dyn JsonSink) -> ReadResult<()> {
        self.dry_value().map_err(|e| self.state_err(e))?;
        self.inner.expect_any_value(sink)?;
        self.structure.value().expect("validated above");
        Ok(())
    }

    fn expect_any_value_source(&mut self) -> ReadResult<&'a Self::Source> {
        self.dry_value().map_err(|e| self.state_err(e))?;
        let v = self.inner.expect_any_value_source()?;
        self.structure.value().expect("validated above");
        Ok(v)
    }

    fn copy(&self) -> Self {
        ValidatingReader {
            inner: self.inner.copy(),
            structure: self.structure.clone(),
            _source: core::marker::PhantomData,
        }
    }

    fn at_eof(&mut self) -> bool {
        self.inner.at_eof()
    }
}
