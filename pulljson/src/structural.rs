//! The structural validator: a finite-state machine shared by [`crate::reader::validate`] and
//! [`crate::sink::validate`].
//!
//! Grounded on `scan_json::scan::StructurePosition`, which tracks a very similar set of
//! positions (top / object-begin / object-middle / object-between-kv / array-begin /
//! array-middle) but as an enum threaded through a dispatcher. Here the same information is
//! packed into bit flags per the spec, since both the reader-validator and the sink-validator
//! need to push/pop it on a plain stack independent of any dispatch loop.

use crate::error::StateError;

const HAS_VALUE: u8 = 0b0001;
const PREVENT_VALUE_AFTER: u8 = 0b0010;
const ALLOW_VALUE: u8 = 0b0100;
const INSIDE_COMPOSITE: u8 = 0b1000;

/// The structural validator's state: a flag word plus a stack of parent flag words.
#[derive(Debug, Clone)]
pub struct Structure {
    flags: u8,
    stack: Vec<u8>,
    reusable: bool,
    complete: bool,
}

impl Structure {
    /// A validator accepting exactly one top-level value.
    #[must_use]
    pub fn single() -> Self {
        Structure {
            flags: ALLOW_VALUE | PREVENT_VALUE_AFTER,
            stack: Vec::new(),
            reusable: false,
            complete: false,
        }
    }

    /// A validator that resets after each top-level value and accepts another.
    #[must_use]
    pub fn reusable() -> Self {
        Structure {
            flags: ALLOW_VALUE,
            stack: Vec::new(),
            reusable: true,
            complete: false,
        }
    }

    fn reset_to_initial(&mut self) {
        self.flags = if self.reusable {
            ALLOW_VALUE
        } else {
            ALLOW_VALUE | PREVENT_VALUE_AFTER
        };
    }

    /// True if a value is permitted at the current position.
    #[must_use]
    pub fn allows_value(&self) -> bool {
        self.flags & ALLOW_VALUE != 0
    }

    /// True if an object key is permitted at the current position.
    #[must_use]
    pub fn allows_key(&self) -> bool {
        self.flags & INSIDE_COMPOSITE != 0 && self.flags & ALLOW_VALUE == 0
    }

    /// True if the current position is directly inside an array body.
    #[must_use]
    pub fn is_array(&self) -> bool {
        self.flags & INSIDE_COMPOSITE != 0 && self.flags & PREVENT_VALUE_AFTER == 0
    }

    /// True if the current position is directly inside an object.
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.flags & INSIDE_COMPOSITE != 0 && self.flags & PREVENT_VALUE_AFTER != 0
    }

    /// Nesting depth: number of composites currently entered.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// True once a single-use validator's one top-level value has completed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    fn check(&self, ok: bool, err: StateError) -> Result<(), StateError> {
        if ok {
            Ok(())
        } else {
            err.log_rejected(self.flags);
            Err(err)
        }
    }

    /// Records that a primitive (or the start of a composite, before `start_array`/`start_object`
    /// push) value is being taken at the current position.
    pub fn value(&mut self) -> Result<(), StateError> {
        if self.complete {
            return Err(StateError::AlreadyComplete);
        }
        self.check(self.allows_value(), StateError::ValueNotAllowed)?;
        self.flags |= HAS_VALUE;
        if self.flags & PREVENT_VALUE_AFTER != 0 {
            self.flags &= !ALLOW_VALUE;
        }
        if self.stack.is_empty() {
            self.complete = true;
            if self.reusable {
                self.complete = false;
                self.reset_to_initial();
            }
        }
        Ok(())
    }

    /// Records that an object key is being taken at the current position.
    pub fn key(&mut self) -> Result<(), StateError> {
        self.check(self.allows_key(), StateError::KeyNotAllowed)?;
        self.flags |= ALLOW_VALUE;
        Ok(())
    }

    /// Enters a new array: validates as a value, then pushes and resets into array-body state.
    pub fn start_array(&mut self) -> Result<(), StateError> {
        if self.complete {
            return Err(StateError::AlreadyComplete);
        }
        self.check(self.allows_value(), StateError::ValueNotAllowed)?;
        self.flags |= HAS_VALUE;
        self.stack.push(self.flags);
        self.flags = ALLOW_VALUE | INSIDE_COMPOSITE;
        Ok(())
    }

    /// Enters a new object: validates as a value, then pushes and resets into object-key state.
    pub fn start_object(&mut self) -> Result<(), StateError> {
        if self.complete {
            return Err(StateError::AlreadyComplete);
        }
        self.check(self.allows_value(), StateError::ValueNotAllowed)?;
        self.flags |= HAS_VALUE;
        self.stack.push(self.flags);
        self.flags = INSIDE_COMPOSITE | PREVENT_VALUE_AFTER;
        Ok(())
    }

    /// Exits the current array.
    pub fn end_array(&mut self) -> Result<(), StateError> {
        self.check(self.is_array(), StateError::NotInArray)?;
        self.pop_and_resume()
    }

    /// Exits the current object. Must be at a key boundary, not mid object-value.
    pub fn end_object(&mut self) -> Result<(), StateError> {
        self.check(
            self.is_object() && self.flags & ALLOW_VALUE == 0,
            StateError::NotAtObjectKeyBoundary,
        )?;
        self.pop_and_resume()
    }

    fn pop_and_resume(&mut self) -> Result<(), StateError> {
        self.flags = self
            .stack
            .pop()
            .expect("depth invariant: pop only after a matching start");
        if self.flags & PREVENT_VALUE_AFTER != 0 {
            self.flags &= !ALLOW_VALUE;
        }
        if self.stack.is_empty() && self.flags & ALLOW_VALUE == 0 {
            self.complete = true;
            if self.reusable {
                self.complete = false;
                self.reset_to_initial();
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_top_level_value_then_complete() {
        let mut s = Structure::single();
        assert!(s.allows_value());
        s.value().unwrap();
        assert!(s.is_complete());
        assert!(s.value().is_err());
    }

    #[test]
    fn reusable_accepts_many_top_level_values() {
        let mut s = Structure::reusable();
        s.value().unwrap();
        assert!(!s.is_complete());
        s.value().unwrap();
        assert!(!s.is_complete());
    }

    #[test]
    fn object_roundtrip() {
        let mut s = Structure::single();
        s.start_object().unwrap();
        assert!(s.allows_key());
        assert!(!s.is_array());
        assert!(s.is_object());
        s.key().unwrap();
        s.value().unwrap();
        assert!(s.allows_key());
        s.end_object().unwrap();
        assert!(s.is_complete());
    }

    #[test]
    fn array_roundtrip() {
        let mut s = Structure::single();
        s.start_array().unwrap();
        assert!(s.is_array());
        s.value().unwrap();
        s.value().unwrap();
        s.end_array().unwrap();
        assert!(s.is_complete());
    }

    #[test]
    fn end_object_mid_value_rejected() {
        let mut s = Structure::single();
        s.start_object().unwrap();
        s.key().unwrap();
        // A value is now expected, not end_object.
        assert_eq!(s.end_object(), Err(StateError::NotAtObjectKeyBoundary));
    }

    #[test]
    fn end_array_on_object_rejected() {
        let mut s = Structure::single();
        s.start_object().unwrap();
        assert_eq!(s.end_array(), Err(StateError::NotInArray));
    }

    #[test]
    fn key_outside_composite_rejected() {
        let mut s = Structure::single();
        assert_eq!(s.key(), Err(StateError::KeyNotAllowed));
    }

    #[test]
    fn nested_composite_depth_tracks_stack() {
        let mut s = Structure::single();
        s.start_array().unwrap();
        s.start_object().unwrap();
        assert_eq!(s.depth(), 2);
        s.key().unwrap();
        s.start_array().unwrap();
        assert_eq!(s.depth(), 3);
        s.end_array().unwrap();
        s.end_object().unwrap();
        s.end_array().unwrap();
        assert_eq!(s.depth(), 0);
        assert!(s.is_complete());
    }
}
