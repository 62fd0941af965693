//! Error types shared by every reader and sink backend.

/// A malformed-input or type-mismatch error raised while reading.
///
/// Carries the byte (or tree-step) offset at which the problem was found. After a `FormatError`
/// is returned the reader that raised it is poisoned: its cursor may sit mid-token and it must not
/// be used further.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{message} at offset {offset}")]
pub struct FormatError {
    /// Human-readable description of the problem.
    pub message: String,
    /// Offset into the source at which the problem was detected.
    pub offset: usize,
}

impl FormatError {
    /// Builds a new `FormatError` at the given offset.
    pub fn new(message: impl Into<String>, offset: usize) -> Self {
        FormatError {
            message: message.into(),
            offset,
        }
    }
}

/// A protocol-misuse error raised by the validating reader/sink decorators.
///
/// Unvalidated readers and sinks never produce this error themselves — they trust the caller and
/// produce undefined output on misuse instead. Only [`crate::reader::validate::ValidatingReader`]
/// and [`crate::sink::validate::ValidatingSink`] detect and report it.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// A value was requested or written where the structural position does not allow one.
    #[error("a value is not allowed here")]
    ValueNotAllowed,
    /// A key was requested or written outside of object-key position.
    #[error("a key is not allowed here")]
    KeyNotAllowed,
    /// `end_array` was called while not inside an array.
    #[error("not positioned inside an array")]
    NotInArray,
    /// `end_object` was called while not at an object key boundary.
    #[error("not positioned at an object key boundary")]
    NotAtObjectKeyBoundary,
    /// A sink created as single-use received events after its one top-level value completed.
    #[error("sink already produced its one value and is not reusable")]
    AlreadyComplete,
}

impl StateError {
    pub(crate) fn log_rejected(&self, flags: u8) {
        log::debug!("structural validator rejected {self:?}, flags={flags:#06b}");
    }
}

/// Result alias for reader operations.
pub type ReadResult<T> = Result<T, FormatError>;

/// Result alias for validating-decorator operations, which can fail either way.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The underlying reader or sink failed with a format error.
    #[error(transparent)]
    Format(#[from] FormatError),
    /// The validator rejected the call sequence.
    #[error(transparent)]
    State(#[from] StateError),
}
