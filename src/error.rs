//! Error types for the ACH codec.
//!
//! The three error kinds are deliberately separate and never conflated:
//! structural errors (malformed input shape), validation errors (a value
//! fails its field rule), and lifecycle errors (operation invalid for the
//! collection's open/closed state).

use thiserror::Error;

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Umbrella error for operations that can fail in more than one way,
/// such as parsing a file from a stream.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to read from the input stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input shape is wrong: bad line length, unexpected record type, etc.
    #[error(transparent)]
    Structural(#[from] StructuralError),

    /// A supplied value failed its field validator
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Operation invalid for the collection's current open/closed state
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// The operation in progress cannot continue because the input or the
/// construction request has the wrong shape. Always fatal, never retried.
#[derive(Error, Debug)]
pub enum StructuralError {
    /// One or more required fields were not supplied at construction time.
    /// Every missing field is reported in a single message.
    #[error("cannot build {record} without required fields, missing: {}", fields.join(", "))]
    MissingFields {
        record: &'static str,
        fields: Vec<&'static str>,
    },

    /// A field name does not exist in the record's specification
    #[error("field {field:?} does not match a valid {record} field")]
    UnknownField {
        record: &'static str,
        field: String,
    },

    /// A serialized record line was not exactly 94 characters
    #[error("{record} line must be exactly 94 characters, found {found}")]
    LineLength { record: &'static str, found: usize },

    /// A serialized record line contained non-ASCII bytes
    #[error("{record} line must be ASCII text")]
    LineNotAscii { record: &'static str },

    /// The stream produced a record type code other than the one the
    /// protocol requires at this position
    #[error("found record type code {found:?}, expected '{expected}' ({record}) on line {line}")]
    UnexpectedRecordType {
        expected: char,
        found: Option<char>,
        record: &'static str,
        line: u64,
    },

    /// The stream ended where the protocol still required a record
    #[error("unexpected end of input, expected '{expected}' ({record}) on line {line}")]
    UnexpectedEndOfInput {
        expected: char,
        record: &'static str,
        line: u64,
    },

    /// The two-character addenda type code did not select a known variant
    #[error("unrecognized addenda type code {code:?}")]
    UnknownAddendaType { code: String },
}

/// A supplied value failed its field validator. Raised only during
/// programmatic construction; trusted serialized lines bypass validation.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Value does not fully match the field's regular expression
    #[error("value {value:?} for {field:?} does not match pattern {pattern}")]
    Pattern {
        field: &'static str,
        value: String,
        pattern: &'static str,
    },

    /// Value does not parse under the field's date/time format
    #[error("value {value:?} for {field:?} does not match date format {format}")]
    DateFormat {
        field: &'static str,
        value: String,
        format: &'static str,
    },

    /// Value is not a member of the field's allowed set
    #[error("value {value:?} for {field:?} must be one of [{}]", allowed.join(", "))]
    NotInSet {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },

    /// Value could not be interpreted as a number where one was required
    #[error("value {value:?} for {field:?} must be numeric")]
    NotNumeric {
        field: &'static str,
        value: String,
    },
}

/// Operation invalid for the collection's current open/closed state.
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// Appending a child to an already-closed collection
    #[error("unable to add entries to a closed {0}")]
    Closed(&'static str),

    /// Closing a collection twice
    #[error("{0} is already closed")]
    AlreadyClosed(&'static str),

    /// Appending a batch that has not been closed yet
    #[error("unable to add an open batch to a file; close the batch first")]
    OpenBatch,

    /// Querying the control record or derived totals before close
    #[error("unable to read the control record or totals of an open {0}")]
    StillOpen(&'static str),

    /// An appended entry's trace number does not begin with the batch
    /// header's originating DFI ID
    #[error("entry trace number {trace:?} does not begin with originating DFI ID {odfi:?}")]
    TraceOutsideBatch { trace: String, odfi: String },
}
