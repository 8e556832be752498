use std::error::Error;
use std::fmt;
use std::io;

use rustyline::error::ReadlineError;

#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    IOError(String),
    ParseError(String),
    ReadOnlyViolation,
    IndexOutOfRange {
        index: i64,
        count: usize,
    },
    CastError {
        expected: &'static str,
        actual: &'static str,
    },
    UnknownSuffix {
        name: String,
        receiver: &'static str,
    },
    ArityMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    MalformedDump(String),
    MissingArgMarker,
    MutableBorrowError,
}

/// A list value runtime error type
#[derive(Debug, PartialEq)]
pub struct RuntimeError {
    kind: ErrorKind,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind) -> RuntimeError {
        RuntimeError { kind }
    }

    pub fn error_kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// True for errors raised by script misuse of a value, as opposed to host failures
    pub fn is_script_error(&self) -> bool {
        match self.kind {
            ErrorKind::IOError(_) => false,
            _ => true,
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            ErrorKind::IOError(ref reason) => write!(f, "IO Error: {}", reason),
            ErrorKind::ParseError(ref reason) => write!(f, "Parse error: {}", reason),
            ErrorKind::ReadOnlyViolation => write!(f, "Attempt to modify a read-only collection"),
            ErrorKind::IndexOutOfRange { index, count } => write!(
                f,
                "Index {} is out of range for a collection of {} items",
                index, count
            ),
            ErrorKind::CastError { expected, actual } => {
                write!(f, "Cannot cast {} to {}", actual, expected)
            }
            ErrorKind::UnknownSuffix {
                ref name,
                receiver,
            } => write!(f, "Suffix '{}' not found on object of type {}", name, receiver),
            ErrorKind::ArityMismatch {
                ref name,
                expected,
                actual,
            } => write!(
                f,
                "Suffix '{}' expected {} arguments, got {}",
                name, expected, actual
            ),
            ErrorKind::MalformedDump(ref reason) => write!(f, "Malformed dump: {}", reason),
            ErrorKind::MissingArgMarker => {
                write!(f, "Argument stack has no argument boundary marker")
            }
            ErrorKind::MutableBorrowError => write!(
                f,
                "Attempt to modify a container that is already borrowed"
            ),
        }
    }
}

/// Convert from io::Error
impl From<io::Error> for RuntimeError {
    fn from(other: io::Error) -> RuntimeError {
        RuntimeError::new(ErrorKind::IOError(format!("{}", other)))
    }
}

/// Convert from ReadlineError
impl From<ReadlineError> for RuntimeError {
    fn from(other: ReadlineError) -> RuntimeError {
        RuntimeError::new(ErrorKind::IOError(format!("{}", other)))
    }
}

/// Convert from serde_json::Error, which only arises while reading or writing a Dump
impl From<serde_json::Error> for RuntimeError {
    fn from(other: serde_json::Error) -> RuntimeError {
        RuntimeError::new(ErrorKind::MalformedDump(format!("{}", other)))
    }
}

impl Error for RuntimeError {}

/// Convenience shorthand function for building a read-only violation error
pub fn err_read_only() -> RuntimeError {
    RuntimeError::new(ErrorKind::ReadOnlyViolation)
}

/// Convenience shorthand function for building a bounds error against a resolved index
pub fn err_bounds(index: i64, count: usize) -> RuntimeError {
    RuntimeError::new(ErrorKind::IndexOutOfRange { index, count })
}

/// Convenience shorthand function for building a cast error
pub fn err_cast(expected: &'static str, actual: &'static str) -> RuntimeError {
    RuntimeError::new(ErrorKind::CastError { expected, actual })
}

/// Convenience shorthand function for building an unknown suffix error
pub fn err_unknown_suffix(name: &str, receiver: &'static str) -> RuntimeError {
    RuntimeError::new(ErrorKind::UnknownSuffix {
        name: String::from(name),
        receiver,
    })
}

/// Convenience shorthand function for building a suffix arity error
pub fn err_arity(name: &str, expected: usize, actual: usize) -> RuntimeError {
    RuntimeError::new(ErrorKind::ArityMismatch {
        name: String::from(name),
        expected,
        actual,
    })
}

/// Convenience shorthand function for building a dump decoding error
pub fn err_dump(reason: &str) -> RuntimeError {
    RuntimeError::new(ErrorKind::MalformedDump(String::from(reason)))
}

/// Convenience shorthand function for building a parser error
pub fn err_parser(reason: &str) -> RuntimeError {
    RuntimeError::new(ErrorKind::ParseError(String::from(reason)))
}
