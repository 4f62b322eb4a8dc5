//! Library error types.

use std::fmt;
use std::io;

/// An ingredient-pack Result, normally returning an ingredient-pack
/// [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An ingredient-pack error. Covers structural decode failures, the
/// compression boundary, and stream I/O.
///
/// Lookup misses and type-coercion mismatches are not errors: lookups
/// return the shared Null sentinel and coercions return a default value.
#[derive(Debug)]
pub enum Error {
    /// A decoder needed more bytes than the input could provide.
    LengthTooShort {
        /// What step of the decoding we were on when it failed.
        step: &'static str,
        /// The number of bytes actually available.
        actual: usize,
        /// The number of bytes the step required.
        expected: usize,
    },
    /// A marker byte's kind bits aren't an assigned codepoint.
    UnknownKind(u8),
    /// The bytes don't form the structure their markers claim.
    BadEncode(String),
    /// The Snappy codec reported a failure.
    Compression(snap::Error),
    /// Failure at the stream boundary.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::LengthTooShort {
                step,
                actual,
                expected,
            } => write!(
                f,
                "Expected data length {}, but got {} on step [{}]",
                expected, actual, step
            ),
            Error::UnknownKind(marker) => {
                write!(f, "Marker 0x{:02X} has no assigned kind", marker)
            }
            Error::BadEncode(ref err) => write!(f, "Basic data encoding failure: {}", err),
            Error::Compression(_) => write!(f, "Compression codec error"),
            Error::Io(_) => write!(f, "Stream I/O error"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Compression(ref err) => Some(err),
            Error::Io(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<snap::Error> for Error {
    fn from(e: snap::Error) -> Self {
        Self::Compression(e)
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
