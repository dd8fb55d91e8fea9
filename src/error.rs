//! Error types

use crate::binary::read::ReadEof;
use std::collections::TryReserveError;
use std::fmt;

/// Errors that originate when decoding a CFF font
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ParseError {
    /// The data is not a CFF font or an sfnt wrapping one.
    NotAFont,
    /// An offset, count, or operand failed a bounds or consistency check.
    MalformedFont,
    /// A lookup into a table that is empty or smaller than expected.
    OutOfRange,
    /// A valid font that uses an unsupported variant of the format.
    UnsupportedFont,
    /// Memory for the decoded tables could not be reserved.
    AllocationFailure,
}

impl From<ReadEof> for ParseError {
    fn from(_error: ReadEof) -> Self {
        ParseError::MalformedFont
    }
}

impl From<std::num::TryFromIntError> for ParseError {
    fn from(_error: std::num::TryFromIntError) -> Self {
        ParseError::MalformedFont
    }
}

impl From<TryReserveError> for ParseError {
    fn from(_error: TryReserveError) -> Self {
        ParseError::AllocationFailure
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NotAFont => write!(f, "data is not a CFF font"),
            ParseError::MalformedFont => write!(f, "malformed font data"),
            ParseError::OutOfRange => write!(f, "index out of range"),
            ParseError::UnsupportedFont => write!(f, "unsupported font"),
            ParseError::AllocationFailure => write!(f, "unable to allocate font data"),
        }
    }
}

impl std::error::Error for ParseError {}
