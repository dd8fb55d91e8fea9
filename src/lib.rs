#![warn(rust_2018_idioms)]

//! Decoding of Compact Font Format (CFF) fonts into the tables a Type 2 charstring interpreter
//! needs.

/// Reading of binary data.
pub mod binary;
pub mod cff;
pub mod error;
pub mod size;
pub mod tables;
pub mod tag;

pub use crate::cff::{decode, DecodedFont};
pub use crate::error::ParseError;
