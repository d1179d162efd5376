//! Error types surfaced to callers.
//!
//! Only input validation and configuration problems are reported as values.
//! Broken construction invariants (duplicate transitions, missing suffix
//! links) are bugs in the tree itself and panic instead.

use thiserror::Error;

/// Text could not be turned into a [`CodepointString`](crate::CodepointString).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The bytes are not valid UTF-8.
    #[error("text is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 {
        /// Length of the longest valid UTF-8 prefix.
        valid_up_to: usize,
    },

    /// The text has more code points than tree indices can address.
    #[error("text has {length} code points, at most {max} are supported")]
    TooLong {
        /// Number of code points in the rejected text.
        length: usize,
        /// Largest supported number of code points.
        max: usize,
    },
}

impl From<std::str::Utf8Error> for DecodeError {
    fn from(err: std::str::Utf8Error) -> Self {
        DecodeError::InvalidUtf8 {
            valid_up_to: err.valid_up_to(),
        }
    }
}

/// An [`LcsFinder`](crate::LcsFinder) was configured with unusable settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The candidate separator list is empty.
    #[error("at least one separator/terminator pair is required")]
    NoSeparatorPairs,

    /// A pair uses the same symbol as separator and terminator.
    #[error("separator and terminator must differ, both are {0:?}")]
    IdenticalSymbols(char),
}
