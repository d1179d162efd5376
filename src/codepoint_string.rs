//! Owned, code-point indexed text.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use mediumvec::Vec32;

use crate::error::DecodeError;
use crate::state::Index;

/// Largest number of code points a [`CodepointString`] may hold.
///
/// Tree positions are 1-based `i32` values, and the leaf counter has to be
/// able to reach one past the last position.
pub const MAX_CODE_POINTS: usize = i32::MAX as usize - 1;

/// An immutable sequence of Unicode scalar values.
///
/// All suffix tree positions refer to code points, never to UTF-8 bytes, so
/// the text is decoded once up front and indexed directly afterwards.
#[derive(Clone)]
pub struct CodepointString {
    code_points: Vec32<char>,
}

impl CodepointString {
    /// Decodes `text`, rejecting it if it is longer than [`MAX_CODE_POINTS`].
    pub fn from_text(text: &str) -> Result<Self, DecodeError> {
        Self::from_text_with_limit(text, MAX_CODE_POINTS)
    }

    /// [`from_text`](CodepointString::from_text) with a ceiling of `max`
    /// code points. The error reports the exact length.
    pub(crate) fn from_text_with_limit(text: &str, max: usize) -> Result<Self, DecodeError> {
        let length = text.chars().count();
        if length > max {
            return Err(DecodeError::TooLong { length, max });
        }
        Self::from_chars_with_limit(text.chars(), max)
    }

    /// Validates `bytes` as UTF-8 and decodes them.
    pub fn from_utf8(bytes: &[u8]) -> Result<Self, DecodeError> {
        let text = std::str::from_utf8(bytes)?;
        Self::from_text(text)
    }

    /// Collects code points from an iterator.
    ///
    /// Stops at the first code point past [`MAX_CODE_POINTS`], so the length
    /// reported in the error is a lower bound.
    pub fn from_chars<I>(chars: I) -> Result<Self, DecodeError>
    where
        I: IntoIterator<Item = char>,
    {
        Self::from_chars_with_limit(chars, MAX_CODE_POINTS)
    }

    pub(crate) fn from_chars_with_limit<I>(chars: I, max: usize) -> Result<Self, DecodeError>
    where
        I: IntoIterator<Item = char>,
    {
        let mut code_points = Vec32::new();
        let mut length = 0usize;
        for ch in chars {
            length += 1;
            if length > max {
                return Err(DecodeError::TooLong { length, max });
            }
            code_points.push(ch);
        }
        Ok(Self { code_points })
    }

    /// The code points as a slice.
    pub fn as_slice(&self) -> &[char] {
        &self.code_points
    }

    /// Number of code points.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// The code point at 0-based `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn code_point_at(&self, index: usize) -> char {
        self.as_slice()[index]
    }

    /// The code point at a 1-based tree position.
    pub(crate) fn at_position(&self, position: Index) -> char {
        debug_assert!(position >= 1, "tree positions are 1-based, got {}", position);
        self.code_point_at((position - 1) as usize)
    }

    /// Copies out the code points in `start..end`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end` or `end > self.len()`.
    pub fn substring(&self, start: usize, end: usize) -> CodepointString {
        let mut code_points = Vec32::new();
        for &ch in &self.as_slice()[start..end] {
            code_points.push(ch);
        }
        Self { code_points }
    }

    /// Index of the first occurrence of `code_point`.
    pub fn index_of(&self, code_point: char) -> Option<usize> {
        self.as_slice().iter().position(|&ch| ch == code_point)
    }

    /// The distinct code points of this string in ascending order.
    pub fn unique_code_points(&self) -> BTreeSet<char> {
        self.as_slice().iter().copied().collect()
    }
}

impl fmt::Display for CodepointString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.as_slice() {
            fmt::Write::write_char(f, *ch)?;
        }
        Ok(())
    }
}

impl fmt::Debug for CodepointString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CodepointString")
            .field(&self.to_string())
            .finish()
    }
}

impl PartialEq for CodepointString {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for CodepointString {}

impl FromStr for CodepointString {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}

impl TryFrom<&str> for CodepointString {
    type Error = DecodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::from_text(value)
    }
}
