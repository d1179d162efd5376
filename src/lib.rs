//! Longest common substring of two Unicode strings, using a generalized
//! suffix tree built with Ukkonen's algorithm.
//!
//! The two strings are joined with a separator and a terminator that occur in
//! neither of them, a suffix tree is built over the joined text in linear
//! time, and the deepest state with suffixes of both strings below it spells
//! the answer. All positions are code point positions, so multi-byte text is
//! handled the same way as ASCII.
//!
//! # Examples
//!
//! ```
//! use suffix_tree_lcs::longest_common_substring;
//!
//! assert_eq!(longest_common_substring("abcdef", "zcdef").as_deref(), Some("cdef"));
//! assert_eq!(longest_common_substring("abc", "xyz"), None);
//! ```
//!
//! The tree itself can be used directly as well:
//!
//! ```
//! use suffix_tree_lcs::SuffixTree;
//!
//! let tree = SuffixTree::build("mississippi").unwrap();
//! assert!(tree.contains("issip"));
//! assert!(!tree.contains("spim"));
//! ```

mod codepoint_string;
mod error;
mod lcs;
mod state;
mod suffix_tree;

pub use codepoint_string::{CodepointString, MAX_CODE_POINTS};
pub use error::{ConfigError, DecodeError};
pub use lcs::{
    longest_common_substring, separator_pair_for, LcsFinder, LcsFinderBuilder, SeparatorPair,
    SubstringKind, DEFAULT_SEPARATOR_PAIRS,
};
pub use state::{
    AuxiliaryState, Edge, ExplicitState, Index, RightPointer, State, StateId, Transition,
    Transitions, AUXILIARY, ROOT,
};
pub use suffix_tree::{ReferencePair, SuffixTree};
