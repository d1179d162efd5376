//! Longest common substring of two strings via a generalized suffix tree.
//!
//! Both strings are joined as `first + separator + second + terminator` and a
//! single suffix tree is built over the result. A state lies on a common
//! substring iff leaves of both strings hang below it, so the deepest such
//! state spells the answer.

use std::iter;

use crate::codepoint_string::CodepointString;
use crate::error::{ConfigError, DecodeError};
use crate::state::{Index, State, Transitions};
use crate::suffix_tree::SuffixTree;

/// Symbols used to join two strings into one tree text.
///
/// Neither symbol may occur in the strings being compared, otherwise leaves
/// could not be attributed to one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeparatorPair {
    pub separator: char,
    pub terminator: char,
}

impl SeparatorPair {
    pub const fn new(separator: char, terminator: char) -> Self {
        Self {
            separator,
            terminator,
        }
    }

    /// Whether neither symbol occurs in `text`.
    pub fn is_unused_in(&self, text: &str) -> bool {
        !text.contains(self.separator) && !text.contains(self.terminator)
    }
}

/// Candidate pairs tried, in order, by [`LcsFinder::default`].
pub const DEFAULT_SEPARATOR_PAIRS: [SeparatorPair; 4] = [
    SeparatorPair::new('_', '*'),
    SeparatorPair::new('_', '$'),
    SeparatorPair::new('#', '$'),
    SeparatorPair::new('&', '~'),
];

/// Which of the two joined strings the suffixes below a state come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubstringKind {
    /// Nothing below the state has been seen yet.
    Undetermined,
    First,
    Second,
    Both,
}

impl SubstringKind {
    /// Folds the kind of one more child into a state's kind so far.
    pub fn merge(self, child: SubstringKind) -> SubstringKind {
        match self {
            SubstringKind::Undetermined => child,
            SubstringKind::First | SubstringKind::Second if self == child => self,
            SubstringKind::First | SubstringKind::Second => match child {
                SubstringKind::Undetermined => self,
                _ => SubstringKind::Both,
            },
            SubstringKind::Both => SubstringKind::Both,
        }
    }
}

/// Finds longest common substrings.
///
/// The only setting is the ordered list of separator pairs to try. The
/// finder holds no state between calls, so one instance can be shared across
/// threads; every call builds its own tree.
///
/// # Examples
///
/// ```
/// use suffix_tree_lcs::LcsFinder;
///
/// let finder = LcsFinder::default();
/// assert_eq!(finder.compute("banana", "ananas").as_deref(), Some("anana"));
/// assert_eq!(finder.compute("abc", "xyz"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LcsFinder {
    separator_pairs: Vec<SeparatorPair>,
}

impl Default for LcsFinder {
    fn default() -> Self {
        Self {
            separator_pairs: DEFAULT_SEPARATOR_PAIRS.to_vec(),
        }
    }
}

impl LcsFinder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> LcsFinderBuilder {
        LcsFinderBuilder::new()
    }

    pub fn separator_pairs(&self) -> &[SeparatorPair] {
        &self.separator_pairs
    }

    /// The first configured pair whose symbols occur in neither string.
    pub fn separator_pair_for(&self, first: &str, second: &str) -> Option<SeparatorPair> {
        first_unused_pair(&self.separator_pairs, first, second)
    }

    /// The longest common substring of `first` and `second`.
    ///
    /// Returns `None` if the strings share no code point, or if every
    /// separator pair already occurs in one of them. Among several longest
    /// substrings the same one is returned on every call.
    pub fn compute(&self, first: &str, second: &str) -> Option<String> {
        match self.try_compute(first, second) {
            Ok(lcs) => lcs,
            Err(err) => {
                log::warn!("cannot compare strings: {}", err);
                None
            }
        }
    }

    /// Like [`compute`](LcsFinder::compute), but reports input that is too
    /// long to index.
    pub fn try_compute(&self, first: &str, second: &str) -> Result<Option<String>, DecodeError> {
        let Some(pair) = self.separator_pair_for(first, second) else {
            log::warn!(
                "no usable separator pair among {} candidates",
                self.separator_pairs.len()
            );
            return Ok(None);
        };
        log::trace!(
            "joining with separator {:?} and terminator {:?}",
            pair.separator,
            pair.terminator
        );

        let joined = CodepointString::from_chars(
            first
                .chars()
                .chain(iter::once(pair.separator))
                .chain(second.chars())
                .chain(iter::once(pair.terminator)),
        )?;
        let separator_position = first.chars().count() as Index + 1;

        let mut tree = SuffixTree::new(joined);
        tree.construct();

        let Some(best) = deepest_common_substring(&tree, separator_position) else {
            return Ok(None);
        };
        log::trace!("longest common substring spans {} code points", best.length);
        let start = (best.start - 1) as usize;
        let end = start + best.length as usize;
        Ok(Some(tree.text().substring(start, end).to_string()))
    }

    /// Like [`try_compute`](LcsFinder::try_compute), for input that has not
    /// been validated as UTF-8 yet.
    ///
    /// `first` is validated before `second`. The `valid_up_to` offset of a
    /// [`DecodeError::InvalidUtf8`] is relative to whichever argument failed,
    /// so it does not say by itself which one that was. Validate the two
    /// separately with [`std::str::from_utf8`] if that matters.
    pub fn compute_utf8(&self, first: &[u8], second: &[u8]) -> Result<Option<String>, DecodeError> {
        let first = std::str::from_utf8(first)?;
        let second = std::str::from_utf8(second)?;
        self.try_compute(first, second)
    }
}

/// The first default separator pair usable for `first` and `second`.
pub fn separator_pair_for(first: &str, second: &str) -> Option<SeparatorPair> {
    first_unused_pair(&DEFAULT_SEPARATOR_PAIRS, first, second)
}

fn first_unused_pair(pairs: &[SeparatorPair], first: &str, second: &str) -> Option<SeparatorPair> {
    pairs
        .iter()
        .find(|pair| pair.is_unused_in(first) && pair.is_unused_in(second))
        .copied()
}

/// The longest common substring of `first` and `second`, using the default
/// separator pairs.
///
/// ```
/// use suffix_tree_lcs::longest_common_substring;
///
/// assert_eq!(longest_common_substring("café", "café société").as_deref(), Some("café"));
/// assert_eq!(longest_common_substring("", "x"), None);
/// ```
pub fn longest_common_substring(first: &str, second: &str) -> Option<String> {
    LcsFinder::default().compute(first, second)
}

/// Builder for [`LcsFinder`].
///
/// ```
/// use suffix_tree_lcs::LcsFinder;
///
/// let finder = LcsFinder::builder()
///     .separator_pair('\u{1}', '\u{2}')
///     .build()
///     .unwrap();
/// assert_eq!(finder.compute("a_#&b", "_#&").as_deref(), Some("_#&"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct LcsFinderBuilder {
    separator_pairs: Option<Vec<SeparatorPair>>,
}

impl LcsFinderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the candidate pairs.
    pub fn separator_pairs<I>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = SeparatorPair>,
    {
        self.separator_pairs = Some(pairs.into_iter().collect());
        self
    }

    /// Appends one candidate pair. The first call discards the defaults.
    pub fn separator_pair(mut self, separator: char, terminator: char) -> Self {
        self.separator_pairs
            .get_or_insert_with(Vec::new)
            .push(SeparatorPair::new(separator, terminator));
        self
    }

    pub fn build(self) -> Result<LcsFinder, ConfigError> {
        let separator_pairs = match self.separator_pairs {
            Some(pairs) => pairs,
            None => return Ok(LcsFinder::default()),
        };
        if separator_pairs.is_empty() {
            return Err(ConfigError::NoSeparatorPairs);
        }
        if let Some(pair) = separator_pairs
            .iter()
            .find(|pair| pair.separator == pair.terminator)
        {
            return Err(ConfigError::IdenticalSymbols(pair.separator));
        }
        Ok(LcsFinder { separator_pairs })
    }
}

/// Start (1-based) and length of the best common substring found so far.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Best {
    start: Index,
    length: Index,
}

/// A state on the traversal stack.
struct Frame<'a> {
    /// Code points from the root to this state.
    depth: Index,
    /// Right end of the edge leading into this state.
    right: Index,
    kind: SubstringKind,
    children: Transitions<'a>,
}

impl Frame<'_> {
    fn absorb(&mut self, child: SubstringKind, child_depth: Index, child_right: Index, best: &mut Best) {
        self.kind = self.kind.merge(child);
        if self.kind == SubstringKind::Both
            && child == SubstringKind::Both
            && child_depth > best.length
        {
            *best = Best {
                start: child_right - child_depth + 1,
                length: child_depth,
            };
        }
    }
}

/// Classifies every state of `tree` bottom-up and returns the deepest one
/// shared by both strings.
///
/// Children are visited in ascending code point order, so ties always
/// resolve the same way. An explicit stack keeps deep trees from exhausting
/// the call stack.
fn deepest_common_substring(tree: &SuffixTree, separator_position: Index) -> Option<Best> {
    let mut best = Best::default();
    let mut stack = vec![Frame {
        depth: 0,
        right: 0,
        kind: SubstringKind::Undetermined,
        children: tree.root().transitions(),
    }];

    loop {
        let Some(frame) = stack.last_mut() else {
            break;
        };
        let Some(transition) = frame.children.next() else {
            let Some(done) = stack.pop() else {
                break;
            };
            debug_assert_ne!(done.kind, SubstringKind::Undetermined);
            if let Some(parent) = stack.last_mut() {
                parent.absorb(done.kind, done.depth, done.right, &mut best);
            }
            continue;
        };

        let child_depth = frame.depth + transition.edge.len();
        let child = tree
            .explicit_state(transition.target)
            .unwrap_or_else(|| panic!("transition to unknown state {}", transition.target));
        if child.is_leaf() {
            let kind = if transition.edge.left() <= separator_position {
                SubstringKind::First
            } else {
                SubstringKind::Second
            };
            frame.absorb(kind, child_depth, transition.edge.right(), &mut best);
        } else {
            stack.push(Frame {
                depth: child_depth,
                right: transition.edge.right(),
                kind: SubstringKind::Undetermined,
                children: child.transitions(),
            });
        }
    }

    (best.length > 0).then_some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lcs(first: &str, second: &str) -> Option<String> {
        longest_common_substring(first, second)
    }

    #[test]
    fn merge_table() {
        use SubstringKind::*;
        assert_eq!(Undetermined.merge(First), First);
        assert_eq!(Undetermined.merge(Both), Both);
        assert_eq!(First.merge(First), First);
        assert_eq!(Second.merge(Second), Second);
        assert_eq!(First.merge(Second), Both);
        assert_eq!(Second.merge(First), Both);
        assert_eq!(First.merge(Both), Both);
        assert_eq!(Both.merge(First), Both);
        assert_eq!(Both.merge(Undetermined), Both);
    }

    #[test]
    fn known_pairs() {
        assert_eq!(lcs("abcdef", "zcdef").as_deref(), Some("cdef"));
        assert_eq!(lcs("abc", "ab").as_deref(), Some("ab"));
        assert_eq!(lcs("abc", "xyz"), None);
        assert_eq!(lcs("banana", "ananas").as_deref(), Some("anana"));
        assert_eq!(lcs("café", "café société").as_deref(), Some("café"));
    }

    #[test]
    fn empty_inputs_share_nothing() {
        assert_eq!(lcs("", "x"), None);
        assert_eq!(lcs("x", ""), None);
        assert_eq!(lcs("", ""), None);
    }

    #[test]
    fn single_shared_code_point() {
        assert_eq!(lcs("a", "a").as_deref(), Some("a"));
        assert_eq!(lcs("xay", "bac").as_deref(), Some("a"));
    }

    #[test]
    fn whole_string_match() {
        assert_eq!(lcs("hello world", "hello world").as_deref(), Some("hello world"));
        assert_eq!(lcs("aaaa", "aa").as_deref(), Some("aa"));
    }

    #[test]
    fn separator_selection_skips_used_symbols() {
        assert_eq!(separator_pair_for("abc", "def"), Some(SeparatorPair::new('_', '*')));
        assert_eq!(separator_pair_for("a*b", "def"), Some(SeparatorPair::new('_', '$')));
        assert_eq!(separator_pair_for("snake_case", "x"), Some(SeparatorPair::new('#', '$')));
        assert_eq!(separator_pair_for("a_b", "c$d"), Some(SeparatorPair::new('&', '~')));
        assert_eq!(separator_pair_for("_#", "&"), None);
    }

    #[test]
    fn inputs_using_every_separator_yield_none() {
        assert_eq!(lcs("a_#&b", "a_#&b"), None);
        assert_eq!(lcs("_x", "#&x"), None);
    }

    #[test]
    fn inputs_with_some_separator_symbols_still_work() {
        assert_eq!(lcs("foo_bar", "bar_baz").as_deref(), Some("_ba"));
        assert_eq!(lcs("cost: $5", "costs $5").as_deref(), Some("cost"));
    }

    #[test]
    fn ties_resolve_to_the_smallest_code_point_branch() {
        // "ab" and "cd" are both common and equally long.
        let first = lcs("ab-cd", "cd+ab");
        let second = lcs("ab-cd", "cd+ab");
        assert_eq!(first.as_deref(), Some("ab"));
        assert_eq!(first, second);
    }

    #[test]
    fn utf8_input_is_validated() {
        let finder = LcsFinder::default();
        assert_eq!(
            finder.compute_utf8("naïve".as_bytes(), "ïv".as_bytes()),
            Ok(Some("ïv".to_string()))
        );
        assert_eq!(
            finder.compute_utf8(&[0x61, 0xff], b"a"),
            Err(DecodeError::InvalidUtf8 { valid_up_to: 1 })
        );
    }

    #[test]
    fn utf8_offset_is_relative_to_the_failing_argument() {
        let finder = LcsFinder::default();
        // Valid `first`, broken `second` three bytes in.
        assert_eq!(
            finder.compute_utf8(b"abcdef", &[b'a', b'b', b'c', 0xc3]),
            Err(DecodeError::InvalidUtf8 { valid_up_to: 3 })
        );
        // Both broken: `first` is reported.
        assert_eq!(
            finder.compute_utf8(&[0xff], &[b'a', 0xff]),
            Err(DecodeError::InvalidUtf8 { valid_up_to: 0 })
        );
    }

    #[test]
    fn builder_defaults_to_the_standard_pairs() {
        let finder = LcsFinder::builder().build().unwrap();
        assert_eq!(finder, LcsFinder::default());
        assert_eq!(finder.separator_pairs(), &DEFAULT_SEPARATOR_PAIRS);
    }

    #[test]
    fn builder_rejects_bad_pairs() {
        assert_eq!(
            LcsFinder::builder().separator_pairs(Vec::new()).build(),
            Err(ConfigError::NoSeparatorPairs)
        );
        assert_eq!(
            LcsFinder::builder().separator_pair('|', '|').build(),
            Err(ConfigError::IdenticalSymbols('|'))
        );
    }

    #[test]
    fn custom_pairs_are_tried_in_order() {
        let finder = LcsFinder::builder()
            .separator_pair('|', '^')
            .separator_pair('\u{0}', '\u{1}')
            .build()
            .unwrap();
        assert_eq!(finder.separator_pair_for("a|b", "c"), Some(SeparatorPair::new('\u{0}', '\u{1}')));
        assert_eq!(finder.compute("x|y^z", "|y^").as_deref(), Some("|y^"));
        assert_eq!(finder.compute("\u{0}|", "^\u{1}"), None);
    }

    #[test]
    fn finder_is_shareable_across_threads() {
        let finder = std::sync::Arc::new(LcsFinder::default());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let finder = std::sync::Arc::clone(&finder);
                std::thread::spawn(move || finder.compute(&format!("xx{}common", i), "the common part"))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().as_deref(), Some("common"));
        }
    }
}
