//! States (vertices) of a Ukkonen suffix tree and the edges between them.
//!
//! States live in an arena owned by [`SuffixTree`](crate::SuffixTree) and
//! refer to each other by [`StateId`]. Suffix links are plain ids as well, so
//! they never own anything and crossing subtree boundaries is harmless.

use std::cell::Cell;
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::codepoint_string::CodepointString;

/// Arena index of a state.
pub type StateId = usize;

/// A 1-based, inclusive position into the tree's text.
///
/// Transitions out of the auxiliary state use negative values.
pub type Index = i32;

/// Id of the root. It is always the first state allocated.
pub const ROOT: StateId = 0;

/// Id of the auxiliary state, which lives outside the arena.
pub const AUXILIARY: StateId = StateId::MAX;

/// Right end of an edge label.
///
/// Internal edges get a fixed end when they are split off. Leaf edges share
/// the tree's leaf counter instead, so all of them grow by one position each
/// time a code point is appended, without being visited.
#[derive(Debug, Clone)]
pub enum RightPointer {
    Owned(Index),
    Shared(Rc<Cell<Index>>),
}

impl RightPointer {
    pub fn get(&self) -> Index {
        match self {
            RightPointer::Owned(index) => *index,
            RightPointer::Shared(cell) => cell.get(),
        }
    }
}

/// The label of a transition: positions `left..=right` of the tree's text.
#[derive(Debug, Clone)]
pub struct Edge {
    left: Index,
    right: RightPointer,
}

impl Edge {
    pub fn new(left: Index, right: RightPointer) -> Self {
        Self { left, right }
    }

    pub fn left(&self) -> Index {
        self.left
    }

    pub fn right(&self) -> Index {
        self.right.get()
    }

    /// Number of code points on the edge.
    pub fn len(&self) -> Index {
        self.right() - self.left + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }

    /// Whether this edge ends at the shared leaf counter.
    pub fn is_open(&self) -> bool {
        matches!(self.right, RightPointer::Shared(_))
    }
}

/// An outgoing transition: the edge label and the state it leads to.
#[derive(Debug, Clone)]
pub struct Transition {
    pub edge: Edge,
    pub target: StateId,
}

/// Transitions of a state in ascending order of their first code point.
pub type Transitions<'a> = btree_map::Values<'a, char, Transition>;

/// Read access shared by explicit states and the auxiliary state.
pub trait State {
    fn id(&self) -> StateId;

    fn has_transition(&self, code_point: char) -> bool;

    /// The transition whose label starts with `code_point`.
    ///
    /// # Panics
    ///
    /// Panics if there is no such transition. Callers check
    /// [`has_transition`](State::has_transition) first, or know from the
    /// construction invariants that it exists.
    fn transition(&self, code_point: char) -> &Transition;

    /// The state representing this state's string minus its first code point.
    ///
    /// # Panics
    ///
    /// Panics if the link has not been set.
    fn suffix_link(&self) -> StateId;

    fn is_leaf(&self) -> bool;
}

/// A state that is materialised in the tree: the root, every branching
/// state, and every leaf.
#[derive(Debug)]
pub struct ExplicitState {
    id: StateId,
    transitions: BTreeMap<char, Transition>,
    suffix_link: Option<StateId>,
}

impl ExplicitState {
    pub(crate) fn new(id: StateId) -> Self {
        Self {
            id,
            transitions: BTreeMap::new(),
            suffix_link: None,
        }
    }

    /// Outgoing transitions, ordered by first code point.
    pub fn transitions(&self) -> Transitions<'_> {
        self.transitions.values()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub fn has_suffix_link(&self) -> bool {
        self.suffix_link.is_some()
    }

    /// Adds the transition starting with `code_point`.
    ///
    /// # Panics
    ///
    /// Panics if a transition for `code_point` already exists. A state never
    /// overwrites a transition during construction.
    pub(crate) fn set_transition(&mut self, code_point: char, edge: Edge, target: StateId) {
        assert!(
            !self.transitions.contains_key(&code_point),
            "state {} already has a transition for {:?}",
            self.id,
            code_point
        );
        self.transitions.insert(code_point, Transition { edge, target });
    }

    /// Sets the suffix link. A link is set once; repeating the same target
    /// is accepted.
    ///
    /// # Panics
    ///
    /// Panics if the state already links to a different state.
    pub(crate) fn set_suffix_link(&mut self, target: StateId) {
        assert!(
            self.suffix_link.map_or(true, |existing| existing == target),
            "state {} already links to {:?}, refusing to relink to {}",
            self.id,
            self.suffix_link,
            target
        );
        self.suffix_link = Some(target);
    }

    /// Breaks the transition starting at `text[left]` in two.
    ///
    /// The transition is shortened to end at `right` and redirected to a new
    /// state `r`, which gets the remainder of the old label and the old
    /// target. `r` is returned for the caller to store under
    /// `intermediate_id`.
    pub(crate) fn split(
        &mut self,
        text: &CodepointString,
        left: Index,
        right: Index,
        intermediate_id: StateId,
    ) -> ExplicitState {
        let code_point = text.at_position(left);
        let old = self.transitions.remove(&code_point).unwrap_or_else(|| {
            panic!("state {} has no transition for {:?} to split", self.id, code_point)
        });
        let old_left = old.edge.left();
        let head_right = old_left + right - left;
        debug_assert!(
            head_right < old.edge.right(),
            "split point must fall strictly inside the edge"
        );

        let mut intermediate = ExplicitState::new(intermediate_id);
        let tail_left = head_right + 1;
        intermediate.set_transition(
            text.at_position(tail_left),
            Edge::new(tail_left, old.edge.right),
            old.target,
        );
        self.set_transition(
            code_point,
            Edge::new(old_left, RightPointer::Owned(head_right)),
            intermediate_id,
        );
        intermediate
    }
}

impl State for ExplicitState {
    fn id(&self) -> StateId {
        self.id
    }

    fn has_transition(&self, code_point: char) -> bool {
        self.transitions.contains_key(&code_point)
    }

    fn transition(&self, code_point: char) -> &Transition {
        self.transitions.get(&code_point).unwrap_or_else(|| {
            panic!("state {} has no transition for {:?}", self.id, code_point)
        })
    }

    fn suffix_link(&self) -> StateId {
        self.suffix_link
            .unwrap_or_else(|| panic!("state {} has no suffix link", self.id))
    }

    fn is_leaf(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// The state "below" the root.
///
/// For every code point of the text it has a one-symbol transition to the
/// root, labelled with a negative position pair `(j, j)`. Following any of
/// them consumes exactly one code point, which is what lets the first
/// construction steps run without special cases.
#[derive(Debug)]
pub struct AuxiliaryState {
    transitions: BTreeMap<char, Transition>,
}

impl AuxiliaryState {
    /// Builds the auxiliary state for the alphabet of `text`.
    pub(crate) fn new(text: &CodepointString) -> Self {
        let transitions = text
            .unique_code_points()
            .into_iter()
            .zip(1..)
            .map(|(code_point, n): (char, Index)| {
                let edge = Edge::new(-n, RightPointer::Owned(-n));
                (code_point, Transition { edge, target: ROOT })
            })
            .collect();
        Self { transitions }
    }

    /// Number of code points that have a transition to the root.
    pub fn alphabet_size(&self) -> usize {
        self.transitions.len()
    }
}

impl State for AuxiliaryState {
    fn id(&self) -> StateId {
        AUXILIARY
    }

    fn has_transition(&self, code_point: char) -> bool {
        self.transitions.contains_key(&code_point)
    }

    fn transition(&self, code_point: char) -> &Transition {
        self.transitions.get(&code_point).unwrap_or_else(|| {
            panic!("{:?} is not part of the alphabet", code_point)
        })
    }

    fn suffix_link(&self) -> StateId {
        unreachable!("the auxiliary state has no suffix link")
    }

    fn is_leaf(&self) -> bool {
        self.transitions.is_empty()
    }
}
