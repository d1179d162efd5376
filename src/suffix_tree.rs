//! Online suffix tree construction (Ukkonen, 1995).

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::codepoint_string::CodepointString;
use crate::error::DecodeError;
use crate::state::{
    AuxiliaryState, Edge, ExplicitState, Index, RightPointer, State, StateId, AUXILIARY, ROOT,
};

/// A position in the tree: `state` followed by the text at `left..=right`.
///
/// The position may fall inside an edge, in which case it names an implicit
/// state. The pair is canonical when `state` is the closest explicit
/// ancestor of that position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferencePair {
    pub state: StateId,
    pub left: Index,
    pub right: Index,
}

impl ReferencePair {
    pub const fn new(state: StateId, left: Index, right: Index) -> Self {
        Self { state, left, right }
    }

    /// True when the pair points exactly at `state`.
    pub fn is_empty(&self) -> bool {
        self.right < self.left
    }

    pub fn len(&self) -> Index {
        if self.is_empty() {
            0
        } else {
            self.right - self.left + 1
        }
    }
}

/// A suffix tree over a single [`CodepointString`], built with Ukkonen's
/// algorithm.
///
/// The tree is created empty by [`new`](SuffixTree::new), filled by
/// [`construct`](SuffixTree::construct), and read-only afterwards.
///
/// # Examples
///
/// ```
/// use suffix_tree_lcs::SuffixTree;
///
/// let tree = SuffixTree::build("banana$").unwrap();
/// assert!(tree.contains("nan"));
/// assert!(!tree.contains("nab"));
/// ```
#[derive(Debug)]
pub struct SuffixTree {
    text: CodepointString,
    auxiliary: AuxiliaryState,
    states: Vec<ExplicitState>,
    root: StateId,
    leaf_end: Rc<Cell<Index>>,
    constructed: bool,
}

impl SuffixTree {
    /// Prepares a tree for `text` without inserting any suffix yet.
    pub fn new(text: CodepointString) -> Self {
        let auxiliary = AuxiliaryState::new(&text);
        let mut root = ExplicitState::new(ROOT);
        root.set_suffix_link(AUXILIARY);
        let root_id = match text.as_slice().first() {
            Some(&first) => auxiliary.transition(first).target,
            None => ROOT,
        };
        Self {
            text,
            auxiliary,
            states: vec![root],
            root: root_id,
            leaf_end: Rc::new(Cell::new(0)),
            constructed: false,
        }
    }

    /// Decodes `text` and constructs the complete tree.
    pub fn build(text: &str) -> Result<Self, DecodeError> {
        let mut tree = Self::new(CodepointString::from_text(text)?);
        tree.construct();
        Ok(tree)
    }

    /// Inserts every suffix of the text, one code point at a time.
    ///
    /// Calling this on an already constructed tree does nothing.
    pub fn construct(&mut self) {
        if self.constructed {
            return;
        }
        let length = self.text.len() as Index;
        let mut active = ReferencePair::new(self.root, 1, 0);
        for i in 1..=length {
            self.leaf_end.set(i);
            let updated = self.update(ReferencePair::new(active.state, active.left, i));
            active = self.canonize(updated);
        }
        self.constructed = true;
        self.verify_suffix_links();

        log::debug!(
            "constructed suffix tree over {} code points with {} explicit states ({} leaves)",
            length,
            self.states.len(),
            self.leaf_count()
        );
    }

    /// Checks whether the position `pair` already continues with
    /// `code_point`.
    ///
    /// If it does not and the position is implicit, the edge is split so the
    /// position becomes explicit. Returns the answer together with the state
    /// at the position.
    pub(crate) fn test_and_split(&mut self, pair: ReferencePair, code_point: char) -> (bool, StateId) {
        if pair.is_empty() {
            return (self.state(pair.state).has_transition(code_point), pair.state);
        }

        let edge_left = {
            let first = self.text.at_position(pair.left);
            self.state(pair.state).transition(first).edge.left()
        };
        let split_at = edge_left + pair.right - pair.left;
        if self.text.at_position(split_at + 1) == code_point {
            return (true, pair.state);
        }

        assert_ne!(pair.state, AUXILIARY, "the auxiliary state is never split");
        let id = self.states.len();
        let intermediate = self.states[pair.state].split(&self.text, edge_left, split_at, id);
        self.states.push(intermediate);
        (false, id)
    }

    /// Extends the tree by the code point at `pair.right`.
    ///
    /// `pair` is the canonical active point of the previous step, widened to
    /// the new position. Adds a leaf at every position along the boundary
    /// path that does not continue with the new code point yet, and links
    /// the states created on the way. Returns the new active point.
    pub(crate) fn update(&mut self, pair: ReferencePair) -> ReferencePair {
        let i = pair.right;
        let code_point = self.text.at_position(i);
        let mut state = pair.state;
        let mut left = pair.left;
        let mut old_r = ROOT;

        let (mut is_endpoint, mut r) =
            self.test_and_split(ReferencePair::new(state, left, i - 1), code_point);
        while !is_endpoint {
            let leaf = self.new_state();
            let edge = Edge::new(i, RightPointer::Shared(Rc::clone(&self.leaf_end)));
            self.explicit_mut(r).set_transition(code_point, edge, leaf);
            if old_r != ROOT {
                self.explicit_mut(old_r).set_suffix_link(r);
            }
            old_r = r;

            let link = self.state(state).suffix_link();
            let canonical = self.canonize(ReferencePair::new(link, left, i - 1));
            state = canonical.state;
            left = canonical.left;
            (is_endpoint, r) = self.test_and_split(ReferencePair::new(state, left, i - 1), code_point);
        }
        if old_r != ROOT {
            self.explicit_mut(old_r).set_suffix_link(state);
        }
        ReferencePair::new(state, left, i)
    }

    /// Walks `pair` down the tree until its state is the closest explicit
    /// ancestor of the position it names.
    pub(crate) fn canonize(&self, pair: ReferencePair) -> ReferencePair {
        let ReferencePair {
            mut state,
            mut left,
            right,
        } = pair;
        while left <= right {
            let transition = self.state(state).transition(self.text.at_position(left));
            let edge_len = transition.edge.len();
            if edge_len > right - left + 1 {
                break;
            }
            left += edge_len;
            state = transition.target;
        }
        ReferencePair::new(state, left, right)
    }

    // Every branching state except the root must have received its suffix
    // link during the update that created it.
    fn verify_suffix_links(&self) {
        for state in &self.states {
            if state.id() != self.root && !state.is_leaf() {
                assert!(
                    state.has_suffix_link(),
                    "state {} has no suffix link after construction",
                    state.id()
                );
            }
        }
    }

    fn new_state(&mut self) -> StateId {
        let id = self.states.len();
        self.states.push(ExplicitState::new(id));
        id
    }

    fn state(&self, id: StateId) -> &dyn State {
        if id == AUXILIARY {
            &self.auxiliary
        } else {
            &self.states[id]
        }
    }

    fn explicit_mut(&mut self, id: StateId) -> &mut ExplicitState {
        assert_ne!(id, AUXILIARY, "the auxiliary state has no mutable transitions");
        &mut self.states[id]
    }

    /// The text the tree is built over.
    pub fn text(&self) -> &CodepointString {
        &self.text
    }

    /// Number of code points in the text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    pub fn root(&self) -> &ExplicitState {
        &self.states[self.root]
    }

    pub fn auxiliary(&self) -> &AuxiliaryState {
        &self.auxiliary
    }

    /// The explicit state with the given id, if it exists.
    pub fn explicit_state(&self, id: StateId) -> Option<&ExplicitState> {
        self.states.get(id)
    }

    /// Number of explicit states, the root included.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.states.iter().filter(|state| state.is_leaf()).count()
    }

    /// Checks whether `pattern` occurs anywhere in the text.
    pub fn contains(&self, pattern: &str) -> bool {
        let mut state = self.root;
        let mut chars = pattern.chars().peekable();
        while let Some(&first) = chars.peek() {
            let current = &self.states[state];
            if !current.has_transition(first) {
                return false;
            }
            let transition = current.transition(first);
            for position in transition.edge.left()..=transition.edge.right() {
                match chars.next() {
                    None => return true,
                    Some(ch) if ch != self.text.at_position(position) => return false,
                    Some(_) => {}
                }
            }
            state = transition.target;
        }
        true
    }

    /// The label of `edge` as text.
    pub fn edge_label(&self, edge: &Edge) -> String {
        (edge.left()..=edge.right())
            .map(|position| self.text.at_position(position))
            .collect()
    }

    pub fn pretty_print(&self) {
        print!("{}", self);
    }
}

impl fmt::Display for SuffixTree {
    /// One line per edge in depth-first order, children indented by two
    /// spaces per level.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SuffixTree({})", self.text)?;
        // One pending-children iterator per level below the root.
        let mut stack = vec![self.states[self.root].transitions()];
        while let Some(children) = stack.last_mut() {
            let Some(transition) = children.next() else {
                stack.pop();
                continue;
            };
            let depth = stack.len() - 1;
            writeln!(
                f,
                "{:indent$}({}, {}) {} State({})",
                "",
                transition.edge.left(),
                transition.edge.right(),
                self.edge_label(&transition.edge),
                transition.target,
                indent = depth * 2
            )?;
            stack.push(self.states[transition.target].transitions());
        }
        Ok(())
    }
}
