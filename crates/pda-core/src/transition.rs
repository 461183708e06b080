//! Transition records supplied by table front-ends.

use std::fmt::Debug;

/// Bound shared by state, input, and stack symbol types.
///
/// Symbols are opaque: the engine only clones, orders, and renders them.
pub trait Symbol: Clone + Ord + Debug {}

impl<T: Clone + Ord + Debug> Symbol for T {}

/// Destination half of a transition: the next state and the symbols pushed
/// in place of the popped stack top.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Move<S, T> {
    /// State entered after the move.
    pub state: S,
    /// Symbols pushed in order; the last element becomes the new top.
    pub push: Vec<T>,
}

impl<S, T> Move<S, T> {
    /// Creates a move to `state` pushing `push` in order.
    #[must_use]
    pub const fn new(state: S, push: Vec<T>) -> Self {
        Self { state, push }
    }
}

/// One immutable transition rule.
///
/// `input == None` marks an epsilon move that leaves the input untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Transition<S, A, T> {
    /// Source state.
    pub state: S,
    /// Consumed input symbol, or `None` for an epsilon move.
    pub input: Option<A>,
    /// Stack symbol that must be on top (and is popped).
    pub stack: T,
    /// Where the rule leads.
    pub next: Move<S, T>,
}

impl<S, A, T> Transition<S, A, T> {
    /// Creates a rule consuming `input` with `stack` on top.
    #[must_use]
    pub const fn lettered(state: S, input: A, stack: T, next: Move<S, T>) -> Self {
        Self {
            state,
            input: Some(input),
            stack,
            next,
        }
    }

    /// Creates an epsilon rule taken whenever `stack` is on top.
    #[must_use]
    pub const fn epsilon(state: S, stack: T, next: Move<S, T>) -> Self {
        Self {
            state,
            input: None,
            stack,
            next,
        }
    }

    /// Returns true when the rule does not consume input.
    #[must_use]
    pub const fn is_epsilon(&self) -> bool {
        self.input.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{Move, Transition};

    #[test]
    fn constructors_set_input_kind() {
        let shift = Transition::lettered(0, '(', 'Z', Move::new(0, vec!['Z', 'P']));
        let spontaneous = Transition::<_, char, _>::epsilon(0, 'Z', Move::new(1, vec!['Z']));

        assert!(!shift.is_epsilon());
        assert_eq!(shift.input, Some('('));
        assert!(spontaneous.is_epsilon());
        assert_eq!(spontaneous.next.state, 1);
    }
}
