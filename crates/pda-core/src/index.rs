//! Per-state transition lookup with determinism validation.
//!
//! Every `(state, stack symbol)` pair resolves to at most one slot kind: a
//! single epsilon move, or a map of lettered moves keyed by input symbol.
//! Mixing the two would let the automaton choose between a shift and a
//! spontaneous move, so the builder rejects it.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::error::BuildError;
use crate::transition::{Move, Symbol, Transition};

/// Resolution for one stack symbol within a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot<S, A, T> {
    /// Unconditional move that does not consume input.
    Epsilon(Move<S, T>),
    /// Moves keyed by the input symbol they consume.
    Lettered(BTreeMap<A, Move<S, T>>),
}

/// Move selected by a lookup, tagged with whether it consumes input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step<'a, S, T> {
    /// Lettered move; the input position advances.
    Consume(&'a Move<S, T>),
    /// Epsilon move; the input position stays.
    Epsilon(&'a Move<S, T>),
}

impl<'a, S, T> Step<'a, S, T> {
    /// Returns the move regardless of kind.
    #[must_use]
    pub const fn target(&self) -> &'a Move<S, T> {
        match self {
            Self::Consume(target) | Self::Epsilon(target) => *target,
        }
    }

    /// Returns true when the step consumes the current input symbol.
    #[must_use]
    pub const fn consumes(&self) -> bool {
        matches!(self, Self::Consume(_))
    }
}

/// Immutable lookup table for the rules leaving one state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionIndex<S, A, T> {
    slots: BTreeMap<T, Slot<S, A, T>>,
}

impl<S, A, T> Default for TransitionIndex<S, A, T> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<S: Symbol, A: Symbol, T: Symbol> TransitionIndex<S, A, T> {
    /// Builds the index for `state` from the rules whose source is `state`.
    ///
    /// Lettered rules are placed first; epsilon rules are then installed only
    /// into stack slots that have no lettered entry.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] when two rules would make a lookup ambiguous:
    /// an epsilon rule next to lettered rules, two lettered rules with the same
    /// input, or two epsilon rules, all for the same stack symbol.
    pub fn build<'r, I>(state: &S, rules: I) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = &'r Transition<S, A, T>>,
        S: 'r,
        A: 'r,
        T: 'r,
    {
        let mut lettered: BTreeMap<T, BTreeMap<A, Move<S, T>>> = BTreeMap::new();
        let mut epsilon: Vec<&Transition<S, A, T>> = Vec::new();

        for rule in rules {
            debug_assert!(rule.state == *state, "rule indexed under a foreign state");
            let Some(input) = &rule.input else {
                epsilon.push(rule);
                continue;
            };
            let moves = lettered.entry(rule.stack.clone()).or_default();
            match moves.entry(input.clone()) {
                Entry::Occupied(_) => {
                    return Err(BuildError::DuplicateInput {
                        state: format!("{state:?}"),
                        stack: format!("{:?}", rule.stack),
                        input: format!("{input:?}"),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(rule.next.clone());
                }
            }
        }

        let mut slots: BTreeMap<T, Slot<S, A, T>> = lettered
            .into_iter()
            .map(|(stack, moves)| (stack, Slot::Lettered(moves)))
            .collect();

        for rule in epsilon {
            match slots.entry(rule.stack.clone()) {
                Entry::Occupied(existing) => {
                    let stack = format!("{:?}", rule.stack);
                    let state = format!("{state:?}");
                    return Err(match existing.get() {
                        Slot::Lettered(_) => BuildError::EpsilonConflict { state, stack },
                        Slot::Epsilon(_) => BuildError::DuplicateEpsilon { state, stack },
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(Slot::Epsilon(rule.next.clone()));
                }
            }
        }

        Ok(Self { slots })
    }

    /// Resolves the move for `stack` on top, reading `input`.
    ///
    /// `input == None` stands for the end-of-input sentinel: it never matches
    /// a lettered move but still takes an epsilon move.
    #[must_use]
    pub fn lookup(&self, input: Option<&A>, stack: &T) -> Option<Step<'_, S, T>> {
        match self.slots.get(stack)? {
            Slot::Epsilon(target) => Some(Step::Epsilon(target)),
            Slot::Lettered(moves) => input.and_then(|a| moves.get(a)).map(Step::Consume),
        }
    }

    /// Returns the slot registered for `stack`, if any.
    #[must_use]
    pub fn slot(&self, stack: &T) -> Option<&Slot<S, A, T>> {
        self.slots.get(stack)
    }

    /// Iterates every input symbol that keys a lettered move.
    pub fn inputs(&self) -> impl Iterator<Item = &A> + '_ {
        self.slots
            .values()
            .filter_map(|slot| match slot {
                Slot::Lettered(moves) => Some(moves.keys()),
                Slot::Epsilon(_) => None,
            })
            .flatten()
    }

    /// Number of rules held by the index.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots
            .values()
            .map(|slot| match slot {
                Slot::Epsilon(_) => 1,
                Slot::Lettered(moves) => moves.len(),
            })
            .sum()
    }

    /// Returns true when the state has no outgoing rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
