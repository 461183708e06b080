//! Single-path execution engine for deterministic pushdown automata.
//!
//! Determinism is established when the per-state indices are built, so a run
//! is one linear pass over the input: no backtracking and no branching.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::ControlFlow;

use log::{debug, trace};

use crate::config::EngineConfig;
use crate::error::BuildError;
use crate::index::{Step, TransitionIndex};
use crate::transition::{Symbol, Transition};

/// Mutable run configuration: current state plus stack (top = last element).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Configuration<S, T> {
    /// Current control state.
    pub state: S,
    /// Stack contents, bottom first.
    pub stack: Vec<T>,
}

impl<S, T> Configuration<S, T> {
    /// Starting configuration: `state` with a single-symbol stack.
    #[must_use]
    pub fn initial(state: S, stack_symbol: T) -> Self {
        Self {
            state,
            stack: vec![stack_symbol],
        }
    }
}

/// Why a run rejected its word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Rejection {
    /// The stack emptied while a move was still required.
    StackUnderflow {
        /// Input position being processed (word length = end of input).
        position: usize,
    },
    /// No move applies before the end of input.
    NoMove {
        /// Input position that could not be consumed.
        position: usize,
    },
    /// Input ended in a non-final state.
    NotFinal,
}

/// Outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Verdict {
    /// The word is in the language.
    Accepted,
    /// The word is not in the language.
    Rejected(Rejection),
    /// The epsilon ceiling was hit; membership is undecided.
    Inconclusive {
        /// Input position where the epsilon chain was cut off.
        position: usize,
        /// Epsilon moves taken at that position.
        epsilon_steps: usize,
    },
}

impl Verdict {
    /// Returns true for [`Verdict::Accepted`].
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Returns true for [`Verdict::Inconclusive`].
    #[must_use]
    pub const fn is_inconclusive(self) -> bool {
        matches!(self, Self::Inconclusive { .. })
    }
}

/// A deterministic pushdown automaton and its current configuration.
///
/// The instance owns its configuration exclusively. A driver arms it with
/// [`Automaton::reset`] before every independent [`Automaton::accepts`]; the
/// pair must not interleave with another run on the same instance. Parallel
/// workers should each hold their own clone.
#[derive(Debug, Clone)]
pub struct Automaton<S, A, T> {
    state: S,
    stack: Vec<T>,
    final_states: BTreeSet<S>,
    indices: BTreeMap<S, TransitionIndex<S, A, T>>,
    config: EngineConfig,
}

impl<S: Symbol, A: Symbol, T: Symbol> Automaton<S, A, T> {
    /// Builds the automaton and indexes every state it can reach by name.
    ///
    /// The state universe is the initial state, the final states, and every
    /// source and destination of a transition. States are discovered, never
    /// declared, so an unknown destination is simply added.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] when the transition set is non-deterministic.
    pub fn new<I>(
        initial_state: S,
        final_states: BTreeSet<S>,
        transitions: I,
        initial_stack: T,
    ) -> Result<Self, BuildError>
    where
        I: IntoIterator<Item = Transition<S, A, T>>,
    {
        let mut by_state: BTreeMap<S, Vec<Transition<S, A, T>>> = BTreeMap::new();
        by_state.entry(initial_state.clone()).or_default();
        for state in &final_states {
            by_state.entry(state.clone()).or_default();
        }

        let mut rule_count = 0usize;
        for transition in transitions {
            by_state.entry(transition.next.state.clone()).or_default();
            by_state
                .entry(transition.state.clone())
                .or_default()
                .push(transition);
            rule_count += 1;
        }

        let indices = by_state
            .iter()
            .map(|(state, rules)| {
                TransitionIndex::build(state, rules).map(|index| (state.clone(), index))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        debug!(
            "built automaton: {} states, {} transitions, {} final",
            indices.len(),
            rule_count,
            final_states.len()
        );

        Ok(Self {
            state: initial_state,
            stack: vec![initial_stack],
            final_states,
            indices,
            config: EngineConfig::default(),
        })
    }

    /// Replaces the execution policy.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the execution policy.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Overwrites the current configuration without validation.
    pub fn reset(&mut self, state: S, stack: Vec<T>) {
        self.state = state;
        self.stack = stack;
    }

    /// Overwrites the current configuration from a saved one, reusing the
    /// stack allocation.
    pub fn restore(&mut self, configuration: &Configuration<S, T>) {
        self.state.clone_from(&configuration.state);
        self.stack.clone_from(&configuration.stack);
    }

    /// Returns a copy of the current configuration.
    #[must_use]
    pub fn configuration(&self) -> Configuration<S, T> {
        Configuration {
            state: self.state.clone(),
            stack: self.stack.clone(),
        }
    }

    /// Current control state.
    #[must_use]
    pub const fn state(&self) -> &S {
        &self.state
    }

    /// Current stack, bottom first.
    #[must_use]
    pub fn stack(&self) -> &[T] {
        &self.stack
    }

    /// Accepting states fixed at construction.
    #[must_use]
    pub const fn final_states(&self) -> &BTreeSet<S> {
        &self.final_states
    }

    /// Returns true when `state` is accepting.
    #[must_use]
    pub fn is_final(&self, state: &S) -> bool {
        self.final_states.contains(state)
    }

    /// Iterates the state universe in canonical order.
    pub fn states(&self) -> impl Iterator<Item = &S> + '_ {
        self.indices.keys()
    }

    /// Returns the index for `state`, if it is part of the universe.
    #[must_use]
    pub fn index(&self, state: &S) -> Option<&TransitionIndex<S, A, T>> {
        self.indices.get(state)
    }

    /// Every input symbol consumed by at least one lettered move.
    ///
    /// The set is in canonical (sorted) order; an epsilon-only automaton
    /// returns an empty set.
    #[must_use]
    pub fn alphabet(&self) -> BTreeSet<A> {
        self.indices
            .values()
            .flat_map(TransitionIndex::inputs)
            .cloned()
            .collect()
    }

    /// Runs `word` from the current configuration and reports membership.
    ///
    /// Inconclusive runs report `false`; use [`Automaton::run`] to tell them
    /// apart from rejections.
    pub fn accepts(&mut self, word: &[A]) -> bool {
        self.run(word).is_accepted()
    }

    /// Runs `word` from the current configuration, mutating it in place.
    pub fn run(&mut self, word: &[A]) -> Verdict {
        for (position, symbol) in word.iter().enumerate() {
            if let ControlFlow::Break(verdict) = self.consume(symbol, position) {
                trace!("word {word:?}: {verdict:?} at position {position}");
                return verdict;
            }
        }
        let verdict = self.finish(word.len());
        trace!("word {word:?}: {verdict:?}");
        verdict
    }

    /// Takes epsilon moves until `symbol` is consumed or the run is decided.
    ///
    /// The ceiling trips only when a move past the limit is required.
    fn consume(&mut self, symbol: &A, position: usize) -> ControlFlow<Verdict> {
        let mut epsilon_steps = 0usize;
        loop {
            let Some(top) = self.stack.pop() else {
                return ControlFlow::Break(Verdict::Rejected(Rejection::StackUnderflow {
                    position,
                }));
            };
            let Some(step) = lookup(&self.indices, &self.state, Some(symbol), &top) else {
                return ControlFlow::Break(Verdict::Rejected(Rejection::NoMove { position }));
            };
            if !step.consumes() {
                if self
                    .config
                    .epsilon_limit
                    .is_some_and(|limit| epsilon_steps >= limit)
                {
                    return ControlFlow::Break(Verdict::Inconclusive {
                        position,
                        epsilon_steps,
                    });
                }
                epsilon_steps += 1;
            }
            apply(&mut self.state, &mut self.stack, &step);
            if step.consumes() {
                return ControlFlow::Continue(());
            }
        }
    }

    /// Decides the run at the end-of-input sentinel.
    ///
    /// At most one epsilon move is taken here: its destination decides.
    fn finish(&mut self, position: usize) -> Verdict {
        let Some(top) = self.stack.pop() else {
            return Verdict::Rejected(Rejection::StackUnderflow { position });
        };
        if let Some(step) = lookup(&self.indices, &self.state, None, &top) {
            apply(&mut self.state, &mut self.stack, &step);
        }
        if self.is_final(&self.state) {
            Verdict::Accepted
        } else {
            Verdict::Rejected(Rejection::NotFinal)
        }
    }
}

fn lookup<'i, S: Symbol, A: Symbol, T: Symbol>(
    indices: &'i BTreeMap<S, TransitionIndex<S, A, T>>,
    state: &S,
    input: Option<&A>,
    top: &T,
) -> Option<Step<'i, S, T>> {
    indices.get(state)?.lookup(input, top)
}

fn apply<S: Clone, T: Clone>(state: &mut S, stack: &mut Vec<T>, step: &Step<'_, S, T>) {
    let target = step.target();
    state.clone_from(&target.state);
    stack.extend(target.push.iter().cloned());
}
