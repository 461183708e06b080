use thiserror::Error;

/// Construction-time failures raised while indexing a transition set.
///
/// Symbols are carried in their `Debug` rendering so the error type stays
/// independent of the automaton's symbol types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum BuildError {
    /// A `(state, stack)` slot has both an epsilon rule and lettered rules.
    #[error("non-deterministic: state {state} offers both epsilon and lettered moves on stack symbol {stack}")]
    EpsilonConflict {
        /// Source state of the conflicting rules.
        state: String,
        /// Stack symbol shared by the conflicting rules.
        stack: String,
    },
    /// Two lettered rules share the same `(state, stack, input)` key.
    #[error("non-deterministic: state {state} has two moves on input {input} with stack symbol {stack}")]
    DuplicateInput {
        /// Source state of the conflicting rules.
        state: String,
        /// Stack symbol shared by the conflicting rules.
        stack: String,
        /// Input symbol shared by the conflicting rules.
        input: String,
    },
    /// Two epsilon rules share the same `(state, stack)` key.
    #[error("non-deterministic: state {state} has two epsilon moves on stack symbol {stack}")]
    DuplicateEpsilon {
        /// Source state of the conflicting rules.
        state: String,
        /// Stack symbol shared by the conflicting rules.
        stack: String,
    },
}

impl BuildError {
    /// Returns the rendered source state the conflict was found in.
    #[must_use]
    pub fn state(&self) -> &str {
        match self {
            Self::EpsilonConflict { state, .. }
            | Self::DuplicateInput { state, .. }
            | Self::DuplicateEpsilon { state, .. } => state,
        }
    }

    /// Returns the rendered stack symbol of the conflicting slot.
    #[must_use]
    pub fn stack(&self) -> &str {
        match self {
            Self::EpsilonConflict { stack, .. }
            | Self::DuplicateInput { stack, .. }
            | Self::DuplicateEpsilon { stack, .. } => stack,
        }
    }
}
