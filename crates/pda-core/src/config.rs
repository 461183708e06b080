//! Engine and fuzz-run configuration.

use std::time::Duration;

/// Default ceiling on consecutive epsilon moves at one input position.
pub const DEFAULT_EPSILON_LIMIT: usize = 10_000;

/// Default longest word the fuzzer enumerates.
pub const DEFAULT_MAX_WORD_LEN: usize = 150;

/// Default wall-clock budget for one fuzz run.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(2);

/// Execution policy for an automaton instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct EngineConfig {
    /// Consecutive epsilon moves allowed at one input position before a run
    /// is reported inconclusive. `None` disables the guard, so an epsilon
    /// cycle makes the run spin forever.
    pub epsilon_limit: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epsilon_limit: Some(DEFAULT_EPSILON_LIMIT),
        }
    }
}

impl EngineConfig {
    /// Configuration without an epsilon ceiling.
    #[must_use]
    pub const fn unguarded() -> Self {
        Self {
            epsilon_limit: None,
        }
    }
}

/// Bounds for one exhaustive fuzz run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FuzzConfig {
    /// Longest word enumerated, inclusive.
    pub max_word_len: usize,
    /// Wall-clock time after which no new candidate is drawn.
    pub time_budget: Duration,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            max_word_len: DEFAULT_MAX_WORD_LEN,
            time_budget: DEFAULT_TIME_BUDGET,
        }
    }
}
