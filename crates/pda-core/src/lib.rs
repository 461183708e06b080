//! Deterministic pushdown automaton engine and exhaustive word fuzzer.

/// Transition records and the symbol bound shared by all alphabets.
pub mod transition;
pub use transition::{Move, Symbol, Transition};

/// Construction-time error taxonomy.
pub mod error;
pub use error::BuildError;

/// Per-state transition lookup with determinism validation.
pub mod index;
pub use index::{Slot, Step, TransitionIndex};

/// Engine and fuzz-run configuration.
pub mod config;
pub use config::{
    EngineConfig, FuzzConfig, DEFAULT_EPSILON_LIMIT, DEFAULT_MAX_WORD_LEN, DEFAULT_TIME_BUDGET,
};

/// Execution engine: acceptance runs and reset.
pub mod automaton;
pub use automaton::{Automaton, Configuration, Rejection, Verdict};

/// Odometer-order word enumeration.
pub mod enumerate;
pub use enumerate::{word_count, WordEnumerator};

/// Time-bounded exhaustive fuzz driver.
pub mod fuzz;
pub use fuzz::{collect_accepted, fuzz, FuzzReport, Fuzzer, StopReason};

#[cfg(test)]
use proptest as _;
