//! Tabular front-end for the pushdown automaton engine.

use clap as _;
use env_logger as _;

/// Load failures surfaced to the CLI.
pub mod errors;
/// Description loading and automaton construction.
pub mod machine;
/// Per-state table parser.
pub mod parser;
/// Source loading and literate Markdown extraction.
pub mod source;

pub use errors::LoadError;
pub use machine::{transitions, TableAutomaton, TableMachine, TableTransition, INITIAL_STACK_SYMBOL};
