//! Failures while turning a description file into an automaton.

use pda_core::BuildError;
use thiserror::Error;

use crate::parser::ParseError;

/// Why a description could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path as given.
        path: String,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A table block is malformed.
    #[error("{file}:{}:{}: {error}", .error.location.line, .error.location.column)]
    Parse {
        /// File the block came from.
        file: String,
        /// Located parse failure.
        error: ParseError,
    },
    /// The file holds no tables, so there is no initial state.
    #[error("{file}: no state tables found")]
    Empty {
        /// File that was empty.
        file: String,
    },
    /// The tables describe a non-deterministic automaton.
    #[error(transparent)]
    Build(#[from] BuildError),
}
