//! Builds a runnable automaton from parsed state tables.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use log::debug;
use pda_core::{Automaton, Configuration, EngineConfig, Move, Transition, Verdict};

use crate::errors::LoadError;
use crate::parser::{parse_table, StateTable};
use crate::source::{extract_source, SourceContent};

/// Stack symbol every run starts with.
pub const INITIAL_STACK_SYMBOL: char = 'Z';

/// Automaton over integer states and single-character symbols.
pub type TableAutomaton = Automaton<u32, char, char>;

/// Transition rule produced from a table entry.
pub type TableTransition = Transition<u32, char, char>;

/// An automaton loaded from a description, plus the configuration runs
/// start from.
#[derive(Debug, Clone)]
pub struct TableMachine {
    /// The constructed automaton.
    pub automaton: TableAutomaton,
    /// First table's state with the initial stack symbol.
    pub initial: Configuration<u32, char>,
    /// Parsed tables in source order.
    pub tables: Vec<StateTable>,
}

impl TableMachine {
    /// Reads and builds the description at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the file cannot be read, a table is
    /// malformed, the file has no tables, or the rules are non-deterministic.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_source(&extract_source(path, &content))
    }

    /// Builds from already extracted source lines.
    ///
    /// # Errors
    ///
    /// Same as [`TableMachine::load`], minus I/O failures.
    pub fn from_source(source: &SourceContent) -> Result<Self, LoadError> {
        let tables = source
            .blocks()
            .into_iter()
            .map(parse_table)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| LoadError::Parse {
                file: source.file_path.clone(),
                error,
            })?;

        let initial_state = tables
            .first()
            .map(|table| table.state)
            .ok_or_else(|| LoadError::Empty {
                file: source.file_path.clone(),
            })?;

        let final_states: BTreeSet<u32> = tables
            .iter()
            .filter(|table| table.is_final)
            .map(|table| table.state)
            .collect();

        let automaton = Automaton::new(
            initial_state,
            final_states,
            transitions(&tables),
            INITIAL_STACK_SYMBOL,
        )?;
        debug!("loaded {} tables from {}", tables.len(), source.file_path);

        Ok(Self {
            automaton,
            initial: Configuration::initial(initial_state, INITIAL_STACK_SYMBOL),
            tables,
        })
    }

    /// Replaces the engine's execution policy.
    #[must_use]
    pub fn with_engine_config(mut self, config: EngineConfig) -> Self {
        self.automaton = self.automaton.with_config(config);
        self
    }

    /// Runs `word` from the initial configuration.
    pub fn check(&mut self, word: &[char]) -> Verdict {
        self.automaton.restore(&self.initial);
        self.automaton.run(word)
    }
}

/// Expands every table entry into a transition rule.
///
/// Entries list pushed symbols top first, so they are reversed into the
/// engine's bottom-first order; an entry without a destination stays in the
/// table's own state.
#[must_use]
pub fn transitions(tables: &[StateTable]) -> Vec<TableTransition> {
    tables.iter().flat_map(table_transitions).collect()
}

fn table_transitions(table: &StateTable) -> impl Iterator<Item = TableTransition> + '_ {
    table.rows.iter().flat_map(move |row| {
        row.entries
            .iter()
            .zip(&table.stack)
            .filter_map(move |(entry, &stack)| {
                let entry = entry.as_ref()?;
                let push = entry.push.iter().rev().copied().collect();
                Some(Transition {
                    state: table.state,
                    input: row.input,
                    stack,
                    next: Move::new(entry.next.unwrap_or(table.state), push),
                })
            })
    })
}
