//! Exhaustive, time-bounded search for accepted words.
//!
//! The driver draws candidates from a [`WordEnumerator`] over the automaton's
//! alphabet, re-arms the automaton before each one, and reports accepted
//! words in enumeration order as they are found. The deadline is polled
//! between candidates; a run that has started always completes, and a
//! deadline that passes after the last candidate still counts as exhaustion.

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::automaton::{Automaton, Configuration, Verdict};
use crate::config::FuzzConfig;
use crate::enumerate::WordEnumerator;
use crate::transition::Symbol;

/// Why a fuzz run stopped drawing candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StopReason {
    /// Every word up to the length bound was tested.
    Exhausted,
    /// The deadline passed before enumeration finished.
    Deadline,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exhausted => f.write_str("exhausted"),
            Self::Deadline => f.write_str("timeout"),
        }
    }
}

/// Aggregated outcome of one fuzz run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct FuzzReport {
    /// Candidates presented to the automaton.
    pub words_tested: usize,
    /// Candidates accepted and reported.
    pub accepted: usize,
    /// Candidates cut off by the epsilon ceiling.
    pub inconclusive: usize,
    /// Length of the last candidate tested.
    pub last_length: usize,
    /// Why the run ended.
    pub stop: StopReason,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Drives one automaton through every word up to a length bound.
///
/// The automaton does not remember its starting configuration once runs have
/// mutated it, so the caller supplies the configuration to re-arm from.
#[derive(Debug)]
pub struct Fuzzer<'a, S, A, T> {
    automaton: &'a mut Automaton<S, A, T>,
    initial: Configuration<S, T>,
    max_word_len: usize,
}

impl<'a, S: Symbol, A: Symbol, T: Symbol> Fuzzer<'a, S, A, T> {
    /// Creates a driver that re-arms `automaton` to `initial` before each
    /// candidate of at most `max_word_len` symbols.
    #[must_use]
    pub fn new(
        automaton: &'a mut Automaton<S, A, T>,
        initial: Configuration<S, T>,
        max_word_len: usize,
    ) -> Self {
        Self {
            automaton,
            initial,
            max_word_len,
        }
    }

    /// Runs until enumeration is exhausted or `budget` has elapsed.
    pub fn run<F>(&mut self, budget: Duration, on_accept: F) -> FuzzReport
    where
        F: FnMut(&[A]),
    {
        self.drive(Instant::now().checked_add(budget), on_accept)
    }

    /// Runs until enumeration is exhausted or `deadline` has passed.
    pub fn run_until<F>(&mut self, deadline: Instant, on_accept: F) -> FuzzReport
    where
        F: FnMut(&[A]),
    {
        self.drive(Some(deadline), on_accept)
    }

    /// Runs every candidate regardless of time.
    pub fn run_to_exhaustion<F>(&mut self, on_accept: F) -> FuzzReport
    where
        F: FnMut(&[A]),
    {
        self.drive(None, on_accept)
    }

    fn drive<F>(&mut self, deadline: Option<Instant>, mut on_accept: F) -> FuzzReport
    where
        F: FnMut(&[A]),
    {
        let started = Instant::now();
        let alphabet: Vec<A> = self.automaton.alphabet().into_iter().collect();
        info!(
            "fuzzing {} input symbols up to length {}",
            alphabet.len(),
            self.max_word_len
        );

        let mut enumerator = WordEnumerator::new(&alphabet, self.max_word_len);
        let mut report = FuzzReport {
            words_tested: 0,
            accepted: 0,
            inconclusive: 0,
            last_length: 0,
            stop: StopReason::Exhausted,
            elapsed: Duration::ZERO,
        };

        loop {
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                if enumerator.size_hint() != (0, Some(0)) {
                    report.stop = StopReason::Deadline;
                }
                break;
            }
            let Some(word) = enumerator.advance() else {
                break;
            };

            self.automaton.restore(&self.initial);
            let verdict = self.automaton.run(word);
            report.words_tested += 1;
            report.last_length = word.len();

            match verdict {
                Verdict::Accepted => {
                    debug!("accepted {word:?}");
                    report.accepted += 1;
                    on_accept(word);
                }
                Verdict::Inconclusive {
                    position,
                    epsilon_steps,
                } => {
                    warn!(
                        "inconclusive {word:?}: {epsilon_steps} epsilon moves at position {position}"
                    );
                    report.inconclusive += 1;
                }
                Verdict::Rejected(_) => {}
            }
        }

        report.elapsed = started.elapsed();
        match report.stop {
            StopReason::Exhausted => info!(
                "enumeration exhausted after {} words ({} accepted) in {:?}",
                report.words_tested, report.accepted, report.elapsed
            ),
            StopReason::Deadline => warn!(
                "time budget elapsed after {} words at length {} ({} accepted)",
                report.words_tested, report.last_length, report.accepted
            ),
        }
        report
    }
}

/// Runs one fuzz pass with `config` bounds, reporting matches to `on_accept`.
pub fn fuzz<S, A, T, F>(
    automaton: &mut Automaton<S, A, T>,
    initial: Configuration<S, T>,
    config: &FuzzConfig,
    on_accept: F,
) -> FuzzReport
where
    S: Symbol,
    A: Symbol,
    T: Symbol,
    F: FnMut(&[A]),
{
    Fuzzer::new(automaton, initial, config.max_word_len).run(config.time_budget, on_accept)
}

/// Runs one fuzz pass and collects the accepted words in enumeration order.
pub fn collect_accepted<S, A, T>(
    automaton: &mut Automaton<S, A, T>,
    initial: Configuration<S, T>,
    config: &FuzzConfig,
) -> (Vec<Vec<A>>, FuzzReport)
where
    S: Symbol,
    A: Symbol,
    T: Symbol,
{
    let mut accepted = Vec::new();
    let report = fuzz(automaton, initial, config, |word| accepted.push(word.to_vec()));
    (accepted, report)
}
