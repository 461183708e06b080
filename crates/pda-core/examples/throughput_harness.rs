//! Throughput harness for pda-core.
//!
//! Measures how many candidate words per second the engine decides, both on
//! a fixed corpus of words and when driven by the exhaustive enumerator.
//!
//! ## Usage
//!
//! ```sh
//! cargo run -p pda-core --example throughput_harness
//! ```
//!
//! Every worker thread holds its own clone of the automaton; configurations
//! are never shared between threads.

#![allow(clippy::pedantic)]

use log as _;
use pda_core::{word_count, Automaton, Configuration, Fuzzer, Move, Transition};
use proptest as _;
use rstest as _;
#[cfg(feature = "serde")]
use serde as _;
use thiserror as _;

use std::collections::BTreeSet;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

const NUM_THREADS: usize = 4;

type Machine = Automaton<u32, char, char>;

#[derive(Debug, Clone, Copy)]
struct BenchmarkResult {
    name: &'static str,
    words_per_second: f64,
    symbols_per_second: f64,
}

fn parens() -> Machine {
    let rules = vec![
        Transition::lettered(0, '(', 'Z', Move::new(1, vec!['Z', 'P'])),
        Transition::lettered(1, '(', 'P', Move::new(1, vec!['P', 'P'])),
        Transition::lettered(1, ')', 'P', Move::new(1, vec![])),
        Transition::epsilon(1, 'Z', Move::new(0, vec!['Z'])),
    ];
    match Automaton::new(0, BTreeSet::from([0]), rules, 'Z') {
        Ok(automaton) => automaton,
        Err(error) => panic!("harness automaton is deterministic: {error}"),
    }
}

fn corpus() -> Vec<Vec<char>> {
    ["", "()", "(())", "()()()", "((()())())", "(((((", ")))", "(()"]
        .iter()
        .map(|word| word.chars().collect())
        .collect()
}

fn measure<F>(name: &'static str, duration: Duration, worker: F) -> BenchmarkResult
where
    F: Fn(Machine, Duration) -> (u64, u64) + Send + Copy + 'static,
{
    let (tx, rx) = mpsc::channel();
    let template = parens();

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|_| {
            let tx = tx.clone();
            let automaton = template.clone();
            thread::spawn(move || {
                tx.send(worker(automaton, duration)).ok();
            })
        })
        .collect();

    for h in handles {
        h.join().ok();
    }

    drop(tx);

    let mut total_words = 0u64;
    let mut total_symbols = 0u64;
    for (words, symbols) in rx {
        total_words += words;
        total_symbols += symbols;
    }

    let elapsed_secs = duration.as_secs_f64();
    BenchmarkResult {
        name,
        words_per_second: total_words as f64 / elapsed_secs,
        symbols_per_second: total_symbols as f64 / elapsed_secs,
    }
}

fn corpus_worker(mut automaton: Machine, duration: Duration) -> (u64, u64) {
    let words = corpus();
    let initial = Configuration::initial(0, 'Z');
    let mut total_words = 0u64;
    let mut total_symbols = 0u64;
    let start = Instant::now();

    while start.elapsed() < duration {
        for word in &words {
            automaton.restore(&initial);
            let _ = automaton.run(word);
            total_words += 1;
            total_symbols += word.len() as u64;
        }
    }

    (total_words, total_symbols)
}

fn enumeration_worker(mut automaton: Machine, duration: Duration) -> (u64, u64) {
    let mut total_words = 0u64;
    let mut total_symbols = 0u64;
    let start = Instant::now();

    let alphabet_len = automaton.alphabet().len();
    while start.elapsed() < duration {
        let remaining = duration.saturating_sub(start.elapsed());
        let report = Fuzzer::new(&mut automaton, Configuration::initial(0, 'Z'), 14)
            .run(remaining, |_| {});
        total_words += report.words_tested as u64;
        total_symbols +=
            enumerated_symbols(alphabet_len, report.words_tested, report.last_length);
    }

    (total_words, total_symbols)
}

fn format_number(n: f64) -> String {
    if n >= 1_000_000.0 {
        format!("{:.2}M", n / 1_000_000.0)
    } else if n >= 1_000.0 {
        format!("{:.2}K", n / 1_000.0)
    } else {
        format!("{n:.2}")
    }
}

fn print_results(results: &[BenchmarkResult]) {
    println!("{:<14} {:>14} {:>16}", "benchmark", "words/s", "symbols/s (est)");
    for result in results {
        println!(
            "{:<14} {:>14} {:>16}",
            result.name,
            format_number(result.words_per_second),
            format_number(result.symbols_per_second)
        );
    }
}

/// Symbols in the first `words_tested` words of enumeration order, where
/// every length below `last_length` was covered in full.
fn enumerated_symbols(alphabet_len: usize, words_tested: usize, last_length: usize) -> u64 {
    let shorter = if last_length == 0 {
        0
    } else {
        word_count(alphabet_len, last_length - 1).unwrap_or(usize::MAX)
    };
    let mut symbols = 0u64;
    let mut per_length = 1u64;
    for length in 1..last_length {
        per_length = per_length.saturating_mul(alphabet_len as u64);
        symbols = symbols.saturating_add(per_length.saturating_mul(length as u64));
    }
    let at_last = words_tested.saturating_sub(shorter) as u64;
    symbols.saturating_add(at_last.saturating_mul(last_length as u64))
}

fn main() {
    let warmup = Duration::from_millis(500);
    let benchmark_duration = Duration::from_secs(3);

    println!("Running warmup for {warmup:?}...");
    let _ = measure("warmup", warmup, corpus_worker);

    println!("Running benchmarks for {benchmark_duration:?} each...\n");

    let corpus_result = measure("corpus", benchmark_duration, corpus_worker);
    let enumeration_result = measure("enumeration", benchmark_duration, enumeration_worker);

    print_results(&[corpus_result, enumeration_result]);
}
