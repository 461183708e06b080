//! CLI entry point for the `pda-fuzz` binary.
//!
//! # Usage
//!
//! ```bash
//! # Print every accepted word of up to 12 symbols, within the default budget
//! pda-fuzz fuzz parens.pda --max-len 12
//!
//! # Decide individual words
//! pda-fuzz check parens.pda "()" "(()"
//!
//! # Show the input symbols the fuzzer will enumerate
//! pda-fuzz alphabet parens.pda.md
//! ```

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use log::debug;
use pda_core::{
    EngineConfig, FuzzReport, Fuzzer, StopReason, Verdict, DEFAULT_EPSILON_LIMIT,
    DEFAULT_MAX_WORD_LEN, DEFAULT_TIME_BUDGET,
};
use pda_table::{LoadError, TableMachine};
#[cfg(test)]
use tempfile as _;
use thiserror as _;

#[derive(Debug, Parser)]
#[command(name = "pda-fuzz")]
#[command(about = "Exhaustive word fuzzer for deterministic pushdown automata")]
#[command(version)]
struct Cli {
    /// Enable debug logging (`RUST_LOG` takes precedence).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print every accepted word, shortest first, until exhaustion or timeout.
    Fuzz {
        /// Table description (`.pda`, or literate `.md`).
        file: PathBuf,

        /// Longest word to try.
        #[arg(long, default_value_t = DEFAULT_MAX_WORD_LEN)]
        max_len: usize,

        /// Wall-clock budget in milliseconds [default: 2000].
        #[arg(long)]
        budget_ms: Option<u64>,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Print accept, reject, or inconclusive for each word.
    Check {
        /// Table description (`.pda`, or literate `.md`).
        file: PathBuf,

        /// Words to decide; each character is one input symbol.
        #[arg(required = true)]
        words: Vec<String>,

        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Print the input alphabet in enumeration order, one symbol per line.
    Alphabet {
        /// Table description (`.pda`, or literate `.md`).
        file: PathBuf,
    },
}

#[derive(Debug, Args)]
struct EngineArgs {
    /// Maximum consecutive epsilon moves at one input position.
    #[arg(long, default_value_t = DEFAULT_EPSILON_LIMIT, conflicts_with = "no_epsilon_limit")]
    epsilon_limit: usize,

    /// Remove the epsilon ceiling; an epsilon cycle then never terminates.
    #[arg(long)]
    no_epsilon_limit: bool,
}

impl EngineArgs {
    const fn config(&self) -> EngineConfig {
        if self.no_epsilon_limit {
            EngineConfig::unguarded()
        } else {
            EngineConfig {
                epsilon_limit: Some(self.epsilon_limit),
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load(file: &Path, engine: Option<&EngineArgs>) -> Result<TableMachine, i32> {
    let machine = TableMachine::load(file).map_err(|e| {
        report_load_error(&e);
        1
    })?;
    Ok(match engine {
        Some(args) => {
            let config = args.config();
            debug!("engine config: {config:?}");
            machine.with_engine_config(config)
        }
        None => machine,
    })
}

fn report_load_error(e: &LoadError) {
    match e {
        LoadError::Parse { file, error } => eprintln!(
            "{file}:{}:{}: error: {}",
            error.location.line, error.location.column, error.kind
        ),
        other => eprintln!("error: {other}"),
    }
}

fn run_fuzz(
    file: &Path,
    max_len: usize,
    budget: Duration,
    engine: &EngineArgs,
) -> Result<(), i32> {
    let mut machine = load(file, Some(engine))?;
    let initial = machine.initial.clone();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut written: io::Result<()> = Ok(());

    let report = Fuzzer::new(&mut machine.automaton, initial, max_len).run(budget, |word| {
        if written.is_ok() {
            written = writeln!(out, "{}", word.iter().collect::<String>());
        }
    });

    if let Err(e) = written.and_then(|()| out.flush()) {
        eprintln!("error: failed to write output: {e}");
        return Err(1);
    }

    eprintln!("{}", format_summary(&report));
    Ok(())
}

fn format_summary(report: &FuzzReport) -> String {
    let mut summary = format!(
        "{}: {} words tested, {} accepted",
        report.stop, report.words_tested, report.accepted
    );
    if report.inconclusive > 0 {
        summary.push_str(&format!(", {} inconclusive", report.inconclusive));
    }
    if report.stop == StopReason::Deadline {
        summary.push_str(&format!(" (reached length {})", report.last_length));
    }
    summary
}

fn run_check(file: &Path, words: &[String], engine: &EngineArgs) -> Result<(), i32> {
    let mut machine = load(file, Some(engine))?;

    for word in words {
        let symbols: Vec<char> = word.chars().collect();
        let verdict = match machine.check(&symbols) {
            Verdict::Accepted => "accept",
            Verdict::Rejected(_) => "reject",
            Verdict::Inconclusive { .. } => "inconclusive",
        };
        println!("{verdict}");
    }

    Ok(())
}

fn run_alphabet(file: &Path) -> Result<(), i32> {
    let machine = load(file, None)?;
    for symbol in machine.automaton.alphabet() {
        println!("{symbol}");
    }
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.command {
        Commands::Fuzz {
            file,
            max_len,
            budget_ms,
            engine,
        } => {
            let budget = budget_ms.map_or(DEFAULT_TIME_BUDGET, Duration::from_millis);
            run_fuzz(file, *max_len, budget, engine)
        }
        Commands::Check {
            file,
            words,
            engine,
        } => run_check(file, words, engine),
        Commands::Alphabet { file } => run_alphabet(file),
    };

    std::process::exit(match result {
        Ok(()) => 0,
        Err(code) => code,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_fuzz_with_defaults() {
        let cli = Cli::try_parse_from(["pda-fuzz", "fuzz", "parens.pda"]).expect("valid args");

        let Commands::Fuzz {
            file,
            max_len,
            budget_ms,
            engine,
        } = cli.command
        else {
            panic!("expected fuzz command");
        };
        assert_eq!(file, PathBuf::from("parens.pda"));
        assert_eq!(max_len, DEFAULT_MAX_WORD_LEN);
        assert_eq!(budget_ms, None);
        assert_eq!(engine.config(), EngineConfig::default());
        assert!(!cli.verbose);
    }

    #[test]
    fn parses_fuzz_overrides() {
        let cli = Cli::try_parse_from([
            "pda-fuzz",
            "-v",
            "fuzz",
            "parens.pda",
            "--max-len",
            "8",
            "--budget-ms",
            "250",
            "--no-epsilon-limit",
        ])
        .expect("valid args");

        assert!(cli.verbose);
        let Commands::Fuzz {
            max_len,
            budget_ms,
            engine,
            ..
        } = cli.command
        else {
            panic!("expected fuzz command");
        };
        assert_eq!(max_len, 8);
        assert_eq!(budget_ms, Some(250));
        assert_eq!(engine.config(), EngineConfig::unguarded());
    }

    #[test]
    fn epsilon_limit_conflicts_with_unguarded() {
        let error = Cli::try_parse_from([
            "pda-fuzz",
            "check",
            "parens.pda",
            "()",
            "--epsilon-limit",
            "5",
            "--no-epsilon-limit",
        ])
        .expect_err("conflicting flags");
        assert_eq!(error.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn check_requires_a_word() {
        let error = Cli::try_parse_from(["pda-fuzz", "check", "parens.pda"])
            .expect_err("missing words");
        assert_eq!(
            error.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn check_accepts_empty_word_argument() {
        let cli =
            Cli::try_parse_from(["pda-fuzz", "check", "parens.pda", ""]).expect("empty word");
        let Commands::Check { words, engine, .. } = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(words, [String::new()]);
        assert_eq!(engine.config().epsilon_limit, Some(DEFAULT_EPSILON_LIMIT));
    }

    #[test]
    fn summary_distinguishes_timeout() {
        let report = FuzzReport {
            words_tested: 40,
            accepted: 3,
            inconclusive: 1,
            last_length: 5,
            stop: StopReason::Deadline,
            elapsed: Duration::from_millis(10),
        };
        assert_eq!(
            format_summary(&report),
            "timeout: 40 words tested, 3 accepted, 1 inconclusive (reached length 5)"
        );

        let exhausted = FuzzReport {
            stop: StopReason::Exhausted,
            inconclusive: 0,
            ..report
        };
        assert_eq!(
            format_summary(&exhausted),
            "exhausted: 40 words tested, 3 accepted"
        );
    }
}
