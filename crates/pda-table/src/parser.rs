//! Parser for per-state transition tables.
//!
//! One block describes one state:
//!
//! ```text
//! *0, Z,    P
//! (,  1/PZ, /PP
//! ),  ,     /
//! ```
//!
//! The header names the state (`*` marks it final) and the stack symbols,
//! one per column. Each body row starts with the input symbol (empty for an
//! epsilon row) followed by one entry per column. An entry is empty (no
//! move) or `next/push`, where an empty `next` keeps the current state and
//! `push` lists the replacement symbols top first.

use log::debug;

use crate::source::SourceLine;

/// Source location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number.
    pub column: usize,
}

/// Parse error with source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Location of the error.
    pub location: SourceLocation,
    /// Kind of parse error.
    pub kind: ParseErrorKind,
}

/// Classification of parse errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A row has a different number of cells than its header.
    DimensionMismatch {
        /// Cells in the header row.
        expected: usize,
        /// Cells in the offending row.
        found: usize,
    },
    /// Header state cell is not a (optionally `*`-prefixed) integer.
    InvalidState(String),
    /// Input or stack symbol is not exactly one character.
    InvalidSymbol(String),
    /// Header stack cell is empty.
    EmptyStackSymbol,
    /// Entry lacks the `/` between destination and push.
    MissingSlash(String),
    /// Entry destination is not an integer.
    InvalidDestination(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DimensionMismatch { expected, found } => {
                write!(f, "dimension error: expected {expected} cells, found {found}")
            }
            Self::InvalidState(s) => write!(f, "invalid state: {s}"),
            Self::InvalidSymbol(s) => write!(f, "symbol must be one character: {s}"),
            Self::EmptyStackSymbol => write!(f, "empty stack symbol in header"),
            Self::MissingSlash(e) => write!(f, "entry missing '/': {e}"),
            Self::InvalidDestination(d) => write!(f, "invalid destination state: {d}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// One `next/push` table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Destination state, or `None` to stay in the table's state.
    pub next: Option<u32>,
    /// Replacement symbols as written: first character ends up on top.
    pub push: Vec<char>,
}

/// A body row: input symbol plus one optional entry per stack column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Consumed input symbol, `None` for an epsilon row.
    pub input: Option<char>,
    /// Entries aligned with [`StateTable::stack`].
    pub entries: Vec<Option<Entry>>,
    /// Original line of the row.
    pub line: usize,
}

/// The parsed table of a single state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTable {
    /// State this table describes.
    pub state: u32,
    /// Whether the header marked the state final.
    pub is_final: bool,
    /// Stack symbol of each column.
    pub stack: Vec<char>,
    /// Body rows in source order.
    pub rows: Vec<Row>,
    /// Original line of the header.
    pub line: usize,
}

/// Result of parsing a table block.
pub type ParseResult = Result<StateTable, ParseError>;

/// A trimmed cell and the 1-indexed column where its text starts.
struct Cell<'a> {
    text: &'a str,
    column: usize,
}

impl<'a> Cell<'a> {
    fn at(&self, line: usize, kind: ParseErrorKind) -> ParseError {
        ParseError {
            location: SourceLocation {
                line,
                column: self.column,
            },
            kind,
        }
    }

    fn value(&self) -> Option<&'a str> {
        (!self.text.is_empty()).then_some(self.text)
    }
}

fn split_cells(text: &str) -> Vec<Cell<'_>> {
    let mut cells = Vec::new();
    let mut offset = 0;
    for raw in text.split(',') {
        let leading = raw.len() - raw.trim_start().len();
        cells.push(Cell {
            text: raw.trim(),
            column: text[..offset + leading].chars().count() + 1,
        });
        offset += raw.len() + 1;
    }
    cells
}

/// Parses one block (header plus body rows) into a [`StateTable`].
///
/// # Errors
///
/// Returns a `ParseError` for malformed headers, symbols, or entries, and
/// for rows whose cell count differs from the header's. An empty block is
/// reported as an invalid state at line 0.
pub fn parse_table(block: &[SourceLine]) -> ParseResult {
    let Some((header, body)) = block.split_first() else {
        return Err(ParseError {
            location: SourceLocation { line: 0, column: 1 },
            kind: ParseErrorKind::InvalidState(String::new()),
        });
    };

    let header_cells = split_cells(&header.text);
    let (state_cell, stack_cells) = header_cells
        .split_first()
        .ok_or_else(|| ParseError {
            location: SourceLocation {
                line: header.original_line,
                column: 1,
            },
            kind: ParseErrorKind::InvalidState(header.text.clone()),
        })?;
    let (state, is_final) = parse_state(state_cell, header.original_line)?;

    let stack = stack_cells
        .iter()
        .map(|cell| match cell.value() {
            None => Err(cell.at(header.original_line, ParseErrorKind::EmptyStackSymbol)),
            Some(text) => single_char(text).ok_or_else(|| {
                cell.at(
                    header.original_line,
                    ParseErrorKind::InvalidSymbol(text.into()),
                )
            }),
        })
        .collect::<Result<Vec<_>, _>>()?;

    let rows = body
        .iter()
        .map(|line| parse_row(line, header_cells.len()))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "parsed table for state {state}{}: {} columns, {} rows",
        if is_final { " (final)" } else { "" },
        stack.len(),
        rows.len()
    );

    Ok(StateTable {
        state,
        is_final,
        stack,
        rows,
        line: header.original_line,
    })
}

fn parse_state(cell: &Cell<'_>, line: usize) -> Result<(u32, bool), ParseError> {
    let (digits, is_final) = cell
        .text
        .strip_prefix('*')
        .map_or((cell.text, false), |rest| (rest.trim_start(), true));
    digits
        .parse::<u32>()
        .map(|state| (state, is_final))
        .map_err(|_| cell.at(line, ParseErrorKind::InvalidState(cell.text.into())))
}

fn parse_row(line: &SourceLine, width: usize) -> Result<Row, ParseError> {
    let cells = split_cells(&line.text);
    if cells.len() != width {
        return Err(ParseError {
            location: SourceLocation {
                line: line.original_line,
                column: 1,
            },
            kind: ParseErrorKind::DimensionMismatch {
                expected: width,
                found: cells.len(),
            },
        });
    }

    let (input_cell, entry_cells) = cells.split_first().ok_or_else(|| ParseError {
        location: SourceLocation {
            line: line.original_line,
            column: 1,
        },
        kind: ParseErrorKind::DimensionMismatch {
            expected: width,
            found: 0,
        },
    })?;

    let input = input_cell
        .value()
        .map(|text| {
            single_char(text).ok_or_else(|| {
                input_cell.at(line.original_line, ParseErrorKind::InvalidSymbol(text.into()))
            })
        })
        .transpose()?;

    let entries = entry_cells
        .iter()
        .map(|cell| parse_entry(cell, line.original_line))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Row {
        input,
        entries,
        line: line.original_line,
    })
}

fn parse_entry(cell: &Cell<'_>, line: usize) -> Result<Option<Entry>, ParseError> {
    let Some(text) = cell.value() else {
        return Ok(None);
    };
    let (next, push) = text
        .split_once('/')
        .ok_or_else(|| cell.at(line, ParseErrorKind::MissingSlash(text.into())))?;

    let next = next.trim();
    let next = if next.is_empty() {
        None
    } else {
        Some(
            next.parse::<u32>()
                .map_err(|_| cell.at(line, ParseErrorKind::InvalidDestination(next.into())))?,
        )
    };

    Ok(Some(Entry {
        next,
        push: push.trim().chars().collect(),
    }))
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    let first = chars.next()?;
    chars.next().is_none().then_some(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(text: &str) -> Vec<SourceLine> {
        text.lines()
            .enumerate()
            .map(|(idx, line)| SourceLine {
                text: line.to_string(),
                original_line: idx + 1,
            })
            .collect()
    }

    #[test]
    fn parses_header_rows_and_entries() {
        let table = parse_table(&block("*0, Z, P\n(, 1/PZ, /PP\n), , /")).expect("valid");

        assert_eq!(table.state, 0);
        assert!(table.is_final);
        assert_eq!(table.stack, ['Z', 'P']);
        assert_eq!(table.rows.len(), 2);

        let open = &table.rows[0];
        assert_eq!(open.input, Some('('));
        assert_eq!(
            open.entries,
            [
                Some(Entry {
                    next: Some(1),
                    push: vec!['P', 'Z'],
                }),
                Some(Entry {
                    next: None,
                    push: vec!['P', 'P'],
                }),
            ]
        );

        let close = &table.rows[1];
        assert_eq!(close.input, Some(')'));
        assert_eq!(
            close.entries,
            [
                None,
                Some(Entry {
                    next: None,
                    push: vec![],
                })
            ]
        );
    }

    #[test]
    fn empty_input_cell_is_epsilon_row() {
        let table = parse_table(&block("3, Z\n, 0/Z")).expect("valid");

        assert!(!table.is_final);
        assert_eq!(table.rows[0].input, None);
        assert_eq!(table.rows[0].entries[0].as_ref().and_then(|e| e.next), Some(0));
    }

    #[test]
    fn header_without_columns_accepts_input_only_rows() {
        let table = parse_table(&block("*7\na")).expect("valid");
        assert!(table.stack.is_empty());
        assert!(table.rows[0].entries.is_empty());
    }

    #[test]
    fn short_row_is_dimension_error() {
        let err = parse_table(&block("0, Z, P\n(, 1/Z")).expect_err("short row");

        assert_eq!(err.location, SourceLocation { line: 2, column: 1 });
        assert_eq!(
            err.kind,
            ParseErrorKind::DimensionMismatch {
                expected: 3,
                found: 2
            }
        );
        assert_eq!(err.to_string(), "dimension error: expected 3 cells, found 2");
    }

    #[test]
    fn invalid_state_reports_header_cell() {
        let err = parse_table(&block("*q, Z")).expect_err("bad state");
        assert_eq!(err.kind, ParseErrorKind::InvalidState("*q".into()));
        assert_eq!(err.location, SourceLocation { line: 1, column: 1 });
    }

    #[test]
    fn multi_character_symbols_are_rejected() {
        let err = parse_table(&block("0, ZZ")).expect_err("wide stack symbol");
        assert_eq!(err.kind, ParseErrorKind::InvalidSymbol("ZZ".into()));
        assert_eq!(err.location.column, 4);

        let err = parse_table(&block("0, Z\nab, 0/Z")).expect_err("wide input");
        assert_eq!(err.kind, ParseErrorKind::InvalidSymbol("ab".into()));
        assert_eq!(err.location.line, 2);
    }

    #[test]
    fn empty_stack_header_cell_is_rejected() {
        let err = parse_table(&block("0, Z, , P")).expect_err("empty column");
        assert_eq!(err.kind, ParseErrorKind::EmptyStackSymbol);
        assert_eq!(err.location.column, 7);
    }

    #[test]
    fn entry_without_slash_is_rejected() {
        let err = parse_table(&block("0, Z\na, 1Z")).expect_err("no slash");
        assert_eq!(err.kind, ParseErrorKind::MissingSlash("1Z".into()));
        assert_eq!(err.location, SourceLocation { line: 2, column: 4 });
    }

    #[test]
    fn non_numeric_destination_is_rejected() {
        let err = parse_table(&block("0, Z\na, x/Z")).expect_err("bad destination");
        assert_eq!(err.kind, ParseErrorKind::InvalidDestination("x".into()));
    }

    #[test]
    fn explicit_zero_destination_is_state_zero() {
        let table = parse_table(&block("4, Z\na, 0/Z")).expect("valid");
        assert_eq!(table.rows[0].entries[0].as_ref().and_then(|e| e.next), Some(0));
    }
}
