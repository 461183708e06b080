//! Source ingestion for plain and literate table descriptions.
//!
//! Two formats are accepted:
//! - **Literate** (`.md`): Markdown files where fenced code blocks tagged
//!   `pda` hold the tables and everything else is prose.
//! - **Plain** (`.pda` or anything else): the whole file is the description.
//!
//! Lines keep their original line numbers so parse errors point into the
//! file the user wrote.

use std::path::Path;

/// A line of extracted source with its original location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// The source text (without trailing newline).
    pub text: String,
    /// 1-indexed line number in the original file.
    pub original_line: usize,
}

impl SourceLine {
    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Extracted description content from an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContent {
    /// All extracted lines in document order.
    pub lines: Vec<SourceLine>,
    /// The file path (for error reporting).
    pub file_path: String,
}

impl SourceContent {
    /// Groups the lines into per-state blocks.
    ///
    /// Blocks are separated by blank lines. In literate files a jump in the
    /// original line numbers (a fence boundary) also starts a new block.
    #[must_use]
    pub fn blocks(&self) -> Vec<&[SourceLine]> {
        let mut blocks = Vec::new();
        let mut start: Option<usize> = None;

        for (idx, line) in self.lines.iter().enumerate() {
            let contiguous = idx
                .checked_sub(1)
                .and_then(|prev| self.lines.get(prev))
                .is_some_and(|prev| prev.original_line + 1 == line.original_line);

            if let Some(begin) = start {
                if line.is_blank() || !contiguous {
                    blocks.push(&self.lines[begin..idx]);
                    start = None;
                }
            }
            if start.is_none() && !line.is_blank() {
                start = Some(idx);
            }
        }
        if let Some(begin) = start {
            blocks.push(&self.lines[begin..]);
        }

        blocks
    }
}

/// Extracts the table description from a file's content.
///
/// For `.md` files, extracts content from fenced code blocks tagged `pda`.
/// For all other files, treats the entire content as the description.
#[must_use]
pub fn extract_source(file_path: &Path, content: &str) -> SourceContent {
    let file_path_str = file_path.to_string_lossy().to_string();

    let lines = if is_literate_file(file_path) {
        extract_literate_source(content)
    } else {
        extract_plain_source(content)
    };

    SourceContent {
        lines,
        file_path: file_path_str,
    }
}

fn is_literate_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

fn extract_plain_source(content: &str) -> Vec<SourceLine> {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| SourceLine {
            text: line.to_string(),
            original_line: idx + 1,
        })
        .collect()
}

/// Collects the lines of every `pda` fence in document order.
///
/// A fence closes on a backtick run at least as long as the one that opened
/// it; shorter runs inside the block are content.
fn extract_literate_source(content: &str) -> Vec<SourceLine> {
    let mut lines = Vec::new();
    let mut open_fence: Option<usize> = None;

    for (idx, line) in content.lines().enumerate() {
        let fence = fence_length(line);
        match (open_fence, fence) {
            (Some(open), Some(len)) if len >= open => open_fence = None,
            (None, Some(len)) => {
                let tag = line.trim_start()[len..].trim();
                if tag == "pda" {
                    open_fence = Some(len);
                }
            }
            (Some(_), _) => lines.push(SourceLine {
                text: line.to_string(),
                original_line: idx + 1,
            }),
            (None, None) => {}
        }
    }

    lines
}

/// Number of leading backticks when the line is a fence delimiter (3 or more).
fn fence_length(line: &str) -> Option<usize> {
    let count = line.trim_start().chars().take_while(|&c| c == '`').count();
    (count >= 3).then_some(count)
}
