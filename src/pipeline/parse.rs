//! Structured-text parsing: model replies → intermediate document model.
//!
//! Two small, pure parsers:
//!
//! * [`parse_blocks`] — splits a headed-prose reply into
//!   [`DocumentBlock`]s, one per non-blank line, with the heading depth
//!   taken from the leading `#` run.
//! * [`parse_pipe_table`] — splits a pipe-delimited reply into a
//!   [`TableModel`] grid of trimmed string cells.
//!
//! Neither parser repairs its input. In particular a data row whose
//! column count disagrees with the header is passed through untouched —
//! the assembler detects the mismatch ([`TableModel::is_rectangular`])
//! and fails the record with a defined error instead of drawing a
//! corrupted table. The HTML assembler variant needs no parser at all:
//! its table fragments are embedded verbatim.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A parsed unit of prose: heading depth and text.
///
/// `level == 0` is a body paragraph; `1..` is a heading at that depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentBlock {
    pub level: usize,
    pub text: String,
}

impl DocumentBlock {
    pub fn heading(level: usize, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self {
            level: 0,
            text: text.into(),
        }
    }

    pub fn is_heading(&self) -> bool {
        self.level > 0
    }
}

/// A rectangular-by-convention grid of string cells. The first parsed
/// row is the header; data rows are kept as-is even when ragged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableModel {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableModel {
    /// True when the table carries no rows at all (empty reply).
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }

    /// Number of columns established by the header row.
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Index and width of the first data row whose column count differs
    /// from the header, if any.
    pub fn first_ragged_row(&self) -> Option<(usize, usize)> {
        self.rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.header.len())
            .map(|(i, row)| (i + 1, row.len()))
    }

    /// True when every data row matches the header's column count.
    pub fn is_rectangular(&self) -> bool {
        self.first_ragged_row().is_none()
    }
}

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#+)\s*(.*)$").unwrap());

/// Parse a headed-prose reply into ordered [`DocumentBlock`]s.
///
/// A line whose leading characters are a run of `#` becomes a heading at
/// depth equal to the run length, with the markers and surrounding
/// whitespace stripped. Any other non-blank line is a depth-0 paragraph,
/// kept verbatim apart from trailing whitespace. Blank lines are dropped.
pub fn parse_blocks(text: &str) -> Vec<DocumentBlock> {
    let mut blocks = Vec::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        if let Some(caps) = RE_HEADING.captures(line.trim_start()) {
            // Closed ATX headings ("## Title ##") drop the trailing run.
            let text = caps[2].trim().trim_end_matches('#').trim_end();
            blocks.push(DocumentBlock::heading(caps[1].len(), text.to_string()));
        } else {
            blocks.push(DocumentBlock::paragraph(line));
        }
    }
    blocks
}

/// Parse a pipe-delimited reply into a [`TableModel`].
///
/// Each line is split on `|` and every cell whitespace-trimmed; the first
/// kept line becomes the header. Ragged rows survive unchanged. All-dash
/// GFM separator rows (`--- | :---: | ---`) are dropped: models often
/// emit one despite the prompt, and it carries no content.
pub fn parse_pipe_table(text: &str) -> TableModel {
    let mut table = TableModel::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let cells: Vec<String> = line.split('|').map(|c| c.trim().to_string()).collect();
        if is_separator_row(&cells) {
            continue;
        }
        if table.header.is_empty() {
            table.header = cells;
        } else {
            table.rows.push(cells);
        }
    }
    table
}

/// A GFM separator row: every cell is dashes with optional `:` alignment
/// markers, and at least one cell actually contains a dash.
fn is_separator_row(cells: &[String]) -> bool {
    cells.iter().any(|c| c.contains('-'))
        && cells
            .iter()
            .all(|c| !c.is_empty() && c.chars().all(|ch| ch == '-' || ch == ':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_blocks_round_trip() {
        let blocks = parse_blocks("# Title\nBody line\n## Sub");
        assert_eq!(
            blocks,
            vec![
                DocumentBlock::heading(1, "Title"),
                DocumentBlock::paragraph("Body line"),
                DocumentBlock::heading(2, "Sub"),
            ]
        );
    }

    #[test]
    fn blank_lines_produce_no_blocks() {
        let blocks = parse_blocks("# A\n\n\nParagraph\n   \n## B\n");
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|b| !b.text.is_empty() || b.is_heading()));
    }

    #[test]
    fn empty_reply_yields_no_blocks() {
        assert!(parse_blocks("").is_empty());
        assert!(parse_blocks("\n\n").is_empty());
    }

    #[test]
    fn heading_depth_matches_marker_run() {
        let blocks = parse_blocks("### Deep\n#### Deeper");
        assert_eq!(blocks[0].level, 3);
        assert_eq!(blocks[1].level, 4);
        assert_eq!(blocks[1].text, "Deeper");
    }

    #[test]
    fn heading_without_space_still_parses() {
        let blocks = parse_blocks("##Compensation");
        assert_eq!(blocks[0], DocumentBlock::heading(2, "Compensation"));
    }

    #[test]
    fn closed_heading_markers_are_stripped() {
        let blocks = parse_blocks("## Compensation ##\n# Scope #");
        assert_eq!(blocks[0], DocumentBlock::heading(2, "Compensation"));
        assert_eq!(blocks[1], DocumentBlock::heading(1, "Scope"));
    }

    #[test]
    fn pipe_table_parses_and_trims() {
        let table = parse_pipe_table("A | B | C\n1 | 2 | 3\n4 | 5 | 6");
        assert_eq!(table.header, vec!["A", "B", "C"]);
        assert_eq!(table.rows, vec![vec!["1", "2", "3"], vec!["4", "5", "6"]]);
        assert!(table.is_rectangular());
    }

    #[test]
    fn ragged_row_passes_through() {
        let table = parse_pipe_table("A | B | C\n1 | 2\n4 | 5 | 6 | 7");
        assert_eq!(table.rows[0], vec!["1", "2"]);
        assert_eq!(table.rows[1].len(), 4);
        assert_eq!(table.first_ragged_row(), Some((1, 2)));
        assert!(!table.is_rectangular());
    }

    #[test]
    fn separator_row_is_dropped() {
        let table = parse_pipe_table("A | B\n--- | :---:\n1 | 2");
        assert_eq!(table.rows, vec![vec!["1", "2"]]);
    }

    #[test]
    fn empty_reply_yields_empty_table() {
        let table = parse_pipe_table("");
        assert!(table.is_empty());
        assert!(table.is_rectangular());
    }

    #[test]
    fn cells_containing_dashes_are_not_separators() {
        let table = parse_pipe_table("Zone | Rate\nNon-Emergency | $2.50");
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][0], "Non-Emergency");
    }
}
