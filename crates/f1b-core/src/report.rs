//! Reports: header, optional narrative and an aligned table.
//!
//! `render` produces the markdown flavor (`**HEADER**`, fenced table). The
//! Telegram HTML flavor lives in `formatting` and consumes the same `Report`.

use crate::{errors::Error, Result};

/// Spaces between two table columns.
pub const COLUMN_GAP: usize = 3;

const FENCE: &str = "```";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub header: String,
    pub description: Option<String>,
    pub table_header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Report {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_table_header<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table_header = cells.into_iter().map(Into::into).collect();
    }

    /// Append a row. Once a table header is set, every row must match its arity.
    pub fn add_row<I, S>(&mut self, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row: Vec<String> = cells.into_iter().map(Into::into).collect();
        if !self.table_header.is_empty() && row.len() != self.table_header.len() {
            return Err(Error::ColumnMismatch {
                expected: self.table_header.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let expected = self.table_header.len();
        match self.rows.iter().find(|r| r.len() != expected) {
            Some(r) => Err(Error::ColumnMismatch {
                expected,
                found: r.len(),
            }),
            None => Ok(()),
        }
    }

    pub fn has_table(&self) -> bool {
        !self.table_header.is_empty()
    }

    /// Display width of each column: widest cell plus the gap.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self
            .table_header
            .iter()
            .map(|c| c.chars().count())
            .collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.chars().count();
                match widths.get_mut(i) {
                    Some(w) => *w = (*w).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths.into_iter().map(|w| w + COLUMN_GAP).collect()
    }
}

/// Lay out `rows` with fixed-width columns.
///
/// Every cell except the last in a line is padded to its column width, and
/// each line ends with `\n`.
pub fn layout_table<'a, I>(rows: I, widths: &[usize]) -> String
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut out = String::new();
    for row in rows {
        let last = row.len().saturating_sub(1);
        for (i, cell) in row.iter().enumerate() {
            out.push_str(cell);
            if i < last {
                let width = widths.get(i).copied().unwrap_or(0);
                let pad = width.saturating_sub(cell.chars().count()).max(1);
                out.extend(std::iter::repeat(' ').take(pad));
            }
        }
        out.push('\n');
    }
    out
}

/// Lines of the table including its header row.
pub(crate) fn table_lines(report: &Report) -> impl Iterator<Item = &[String]> {
    std::iter::once(report.table_header.as_slice()).chain(report.rows.iter().map(Vec::as_slice))
}

/// Render a report as markdown text.
pub fn render(report: &Report) -> String {
    let mut out = String::new();

    if !report.header.is_empty() {
        out.push_str(&format!("**{}**\n", report.header.to_uppercase()));
    }

    if let Some(desc) = &report.description {
        out.push_str(desc);
        out.push('\n');
    }

    if report.has_table() {
        let widths = report.column_widths();
        out.push_str(FENCE);
        out.push('\n');
        out.push_str(&layout_table(table_lines(report), &widths));
        out.push_str(FENCE);
    }

    out
}
