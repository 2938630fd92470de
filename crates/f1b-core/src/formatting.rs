//! Telegram HTML rendering of reports.

use crate::report::{layout_table, table_lines, Report};

/// Escape HTML special characters for Telegram HTML parse mode.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn prelude_html(report: &Report) -> String {
    let mut out = String::new();
    if !report.header.is_empty() {
        out.push_str(&format!(
            "<b>{}</b>\n",
            escape_html(&report.header.to_uppercase())
        ));
    }
    if let Some(desc) = &report.description {
        out.push_str(&escape_html(desc));
        out.push('\n');
    }
    out
}

/// Render a report as Telegram HTML (`<b>` header, `<pre>` table).
pub fn render_html(report: &Report) -> String {
    let mut out = prelude_html(report);
    if report.has_table() {
        let widths = report.column_widths();
        let table = layout_table(table_lines(report), &widths);
        out.push_str(&format!("<pre>{}</pre>", escape_html(&table)));
    }
    out
}

/// Render a report into messages of at most `limit` bytes where possible.
///
/// Long tables are split by rows; every page repeats the table header and all
/// pages share the same column widths. A single row longer than `limit` still
/// gets its own page.
pub fn render_html_pages(report: &Report, limit: usize) -> Vec<String> {
    let whole = render_html(report);
    if whole.len() <= limit || report.rows.len() < 2 {
        return vec![whole];
    }

    let widths = report.column_widths();
    let line = |cells: &[String]| escape_html(&layout_table([cells], &widths));
    let header_line = line(report.table_header.as_slice());
    const PRE_LEN: usize = "<pre></pre>".len();

    let mut pages = Vec::new();
    let mut prefix = prelude_html(report);
    let mut body = String::new();

    for row in &report.rows {
        let row_line = line(row.as_slice());
        let projected = prefix.len() + PRE_LEN + header_line.len() + body.len() + row_line.len();
        if projected > limit && !body.is_empty() {
            pages.push(format!("{prefix}<pre>{header_line}{body}</pre>"));
            prefix.clear();
            body.clear();
        }
        body.push_str(&row_line);
    }
    pages.push(format!("{prefix}<pre>{header_line}{body}</pre>"));

    pages
}
