/*!
format.rs

Human output for `supervisor-cli` reports.

  - StyleOptions::detect() -> plain when piped; else colour unless NO_COLOR, width from COLUMNS
  - color(role, text, &style)
  - table(headers, rows, &style) -> aligned columns + dashed header separator
  - render_report(records, &style) -> whole report as one string

Status lines print verbatim, errors in red, tables aligned. Numeric
columns (pid, timestamps, state) are right-aligned.

NOTE: this module never prints; callers decide where the string goes.
JSON output paths do not use these helpers.
*/

use std::borrow::Cow;
use std::io::IsTerminal;

use super::report::OutputRecord;

/* -------------------------------------------------------------------------- */
/* Style Options                                                              */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct StyleOptions {
    pub use_color: bool,
    pub term_width: usize,
}

impl Default for StyleOptions {
    fn default() -> Self {
        Self::detect()
    }
}

impl StyleOptions {
    /// Plain style when stdout is not a terminal, else colour and `COLUMNS` width.
    pub fn detect() -> Self {
        if !std::io::stdout().is_terminal() {
            return Self::plain();
        }
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .map(|w| w.clamp(40, 220))
            .unwrap_or(120);

        StyleOptions {
            use_color: std::env::var_os("NO_COLOR").is_none(),
            term_width: width,
        }
    }

    /// No colour, fixed width. Used for tests and piped output.
    pub fn plain() -> Self {
        StyleOptions {
            use_color: false,
            term_width: 120,
        }
    }
}

/* -------------------------------------------------------------------------- */
/* Color                                                                      */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Copy)]
pub enum Role {
    Header,
    Error,
    Dim,
}

pub fn color(role: Role, text: impl AsRef<str>, style: &StyleOptions) -> String {
    if !style.use_color {
        return text.as_ref().to_string();
    }
    let code = match role {
        Role::Header => "1",        // bold
        Role::Error => "38;5;196", // red
        Role::Dim => "2",          // faint
    };
    format!("\x1b[{code}m{}\x1b[0m", text.as_ref())
}

/* -------------------------------------------------------------------------- */
/* Table Rendering                                                            */
/* -------------------------------------------------------------------------- */

const COLUMN_GAP: &str = "  ";

fn is_numeric_column(rows: &[Vec<String>], col: usize) -> bool {
    rows.iter()
        .filter_map(|r| r.get(col))
        .all(|cell| cell.parse::<i64>().is_ok())
}

pub fn table(headers: &[String], rows: &[Vec<String>], style: &StyleOptions) -> String {
    if headers.is_empty() {
        return String::new();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(headers.len()) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }
    let right_align: Vec<bool> = (0..headers.len())
        .map(|c| !rows.is_empty() && is_numeric_column(rows, c))
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(color(
        Role::Header,
        render_row(headers.iter().map(String::as_str), &widths, &right_align, style),
        style,
    ));
    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    lines.push(color(
        Role::Dim,
        truncate_line(&separator, style.term_width),
        style,
    ));
    for row in rows {
        let cells = (0..headers.len()).map(|c| row.get(c).map(String::as_str).unwrap_or(""));
        lines.push(render_row(cells, &widths, &right_align, style));
    }
    lines.join("\n")
}

fn render_row<'a>(
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
    right_align: &[bool],
    style: &StyleOptions,
) -> String {
    let line = cells
        .enumerate()
        .map(|(i, cell)| align(cell, widths[i], right_align[i]))
        .collect::<Vec<_>>()
        .join(COLUMN_GAP);
    truncate_line(line.trim_end(), style.term_width).into_owned()
}

fn align(cell: &str, width: usize, right: bool) -> String {
    let pad = " ".repeat(width.saturating_sub(display_width(cell)));
    if right {
        format!("{pad}{cell}")
    } else {
        format!("{cell}{pad}")
    }
}

/* -------------------------------------------------------------------------- */
/* Report                                                                     */
/* -------------------------------------------------------------------------- */

pub fn render_report(records: &[OutputRecord], style: &StyleOptions) -> String {
    records
        .iter()
        .map(|record| match record {
            OutputRecord::Line { text } => text.clone(),
            OutputRecord::Error { message } => color(Role::Error, message, style),
            OutputRecord::Table { headers, rows } => table(headers, rows, style),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/* -------------------------------------------------------------------------- */
/* Width Utilities                                                            */
/* -------------------------------------------------------------------------- */

fn truncate_line(s: &str, max_chars: usize) -> Cow<'_, str> {
    if max_chars == 0 || s.chars().count() <= max_chars {
        return Cow::Borrowed(s);
    }
    let mut out: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    out.push('…');
    Cow::Owned(out)
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(h: &[&str]) -> Vec<String> {
        h.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn table_aligns_columns() {
        let t = table(
            &headers(&["pid", "name"]),
            &[
                vec!["7".into(), "web_1".into()],
                vec!["1234".into(), "cron".into()],
            ],
            &StyleOptions::plain(),
        );
        let lines: Vec<&str> = t.lines().collect();
        assert_eq!(lines[0], " pid  name");
        assert_eq!(lines[1], "----  -----");
        assert_eq!(lines[2], "   7  web_1");
        assert_eq!(lines[3], "1234  cron");
    }

    #[test]
    fn text_columns_stay_left_aligned() {
        let t = table(
            &headers(&["name", "statename"]),
            &[vec!["a".into(), "RUNNING".into()]],
            &StyleOptions::plain(),
        );
        assert_eq!(t.lines().last(), Some("a     RUNNING"));
    }

    #[test]
    fn long_lines_are_truncated() {
        let style = StyleOptions {
            use_color: false,
            term_width: 40,
        };
        let t = table(&headers(&["name"]), &[vec!["x".repeat(60)]], &style);
        let last = t.lines().last().unwrap();
        assert_eq!(last.chars().count(), 40);
        assert!(last.ends_with('…'));
    }

    #[test]
    fn piped_output_is_uncoloured() {
        let out = render_report(&[OutputRecord::error("boom")], &StyleOptions::plain());
        assert_eq!(out, "boom");
    }

    #[test]
    fn report_lines_and_errors() {
        let records = vec![
            OutputRecord::line("stopping all processes..."),
            OutputRecord::error("supervisor unreachable: connection refused"),
        ];
        let out = render_report(&records, &StyleOptions::plain());
        assert_eq!(
            out,
            "stopping all processes...\nsupervisor unreachable: connection refused"
        );
    }

    #[test]
    fn errors_are_red_when_colour_is_on() {
        let style = StyleOptions {
            use_color: true,
            term_width: 80,
        };
        let out = render_report(&[OutputRecord::error("boom")], &style);
        assert_eq!(out, "\x1b[38;5;196mboom\x1b[0m");
    }
}
