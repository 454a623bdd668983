//! Column-aligned text for the view model. No business logic.

use unicode_width::UnicodeWidthStr;

use crate::output::Output;
use crate::terminal::Tone;
use crate::view_model::{AppRow, CellRow, DetailLine, DetailView, Styled};

pub const RULE_WIDTH: usize = 80;

/// Minimum width of the detail view's label column.
pub const LABEL_MIN_WIDTH: usize = 13;

const LIST_MIN_WIDTH: usize = 10;

/// Pads every cell but the last non-empty one to its column width. Widths
/// are measured on the uncoloured text.
fn write_table(out: &mut Output, rows: &[Vec<Styled>], min_width: usize) {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| text_width(&cell.text) + 1)
                .max()
                .unwrap_or(0)
                .max(min_width)
        })
        .collect();

    for row in rows {
        let last = row.iter().rposition(|cell| !cell.text.is_empty()).unwrap_or(0);
        let mut line = String::new();
        for (col, cell) in row.iter().enumerate().take(last + 1) {
            line.push_str(&out.colorize(&cell.text, cell.tone));
            if col < last {
                line.push_str(&" ".repeat(widths[col].saturating_sub(text_width(&cell.text))));
            }
        }
        out.say_line(&line);
    }
}

/// Terminal columns occupied by `text`; wide glyphs count twice.
fn text_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

fn horizontal_rule(out: &mut Output, pattern: char) {
    out.say_line(&pattern.to_string().repeat(RULE_WIDTH));
}

fn heading_prefix() -> String {
    " ".repeat(LABEL_MIN_WIDTH / 2)
}

pub fn render_list(out: &mut Output, rows: &[AppRow]) {
    let header: Vec<Styled> = ["App Name", "Instances", "DiskMB", "MemoryMB", "Route"]
        .into_iter()
        .map(|title| Styled::new(title, Tone::Bold))
        .collect();

    let mut table = vec![header];
    table.extend(rows.iter().map(|row| {
        vec![
            Styled::new(row.name.clone(), Tone::Bold),
            row.instances.clone(),
            Styled::plain(row.disk_mb.clone()),
            Styled::plain(row.memory_mb.clone()),
            Styled::new(row.route.clone(), Tone::Info),
        ]
    }));
    write_table(out, &table, LIST_MIN_WIDTH);
    out.flush();
}

pub fn render_detail(out: &mut Output, view: &DetailView) {
    let label_width = view
        .lines()
        .map(|line| text_width(&line.label) + 1)
        .max()
        .unwrap_or(0)
        .max(LABEL_MIN_WIDTH);
    let prefix = heading_prefix();

    horizontal_rule(out, '=');
    let title = out.colorize(&view.title, Tone::Bold);
    out.say_line(&format!("{prefix}{title}"));
    horizontal_rule(out, '-');

    write_lines(out, &view.summary, label_width);
    horizontal_rule(out, '-');

    out.say_line("Environment");
    out.new_line();
    for var in &view.environment {
        out.say_line(var);
    }
    out.new_line();
    horizontal_rule(out, '=');

    for block in &view.instances {
        let state = out.colorize(&block.state.text, block.state.tone);
        out.say_line(&format!("{prefix}Instance {}  [{state}]", block.index));
        horizontal_rule(out, '-');
        write_lines(out, &block.lines, label_width);
        horizontal_rule(out, '-');
    }
    out.flush();
}

fn write_lines(out: &mut Output, lines: &[DetailLine], label_width: usize) {
    let rows: Vec<Vec<Styled>> = lines
        .iter()
        .map(|line| vec![Styled::plain(line.label.clone()), line.value.clone()])
        .collect();
    write_table(out, &rows, label_width);
}

/// `cell-id[MISSING]: <load>`, cleared to end of line.
pub fn render_cell_row(out: &mut Output, row: &CellRow) {
    let mut line = row.cell_id.clone();
    if let Some(missing) = &row.missing {
        line.push_str(&out.colorize(&missing.text, missing.tone));
    }
    line.push_str(": ");
    for segment in &row.load {
        line.push_str(&out.colorize(&segment.text, segment.tone));
    }
    line.push_str(&out.terminal().clear_line());
    out.say_line(&line);
}
