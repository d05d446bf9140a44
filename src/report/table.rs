use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::aggregation::{format_value, MergedRow, Operation};

/// Literal decomposition value that is always rendered blank
pub const UNDEFINED_DECOMPOSITION: &str = "undefined";

/// Minimum width of an operation column
pub const MIN_VALUE_WIDTH: usize = 10;

const COLUMN_SEPARATOR: &str = " ";

/// Presentation switches for the table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Header of the decomposition column (upper-cased decomposition field)
    pub decomposition_label: String,
    /// Print the header row
    pub show_header: bool,
    /// Repeat the decomposition value on every row
    pub verbose: bool,
}

impl ReportOptions {
    /// Options for a table partitioned by `decomposition_field` (empty for none)
    pub fn new(decomposition_field: &str) -> Self {
        Self {
            decomposition_label: decomposition_field.to_uppercase(),
            show_header: true,
            verbose: false,
        }
    }

    /// Suppress the header row
    pub fn without_header(mut self) -> Self {
        self.show_header = false;
        self
    }

    /// Disable blanking of repeated decomposition values
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone)]
struct Column {
    label: String,
    width: usize,
    align: Align,
}

/// Renders merged rows as a fixed-width text table
#[derive(Debug, Clone)]
pub struct TableEmitter {
    options: ReportOptions,
    operations: Vec<Operation>,
}

impl TableEmitter {
    /// Create an emitter for the given operation columns
    pub fn new(options: ReportOptions, operations: Vec<Operation>) -> Self {
        Self {
            options,
            operations,
        }
    }

    /// Group rows by decomposition and produce display cells, blanking
    /// decomposition values per the compact/verbose rules
    pub fn shape(&self, rows: &[MergedRow]) -> Vec<Vec<String>> {
        let mut previous: Option<&str> = None;
        let mut shaped = Vec::with_capacity(rows.len());

        for row in group_by_decomposition(rows) {
            let mut cells = row.cells();
            let decomposition = row.decomposition.as_deref();

            let blank = match decomposition {
                None | Some(UNDEFINED_DECOMPOSITION) => true,
                Some(value) if !self.options.verbose && previous == Some(value) => true,
                Some(value) => {
                    previous = Some(value);
                    false
                }
            };
            if blank {
                cells[0].clear();
            }

            shaped.push(cells);
        }

        shaped
    }

    /// Render the table followed by one blank line
    pub fn render(&self, rows: &[MergedRow]) -> String {
        let columns = self.columns(rows);
        let mut out = String::new();

        if self.options.show_header {
            let header: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
            push_line(&mut out, &columns, &header);
        }

        for cells in self.shape(rows) {
            let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
            push_line(&mut out, &columns, &cells);
        }

        out.push('\n');
        out
    }

    /// Write the rendered table to `out`
    pub fn emit<W: Write + ?Sized>(&self, rows: &[MergedRow], out: &mut W) -> io::Result<()> {
        out.write_all(self.render(rows).as_bytes())?;
        out.flush()
    }

    fn columns(&self, rows: &[MergedRow]) -> Vec<Column> {
        let decomp_width = rows
            .iter()
            .filter_map(|row| row.decomposition.as_deref())
            .filter(|value| *value != UNDEFINED_DECOMPOSITION)
            .map(display_width)
            .max()
            .unwrap_or(0);
        let metric_width = rows
            .iter()
            .map(|row| display_width(&row.metric))
            .max()
            .unwrap_or(0);

        let mut columns = vec![
            Column {
                label: self.options.decomposition_label.clone(),
                width: decomp_width,
                align: Align::Left,
            },
            Column {
                label: "METRIC".to_string(),
                width: metric_width,
                align: Align::Left,
            },
        ];

        for (position, op) in self.operations.iter().enumerate() {
            let value_width = rows
                .iter()
                .filter_map(|row| row.values.get(position))
                .map(|value| display_width(&format_value(*value)))
                .max()
                .unwrap_or(0);
            columns.push(Column {
                label: op.label(),
                width: value_width.max(MIN_VALUE_WIDTH),
                align: Align::Right,
            });
        }

        if self.options.show_header {
            for column in &mut columns {
                column.width = column.width.max(display_width(&column.label));
            }
        }
        columns
    }
}

fn group_by_decomposition(rows: &[MergedRow]) -> Vec<&MergedRow> {
    let mut groups: Vec<(Option<&str>, Vec<&MergedRow>)> = Vec::new();

    for row in rows {
        let decomposition = row.decomposition.as_deref();
        match groups.iter_mut().find(|(value, _)| *value == decomposition) {
            Some((_, members)) => members.push(row),
            None => groups.push((decomposition, vec![row])),
        }
    }

    groups.into_iter().flat_map(|(_, members)| members).collect()
}

fn push_line(out: &mut String, columns: &[Column], cells: &[&str]) {
    let mut line = String::new();

    for (i, (column, cell)) in columns.iter().zip(cells).enumerate() {
        if i > 0 {
            line.push_str(COLUMN_SEPARATOR);
        }
        let pad = column.width.saturating_sub(display_width(cell));
        match column.align {
            Align::Left => {
                line.push_str(cell);
                line.extend(std::iter::repeat(' ').take(pad));
            }
            Align::Right => {
                line.extend(std::iter::repeat(' ').take(pad));
                line.push_str(cell);
            }
        }
    }

    out.push_str(line.trim_end());
    out.push('\n');
}

fn display_width(s: &str) -> usize {
    s.chars().count()
}
