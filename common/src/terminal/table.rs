//! Column-balancing table renderer.

use std::io::{self, Stdout, Write};

use console::{Alignment, measure_text_width, pad_str};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

use super::wrap::wrap;

/// Space between a column and the next one.
const COLUMN_GAP: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl From<Align> for Alignment {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => Alignment::Left,
            Align::Center => Alignment::Center,
            Align::Right => Alignment::Right,
        }
    }
}

pub struct TableOutput<W: Write = Stdout> {
    columns: Vec<String>,
    align: Vec<Align>,
    rows: Vec<Vec<String>>,
    max_width: usize,
    out: W,
}

impl TableOutput<Stdout> {
    /// Table on stdout, as wide as the terminal.
    pub fn stdout<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self::new(columns, super::width(), io::stdout())
    }
}

impl<W: Write> TableOutput<W> {
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>, max_width: usize, out: W) -> Self {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        Self {
            align: vec![Align::Left; columns.len()],
            columns,
            rows: Vec::new(),
            max_width: max_width.max(1),
            out,
        }
    }

    pub fn with_align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.align.get_mut(column) {
            *slot = align;
        }
        self
    }

    /// Appends a row. Missing cells render blank; cells past the last column are ignored.
    pub fn add_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Width each column is rendered with.
    pub fn column_widths(&self) -> Vec<usize> {
        balance_widths(&self.natural_widths(), self.max_width)
    }

    /// Writes header, `=` rule and all rows.
    pub fn print(&mut self) -> io::Result<()> {
        if self.columns.is_empty() {
            return Ok(());
        }
        let widths = self.column_widths();

        let header = self.columns.clone();
        self.print_row(&header, &widths)?;

        queue!(self.out, Clear(ClearType::UntilNewLine))?;
        write!(self.out, "{}\r\n", "=".repeat(widths.iter().sum()))?;

        let rows = std::mem::take(&mut self.rows);
        let result = rows.iter().try_for_each(|row| self.print_row(row, &widths));
        self.rows = rows;
        result?;

        self.out.flush()
    }

    fn natural_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| measure_text_width(c)).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                let cell_width = cell.split('\n').map(measure_text_width).max().unwrap_or(0);
                *width = (*width).max(cell_width);
            }
        }

        let last = widths.len().saturating_sub(1);
        for width in &mut widths[..last] {
            *width += COLUMN_GAP;
        }
        widths
    }

    fn print_row(&mut self, row: &[String], widths: &[usize]) -> io::Result<()> {
        let cells: Vec<Vec<String>> = widths
            .iter()
            .enumerate()
            .map(|(i, &width)| row.get(i).map(|cell| wrap(cell, width)).unwrap_or_default())
            .collect();
        let height = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);

        for n in 0..height {
            for (i, &width) in widths.iter().enumerate() {
                match cells[i].get(n) {
                    Some(text) => {
                        let padded = pad_str(text, width, self.align[i].into(), Some(""));
                        write!(self.out, "{padded}")?;
                    }
                    None => write!(self.out, "{}", " ".repeat(width))?,
                }
            }
            write!(self.out, "\r\n")?;
        }
        Ok(())
    }
}

/// Shrinks `widths` so their sum fits in `max_width`.
///
/// Columns narrower than the shared budget keep their width; the rest share
/// what is left evenly. The budget is recomputed until it stops changing.
pub fn balance_widths(widths: &[usize], max_width: usize) -> Vec<usize> {
    if widths.is_empty() || widths.iter().sum::<usize>() <= max_width {
        return widths.to_vec();
    }

    let mut budget = max_width / widths.len();
    loop {
        let (used, larger) = widths.iter().fold((0, 0), |(used, larger), &w| {
            if w < budget { (used + w, larger) } else { (used, larger + 1) }
        });
        let next = max_width.saturating_sub(used) / larger.max(1);
        if next == budget {
            break;
        }
        budget = next;
    }

    widths.iter().map(|&w| w.min(budget)).collect()
}
