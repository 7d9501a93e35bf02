//! Terminal renderers used while commands are being prepared or run.
//!
//! Both renderers write raw lines terminated by `\r\n` so they behave the same
//! whether or not the terminal is in raw mode.

pub mod status;
pub mod table;
pub mod wrap;

#[cfg(test)]
pub(crate) mod vt;

pub use status::StatusOutput;
pub use table::{Align, TableOutput};

pub const FALLBACK_WIDTH: usize = 80;

/// Current terminal width in columns, or [`FALLBACK_WIDTH`] when stdout is not a terminal.
pub fn width() -> usize {
    match crossterm::terminal::size() {
        Ok((cols, _)) if cols > 0 => cols as usize,
        _ => FALLBACK_WIDTH,
    }
}
