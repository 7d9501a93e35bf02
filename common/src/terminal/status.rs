//! Bounded, in-place status area.
//!
//! [`StatusOutput`] keeps the last `line_count` lines it was given and redraws
//! them over themselves, so a long-running step shows a small rolling window
//! instead of flooding the terminal. It is a single-writer abstraction: one
//! instance per output stream.
//!
//! Call [`StatusOutput::clear`] (or drop the instance) before exiting so auto-wrap
//! is left enabled and the area does not linger.

use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveUp;
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType, DisableLineWrap, EnableLineWrap};

use crate::style;

pub struct StatusOutput<W: Write = Stdout> {
    line_count: usize,
    lines: Vec<String>,
    /// Lines of the status area currently on screen above the cursor.
    drawn: usize,
    overwrite: bool,
    out: W,
}

impl StatusOutput<Stdout> {
    pub fn stdout(line_count: usize) -> Self {
        Self::new(line_count, io::stdout())
    }
}

impl<W: Write> StatusOutput<W> {
    pub fn new(line_count: usize, out: W) -> Self {
        Self {
            line_count: line_count.max(1),
            lines: Vec::new(),
            drawn: 0,
            overwrite: true,
            out,
        }
    }

    /// Lines currently held in the status area, oldest first.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    /// Stops overwriting: later [`status`](Self::status) calls append plainly.
    ///
    /// Whatever is on screen stays there and is no longer tracked.
    pub fn disable_overwrite(&mut self) {
        self.overwrite = false;
        self.lines.clear();
        self.drawn = 0;
    }

    /// Adds `message` (possibly several lines) to the status area, keeping only
    /// the newest `line_count` lines.
    pub fn status(&mut self, message: &str) -> io::Result<()> {
        if !self.overwrite {
            for line in message.split('\n') {
                write!(self.out, "{line}\r\n")?;
            }
            return self.out.flush();
        }

        self.lines.extend(message.split('\n').map(str::to_string));
        if self.lines.len() > self.line_count {
            let excess = self.lines.len() - self.line_count;
            self.lines.drain(..excess);
        }
        self.move_to_top()?;
        self.redraw()
    }

    /// Prints `message` as a regular line above the status area.
    ///
    /// With `clear_status` the buffered status lines are dropped; otherwise they
    /// are redrawn below the message.
    pub fn info(&mut self, message: &str, clear_status: bool) -> io::Result<()> {
        self.move_to_top()?;
        for line in message.split('\n') {
            queue!(self.out, Clear(ClearType::UntilNewLine))?;
            write!(self.out, "{}\r\n", style::info_line(line))?;
        }
        if clear_status {
            self.lines.clear();
        }
        self.redraw()
    }

    /// Erases the status area from the screen and empties the buffer.
    pub fn clear(&mut self) -> io::Result<()> {
        if self.drawn > 0 {
            self.move_to_top()?;
            queue!(self.out, Clear(ClearType::FromCursorDown))?;
        }
        self.lines.clear();
        self.out.flush()
    }

    fn move_to_top(&mut self) -> io::Result<()> {
        let mut remaining = std::mem::take(&mut self.drawn);
        while remaining > 0 {
            let step = remaining.min(u16::MAX as usize);
            queue!(self.out, MoveUp(step as u16))?;
            remaining -= step;
        }
        Ok(())
    }

    /// Draws the buffer from the current cursor row. Expects the cursor at the
    /// top of the area (see [`move_to_top`](Self::move_to_top)).
    fn redraw(&mut self) -> io::Result<()> {
        queue!(self.out, DisableLineWrap)?;
        let drawn = self.draw_lines();
        let restored = queue!(self.out, EnableLineWrap);
        drawn.and(restored)?;
        self.out.flush()
    }

    fn draw_lines(&mut self) -> io::Result<()> {
        for line in &self.lines {
            queue!(self.out, Clear(ClearType::UntilNewLine))?;
            write!(self.out, "{line}\r\n")?;
            self.drawn += 1;
        }
        queue!(self.out, Clear(ClearType::FromCursorDown))
    }
}

impl<W: Write> Drop for StatusOutput<W> {
    fn drop(&mut self) {
        let _ = queue!(self.out, EnableLineWrap);
        let _ = self.out.flush();
    }
}
