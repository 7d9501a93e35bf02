//! In-memory terminal model for asserting what a renderer leaves on screen.
//!
//! Understands printable text, `\r`, `\n`, and the CSI sequences the renderers
//! emit: cursor up (`A`), erase line (`K`), erase below (`J`), auto-wrap
//! (`?7l` / `?7h`). SGR and unknown sequences are ignored.

pub struct VirtualTerminal {
    width: usize,
    rows: Vec<Vec<char>>,
    row: usize,
    col: usize,
    autowrap: bool,
    /// Total cursor-up distance requested that would have gone past the top row.
    pub overshoot: usize,
}

impl VirtualTerminal {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            rows: vec![Vec::new()],
            row: 0,
            col: 0,
            autowrap: true,
            overshoot: 0,
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            match ch {
                '\x1b' => {
                    if chars.peek() != Some(&'[') {
                        continue;
                    }
                    chars.next();
                    let mut params = String::new();
                    let mut final_byte = None;
                    for c in chars.by_ref() {
                        if c.is_ascii_alphabetic() {
                            final_byte = Some(c);
                            break;
                        }
                        params.push(c);
                    }
                    if let Some(f) = final_byte {
                        self.csi(&params, f);
                    }
                }
                '\r' => self.col = 0,
                '\n' => self.line_feed(),
                c => self.put(c),
            }
        }
    }

    /// Screen content with trailing blanks and trailing empty rows removed.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .rows
            .iter()
            .map(|r| r.iter().collect::<String>().trim_end().to_string())
            .collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        lines
    }

    pub fn cursor_row(&self) -> usize {
        self.row
    }

    pub fn autowrap(&self) -> bool {
        self.autowrap
    }

    fn csi(&mut self, params: &str, final_byte: char) {
        match (params, final_byte) {
            ("?7", 'l') => self.autowrap = false,
            ("?7", 'h') => self.autowrap = true,
            (_, 'A') => {
                let n: usize = params.parse().unwrap_or(1).max(1);
                if n > self.row {
                    self.overshoot += n - self.row;
                }
                self.row = self.row.saturating_sub(n);
            }
            ("" | "0", 'K') => {
                let row = &mut self.rows[self.row];
                row.truncate(self.col);
            }
            ("" | "0", 'J') => {
                self.rows[self.row].truncate(self.col);
                self.rows.truncate(self.row + 1);
            }
            _ => {}
        }
    }

    fn line_feed(&mut self) {
        self.row += 1;
        if self.row >= self.rows.len() {
            self.rows.push(Vec::new());
        }
    }

    fn put(&mut self, c: char) {
        if self.col >= self.width {
            if self.autowrap {
                self.col = 0;
                self.line_feed();
            } else {
                self.col = self.width - 1;
            }
        }
        let row = &mut self.rows[self.row];
        while row.len() < self.col {
            row.push(' ');
        }
        if self.col < row.len() {
            row[self.col] = c;
        } else {
            row.push(c);
        }
        self.col += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interprets_cursor_and_erase_sequences() {
        let mut vt = VirtualTerminal::new(20);
        vt.feed(b"first\r\nsecond\r\n\x1b[1A\x1b[Kthird\r\n");
        assert_eq!(vt.lines(), vec!["first", "third"]);

        vt.feed(b"\x1b[2A\x1b[J");
        assert!(vt.lines().is_empty());
        assert_eq!(vt.overshoot, 0);
    }

    #[test]
    fn truncates_instead_of_wrapping_when_autowrap_is_off() {
        let mut vt = VirtualTerminal::new(4);
        vt.feed(b"\x1b[?7labcdef\r\n\x1b[?7h");
        assert_eq!(vt.lines(), vec!["abcf"]);
        assert!(vt.autowrap());
    }
}
