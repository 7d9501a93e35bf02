use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TAB_SIZE: usize = 4;

/// Greedy word wrap of `text` to lines at most `width` columns wide.
///
/// Embedded newlines start a new paragraph. Runs of whitespace collapse to a
/// single space and words wider than `width` are split. Empty text yields no lines.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let expanded = paragraph.replace('\t', &" ".repeat(TAB_SIZE));
        let mut current = String::new();
        let mut current_width = 0;

        for word in expanded.split_whitespace() {
            for piece in split_long_word(word, width) {
                let piece_width = piece.width();
                let needed = if current.is_empty() { piece_width } else { current_width + 1 + piece_width };

                if needed > width && !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                if !current.is_empty() {
                    current.push(' ');
                    current_width += 1;
                }
                current.push_str(&piece);
                current_width += piece_width;
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

fn split_long_word(word: &str, width: usize) -> Vec<String> {
    if word.width() <= width {
        return vec![word.to_string()];
    }

    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_width = 0;
    for ch in word.chars() {
        let w = ch.width().unwrap_or(0);
        if piece_width + w > width && !piece.is_empty() {
            pieces.push(std::mem::take(&mut piece));
            piece_width = 0;
        }
        piece.push(ch);
        piece_width += w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}
