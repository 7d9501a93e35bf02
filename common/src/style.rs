//! Line prefixes shared by the log formatter and the terminal renderers.

use colored::*;
use tracing::Level;

pub fn symbol(level: Level) -> ColoredString {
    match level {
        Level::TRACE => "[ ]".dimmed(),
        Level::DEBUG => "[?]".magenta(),
        Level::INFO => "[*]".blue().bold(),
        Level::WARN => "[!]".yellow().bold(),
        Level::ERROR => "[-]".red().bold(),
    }
}

pub fn success_symbol() -> ColoredString {
    "[+]".green().bold()
}

/// `message` as an info line, the way the log formatter prints it.
pub fn info_line(message: &str) -> String {
    format!("{} {message}", symbol(Level::INFO))
}
