//! Final shell strings.
//!
//! A command running on the operator's machine is passed through untouched.
//! Everything else is wrapped as `ssh -p <port> -t <user>@<hostname> '<command>'`.

use crate::fleet::ExecutionTarget;

pub fn synthesize(target: ExecutionTarget<'_>, command: &str) -> String {
    match target {
        ExecutionTarget::Local => command.to_string(),
        ExecutionTarget::Remote(host) => format!(
            "ssh -p {} -t {}@{} {}",
            host.port,
            host.user,
            host.hostname,
            single_quote(command)
        ),
    }
}

/// Quotes `s` for a POSIX shell: wrapped in single quotes, every embedded
/// single quote written as `'\''`.
pub fn single_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
