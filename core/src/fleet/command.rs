use crate::template::{self, Scope};

use super::LOCALHOST;

/// Names accepted as "run on the operator's machine" in `delegate_to`.
const LOCAL_MARKERS: [&str; 2] = [LOCALHOST, "127.0.0.1"];

pub fn is_local(delegate_to: &str) -> bool {
    LOCAL_MARKERS.contains(&delegate_to)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    template: String,
    delegate_to: Option<String>,
}

/// A command rendered against a scope, not yet bound to a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedCommand {
    pub command: String,
    pub delegate_to: Option<String>,
}

impl Command {
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            delegate_to: None,
        }
    }

    pub fn delegated(mut self, delegate_to: impl Into<String>) -> Self {
        self.delegate_to = Some(delegate_to.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn delegate_to(&self) -> Option<&str> {
        self.delegate_to.as_deref()
    }

    pub fn render(&self, scope: &Scope) -> RenderedCommand {
        RenderedCommand {
            command: template::render(&self.template, scope),
            delegate_to: self.delegate_to.clone(),
        }
    }
}

impl RenderedCommand {
    /// Whether the command runs on the operator's machine instead of over SSH.
    pub fn is_local(&self) -> bool {
        self.delegate_to.as_deref().is_some_and(is_local)
    }
}

/// Commands every host starts out with.
pub fn default_commands() -> Vec<Command> {
    vec![
        Command::new("ssh", "ssh -p {{port}} {{user}}@{{hostname}}").delegated(LOCALHOST),
        Command::new("ssh-copy-id", "ssh-copy-id -p {{port}} {{user}}@{{hostname}}").delegated(LOCALHOST),
        Command::new("reboot", "sudo reboot now"),
        Command::new("shutdown", "sudo shutdown now"),
    ]
}
