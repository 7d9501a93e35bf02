use tracing::debug;

use crate::error::{CommandScope, FleetError, Result};
use crate::template::Scope;

use super::command::{Command, RenderedCommand};

pub const DEFAULT_SSH_PORT: u16 = 22;

/// A machine of a robot reachable over SSH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteHost {
    pub name: String,
    pub hostname: String,
    pub user: String,
    pub port: u16,
    pub commands: Vec<Command>,
}

impl RemoteHost {
    pub fn new(name: impl Into<String>, user: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            hostname: name.clone(),
            name,
            user: user.into(),
            port: DEFAULT_SSH_PORT,
            commands: super::default_commands(),
        }
    }

    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.iter().find(|c| c.name() == name)
    }

    pub fn has_command(&self, name: &str) -> bool {
        self.command(name).is_some()
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(Command::name)
    }

    /// `user@hostname:port`
    pub fn address(&self) -> String {
        format!("{}@{}:{}", self.user, self.hostname, self.port)
    }

    /// Variables every command of this host can use.
    pub fn scope(&self) -> Scope {
        Scope::from([
            ("hostname".to_string(), self.hostname.clone()),
            ("pc_name".to_string(), self.name.clone()),
            ("user".to_string(), self.user.clone()),
            ("port".to_string(), self.port.to_string()),
        ])
    }

    /// Renders `command_name` with this host's variables overlaid by `extra`.
    pub fn resolve_command(&self, command_name: &str, extra: &Scope) -> Result<RenderedCommand> {
        let command = self.command(command_name).ok_or_else(|| FleetError::CommandNotFound {
            command: command_name.to_string(),
            scope: CommandScope::Host(self.name.clone()),
        })?;

        let mut scope = self.scope();
        scope.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));

        let rendered = command.render(&scope);
        debug!(host = %self.name, command = command_name, rendered = %rendered.command, "resolved command");
        Ok(rendered)
    }
}
