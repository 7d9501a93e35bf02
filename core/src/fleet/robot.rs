use crate::error::{FleetError, Result};

use super::command::RenderedCommand;
use super::discovery_server::DiscoveryServer;
use super::host::RemoteHost;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Robot {
    pub name: String,
    /// Hosts in definition order; names are unique.
    pub remote_pcs: Vec<RemoteHost>,
    pub discovery_servers: Vec<DiscoveryServer>,
}

/// Where a rendered command actually runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionTarget<'a> {
    /// The operator's machine.
    Local,
    Remote(&'a RemoteHost),
}

impl Robot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remote_pcs: Vec::new(),
            discovery_servers: Vec::new(),
        }
    }

    pub fn host(&self, name: &str) -> Option<&RemoteHost> {
        self.remote_pcs.iter().find(|pc| pc.name == name)
    }

    pub fn require_host(&self, name: &str) -> Result<&RemoteHost> {
        self.host(name).ok_or_else(|| FleetError::HostNotFound {
            host: name.to_string(),
            robot: self.name.clone(),
        })
    }

    pub fn host_names(&self) -> impl Iterator<Item = &str> {
        self.remote_pcs.iter().map(|pc| pc.name.as_str())
    }

    pub fn has_command(&self, command: &str) -> bool {
        self.remote_pcs.iter().any(|pc| pc.has_command(command))
    }

    /// Inserts `host`, replacing a host of the same name in place.
    pub fn insert_host(&mut self, host: RemoteHost) {
        match self.remote_pcs.iter_mut().find(|pc| pc.name == host.name) {
            Some(existing) => *existing = host,
            None => self.remote_pcs.push(host),
        }
    }

    /// Picks the machine `command`, resolved on `host`, runs on.
    ///
    /// Delegation is a single hop: the delegate only contributes its connection
    /// details, never its own commands, so chains cannot form.
    pub fn execution_target<'a>(
        &'a self,
        host: &'a RemoteHost,
        command: &RenderedCommand,
    ) -> Result<ExecutionTarget<'a>> {
        if command.is_local() {
            return Ok(ExecutionTarget::Local);
        }
        match command.delegate_to.as_deref() {
            None => Ok(ExecutionTarget::Remote(host)),
            Some(delegate) => self.host(delegate).map(ExecutionTarget::Remote).ok_or_else(|| {
                FleetError::DelegateNotFound {
                    delegate: delegate.to_string(),
                    host: host.name.clone(),
                    robot: self.name.clone(),
                }
            }),
        }
    }
}
