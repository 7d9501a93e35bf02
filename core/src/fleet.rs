//! # Fleet model
//!
//! A [`Robot`] owns its [`RemoteHost`]s; every host carries its own resolved
//! command set. Everything here is built once by the [`loader`](crate::loader)
//! and never mutated afterwards.

mod command;
mod discovery_server;
mod host;
mod robot;

pub use command::{Command, RenderedCommand, default_commands, is_local};
pub use discovery_server::{DEFAULT_DISCOVERY_PORT, DiscoveryServer};
pub use host::{DEFAULT_SSH_PORT, RemoteHost};
pub use robot::{ExecutionTarget, Robot};

/// Value of `delegate_to` that runs a command on the operator's machine.
pub const LOCALHOST: &str = "localhost";
