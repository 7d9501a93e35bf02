//! # fleetmux core
//!
//! Turns a declarative fleet description into shell commands and runs them in a
//! terminal multiplexer.
//!
//! * **[`fleet`]**: robots, their remote hosts, commands and discovery servers.
//! * **[`loader`]**: reads robot definitions from YAML files and directories, once per path.
//! * **[`template`]**: `{{variable}}` substitution used when rendering commands.
//! * **[`shell`]**: wraps a rendered command in `ssh` when it runs remotely.
//! * **[`dispatch`]**: resolves one command for one host or fans it out over a robot.
//! * **[`multiplexer`]**: lays dispatched commands out in tmux panes or windows.
//! * **[`discovery`]**: writes discovery client profiles for the fleet's discovery servers.

pub mod discovery;
pub mod dispatch;
pub mod error;
pub mod fleet;
pub mod loader;
pub mod multiplexer;
pub mod shell;
pub mod template;

pub use error::{CommandScope, FleetError, Result};
