use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = FleetError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum FleetError {
    /// A robot definition is missing a required field or has the wrong shape.
    #[error("invalid robot configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("failed to parse {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to scan {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("robot {0} not found")]
    RobotNotFound(String),

    #[error("PC {host} not found for robot {robot}")]
    HostNotFound { host: String, robot: String },

    #[error("command {command} not found {scope}")]
    CommandNotFound { command: String, scope: CommandScope },

    /// A command delegates to a host the robot does not have.
    #[error("command on PC {host} delegates to {delegate}, which is not a PC of robot {robot}")]
    DelegateNotFound {
        delegate: String,
        host: String,
        robot: String,
    },

    #[error("malformed discovery server GUID prefix {prefix:?}")]
    GuidPrefix { prefix: String },

    #[error("multiplexer: {0}")]
    Multiplexer(String),

    #[error("interrupted")]
    Interrupted,

    #[error("failed to install signal handlers: {0}")]
    Signal(#[source] std::io::Error),
}

/// Where a command was looked up when it could not be found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandScope {
    Host(String),
    Robot(String),
}

impl fmt::Display for CommandScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandScope::Host(host) => write!(f, "for PC {host}"),
            CommandScope::Robot(robot) => write!(f, "for any PC on robot {robot}"),
        }
    }
}

impl FleetError {
    pub(crate) fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        FleetError::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}
