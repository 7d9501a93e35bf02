pub mod available;
pub mod discovery;
pub mod list;
pub mod run;

use std::io::{IsTerminal, stdout};

use clap::{Args, Parser, Subcommand};
use fleetmux_common::terminal::StatusOutput;
use fleetmux_core::multiplexer::DEFAULT_KEEP_OPEN;

/// Lines kept by progress views.
const STATUS_LINES: usize = 6;

#[derive(Parser)]
#[command(name = "fleetmux")]
#[command(about = "Run commands across the PCs of a robot fleet.", version)]
pub struct CommandLine {
    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a command on one or all PCs of a robot
    #[command(alias = "r")]
    Run(RunArgs),
    /// List robots with their PCs and commands
    #[command(alias = "l")]
    List {
        /// Only show this robot
        robot: Option<String>,
    },
    /// Print the commands available on a PC, or on any PC with `all`
    Commands {
        robot: String,
        remote_pc: String,
    },
    /// Write discovery client profiles for robots, `all`, `local_server`, or `off`
    #[command(alias = "d")]
    Discovery {
        #[arg(required = true)]
        servers: Vec<String>,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// The robot to communicate with
    #[arg(value_name = "ROBOT")]
    pub robot: String,
    /// The PC to run the command on, or `all`
    #[arg(value_name = "REMOTE_PC")]
    pub remote_pc: String,
    /// The command to execute
    #[arg(value_name = "COMMAND")]
    pub command: String,
    /// Seconds to keep each pane or window open after its command completes
    #[arg(long = "keep_open_duration", alias = "keep-open-duration", value_name = "SECONDS", default_value_t = DEFAULT_KEEP_OPEN)]
    pub keep_open_duration: u64,
    /// Keep panes open until closed by hand
    #[arg(long, conflicts_with = "keep_open_duration")]
    pub keep_open_forever: bool,
    /// Use windows instead of panes
    #[arg(long)]
    pub use_windows: bool,
    /// Name of the tmux session
    #[arg(long, value_name = "NAME")]
    pub session: Option<String>,
    /// Print the resolved shell commands instead of running them
    #[arg(long)]
    pub dry_run: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Rolling progress view, only when stdout is a terminal.
pub(crate) fn status_view() -> Option<StatusOutput> {
    stdout().is_terminal().then(|| StatusOutput::stdout(STATUS_LINES))
}
