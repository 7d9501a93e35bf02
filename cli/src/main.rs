mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, Commands, available, discovery, list, run};
use fleetmux_common::config::Config;
use fleetmux_common::error;
use terminal::{logging, print};

fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    let cfg = Config::from_env();

    let result = match commands.command {
        Commands::Run(args) => run::run(args, &cfg),
        Commands::List { robot } => {
            print::header("robots");
            list::list(robot, &cfg).map(|()| print::end_of_program())
        }
        Commands::Commands { robot, remote_pc } => available::commands(&robot, &remote_pc, &cfg),
        Commands::Discovery { servers } => {
            print::header("discovery servers");
            discovery::discovery(servers, &cfg).map(|()| print::end_of_program())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
