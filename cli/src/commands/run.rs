use std::io::Write;

use anyhow::{Context, bail};
use fleetmux_common::config::Config;
use fleetmux_common::terminal::{StatusOutput, TableOutput};
use fleetmux_common::{error, success, warn};
use fleetmux_core::FleetError;
use fleetmux_core::dispatch::{ALL_HOSTS, dispatch_all, dispatch_one};
use fleetmux_core::fleet::Robot;
use fleetmux_core::loader::RobotLoader;
use fleetmux_core::multiplexer::{self, LaunchOptions, Tmux};
use fleetmux_core::template::Scope;

use super::{RunArgs, status_view};

pub fn run(args: RunArgs, cfg: &Config) -> anyhow::Result<()> {
    let robot = RobotLoader::new().robot(&cfg.search_paths(), &args.robot)?;

    let mut status = status_view();
    let resolution = resolve(&robot, &args.remote_pc, &args.command, status.as_mut());
    if let Some(status) = status.as_mut() {
        status.clear()?;
    }
    let commands = resolution?.report(&robot.name, &args.command)?;

    if args.dry_run {
        let mut table = TableOutput::stdout(["PC", "Shell command"]);
        for (host, shell) in &commands {
            table.add_row([host.as_str(), shell.as_str()]);
        }
        table.print()?;
        return Ok(());
    }

    let options = LaunchOptions {
        session_name: args.session,
        use_windows: args.use_windows,
        keep_open: (!args.keep_open_forever).then_some(args.keep_open_duration),
    };
    success!(
        "Starting {} on {} PC(s) of {}",
        args.command,
        commands.len(),
        robot.name
    );
    multiplexer::launch(&Tmux::new(), &commands, &options).context("tmux session failed")
}

/// Outcome of resolving a command for one PC or all of them.
#[derive(Debug, Default)]
struct Resolution {
    commands: Vec<(String, String)>,
    failures: Vec<(String, FleetError)>,
}

impl Resolution {
    /// Logs the PCs that failed; an error when none resolved.
    fn report(self, robot: &str, command: &str) -> anyhow::Result<Vec<(String, String)>> {
        for (host, e) in &self.failures {
            error!("Skipping {host}: {e}");
        }
        if self.commands.is_empty() {
            bail!("command {command} could not be resolved for any PC on robot {robot}");
        }
        if !self.failures.is_empty() {
            warn!("{} PC(s) skipped", self.failures.len());
        }
        Ok(self.commands)
    }
}

/// `(PC, shell command)` pairs for one PC or, with `all`, every PC that defines
/// the command. Each PC is shown on `status` as it resolves.
fn resolve<W: Write>(
    robot: &Robot,
    remote_pc: &str,
    command: &str,
    mut status: Option<&mut StatusOutput<W>>,
) -> anyhow::Result<Resolution> {
    let extra = Scope::new();
    let mut resolution = Resolution::default();

    if remote_pc != ALL_HOSTS {
        let shell = dispatch_one(robot, remote_pc, command, &extra)?;
        if let Some(status) = status.as_mut() {
            status.status(&format!("{remote_pc}: {shell}"))?;
        }
        resolution.commands.push((remote_pc.to_string(), shell));
        return Ok(resolution);
    }

    for dispatch in dispatch_all(robot, command, &extra)? {
        let line = match dispatch.result {
            Ok(shell) => {
                let line = format!("{}: {shell}", dispatch.host);
                resolution.commands.push((dispatch.host, shell));
                line
            }
            Err(e) => {
                let line = format!("{}: failed", dispatch.host);
                resolution.failures.push((dispatch.host, e));
                line
            }
        };
        if let Some(status) = status.as_mut() {
            status.status(&line)?;
        }
    }
    Ok(resolution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetmux_core::fleet::{Command, RemoteHost};

    fn rescue() -> Robot {
        let mut robot = Robot::new("rescue");
        let mut jetson = RemoteHost::new("jetson", "ubuntu");
        jetson.commands.push(Command::new("camera", "ros2 launch camera {{ robot }}.launch.py"));
        robot.insert_host(jetson);
        let mut nuc = RemoteHost::new("nuc", "robot");
        nuc.commands.push(Command::new("camera", "ros2 launch camera nuc.launch.py").delegated("gateway"));
        robot.insert_host(nuc);
        robot.insert_host(RemoteHost::new("arm", "robot"));
        robot
    }

    fn resolved(robot: &Robot, remote_pc: &str, command: &str) -> anyhow::Result<Vec<(String, String)>> {
        resolve::<Vec<u8>>(robot, remote_pc, command, None)?.report(&robot.name, command)
    }

    #[test]
    fn single_pc() {
        let commands = resolved(&rescue(), "jetson", "reboot").unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].0, "jetson");
        assert!(commands[0].1.starts_with("ssh -p 22 -t ubuntu@jetson "));
    }

    #[test]
    fn all_skips_failing_pcs() {
        let commands = resolved(&rescue(), ALL_HOSTS, "camera").unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].0, "jetson");
        assert!(commands[0].1.contains("rescue.launch.py"));
    }

    #[test]
    fn each_pc_shows_up_as_it_resolves() {
        let mut status = StatusOutput::new(4, Vec::new());
        let resolution = resolve(&rescue(), ALL_HOSTS, "camera", Some(&mut status)).unwrap();

        assert_eq!(status.lines().len(), 2);
        assert!(status.lines()[0].starts_with("jetson: ssh -p 22 -t ubuntu@jetson "));
        assert_eq!(status.lines()[1], "nuc: failed");
        assert_eq!(resolution.failures.len(), 1);
        assert!(matches!(resolution.failures[0].1, FleetError::DelegateNotFound { .. }));
    }

    #[test]
    fn unknown_command_fails() {
        let err = resolved(&rescue(), ALL_HOSTS, "dance").unwrap_err();
        assert_eq!(err.to_string(), "command dance not found for any PC on robot rescue");
        assert!(resolved(&rescue(), "tower", "reboot").is_err());
    }

    #[test]
    fn nothing_resolvable_fails() {
        let mut robot = Robot::new("lonely");
        let mut pc = RemoteHost::new("pc", "robot");
        pc.commands.push(Command::new("x", "true").delegated("nowhere"));
        robot.insert_host(pc);
        let err = resolved(&robot, ALL_HOSTS, "x").unwrap_err();
        assert_eq!(err.to_string(), "command x could not be resolved for any PC on robot lonely");
    }
}
