//! Resolution of a command name into concrete shell strings.
//!
//! [`dispatch_one`] targets a single named host. [`dispatch_all`] fans a command
//! out to every host of a robot that defines it.

use std::slice;

use tracing::debug;

use crate::error::{CommandScope, FleetError, Result};
use crate::fleet::{RemoteHost, Robot};
use crate::shell;
use crate::template::Scope;

/// Pseudo host name addressing every host of a robot.
pub const ALL_HOSTS: &str = "all";

/// Shell command for `command` on the host named `host`.
///
/// `host` must be a concrete host name; callers translate [`ALL_HOSTS`] into
/// [`dispatch_all`] themselves.
pub fn dispatch_one(robot: &Robot, host: &str, command: &str, extra: &Scope) -> Result<String> {
    let pc = robot.require_host(host)?;
    shell_command(robot, pc, command, &robot_scope(robot, extra))
}

/// `(host name, shell command)` for every host defining `command`.
///
/// Fails up front with [`FleetError::CommandNotFound`] naming the robot when no
/// host defines it. Failures of individual hosts are yielded in place and do
/// not stop the remaining hosts.
pub fn dispatch_all<'a>(robot: &'a Robot, command: &str, extra: &Scope) -> Result<Dispatch<'a>> {
    if !robot.has_command(command) {
        return Err(FleetError::CommandNotFound {
            command: command.to_string(),
            scope: CommandScope::Robot(robot.name.clone()),
        });
    }

    Ok(Dispatch {
        robot,
        hosts: robot.remote_pcs.iter(),
        command: command.to_string(),
        scope: robot_scope(robot, extra),
    })
}

/// Lazy fan-out produced by [`dispatch_all`].
pub struct Dispatch<'a> {
    robot: &'a Robot,
    hosts: slice::Iter<'a, RemoteHost>,
    command: String,
    scope: Scope,
}

/// One host's share of a fan-out.
#[derive(Debug)]
pub struct HostDispatch {
    pub host: String,
    pub result: Result<String>,
}

impl Iterator for Dispatch<'_> {
    type Item = HostDispatch;

    fn next(&mut self) -> Option<Self::Item> {
        let pc = self.hosts.find(|pc| pc.has_command(&self.command))?;
        Some(HostDispatch {
            host: pc.name.clone(),
            result: shell_command(self.robot, pc, &self.command, &self.scope),
        })
    }
}

impl Dispatch<'_> {
    /// Collects the fan-out, stopping at the first host that fails.
    pub fn collect_all(self) -> Result<Vec<(String, String)>> {
        self.map(|d| d.result.map(|cmd| (d.host, cmd))).collect()
    }
}

fn robot_scope(robot: &Robot, extra: &Scope) -> Scope {
    let mut scope = Scope::from([("robot".to_string(), robot.name.clone())]);
    scope.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    scope
}

fn shell_command(robot: &Robot, pc: &RemoteHost, command: &str, scope: &Scope) -> Result<String> {
    let rendered = pc.resolve_command(command, scope)?;
    let target = robot.execution_target(pc, &rendered)?;
    let shell = shell::synthesize(target, &rendered.command);
    debug!(robot = %robot.name, host = %pc.name, shell = %shell, "dispatching");
    Ok(shell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::Command;
    use crate::template::scope;

    fn rescue() -> Robot {
        let mut robot = Robot::new("rescue");
        robot.insert_host(RemoteHost::new("jetson", "pi"));
        robot
    }

    fn athena() -> Robot {
        let mut robot = Robot::new("athena");

        let mut a = RemoteHost::new("a", "robot");
        a.commands.push(Command::new("status", "systemctl status {{robot}}-{{pc_name}}"));
        a.commands.push(Command::new("broken", "true").delegated("ghost"));

        let mut b = RemoteHost::new("b", "robot");
        b.commands.retain(|c| c.name() != "reboot");
        b.commands.push(Command::new("broken", "true"));

        robot.insert_host(a);
        robot.insert_host(b);
        robot
    }

    #[test]
    fn rescue_reboot_scenario() {
        let robot = rescue();
        let pairs = dispatch_all(&robot, "reboot", &Scope::new()).unwrap().collect_all().unwrap();
        assert_eq!(
            pairs,
            vec![("jetson".to_string(), "ssh -p 22 -t pi@jetson 'sudo reboot now'".to_string())]
        );
    }

    #[test]
    fn only_hosts_defining_the_command_are_yielded() {
        let robot = athena();
        let hosts: Vec<String> = dispatch_all(&robot, "reboot", &Scope::new())
            .unwrap()
            .map(|d| d.host)
            .collect();
        assert_eq!(hosts, vec!["a"]);
    }

    #[test]
    fn unknown_command_names_the_robot() {
        let robot = athena();
        let err = dispatch_all(&robot, "dance", &Scope::new()).err().unwrap();
        assert!(matches!(
            err,
            FleetError::CommandNotFound { scope: CommandScope::Robot(ref r), .. } if r == "athena"
        ));
    }

    #[test]
    fn one_failing_host_does_not_stop_the_others() {
        let robot = athena();
        let results: Vec<HostDispatch> = dispatch_all(&robot, "broken", &Scope::new()).unwrap().collect();

        assert_eq!(results.len(), 2);
        assert!(matches!(results[0].result, Err(FleetError::DelegateNotFound { .. })));
        assert_eq!(results[1].host, "b");
        assert_eq!(results[1].result.as_ref().unwrap(), "ssh -p 22 -t robot@b 'true'");

        assert!(dispatch_all(&robot, "broken", &Scope::new()).unwrap().collect_all().is_err());
    }

    #[test]
    fn each_call_walks_the_hosts_again() {
        let robot = athena();
        let first = dispatch_all(&robot, "ssh", &Scope::new()).unwrap().count();
        let second = dispatch_all(&robot, "ssh", &Scope::new()).unwrap().count();
        assert_eq!((first, second), (2, 2));
    }

    #[test]
    fn robot_variable_is_injected_and_overridable() {
        let robot = athena();
        assert_eq!(
            dispatch_one(&robot, "a", "status", &Scope::new()).unwrap(),
            "ssh -p 22 -t robot@a 'systemctl status athena-a'"
        );
        assert_eq!(
            dispatch_one(&robot, "a", "status", &scope([("robot", "demo")])).unwrap(),
            "ssh -p 22 -t robot@a 'systemctl status demo-a'"
        );
    }

    #[test]
    fn dispatch_one_rejects_unknown_and_all() {
        let robot = athena();
        for host in ["ghost", ALL_HOSTS] {
            assert!(matches!(
                dispatch_one(&robot, host, "reboot", &Scope::new()),
                Err(FleetError::HostNotFound { .. })
            ));
        }
        assert!(matches!(
            dispatch_one(&robot, "b", "reboot", &Scope::new()),
            Err(FleetError::CommandNotFound { scope: CommandScope::Host(_), .. })
        ));
    }

    #[test]
    fn local_commands_skip_ssh() {
        let robot = rescue();
        assert_eq!(
            dispatch_one(&robot, "jetson", "ssh-copy-id", &Scope::new()).unwrap(),
            "ssh-copy-id -p 22 pi@jetson"
        );
    }
}
