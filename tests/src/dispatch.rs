use fleetmux_core::FleetError;
use fleetmux_core::dispatch::{dispatch_all, dispatch_one};
use fleetmux_core::loader::RobotLoader;
use fleetmux_core::template::Scope;

use super::util::fleet_dir;

#[test]
fn rescue_reboot_fans_out_to_jetson() {
    let dir = fleet_dir();
    let rescue = RobotLoader::new().robot(&[dir.path().to_path_buf()], "rescue").unwrap();

    let commands = dispatch_all(&rescue, "reboot", &Scope::new()).unwrap().collect_all().unwrap();
    assert_eq!(
        commands,
        vec![("jetson".to_string(), "ssh -p 22 -t pi@jetson 'sudo reboot now'".to_string())]
    );
}

#[test]
fn delegated_command_connects_to_the_delegate() {
    let dir = fleet_dir();
    let athena = RobotLoader::new().robot(&[dir.path().to_path_buf()], "athena").unwrap();

    let shell = dispatch_one(&athena, "field_pc", "logs", &Scope::new()).unwrap();
    assert_eq!(shell, "ssh -p 2200 -t operator@10.0.0.2 'tail -f /var/log/field_pc.log'");
}

#[test]
fn ssh_runs_locally() {
    let dir = fleet_dir();
    let athena = RobotLoader::new().robot(&[dir.path().to_path_buf()], "athena").unwrap();

    let shell = dispatch_one(&athena, "field_pc", "ssh", &Scope::new()).unwrap();
    assert_eq!(shell, "ssh -p 2222 robot@10.0.0.7");
}

#[test]
fn fan_out_only_reaches_hosts_with_the_command() {
    let dir = fleet_dir();
    let athena = RobotLoader::new().robot(&[dir.path().to_path_buf()], "athena").unwrap();

    let hosts: Vec<String> = dispatch_all(&athena, "logs", &Scope::new())
        .unwrap()
        .map(|d| d.host)
        .collect();
    assert_eq!(hosts, ["field_pc"]);

    assert!(matches!(
        dispatch_all(&athena, "dance", &Scope::new()),
        Err(FleetError::CommandNotFound { .. })
    ));
}
