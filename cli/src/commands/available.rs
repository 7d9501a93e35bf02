use std::collections::BTreeSet;

use fleetmux_common::config::Config;
use fleetmux_core::Result;
use fleetmux_core::dispatch::ALL_HOSTS;
use fleetmux_core::fleet::Robot;
use fleetmux_core::loader::RobotLoader;

use crate::terminal::print;

pub fn commands(robot: &str, remote_pc: &str, cfg: &Config) -> anyhow::Result<()> {
    let robot = RobotLoader::new().robot(&cfg.search_paths(), robot)?;
    for name in available(&robot, remote_pc)? {
        print::print(&name);
    }
    Ok(())
}

/// Command names of one PC in definition order, or the sorted union over all PCs.
fn available(robot: &Robot, remote_pc: &str) -> Result<Vec<String>> {
    if remote_pc == ALL_HOSTS {
        let names: BTreeSet<&str> = robot
            .remote_pcs
            .iter()
            .flat_map(|pc| pc.command_names())
            .collect();
        return Ok(names.into_iter().map(String::from).collect());
    }
    let pc = robot.require_host(remote_pc)?;
    Ok(pc.command_names().map(String::from).collect())
}
