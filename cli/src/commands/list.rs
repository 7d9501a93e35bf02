use fleetmux_common::config::Config;
use fleetmux_common::terminal::TableOutput;
use fleetmux_common::warn;
use fleetmux_core::fleet::Robot;
use fleetmux_core::loader::RobotLoader;

pub fn list(robot: Option<String>, cfg: &Config) -> anyhow::Result<()> {
    let mut loader = RobotLoader::new();
    let robots: Vec<Robot> = match robot {
        Some(name) => vec![loader.robot(&cfg.search_paths(), &name)?],
        None => loader.load(&cfg.search_paths())?.into_values().collect(),
    };

    if robots.is_empty() {
        warn!("No robots found in {}", cfg.robots_path);
        return Ok(());
    }

    let mut table = TableOutput::stdout(["Robot", "PC", "Address", "Commands"]);
    for row in rows(&robots) {
        table.add_row(row);
    }
    table.print()?;
    Ok(())
}

/// One row per PC; the robot name is only shown on its first PC.
fn rows(robots: &[Robot]) -> Vec<[String; 4]> {
    let mut rows = Vec::new();
    for robot in robots {
        for (i, pc) in robot.remote_pcs.iter().enumerate() {
            let name = if i == 0 { robot.name.clone() } else { String::new() };
            let commands = pc.command_names().collect::<Vec<_>>().join(" ");
            rows.push([name, pc.name.clone(), pc.address(), commands]);
        }
    }
    rows
}
