use std::io::Write;
use std::path::{Path, PathBuf};

use fleetmux_common::config::Config;
use fleetmux_common::terminal::StatusOutput;
use fleetmux_common::{success, warn};
use fleetmux_core::discovery::{self, OFF, Protocol};
use fleetmux_core::fleet::DiscoveryServer;
use fleetmux_core::loader::RobotLoader;

use super::status_view;
use crate::terminal::print;

const KEY_WIDTH: usize = 12;

pub fn discovery(servers: Vec<String>, cfg: &Config) -> anyhow::Result<()> {
    if servers.iter().any(|s| s == OFF) {
        if servers.len() > 1 {
            warn!("'{OFF}' disables discovery servers, ignoring the other arguments");
        }
        let path = discovery::disable(&cfg.discovery_dir)?;
        success!("Discovery servers disabled");
        print::aligned_line("Profile", path.display(), KEY_WIDTH);
        return Ok(());
    }

    let robots = RobotLoader::new().load(&cfg.search_paths())?;
    let selection = discovery::select(&robots, &servers);
    for name in &selection.unknown {
        warn!("Couldn't find robot {name} in the robot configs. Is it available?");
    }

    let mut status = status_view();
    let written = export(&cfg.discovery_dir, &selection.servers, status.as_mut());
    if let Some(status) = status.as_mut() {
        status.clear()?;
    }
    let written = written?;

    success!("Exported {} discovery server(s)", selection.servers.len());
    for (label, path) in ["Client", "Super client"].iter().zip(&written) {
        print::aligned_line(label, path.display(), KEY_WIDTH);
    }
    Ok(())
}

/// Writes the client and super-client profiles, showing each server and each
/// file on `status` as it is handled.
fn export<W: Write>(
    dir: &Path,
    servers: &[DiscoveryServer],
    mut status: Option<&mut StatusOutput<W>>,
) -> anyhow::Result<Vec<PathBuf>> {
    for server in servers {
        let line = match server.server_id() {
            Ok(id) => format!("Server {id} at {}", server.locator()),
            Err(e) => format!("Server at {} ({e})", server.locator()),
        };
        if let Some(status) = status.as_mut() {
            status.status(&line)?;
        }
    }

    let mut written = Vec::new();
    for protocol in [Protocol::Client, Protocol::SuperClient] {
        if let Some(status) = status.as_mut() {
            status.status(&format!("Writing {}", protocol.file_name()))?;
        }
        written.push(discovery::write_profile(dir, servers, protocol)?);
    }
    Ok(written)
}
