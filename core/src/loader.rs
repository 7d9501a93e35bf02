//! # Robot loader
//!
//! Builds [`Robot`]s from YAML files and directories. Each file or directory is
//! read at most once per [`RobotLoader`]; later requests for the same path are
//! served from its cache.
//!
//! Command sets are layered: the built-in defaults, then the robot's
//! `commands`, then the host's own `commands`. A `null` entry removes a command
//! from the layer below, anything else replaces or adds it.

mod document;
mod source;

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_yaml::Mapping;
use tracing::debug;

use crate::error::{FleetError, Result};
use crate::fleet::{Command, DEFAULT_DISCOVERY_PORT, DEFAULT_SSH_PORT, DiscoveryServer, RemoteHost, Robot};

pub use document::{CommandSpec, Document};
pub use source::{FleetSource, FsSource, SourceKind};

use document::{DiscoveryServerSpec, HostSpec, RobotSpec, entries};

pub type RobotMap = BTreeMap<String, Robot>;

pub struct RobotLoader<S = FsSource> {
    source: S,
    cache: HashMap<PathBuf, Arc<RobotMap>>,
}

impl RobotLoader<FsSource> {
    pub fn new() -> Self {
        Self::with_source(FsSource)
    }
}

impl Default for RobotLoader<FsSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: FleetSource> RobotLoader<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            cache: HashMap::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// All robots found on `search_path`, merged in order.
    ///
    /// A robot defined on several paths keeps the last definition. Entries that
    /// do not exist are skipped.
    pub fn load(&mut self, search_path: &[PathBuf]) -> Result<RobotMap> {
        let mut robots = RobotMap::new();
        for path in search_path {
            if let Some(found) = self.load_path(path)? {
                robots.extend(found.iter().map(|(name, robot)| (name.clone(), robot.clone())));
            }
        }
        Ok(robots)
    }

    /// Robots defined in one file or directory, `None` if it does not exist.
    pub fn load_path(&mut self, path: &Path) -> Result<Option<Arc<RobotMap>>> {
        if let Some(cached) = self.cache.get(path) {
            return Ok(Some(Arc::clone(cached)));
        }

        match self.source.kind(path) {
            None => {
                debug!(path = %path.display(), "skipping missing robot path");
                Ok(None)
            }
            Some(SourceKind::File) => self.load_file(path).map(Some),
            Some(SourceKind::Dir) => {
                let mut robots = RobotMap::new();
                for file in self.source.yaml_files(path)? {
                    let found = self.load_file(&file)?;
                    robots.extend(found.iter().map(|(name, robot)| (name.clone(), robot.clone())));
                }
                Ok(Some(self.remember(path, robots)))
            }
        }
    }

    /// Looks up a single robot by name.
    pub fn robot(&mut self, search_path: &[PathBuf], name: &str) -> Result<Robot> {
        self.load(search_path)?
            .remove(name)
            .ok_or_else(|| FleetError::RobotNotFound(name.to_string()))
    }

    fn load_file(&mut self, path: &Path) -> Result<Arc<RobotMap>> {
        if let Some(cached) = self.cache.get(path) {
            return Ok(Arc::clone(cached));
        }

        debug!(path = %path.display(), "reading robot definitions");
        let text = self.source.read(path)?;
        let robots = match Document::parse(&text, path)? {
            Document::Single(spec) => {
                let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
                let robot = build_robot(&stem, spec, path)?;
                RobotMap::from([(robot.name.clone(), robot)])
            }
            Document::Multi(specs) => specs
                .into_iter()
                .map(|(key, spec)| build_robot(&key, spec, path).map(|robot| (robot.name.clone(), robot)))
                .collect::<Result<_>>()?,
        };
        Ok(self.remember(path, robots))
    }

    fn remember(&mut self, path: &Path, robots: RobotMap) -> Arc<RobotMap> {
        let robots = Arc::new(robots);
        self.cache.insert(path.to_path_buf(), Arc::clone(&robots));
        robots
    }
}

/// Builds a robot named `key` (file stem or mapping key) unless the body sets `name`.
fn build_robot(key: &str, spec: RobotSpec, path: &Path) -> Result<Robot> {
    let mut robot = Robot::new(spec.name.unwrap_or_else(|| key.to_string()));

    let mut shared = crate::fleet::default_commands();
    apply_overrides(&mut shared, spec.commands, path)?;

    for (pc_name, host) in entries::<HostSpec>(spec.remote_pcs, path, "remote PC")? {
        let pc = build_host(pc_name, host, &shared, path)?;
        robot.insert_host(pc);
    }

    robot.discovery_servers = spec
        .discovery_servers
        .into_iter()
        .map(|server| build_discovery_server(server, &robot.name, path))
        .collect::<Result<_>>()?;

    Ok(robot)
}

fn build_host(name: String, spec: HostSpec, shared: &[Command], path: &Path) -> Result<RemoteHost> {
    let Some(user) = spec.user else {
        return Err(FleetError::config(path, format!("user not specified for remote PC {name}")));
    };

    let mut commands = shared.to_vec();
    apply_overrides(&mut commands, spec.commands, path)?;

    Ok(RemoteHost {
        hostname: spec.hostname.unwrap_or_else(|| name.clone()),
        name,
        user,
        port: spec.port.unwrap_or(DEFAULT_SSH_PORT),
        commands,
    })
}

fn build_discovery_server(spec: DiscoveryServerSpec, robot: &str, path: &Path) -> Result<DiscoveryServer> {
    let missing = |field: &str| FleetError::config(path, format!("{field} not specified for a discovery server of robot {robot}"));
    let address = spec.address.ok_or_else(|| missing("address"))?;
    let guid_prefix = spec.guid_prefix.ok_or_else(|| missing("guid_prefix"))?;
    Ok(DiscoveryServer::new(address, spec.port.unwrap_or(DEFAULT_DISCOVERY_PORT), guid_prefix))
}

fn apply_overrides(commands: &mut Vec<Command>, overrides: Mapping, path: &Path) -> Result<()> {
    for (name, spec) in entries::<Option<CommandSpec>>(overrides, path, "command")? {
        let position = commands.iter().position(|c| c.name() == name);
        match (spec, position) {
            (None, Some(i)) => {
                commands.remove(i);
            }
            (None, None) => debug!(command = %name, "nothing to remove"),
            (Some(spec), Some(i)) => commands[i] = into_command(name, spec),
            (Some(spec), None) => commands.push(into_command(name, spec)),
        }
    }
    Ok(())
}

fn into_command(name: String, spec: CommandSpec) -> Command {
    match spec {
        CommandSpec::Text(template) => Command::new(name, template),
        CommandSpec::Full { command, delegate_to: None } => Command::new(name, command),
        CommandSpec::Full {
            command,
            delegate_to: Some(delegate),
        } => Command::new(name, command).delegated(delegate),
    }
}
