use std::env;
use std::path::{Path, PathBuf};

/// Search path for robot definitions, separated like `PATH`.
pub const ROBOTS_ENV: &str = "FLEETMUX_ROBOTS";
/// Workspace root used to locate the default robot definition file.
pub const WORKSPACE_ENV: &str = "FLEETMUX_WORKSPACE";
/// Output directory for generated discovery profiles.
pub const DISCOVERY_DIR_ENV: &str = "FLEETMUX_DISCOVERY_DIR";
/// Log filter directive, e.g. `debug` or `fleetmux_core=trace`.
pub const LOG_ENV: &str = "FLEETMUX_LOG";

pub const DEFAULT_ROBOTS_FILE: &str = ".config/robots.yaml";
pub const DEFAULT_DISCOVERY_DIR: &str = "/tmp/fleetmux";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Files and directories robots are loaded from.
    ///
    /// Entries are separated by the platform path separator. Entries that do not
    /// exist are skipped by the loader.
    pub robots_path: String,
    /// Where `discovery` writes its client profiles.
    pub discovery_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::resolve(
            env::var(ROBOTS_ENV).ok(),
            env::var_os(WORKSPACE_ENV).map(PathBuf::from),
            env::var_os(DISCOVERY_DIR_ENV).map(PathBuf::from),
            &cwd,
        )
    }

    fn resolve(
        robots: Option<String>,
        workspace: Option<PathBuf>,
        discovery_dir: Option<PathBuf>,
        cwd: &Path,
    ) -> Self {
        let robots_path = robots.filter(|p| !p.is_empty()).unwrap_or_else(|| {
            let root = workspace.unwrap_or_else(|| cwd.to_path_buf());
            root.join(DEFAULT_ROBOTS_FILE).to_string_lossy().into_owned()
        });

        Self {
            robots_path,
            discovery_dir: discovery_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DISCOVERY_DIR)),
        }
    }

    /// Splits [`Config::robots_path`] into its individual entries.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        env::split_paths(&self.robots_path)
            .filter(|p| !p.as_os_str().is_empty())
            .collect()
    }
}
