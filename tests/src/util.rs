use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use fleetmux_common::config::Config;
use fleetmux_core::Result;
use fleetmux_core::loader::{FleetSource, FsSource, SourceKind};
use tempfile::TempDir;

pub const RESCUE: &str = "
remote_pcs:
  jetson:
    user: pi
";

pub const ATHENA: &str = "
athena:
  commands:
    logs:
      command: tail -f /var/log/{{pc_name}}.log
      delegate_to: base_station
  remote_pcs:
    field_pc:
      user: robot
      hostname: 10.0.0.7
      port: 2222
    base_station:
      user: operator
      hostname: 10.0.0.2
      port: 2200
      commands:
        logs: ~
  discovery_servers:
    - address: 10.0.0.2
      guid_prefix: 44.53.01.5f.45.50.52.4f.53.49.4d.41
";

/// A robot directory with `rescue.yaml` at the top and `athena` one level down.
pub fn fleet_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "rescue.yaml", RESCUE);
    write(dir.path(), "teams/athena.yaml", ATHENA);
    dir
}

pub fn write(root: &Path, relative: &str, text: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, text).unwrap();
    path
}

pub fn config(robots: &[&Path], discovery_dir: &Path) -> Config {
    let joined = std::env::join_paths(robots).unwrap();
    Config {
        robots_path: joined.to_string_lossy().into_owned(),
        discovery_dir: discovery_dir.to_path_buf(),
    }
}

/// Filesystem source that records every file it reads.
#[derive(Default)]
pub struct CountingSource {
    pub reads: RefCell<Vec<PathBuf>>,
}

impl FleetSource for CountingSource {
    fn kind(&self, path: &Path) -> Option<SourceKind> {
        FsSource.kind(path)
    }

    fn yaml_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        FsSource.yaml_files(dir)
    }

    fn read(&self, path: &Path) -> Result<String> {
        self.reads.borrow_mut().push(path.to_path_buf());
        FsSource.read(path)
    }
}
