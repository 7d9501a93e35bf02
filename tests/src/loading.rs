use fleetmux_core::FleetError;
use fleetmux_core::loader::RobotLoader;

use super::util::{self, CountingSource, fleet_dir};

#[test]
fn directory_is_walked_recursively() {
    let dir = fleet_dir();
    let cfg = util::config(&[dir.path()], dir.path());

    let robots = RobotLoader::new().load(&cfg.search_paths()).unwrap();
    assert_eq!(robots.keys().collect::<Vec<_>>(), ["athena", "rescue"]);

    let field = robots["athena"].host("field_pc").unwrap();
    assert_eq!(field.address(), "robot@10.0.0.7:2222");
    assert_eq!(
        field.command_names().collect::<Vec<_>>(),
        ["ssh", "ssh-copy-id", "reboot", "shutdown", "logs"]
    );
    assert!(!robots["athena"].host("base_station").unwrap().has_command("logs"));
}

#[test]
fn each_file_is_read_once() {
    let dir = fleet_dir();
    let cfg = util::config(&[dir.path()], dir.path());
    let mut loader = RobotLoader::with_source(CountingSource::default());

    loader.load(&cfg.search_paths()).unwrap();
    loader.robot(&cfg.search_paths(), "rescue").unwrap();
    loader.load_path(&dir.path().join("rescue.yaml")).unwrap();

    let reads = loader.source().reads.borrow();
    assert_eq!(reads.len(), 2, "files were read again: {reads:?}");
}

#[test]
fn later_paths_override_earlier_ones() {
    let dir = fleet_dir();
    let overrides = tempfile::tempdir().unwrap();
    let local = util::write(
        overrides.path(),
        "rescue.yaml",
        "
remote_pcs:
  jetson:
    user: ubuntu
    hostname: 192.168.1.40
",
    );
    let missing = dir.path().join("does-not-exist.yaml");
    let cfg = util::config(&[dir.path(), missing.as_path(), local.as_path()], dir.path());

    let rescue = RobotLoader::new().robot(&cfg.search_paths(), "rescue").unwrap();
    assert_eq!(rescue.host("jetson").unwrap().address(), "ubuntu@192.168.1.40:22");
}

#[test]
fn broken_file_names_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = util::write(dir.path(), "broken.yaml", "remote_pcs:\n  jetson:\n    port: 22\n");

    let err = RobotLoader::new().load(&[path.clone()]).unwrap_err();
    assert!(matches!(err, FleetError::Config { .. }), "unexpected error: {err:?}");
    assert!(err.to_string().contains("broken.yaml"));
    assert!(err.to_string().contains("user not specified for remote PC jetson"));
}

#[test]
fn unknown_robot() {
    let dir = fleet_dir();
    let err = RobotLoader::new().robot(&[dir.path().to_path_buf()], "hermes").unwrap_err();
    assert_eq!(err.to_string(), "robot hermes not found");
}
