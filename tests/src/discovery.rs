use std::fs;

use fleetmux_core::discovery::{self, CLIENT_FILE};
use fleetmux_core::loader::RobotLoader;

use super::util::{self, fleet_dir};

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[test]
fn profiles_list_selected_servers() {
    let dir = fleet_dir();
    let out = tempfile::tempdir().unwrap();
    let cfg = util::config(&[dir.path()], &out.path().join("profiles"));
    let robots = RobotLoader::new().load(&cfg.search_paths()).unwrap();

    let selection = discovery::select(&robots, &names(&["athena", "hermes", "local_server"]));
    assert_eq!(selection.unknown, ["hermes"]);
    assert_eq!(selection.servers.len(), 2);

    let [client, super_client] = discovery::write_profiles(&cfg.discovery_dir, &selection.servers).unwrap();
    let client = fs::read_to_string(client).unwrap();
    let super_client = fs::read_to_string(super_client).unwrap();

    assert!(client.contains("<discoveryProtocol>CLIENT</discoveryProtocol>"));
    assert!(super_client.contains("<discoveryProtocol>SUPER_CLIENT</discoveryProtocol>"));
    for xml in [&client, &super_client] {
        assert!(xml.contains("<address>10.0.0.2</address>"));
        assert!(xml.contains("<address>127.0.0.1</address>"));
        assert!(xml.contains("44.53.01.5f.45.50.52.4f.53.49.4d.41"));
    }
}

#[test]
fn off_replaces_the_client_profile() {
    let out = tempfile::tempdir().unwrap();
    discovery::write_profiles(out.path(), &[discovery::local_server()]).unwrap();

    let path = discovery::disable(out.path()).unwrap();
    assert_eq!(path, out.path().join(CLIENT_FILE));
    let xml = fs::read_to_string(path).unwrap();
    assert!(!xml.contains("discoveryServersList"));
    assert!(xml.contains("empty_profile"));
}
