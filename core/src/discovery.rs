//! # Discovery profiles
//!
//! Writes the middleware's XML participant profiles so every new shell on this
//! machine discovers the selected robots' discovery servers.
//!
//! Two files are produced in the output directory: `discovery_client.xml`
//! (protocol `CLIENT`) and `super_client.xml` (protocol `SUPER_CLIENT`, for
//! introspection tools that need the whole graph).

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FleetError, Result};
use crate::fleet::{DEFAULT_DISCOVERY_PORT, DiscoveryServer};
use crate::loader::RobotMap;

pub const CLIENT_FILE: &str = "discovery_client.xml";
pub const SUPER_CLIENT_FILE: &str = "super_client.xml";

/// Selects every robot's servers plus the local one.
pub const ALL: &str = "all";
/// Selects the default server on this machine.
pub const LOCAL_SERVER: &str = "local_server";
/// Writes an empty profile, disabling discovery servers.
pub const OFF: &str = "off";

const LOCAL_GUID_PREFIX: &str = "44.53.00.5f.45.50.52.4f.53.49.4d.41";
const PROFILES_NAMESPACE: &str = "http://www.eprosima.com/XMLSchemas/fastRTPS_Profiles";
const INDENT: &str = "    ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Client,
    SuperClient,
}

impl Protocol {
    fn as_str(&self) -> &'static str {
        match self {
            Protocol::Client => "CLIENT",
            Protocol::SuperClient => "SUPER_CLIENT",
        }
    }

    /// File the profile for this protocol is written to.
    pub fn file_name(&self) -> &'static str {
        match self {
            Protocol::Client => CLIENT_FILE,
            Protocol::SuperClient => SUPER_CLIENT_FILE,
        }
    }
}

pub fn local_server() -> DiscoveryServer {
    DiscoveryServer::new("127.0.0.1", DEFAULT_DISCOVERY_PORT, LOCAL_GUID_PREFIX)
}

/// Servers picked by `names`, and the names that matched no robot.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub servers: Vec<DiscoveryServer>,
    pub unknown: Vec<String>,
}

/// Resolves robot names, [`ALL`] and [`LOCAL_SERVER`] to discovery servers.
///
/// [`ALL`] ends the selection: names after it are ignored.
pub fn select(robots: &RobotMap, names: &[String]) -> Selection {
    let mut selection = Selection::default();
    for name in names {
        match name.as_str() {
            LOCAL_SERVER => selection.servers.push(local_server()),
            ALL => {
                for robot in robots.values() {
                    selection.servers.extend(robot.discovery_servers.iter().cloned());
                }
                selection.servers.push(local_server());
                break;
            }
            robot => match robots.get(robot) {
                Some(robot) => selection.servers.extend(robot.discovery_servers.iter().cloned()),
                None => selection.unknown.push(robot.to_string()),
            },
        }
    }
    selection
}

/// Profile listing `servers` as remote discovery servers.
pub fn client_profile(servers: &[DiscoveryServer], protocol: Protocol) -> String {
    let mut xml = String::new();
    xml_header(&mut xml);
    line(&mut xml, 2, "<participant profile_name=\"discovery_server_profile\" is_default_profile=\"true\">");
    line(&mut xml, 3, "<rtps>");
    line(&mut xml, 4, "<builtin>");
    line(&mut xml, 5, "<discovery_config>");
    line(&mut xml, 6, &format!("<discoveryProtocol>{}</discoveryProtocol>", protocol.as_str()));

    if servers.is_empty() {
        line(&mut xml, 6, "<discoveryServersList />");
    } else {
        line(&mut xml, 6, "<discoveryServersList>");
        for server in servers {
            remote_server(&mut xml, server);
        }
        line(&mut xml, 6, "</discoveryServersList>");
    }

    line(&mut xml, 5, "</discovery_config>");
    line(&mut xml, 4, "</builtin>");
    line(&mut xml, 3, "</rtps>");
    line(&mut xml, 2, "</participant>");
    xml_footer(&mut xml);
    xml
}

/// Default profile without discovery servers.
pub fn empty_profile() -> String {
    let mut xml = String::new();
    xml_header(&mut xml);
    line(&mut xml, 2, "<participant profile_name=\"empty_profile\" is_default_profile=\"true\" />");
    xml_footer(&mut xml);
    xml
}

/// Writes the client and super-client profiles into `dir`.
pub fn write_profiles(dir: &Path, servers: &[DiscoveryServer]) -> Result<[PathBuf; 2]> {
    let client = write_profile(dir, servers, Protocol::Client)?;
    let super_client = write_profile(dir, servers, Protocol::SuperClient)?;
    Ok([client, super_client])
}

/// Writes the profile for one `protocol` into `dir`.
pub fn write_profile(dir: &Path, servers: &[DiscoveryServer], protocol: Protocol) -> Result<PathBuf> {
    write(dir, protocol.file_name(), &client_profile(servers, protocol))
}

/// Replaces the client profile with [`empty_profile`].
pub fn disable(dir: &Path) -> Result<PathBuf> {
    write(dir, CLIENT_FILE, &empty_profile())
}

fn write(dir: &Path, file: &str, contents: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| FleetError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(file);
    fs::write(&path, contents).map_err(|source| FleetError::Io {
        path: path.clone(),
        source,
    })?;
    debug!(path = %path.display(), "wrote discovery profile");
    Ok(path)
}

fn remote_server(xml: &mut String, server: &DiscoveryServer) {
    line(xml, 7, &format!("<RemoteServer prefix=\"{}\">", escape(&server.guid_prefix)));
    line(xml, 8, "<metatrafficUnicastLocatorList>");
    line(xml, 9, "<locator>");
    line(xml, 10, "<udpv4>");
    line(xml, 11, &format!("<address>{}</address>", escape(&server.address)));
    line(xml, 11, &format!("<port>{}</port>", server.port));
    line(xml, 10, "</udpv4>");
    line(xml, 9, "</locator>");
    line(xml, 8, "</metatrafficUnicastLocatorList>");
    line(xml, 7, "</RemoteServer>");
}

fn xml_header(xml: &mut String) {
    xml.push_str("<?xml version='1.0' encoding='utf-8'?>\n");
    xml.push_str("<dds>\n");
    line(xml, 1, &format!("<profiles xmlns=\"{PROFILES_NAMESPACE}\">"));
}

fn xml_footer(xml: &mut String) {
    line(xml, 1, "</profiles>");
    xml.push_str("</dds>\n");
}

fn line(xml: &mut String, depth: usize, text: &str) {
    let _ = writeln!(xml, "{}{text}", INDENT.repeat(depth));
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
