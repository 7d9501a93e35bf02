//! Raw YAML shapes of robot definition files.
//!
//! A file is either a single robot (top-level `remote_pcs`) or a mapping of
//! robot name to robot body. Which one is decided once, here.

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};

use crate::error::{FleetError, Result};

const SINGLE_ROBOT_KEY: &str = "remote_pcs";

#[derive(Debug)]
pub enum Document {
    /// Robot named after the file unless `name` says otherwise.
    Single(RobotSpec),
    Multi(Vec<(String, RobotSpec)>),
}

#[derive(Debug, Deserialize)]
pub struct RobotSpec {
    pub name: Option<String>,
    pub remote_pcs: Mapping,
    #[serde(default)]
    pub commands: Mapping,
    #[serde(default)]
    pub discovery_servers: Vec<DiscoveryServerSpec>,
}

#[derive(Debug, Deserialize)]
pub struct HostSpec {
    pub user: Option<String>,
    pub hostname: Option<String>,
    pub port: Option<u16>,
    #[serde(default)]
    pub commands: Mapping,
}

#[derive(Debug, Deserialize)]
pub struct DiscoveryServerSpec {
    pub address: Option<String>,
    pub port: Option<u16>,
    pub guid_prefix: Option<String>,
}

/// A command override; `null` in YAML (a `None` entry) removes the command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum CommandSpec {
    Text(String),
    Full {
        command: String,
        #[serde(default)]
        delegate_to: Option<String>,
    },
}

impl Document {
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Document::Multi(Vec::new()));
        }
        let value: Value = serde_yaml::from_str(text).map_err(|source| FleetError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        match value {
            Value::Null => Ok(Document::Multi(Vec::new())),
            Value::Mapping(map) if map.contains_key(SINGLE_ROBOT_KEY) => {
                Ok(Document::Single(from_value(Value::Mapping(map), path)?))
            }
            Value::Mapping(map) => Ok(Document::Multi(entries(map, path, "robot")?)),
            _ => Err(FleetError::config(
                path,
                "expected a robot or a mapping of robot names to robots",
            )),
        }
    }
}

/// Deserializes every value of `map`, keeping YAML order. Number and boolean
/// keys are used in their string form.
pub fn entries<T: DeserializeOwned>(map: Mapping, path: &Path, what: &str) -> Result<Vec<(String, T)>> {
    map.into_iter()
        .map(|(key, value)| {
            let name = match key {
                Value::String(name) => name,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                other => {
                    return Err(FleetError::config(path, format!("{what} names must be strings, got {other:?}")));
                }
            };
            let parsed = from_value(value, path).map_err(|e| match e {
                FleetError::Yaml { source, .. } => {
                    FleetError::config(path, format!("{what} {name}: {source}"))
                }
                other => other,
            })?;
            Ok((name, parsed))
        })
        .collect()
}

fn from_value<T: DeserializeOwned>(value: Value, path: &Path) -> Result<T> {
    serde_yaml::from_value(value).map_err(|source| FleetError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}
