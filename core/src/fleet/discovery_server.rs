use crate::error::{FleetError, Result};

pub const DEFAULT_DISCOVERY_PORT: u16 = 11811;

/// A middleware discovery endpoint announced by a robot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryServer {
    pub address: String,
    pub port: u16,
    /// Hex octets separated by `:` or `.`.
    pub guid_prefix: String,
}

impl DiscoveryServer {
    pub fn new(address: impl Into<String>, port: u16, guid_prefix: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            port,
            guid_prefix: guid_prefix.into(),
        }
    }

    /// `address:port`
    pub fn locator(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }

    pub fn octets(&self) -> Result<Vec<u8>> {
        self.guid_prefix
            .split([':', '.'])
            .map(|octet| u8::from_str_radix(octet, 16))
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|_| self.malformed())
    }

    /// Server id, encoded in the third octet of the GUID prefix.
    pub fn server_id(&self) -> Result<u8> {
        self.octets()?.get(2).copied().ok_or_else(|| self.malformed())
    }

    fn malformed(&self) -> FleetError {
        FleetError::GuidPrefix {
            prefix: self.guid_prefix.clone(),
        }
    }
}
