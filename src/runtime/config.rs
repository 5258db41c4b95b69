use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::net::Ipv4Addr;
use std::path::Path;
use std::time::Duration;

use crate::codec::ResponseFrame;
use crate::error::{Result, SsrpError};

/// Probe configuration.
/// All timing values are in milliseconds.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProbeConfig {
    /// SQL Server Browser port (default: 1434)
    #[serde(default = "default_port")]
    pub port: u16,
    /// Listening window for broadcast discovery (ms, default: 2000)
    #[serde(default = "default_broadcast_deadline")]
    pub broadcast_deadline_ms: u64,
    /// Listening window for a directed query (ms, default: 1000)
    #[serde(default = "default_unicast_deadline")]
    pub unicast_deadline_ms: u64,
    /// Receive buffer size per datagram (bytes, default: 4099)
    #[serde(default = "default_max_datagram")]
    pub max_datagram: usize,
    /// Broadcast addresses to use instead of enumerating interfaces
    #[serde(default)]
    pub broadcast_addresses: Vec<Ipv4Addr>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        ProbeConfig {
            port: default_port(),
            broadcast_deadline_ms: default_broadcast_deadline(),
            unicast_deadline_ms: default_unicast_deadline(),
            max_datagram: default_max_datagram(),
            broadcast_addresses: Vec::new(),
        }
    }
}

fn default_port() -> u16 { 1434 }
fn default_broadcast_deadline() -> u64 { 2000 }
fn default_unicast_deadline() -> u64 { 1000 }
fn default_max_datagram() -> usize { ResponseFrame::MAX_DATAGRAM }

impl ProbeConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let config: ProbeConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: ProbeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(SsrpError::InvalidConfig("port must be non-zero".into()));
        }
        if self.broadcast_deadline_ms == 0 || self.unicast_deadline_ms == 0 {
            return Err(SsrpError::InvalidConfig("deadlines must be non-zero".into()));
        }
        if self.max_datagram < ResponseFrame::HEADER_LENGTH {
            return Err(SsrpError::InvalidConfig(format!(
                "max_datagram must be at least {} bytes",
                ResponseFrame::HEADER_LENGTH
            )));
        }
        Ok(())
    }

    pub fn broadcast_deadline(&self) -> Duration {
        Duration::from_millis(self.broadcast_deadline_ms)
    }

    pub fn unicast_deadline(&self) -> Duration {
        Duration::from_millis(self.unicast_deadline_ms)
    }
}
