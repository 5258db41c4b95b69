//! # SSRP Runtime Module
//!
//! High-level entry points tying address discovery, the query orchestrator
//! and a reporter together.
//!
//! ## Key Types
//!
//! - [`SsrpRuntime`] - broadcast sweep or directed query with one call
//! - [`ProbeConfig`] - port, deadlines and buffer sizes
//!
//! ## Example
//!
//! ```ignore
//! let runtime = SsrpRuntime::new(ProbeConfig::default(), ConsoleLogger::init());
//! let mut reporter = TextReporter::new(std::io::stdout());
//! let summary = runtime.broadcast(&mut reporter).await;
//! println!("{} responses", summary.responses);
//! ```

pub mod config;

pub use config::ProbeConfig;

use crate::error::Result;
use crate::logging::{ConsoleLogger, LogLevel, SsrpLogger};
use crate::net::{broadcast_addresses, resolve_host};
use crate::probe::{Orchestrator, ProbeMode, RunSummary};
use crate::report::Reporter;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub struct SsrpRuntime {
    config: ProbeConfig,
    logger: Arc<dyn SsrpLogger>,
    deadline_override: Option<Duration>,
}

impl SsrpRuntime {
    pub fn new(config: ProbeConfig, logger: Arc<dyn SsrpLogger>) -> Self {
        SsrpRuntime {
            config,
            logger,
            deadline_override: None,
        }
    }

    /// Loads the config file and logs through the console logger.
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let logger = ConsoleLogger::new();
        logger.log(
            LogLevel::Debug,
            "Runtime",
            &format!("Loading config from {}", config_path.as_ref().display()),
        );
        let config = ProbeConfig::load(config_path)?;
        Ok(Self::new(config, logger))
    }

    /// Uses `deadline` for both modes instead of the configured windows.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_override = Some(deadline);
        self
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub fn get_logger(&self) -> Arc<dyn SsrpLogger> {
        self.logger.clone()
    }

    pub fn deadline(&self, mode: ProbeMode) -> Duration {
        self.deadline_override.unwrap_or_else(|| match mode {
            ProbeMode::Broadcast => self.config.broadcast_deadline(),
            ProbeMode::Unicast => self.config.unicast_deadline(),
        })
    }

    fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(self.logger.clone()).with_max_datagram(self.config.max_datagram)
    }

    /// Sends CLNT_BCAST_EX to every local subnet.
    pub async fn broadcast<R: Reporter>(&self, reporter: &mut R) -> RunSummary {
        self.logger.log(LogLevel::Info, "Runtime", "Detecting network interfaces...");
        let destinations: Vec<SocketAddr> = broadcast_addresses(&self.config.broadcast_addresses, &*self.logger)
            .into_iter()
            .map(|ip| SocketAddr::new(IpAddr::V4(ip), self.config.port))
            .collect();

        self.logger.log(LogLevel::Info, "Runtime", "Broadcasting...");
        self.orchestrator()
            .probe(&destinations, ProbeMode::Broadcast, self.deadline(ProbeMode::Broadcast), reporter)
            .await
    }

    /// Sends CLNT_UCAST_EX to every address `host` resolves to.
    ///
    /// A host that resolves to nothing still waits out the deadline and
    /// reports failure.
    pub async fn unicast<R: Reporter>(&self, host: &str, reporter: &mut R) -> RunSummary {
        self.logger.log(LogLevel::Info, "Runtime", &format!("Resolving {}...", host));
        let destinations: Vec<SocketAddr> = resolve_host(host, self.config.port, &*self.logger)
            .await
            .into_iter()
            .map(|ip| SocketAddr::new(ip, self.config.port))
            .collect();

        self.logger.log(LogLevel::Info, "Runtime", "Querying...");
        self.orchestrator()
            .probe(&destinations, ProbeMode::Unicast, self.deadline(ProbeMode::Unicast), reporter)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLogger;

    #[test]
    fn test_deadline_per_mode() {
        let runtime = SsrpRuntime::new(ProbeConfig::default(), MemoryLogger::new());
        assert_eq!(runtime.deadline(ProbeMode::Broadcast), Duration::from_secs(2));
        assert_eq!(runtime.deadline(ProbeMode::Unicast), Duration::from_secs(1));

        let runtime = runtime.with_deadline(Duration::from_millis(300));
        assert_eq!(runtime.deadline(ProbeMode::Broadcast), Duration::from_millis(300));
        assert_eq!(runtime.deadline(ProbeMode::Unicast), Duration::from_millis(300));
    }
}
