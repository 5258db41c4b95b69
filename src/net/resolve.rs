use crate::logging::{LogLevel, SsrpLogger};
use std::net::IpAddr;

/// Addresses `host` resolves to. A literal IP address is returned as is.
///
/// Lookup failures are logged and yield no addresses, which leaves the
/// caller with nothing to query rather than an error.
pub async fn resolve_host(host: &str, port: u16, logger: &dyn SsrpLogger) -> Vec<IpAddr> {
    if let Ok(addr) = host.parse::<IpAddr>() {
        return vec![addr];
    }

    let resolved = match tokio::net::lookup_host((host, port)).await {
        Ok(resolved) => resolved,
        Err(e) => {
            logger.log(LogLevel::Error, "Net", &format!("cannot resolve {}: {}", host, e));
            return Vec::new();
        }
    };

    let mut addrs: Vec<IpAddr> = Vec::new();
    for endpoint in resolved {
        logger.log(LogLevel::Info, "Net", &format!("  {}", endpoint));
        if !addrs.contains(&endpoint.ip()) {
            addrs.push(endpoint.ip());
        }
    }
    addrs
}
