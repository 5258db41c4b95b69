//! # Address Discovery
//!
//! Where to send SSRP requests: subnet broadcast addresses for a LAN-wide
//! sweep, or the resolved addresses of a single host.

pub mod broadcast;
pub mod resolve;

pub use broadcast::{broadcast_addresses, collect_broadcast_addresses, parse_ip_addr_output, subnet_broadcast};
pub use resolve::resolve_host;
