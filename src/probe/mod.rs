//! # SSRP Probe Module
//!
//! Concurrent discovery queries against a shared deadline.
//!
//! ## Key Types
//!
//! - [`Query`] - one destination: send once, then collect every reply
//! - [`Orchestrator`] - runs many queries, warns at half time, tallies at the end
//! - [`ResponseEvent`] - a parsed datagram on its way to the reporter
//!
//! ## Lifecycle
//!
//! 1. `Idle -> Sent`: the 1-byte request goes out
//! 2. `Sent -> Receiving`: each datagram is parsed and forwarded, then the
//!    receive is re-armed
//! 3. `* -> Closed`: the deadline closes the socket; this is not an error

pub mod orchestrator;
pub mod query;

pub use orchestrator::{Orchestrator, RunSummary};
pub use query::{ProbeMode, Query, QueryOutcome, QueryState, ResponseEvent};
