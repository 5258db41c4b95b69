pub mod codec;
pub mod error;
pub mod logging;
pub mod net;
pub mod probe;
pub mod report;
pub mod runtime;
pub mod transport;

pub use transport::{DatagramTransport, UdpTransport};
pub use codec::{parse, InstanceRecord, Property, ResponseFrame, WireRequest};

pub use probe::{Orchestrator, ProbeMode, Query, RunSummary, ResponseEvent};
pub use report::{Reporter, TextReporter, JsonReporter};
pub use error::{SsrpError, Result};
pub use runtime::*;
