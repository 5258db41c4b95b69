//! # SSRP Codec Module
//!
//! Wire framing and response parsing for the SQL Server Resolution Protocol
//! ([MC-SQLR]).
//!
//! ## Key Types
//!
//! - [`WireRequest`] - 1-byte discovery request (broadcast or unicast)
//! - [`ResponseFrame`] - tag/length/payload view of a response datagram
//! - [`InstanceRecord`] - one SQL Server instance decoded from a response
//! - [`parse`] - payload text to instance records
//!
//! ## Example
//!
//! ```ignore
//! use ssrp_client::codec::parse;
//!
//! let records = parse(b"ServerName;BLUE;InstanceName;SQL2014;IsClustered;No;Version;12.0.4100.1;tcp;7317;;");
//! assert_eq!(records[0].instance, "SQL2014");
//! ```

pub mod header;
pub mod parser;
pub mod record;

pub use header::{ResponseFrame, WireRequest};
pub use parser::{parse, parse_datagram};
pub use record::{InstanceRecord, Property};

mod tests;
