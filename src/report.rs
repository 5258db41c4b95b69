//! Rendering of discovered instances.

use crate::codec::InstanceRecord;
use crate::probe::ResponseEvent;
use serde::Serialize;
use std::io::{Result, Write};

pub trait Reporter {
    fn report(&mut self, event: &ResponseEvent) -> Result<()>;
}

/// Human-readable listing, one block per instance.
///
/// ```text
/// BLUE\SQL2014STD
///   ver: 12.0.4100.1
///   np:  \\BLUE\pipe\MSSQL$SQL2014STD\sql\query
///   tcp: 7317
///   ip:  192.168.1.20
/// ```
pub struct TextReporter<W: Write> {
    out: W,
}

impl<W: Write> TextReporter<W> {
    pub fn new(out: W) -> Self {
        TextReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TextReporter<W> {
    fn report(&mut self, event: &ResponseEvent) -> Result<()> {
        for r in &event.records {
            writeln!(self.out, "{}", r.display_name())?;
            writeln!(self.out, "  ver: {}", r.version)?;
            if r.is_clustered() {
                writeln!(self.out, "  Clustered")?;
            }
            if !r.np.is_empty() {
                writeln!(self.out, "  np:  {}", r.np)?;
            }
            if !r.tcp.is_empty() {
                writeln!(self.out, "  tcp: {}", r.tcp)?;
            }
            writeln!(self.out, "  ip:  {}", event.sender.ip())?;
            for p in &r.props {
                writeln!(self.out, "  {}:\t{}", p.key, p.value)?;
            }
        }
        writeln!(self.out)?;
        self.out.flush()
    }
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    #[serde(flatten)]
    record: &'a InstanceRecord,
    address: String,
    elapsed_ms: u64,
}

/// One JSON object per instance, newline-delimited.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        JsonReporter { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, event: &ResponseEvent) -> Result<()> {
        for record in &event.records {
            let line = JsonRecord {
                record,
                address: event.sender.ip().to_string(),
                elapsed_ms: event.elapsed.as_millis() as u64,
            };
            serde_json::to_writer(&mut self.out, &line)?;
            writeln!(self.out)?;
        }
        self.out.flush()
    }
}

/// Collects events in memory.
#[derive(Default)]
pub struct CollectingReporter {
    pub events: Vec<ResponseEvent>,
}

impl CollectingReporter {
    pub fn records(&self) -> impl Iterator<Item = &InstanceRecord> {
        self.events.iter().flat_map(|e| e.records.iter())
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, event: &ResponseEvent) -> Result<()> {
        self.events.push(event.clone());
        Ok(())
    }
}
