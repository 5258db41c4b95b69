use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

pub trait SsrpLogger: Send + Sync {
    fn log(&self, level: LogLevel, component: &str, msg: &str);
}

/// Forwards to the `log` facade, using the component as the target.
pub struct ConsoleLogger;

impl ConsoleLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }

    /// Installs `env_logger` with an `info` default, overridable via `RUST_LOG`.
    /// Safe to call more than once.
    pub fn init() -> Arc<Self> {
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format_timestamp(None)
            .format_target(false)
            .try_init();
        Self::new()
    }
}

impl SsrpLogger for ConsoleLogger {
    fn log(&self, level: LogLevel, component: &str, msg: &str) {
        let level: log::Level = level.into();
        log::log!(target: component, level, "{}", msg);
    }
}

/// Keeps every record in memory. Used to assert on diagnostics.
#[derive(Default)]
pub struct MemoryLogger {
    records: Mutex<Vec<(LogLevel, String, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn records(&self) -> Vec<(LogLevel, String, String)> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn count(&self, level: LogLevel) -> usize {
        self.records().iter().filter(|(l, _, _)| *l == level).count()
    }

    pub fn count_matching(&self, needle: &str) -> usize {
        self.records()
            .iter()
            .filter(|(_, _, msg)| msg.contains(needle))
            .count()
    }
}

impl SsrpLogger for MemoryLogger {
    fn log(&self, level: LogLevel, component: &str, msg: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push((level, component.to_string(), msg.to_string()));
        }
    }
}
