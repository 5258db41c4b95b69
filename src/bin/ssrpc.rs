//! ssrpc - SSRP (SQL Server Resolution Protocol) client
//!
//! Lists SQL Server instances on the local network, or on one host.

use clap::Parser;
use ssrp_client::logging::{ConsoleLogger, LogLevel, SsrpLogger};
use ssrp_client::report::{JsonReporter, Reporter, TextReporter};
use ssrp_client::{ProbeConfig, RunSummary, SsrpRuntime};
use std::process::ExitCode;
use std::time::Duration;

/// SSRP (SQL Server Resolution Protocol) Client
#[derive(Parser, Debug)]
#[command(name = "ssrpc")]
#[command(version)]
#[command(about = "SSRP (SQL Server Resolution Protocol) Client")]
#[command(after_help = "Examples:\n  ssrpc servername\n  ssrpc 192.168.1.1\n  ssrpc")]
struct Args {
    /// Host name or IP address to query; broadcast to all local subnets when omitted
    target: Option<String>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<String>,

    /// Listening window in milliseconds (default: 2000 broadcast, 1000 directed)
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Output format: pretty, json
    #[arg(short, long, default_value = "pretty")]
    format: OutputFormat,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "p" => Ok(OutputFormat::Pretty),
            "json" | "j" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let logger = ConsoleLogger::init();
    logger.log(
        LogLevel::Info,
        "Main",
        &format!("ssrpc {} - SSRP (SQL Server Resolution Protocol) Client", env!("CARGO_PKG_VERSION")),
    );

    match run(&args, logger.clone()).await {
        Ok(summary) if summary.success() => {
            logger.log(LogLevel::Info, "Main", "Everything's shiny cap'n!");
            ExitCode::SUCCESS
        }
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            logger.log(LogLevel::Error, "Main", &format!("Exception: {}", e));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, logger: std::sync::Arc<ConsoleLogger>) -> ssrp_client::Result<RunSummary> {
    let config = match &args.config {
        Some(path) => ProbeConfig::load(path)?,
        None => ProbeConfig::default(),
    };

    let mut runtime = SsrpRuntime::new(config, logger);
    if let Some(ms) = args.timeout {
        if ms == 0 {
            return Err(ssrp_client::SsrpError::InvalidConfig("timeout must be non-zero".into()));
        }
        runtime = runtime.with_deadline(Duration::from_millis(ms));
    }

    let stdout = std::io::stdout();
    let summary = match args.format {
        OutputFormat::Pretty => discover(&runtime, args.target.as_deref(), &mut TextReporter::new(stdout.lock())).await,
        OutputFormat::Json => discover(&runtime, args.target.as_deref(), &mut JsonReporter::new(stdout.lock())).await,
    };
    Ok(summary)
}

async fn discover<R: Reporter>(runtime: &SsrpRuntime, target: Option<&str>, reporter: &mut R) -> RunSummary {
    match target {
        Some(host) => runtime.unicast(host, reporter).await,
        None => runtime.broadcast(reporter).await,
    }
}
