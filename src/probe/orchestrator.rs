use super::query::{ProbeMode, Query, QueryOutcome, ResponseEvent};
use crate::codec::ResponseFrame;
use crate::logging::{LogLevel, SsrpLogger};
use crate::report::Reporter;
use crate::transport::DatagramTransport;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

/// Result of one discovery run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<QueryOutcome>,
    /// Datagrams received across all queries.
    pub responses: usize,
    /// Instance records handed to the reporter.
    pub records: usize,
    /// Set when nothing had answered by half the deadline.
    pub crickets: bool,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn success(&self) -> bool {
        self.responses > 0
    }
}

/// Drives a set of queries against one shared deadline.
pub struct Orchestrator {
    logger: Arc<dyn SsrpLogger>,
    max_datagram: usize,
}

impl Orchestrator {
    pub fn new(logger: Arc<dyn SsrpLogger>) -> Self {
        Orchestrator {
            logger,
            max_datagram: ResponseFrame::MAX_DATAGRAM,
        }
    }

    pub fn with_max_datagram(mut self, max_datagram: usize) -> Self {
        self.max_datagram = max_datagram;
        self
    }

    /// Opens one UDP query per destination and runs them.
    ///
    /// A destination whose socket cannot be opened is logged and skipped.
    pub async fn probe<R: Reporter>(
        &self,
        destinations: &[SocketAddr],
        mode: ProbeMode,
        deadline: Duration,
        reporter: &mut R,
    ) -> RunSummary {
        let mut queries = Vec::with_capacity(destinations.len());
        for destination in destinations {
            match Query::open(*destination, mode, self.logger.clone()) {
                Ok(query) => queries.push(query.with_max_datagram(self.max_datagram)),
                Err(e) => self.logger.log(
                    LogLevel::Error,
                    "Orchestrator",
                    &format!("cannot open socket for {}: {}", destination, e),
                ),
            }
        }
        self.run(queries, deadline, reporter).await
    }

    /// Sends every request, then listens until `deadline`.
    ///
    /// At `deadline / 2` a warning is logged if no query has heard anything
    /// yet. At `deadline` every query is closed and the per-query counts are
    /// summed; the run succeeds if that sum is non-zero.
    pub async fn run<T: DatagramTransport, R: Reporter>(
        &self,
        queries: Vec<Query<T>>,
        deadline: Duration,
        reporter: &mut R,
    ) -> RunSummary {
        let started = Instant::now();
        let (events_tx, mut events_rx) = mpsc::unbounded_channel::<ResponseEvent>();
        let (close_tx, close_rx) = watch::channel(false);

        let mut counters: Vec<Arc<AtomicUsize>> = Vec::with_capacity(queries.len());
        let mut outcomes = Vec::with_capacity(queries.len());
        let mut handles = Vec::with_capacity(queries.len());

        for mut query in queries {
            if query.begin_query().await.is_err() {
                outcomes.push(QueryOutcome {
                    destination: query.destination(),
                    responses: 0,
                    failed: true,
                });
                continue;
            }
            self.logger.log(LogLevel::Info, "Orchestrator", &format!("packet sent to {}", query.destination()));

            counters.push(query.response_counter());
            handles.push(tokio::spawn(query.listen(events_tx.clone(), close_rx.clone())));
        }
        drop(events_tx);

        self.logger.log(LogLevel::Info, "Orchestrator", "Listening...");

        let full = tokio::time::sleep(deadline);
        let half = tokio::time::sleep(deadline / 2);
        tokio::pin!(full);
        tokio::pin!(half);

        let mut crickets = false;
        let mut half_done = false;
        let mut records = 0;

        loop {
            tokio::select! {
                biased;
                Some(event) = events_rx.recv() => {
                    records += self.deliver(reporter, &event);
                }
                _ = &mut half, if !half_done => {
                    half_done = true;
                    if counters.iter().all(|c| c.load(Ordering::Acquire) == 0) {
                        crickets = true;
                        self.logger.log(LogLevel::Warn, "Orchestrator", "(crickets...)");
                    }
                }
                _ = &mut full => break,
            }
        }

        let _ = close_tx.send(true);
        for handle in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => self.logger.log(LogLevel::Error, "Orchestrator", &format!("query task failed: {}", e)),
            }
        }

        // Datagrams that arrived before the close are still reported.
        while let Ok(event) = events_rx.try_recv() {
            records += self.deliver(reporter, &event);
        }

        let responses = outcomes.iter().map(|o| o.responses).sum();

        RunSummary {
            outcomes,
            responses,
            records,
            crickets,
            elapsed: started.elapsed(),
        }
    }

    fn deliver<R: Reporter>(&self, reporter: &mut R, event: &ResponseEvent) -> usize {
        if let Err(e) = reporter.report(event) {
            self.logger.log(LogLevel::Warn, "Orchestrator", &format!("failed to report response from {}: {}", event.sender, e));
        }
        event.records.len()
    }
}
