use crate::codec::{parse, InstanceRecord, ResponseFrame, WireRequest};
use crate::logging::{LogLevel, SsrpLogger};
use crate::transport::{DatagramTransport, UdpTransport};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryState {
    Idle,
    Sent,
    Receiving,
    Closed,
}

/// Which request a query sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMode {
    /// CLNT_BCAST_EX to a subnet broadcast address.
    Broadcast,
    /// CLNT_UCAST_EX to one host.
    Unicast,
}

impl ProbeMode {
    pub fn request(self) -> WireRequest {
        match self {
            ProbeMode::Broadcast => WireRequest::broadcast(),
            ProbeMode::Unicast => WireRequest::unicast(),
        }
    }
}

/// One datagram received by a query, already parsed.
#[derive(Debug, Clone)]
pub struct ResponseEvent {
    pub destination: SocketAddr,
    pub sender: SocketAddr,
    pub elapsed: Duration,
    pub tag: u8,
    pub records: Vec<InstanceRecord>,
}

/// Final state of a query after it was closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub destination: SocketAddr,
    pub responses: usize,
    /// True when the query stopped on a transport error rather than on close.
    pub failed: bool,
}

/// A single request/response exchange with one destination.
///
/// The request is sent once. Every datagram that comes back is parsed and
/// forwarded until the query is closed. A destination may answer more than
/// once, e.g. once per adapter.
pub struct Query<T: DatagramTransport = UdpTransport> {
    destination: SocketAddr,
    request: WireRequest,
    transport: T,
    state: QueryState,
    time_sent: Instant,
    responses: Arc<AtomicUsize>,
    failed: bool,
    max_datagram: usize,
    logger: Arc<dyn SsrpLogger>,
}

impl Query<UdpTransport> {
    /// Opens a socket for `destination`, with SO_BROADCAST set in broadcast mode.
    pub fn open(destination: SocketAddr, mode: ProbeMode, logger: Arc<dyn SsrpLogger>) -> std::io::Result<Self> {
        let transport = UdpTransport::for_destination(&destination, mode == ProbeMode::Broadcast)?;
        Ok(Self::with_transport(destination, mode.request(), transport, logger))
    }
}

impl<T: DatagramTransport> Query<T> {
    pub fn with_transport(destination: SocketAddr, request: WireRequest, transport: T, logger: Arc<dyn SsrpLogger>) -> Self {
        Query {
            destination,
            request,
            transport,
            state: QueryState::Idle,
            time_sent: Instant::now(),
            responses: Arc::new(AtomicUsize::new(0)),
            failed: false,
            max_datagram: ResponseFrame::MAX_DATAGRAM,
            logger,
        }
    }

    pub fn with_max_datagram(mut self, max_datagram: usize) -> Self {
        self.max_datagram = max_datagram.max(ResponseFrame::HEADER_LENGTH);
        self
    }

    pub fn destination(&self) -> SocketAddr {
        self.destination
    }

    pub fn request(&self) -> WireRequest {
        self.request
    }

    pub fn state(&self) -> QueryState {
        self.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn response_count(&self) -> usize {
        self.responses.load(Ordering::Acquire)
    }

    /// Shared view of the response counter, readable while the query runs.
    pub fn response_counter(&self) -> Arc<AtomicUsize> {
        self.responses.clone()
    }

    /// Idle -> Sent. On failure the query is closed for good; there is no retry.
    pub async fn begin_query(&mut self) -> std::io::Result<()> {
        self.time_sent = Instant::now();
        match self.transport.send_to(&self.request.serialize(), self.destination).await {
            Ok(_) => {
                self.state = QueryState::Sent;
                Ok(())
            }
            Err(e) => {
                self.logger.log(LogLevel::Error, "Query", &format!("send to {} failed: {}", self.destination, e));
                self.failed = true;
                self.state = QueryState::Closed;
                Err(e)
            }
        }
    }

    /// Receives until `close` fires or the transport fails.
    ///
    /// Closing is the normal way out and is not reported as an error.
    pub async fn listen(mut self, events: mpsc::UnboundedSender<ResponseEvent>, mut close: watch::Receiver<bool>) -> QueryOutcome {
        if self.state == QueryState::Idle {
            let _ = self.begin_query().await;
        }

        let mut buffer = vec![0u8; self.max_datagram];

        while self.state != QueryState::Closed {
            if *close.borrow() {
                break;
            }

            tokio::select! {
                changed = close.changed() => {
                    if changed.is_err() || *close.borrow() {
                        break;
                    }
                }
                received = self.transport.recv_from(&mut buffer) => match received {
                    Ok((len, sender)) => self.on_datagram(&buffer[..len], sender, &events),
                    Err(e) => {
                        self.logger.log(LogLevel::Error, "Query", &format!("receive from {} failed: {}", self.destination, e));
                        self.failed = true;
                        break;
                    }
                }
            }
        }

        self.close()
    }

    fn on_datagram(&mut self, datagram: &[u8], sender: SocketAddr, events: &mpsc::UnboundedSender<ResponseEvent>) {
        let elapsed = self.time_sent.elapsed();
        self.state = QueryState::Receiving;

        let frame = ResponseFrame::deserialize(datagram);
        if !frame.is_expected_tag() {
            self.logger.log(LogLevel::Warn, "Query", &format!("unexpected response type 0x{:02x} from {}", frame.tag, sender));
        }
        if frame.is_truncated() {
            self.logger.log(
                LogLevel::Debug,
                "Query",
                &format!("{} declared {} bytes, {} usable", sender, frame.declared_len, frame.payload.len()),
            );
        }

        let records = parse(frame.payload);
        self.responses.fetch_add(1, Ordering::AcqRel);

        let _ = events.send(ResponseEvent {
            destination: self.destination,
            sender,
            elapsed,
            tag: frame.tag,
            records,
        });
    }

    /// Consumes the query; dropping the transport closes the socket.
    fn close(mut self) -> QueryOutcome {
        self.state = QueryState::Closed;
        self.logger.log(LogLevel::Debug, "Query", &format!("closed {}", self.destination));
        QueryOutcome {
            destination: self.destination,
            responses: self.response_count(),
            failed: self.failed,
        }
    }
}
