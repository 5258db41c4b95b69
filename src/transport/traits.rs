use std::future::Future;
use std::io::Result;
use std::net::SocketAddr;

/// Trait representing an SSRP datagram channel.
/// Pluggable so queries can be driven over a mock in tests.
pub trait DatagramTransport: Send + Sync + 'static {
    /// Send one datagram to `destination`.
    fn send_to(&self, data: &[u8], destination: SocketAddr) -> impl Future<Output = Result<usize>> + Send;

    /// Wait for the next datagram.
    /// Returns the number of bytes read and the source address.
    fn recv_from(&self, buffer: &mut [u8]) -> impl Future<Output = Result<(usize, SocketAddr)>> + Send;

    /// Get the local socket address.
    fn local_addr(&self) -> Result<SocketAddr>;
}
