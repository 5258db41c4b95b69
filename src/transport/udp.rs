use super::traits::DatagramTransport;
use socket2::{Domain, Protocol, Socket, Type};
use std::io::Result;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use tokio::net::UdpSocket;

pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Binds a non-blocking socket. Must be called inside a tokio runtime.
    pub fn new(bind_addr: SocketAddr, broadcast: bool) -> Result<Self> {
        let socket = Socket::new(Domain::for_address(bind_addr), Type::DGRAM, Some(Protocol::UDP))?;
        if broadcast {
            socket.set_broadcast(true)?;
        }
        socket.set_nonblocking(true)?;
        socket.bind(&bind_addr.into())?;

        let socket = UdpSocket::from_std(socket.into())?;
        Ok(UdpTransport { socket })
    }

    /// Ephemeral socket of the right address family for reaching `destination`.
    pub fn for_destination(destination: &SocketAddr, broadcast: bool) -> Result<Self> {
        let bind_addr = match destination {
            SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
            SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
        };
        Self::new(bind_addr, broadcast)
    }

    pub fn is_broadcast(&self) -> Result<bool> {
        self.socket.broadcast()
    }
}

impl DatagramTransport for UdpTransport {
    async fn send_to(&self, data: &[u8], destination: SocketAddr) -> Result<usize> {
        self.socket.send_to(data, destination).await
    }

    async fn recv_from(&self, buffer: &mut [u8]) -> Result<(usize, SocketAddr)> {
        self.socket.recv_from(buffer).await
    }

    fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr()
    }
}
