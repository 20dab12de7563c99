//! Fire-and-forget UDP emission of encoded metric lines.

use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::wire::encode::{Metric, encode};

/// Sends one encoded line as a single datagram.
///
/// Opens an ephemeral socket, writes, and drops it. No response is read
/// and nothing is retried; re-sending a gauge is harmless (the latest
/// value overwrites), so a failed send is simply reported to the caller.
pub fn emit(line: &str, addr: impl ToSocketAddrs) -> io::Result<()> {
    let addr: SocketAddr = addr
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "address resolved to nothing"))?;

    let bind_addr = if addr.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
    let socket = UdpSocket::bind(bind_addr)?;
    socket.send_to(line.as_bytes(), addr)?;
    Ok(())
}

/// Emitter bound to a fixed agent address. Each metric still travels as
/// its own datagram; lines are never batched.
#[derive(Debug, Clone)]
pub struct UdpEmitter {
    host: String,
    port: u16,
}

impl UdpEmitter {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn emit_line(&self, line: &str) -> io::Result<()> {
        emit(line, (self.host.as_str(), self.port))
    }

    pub fn emit_metric(&self, metric: &Metric) -> io::Result<()> {
        self.emit_line(&encode(metric))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::encode::{Metric, MetricValue};
    use std::time::Duration;

    fn local_receiver() -> (UdpSocket, u16) {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        socket
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        let port = socket.local_addr().unwrap().port();
        (socket, port)
    }

    fn recv_line(socket: &UdpSocket) -> String {
        let mut buf = [0u8; 1024];
        let (len, _) = socket.recv_from(&mut buf).unwrap();
        String::from_utf8(buf[..len].to_vec()).unwrap()
    }

    #[test]
    fn delivers_one_line_per_datagram() {
        let (receiver, port) = local_receiver();
        let emitter = UdpEmitter::new("127.0.0.1", port);

        emitter.emit_line("mcman.worker_processes:3|g").unwrap();
        assert_eq!(recv_line(&receiver), "mcman.worker_processes:3|g");
    }

    #[test]
    fn emitting_twice_sends_identical_datagrams() {
        let (receiver, port) = local_receiver();
        let emitter = UdpEmitter::new("127.0.0.1", port);
        let metric = Metric::gauge("custom.network.packet_loss", MetricValue::Float(30.0))
            .with_tag("source", "test-server")
            .with_tag("destination", "example.com");

        emitter.emit_metric(&metric).unwrap();
        emitter.emit_metric(&metric).unwrap();

        let first = recv_line(&receiver);
        let second = recv_line(&receiver);
        assert_eq!(first, second);
    }

    #[test]
    fn unresolvable_host_is_an_error() {
        let emitter = UdpEmitter::new("no-such-host.invalid", 8125);
        assert!(emitter.emit_line("m:1|g").is_err());
    }
}
