use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

use crate::error::{Error, What, When};

/// Largest datagram we will pull off a socket in one read.
///
/// Matches [`crate::config::Config::max_pdu_size`]'s default; bytes past
/// this in a single datagram are dropped by the OS, not treated as an error.
pub const MAX_DGRAM_SIZE: usize = 1152;

/// Data that came from (or is destined for) a network socket
#[derive(PartialEq, PartialOrd, Eq, Ord, Hash, Debug, Clone, Copy)]
pub struct Addrd<T>(pub T, pub SocketAddr);

impl<T> Addrd<T> {
  /// Borrow the contents of this Addressed
  pub fn data(&self) -> &T {
    &self.0
  }

  /// Copy the socket address for the data
  pub fn addr(&self) -> SocketAddr {
    self.1
  }

  /// Map the data contained in this Addressed
  pub fn map<R>(self, f: impl FnOnce(T) -> R) -> Addrd<R> {
    Addrd(f(self.0), self.1)
  }

  /// Discard the socket address and get the data in this Addressed
  pub fn unwrap(self) -> T {
    self.0
  }
}

/// A datagram socket the retrieval core can drive.
///
/// Implemented for [`std::net::UdpSocket`] (which must be in non-blocking
/// mode) and by in-memory test doubles.
pub trait Socket {
  /// Send one datagram to the address attached to `msg`
  fn send(&self, msg: Addrd<&[u8]>) -> nb::Result<(), io::Error>;

  /// Receive one datagram into `buffer`, yielding the byte count and sender
  fn recv(&self, buffer: &mut [u8]) -> nb::Result<Addrd<usize>, io::Error>;

  /// Pull one buffered datagram off the socket, `None` when nothing is ready
  fn poll(&self) -> Result<Option<Addrd<Vec<u8>>>, io::Error> {
    let mut buffer = vec![0u8; MAX_DGRAM_SIZE];

    match self.recv(&mut buffer) {
      | Ok(Addrd(n, addr)) => {
        buffer.truncate(n);
        Ok(Some(Addrd(buffer, addr)))
      },
      | Err(nb::Error::WouldBlock) => Ok(None),
      | Err(nb::Error::Other(e)) => Err(e),
    }
  }
}

fn io_to_nb(e: io::Error) -> nb::Error<io::Error> {
  match e.kind() {
    | io::ErrorKind::WouldBlock => nb::Error::WouldBlock,
    | _ => nb::Error::Other(e),
  }
}

impl Socket for UdpSocket {
  fn send(&self, msg: Addrd<&[u8]>) -> nb::Result<(), io::Error> {
    let Addrd(bytes, addr) = msg;
    self.send_to(bytes, addr).map(|_| ()).map_err(io_to_nb)
  }

  fn recv(&self, buffer: &mut [u8]) -> nb::Result<Addrd<usize>, io::Error> {
    self.recv_from(buffer)
        .map(|(n, from)| Addrd(n, from))
        .map_err(io_to_nb)
  }
}

/// Resolve a host string and port to a concrete socket address.
///
/// Performs a fresh system-level name/service lookup on every call (no
/// caching, no retry) and takes the FIRST candidate the resolver yields.
/// Both IPv4 and IPv6 results are accepted.
///
/// Fails with [`What::Lookup`] when the lookup itself errors (carrying the
/// resolver's diagnostic) and [`What::NoUsableAddress`] when it answers
/// with an empty candidate list.
pub fn resolve(host: &str, port: u16) -> Result<SocketAddr, Error> {
  (host, port).to_socket_addrs()
              .map_err(|e| When::Resolving.what(What::Lookup(e)))
              .and_then(|mut candidates| {
                candidates.next()
                          .ok_or_else(|| When::Resolving.what(What::NoUsableAddress))
              })
}
