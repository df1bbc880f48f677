use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::time::Instant;

use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::error::{Error, What, When};
use crate::exchange::Exchange;
use crate::net::{resolve, Addrd, Socket};
use crate::registry::{Registry, Resource};
use crate::req::Req;
use crate::resp::Resp;

/// A blocking CoAP retrieval client.
///
/// The client owns its socket for its whole lifetime - binding happens once
/// in [`Client::try_new`], and [`Client::retrieve`] performs no
/// process-global setup or teardown. Run one client per thread; a single
/// retrieval keeps exactly one exchange in flight.
///
/// ```no_run
/// use lilypad::client::Client;
/// use lilypad::config::Config;
/// use lilypad::registry::{Registry, Resource};
///
/// let registry = Registry::new();
/// let temp = registry.register(Resource::new("127.0.0.1", "temp"));
///
/// let mut client = Client::try_new(1111, Config::default()).unwrap();
/// client.retrieve(&registry, &temp).unwrap();
///
/// println!("{:?}", temp.value());
/// ```
#[allow(missing_debug_implementations)]
pub struct Client<S> {
  sock: S,
  config: Config,
  rand: rand_chacha::ChaCha8Rng,
  last_id: Option<u16>,
}

/// Helper methods on client Results
pub trait ClientResultExt<T> {
  /// If we timed out waiting for a response, consider that Ok(None).
  ///
  /// Usually used by callers that treat a missed answer as unremarkable;
  /// the value simply is not refreshed this round.
  fn timeout_ok(self) -> Result<Option<T>, Error>;
}

impl<T> ClientResultExt<T> for Result<T, Error> {
  fn timeout_ok(self) -> Result<Option<T>, Error> {
    match self {
      | Ok(t) => Ok(Some(t)),
      | Err(Error { what: What::Timeout, .. }) => Ok(None),
      | Err(e) => Err(e),
    }
  }
}

impl Client<UdpSocket> {
  /// Create a client bound to a local UDP port
  pub fn try_new(port: u16, config: Config) -> io::Result<Self> {
    let addr = format!("0.0.0.0:{}", port);
    let sock = UdpSocket::bind(addr)?;
    sock.set_nonblocking(true)?;

    Ok(Self::new(config, sock))
  }
}

impl<S: Socket> Client<S> {
  /// Create a client from an already-bound socket
  pub fn new(config: Config, sock: S) -> Self {
    Self { sock,
           config,
           rand: rand_chacha::ChaCha8Rng::seed_from_u64(0),
           last_id: None }
  }

  /// Fetch the remote value backing `resource` and store it in the record.
  ///
  /// Resolves the record's host on the configured port, sends one
  /// confirmable GET for its path, marks the record as updating (only
  /// after the request has left the wire), and waits for the correlated
  /// response - bounded by [`Config::timeout`]. On a match the payload is
  /// written into the record under its lock.
  ///
  /// All failures collapse to a single [`Error`] here; diagnostics go to
  /// the log. A deadline miss is [`What::Timeout`] - see
  /// [`ClientResultExt::timeout_ok`]. Unrelated or malformed datagrams
  /// observed while waiting are skipped, never fatal.
  pub fn retrieve(&mut self, registry: &Registry, resource: &Resource) -> Result<(), Error> {
    let addr = resolve(resource.host(), self.config.port).map_err(|e| {
                 log::error!("failed to resolve {}: {:?}", resource.host(), e.what);
                 e
               })?;

    let exchange = self.send_get(addr, resource.path())?;

    // observers may only see the flag once a request is actually out
    resource.mark_updating();
    log::info!("get {} <- coap://{}:{}",
               resource.path(),
               resource.host(),
               self.config.port);

    let rep = self.await_answer(&exchange)?;
    exchange.complete(&rep, registry);

    Ok(())
  }

  fn next_id(&mut self) -> u16 {
    let id = match self.last_id {
      | Some(id) => id.wrapping_add(1),
      | None => self.rand.gen_range(0..=255),
    };

    self.last_id = Some(id);
    id
  }

  fn next_token(&mut self) -> Vec<u8> {
    // token_seed in the leading bytes, entropy in the rest
    let ([a, b], [c, d, e, f, g, h, ..]) =
      (self.config.token_seed.to_be_bytes(), self.rand.gen::<u64>().to_be_bytes());

    vec![a, b, c, d, e, f, g, h]
  }

  fn send_get(&mut self, addr: SocketAddr, path: &str) -> Result<Exchange, Error> {
    let mut req = Req::get(path);
    req.set_msg_id(self.next_id());
    req.set_msg_token(self.next_token());

    let exchange = Exchange::for_req(&req, addr)?;
    let bytes = req.try_into_bytes(self.config.max_pdu_size)?;

    nb::block!(self.sock.send(Addrd(bytes.as_slice(), addr)))
      .map_err(|e| When::Sending.what(What::Sock(e)))?;

    log::trace!("sent {}b -> {}", bytes.len(), addr);
    Ok(exchange)
  }

  fn await_answer(&mut self, exchange: &Exchange) -> Result<Resp, Error> {
    let start = Instant::now();

    loop {
      match self.sock
                .poll()
                .map_err(|e| When::Polling.what(What::Sock(e)))?
      {
        | Some(Addrd(dgram, from)) => {
          log::trace!("recvd {}b <- {}", dgram.len(), from);

          match Resp::try_from_dgram(&dgram) {
            | Ok(rep) if exchange.matches(&rep, from) => return Ok(rep),
            | Ok(rep) => log::trace!("ignoring unrelated message {} <- {}",
                                     rep.msg_id(),
                                     from),
            | Err(e) => log::error!("discarding malformed datagram <- {}: {:?}",
                                    from,
                                    e.what),
          }
        },
        | None => std::thread::yield_now(),
      }

      if self.config.timeout.expired(start.elapsed()) {
        return Err(When::Polling.what(What::Timeout));
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use coap_lite::{MessageType, Packet};

  use super::*;
  use crate::test::{AnsweringSock, SockMock};
  use crate::time::Timeout;

  fn config(timeout_millis: u64) -> Config {
    Config { timeout: Timeout::Millis(timeout_millis),
             ..Config::default() }
  }

  #[test]
  fn retrieve_updates_the_record_from_the_answer() {
    let registry = Registry::new();
    let temp = registry.register(Resource::new("127.0.0.1", "temp"));

    let mut client = Client::new(config(1_000), AnsweringSock::new(&b"21.5"[..]));
    client.retrieve(&registry, &temp).unwrap();

    assert_eq!(temp.value(), b"21.5");
    assert!(temp.is_updating());
  }

  #[test]
  fn retrieve_fails_fast_when_resolution_fails() {
    let registry = Registry::new();
    let temp = registry.register(Resource::new("", "temp"));

    let sock = SockMock::new();
    let tx = sock.tx.clone();

    let mut client = Client::new(config(1_000), sock);
    let err = client.retrieve(&registry, &temp).unwrap_err();

    assert!(matches!(err.what, What::Lookup(_) | What::NoUsableAddress));
    // nothing was sent, nothing was touched
    assert!(tx.lock().unwrap().is_empty());
    assert_eq!(temp.value(), b"");
    assert!(!temp.is_updating());
  }

  #[test]
  fn retrieve_times_out_when_nothing_answers() {
    let registry = Registry::new();
    let temp = registry.register(Resource::new("127.0.0.1", "temp"));

    let mut client = Client::new(config(10), SockMock::new());
    let err = client.retrieve(&registry, &temp).unwrap_err();

    assert!(matches!(err.what, What::Timeout));
    // the request did leave the wire, so the flag is up
    assert!(temp.is_updating());
    assert_eq!(temp.value(), b"");
  }

  #[test]
  fn timeout_ok_swallows_only_timeouts() {
    let timeout: Result<(), Error> = Err(When::Polling.what(What::Timeout));
    assert_eq!(timeout.timeout_ok().unwrap(), None);

    let other: Result<(), Error> = Err(When::Polling.what(What::NoUsableAddress));
    assert!(other.timeout_ok().is_err());

    let fine: Result<(), Error> = Ok(());
    assert_eq!(fine.timeout_ok().unwrap(), Some(()));
  }

  #[test]
  fn retrieve_survives_an_answer_no_record_claims() {
    // the fetched resource was never registered; the answer's path
    // finds no record and the completion must be a harmless no-op
    let registry = Registry::new();
    let orphan = Resource::new("127.0.0.1", "temp");

    let mut client = Client::new(config(1_000), AnsweringSock::new(&b"21.5"[..]));
    client.retrieve(&registry, &orphan).unwrap();

    assert_eq!(orphan.value(), b"");
  }

  #[test]
  fn retrieve_ignores_unrelated_datagrams() {
    let registry = Registry::new();
    let temp = registry.register(Resource::new("127.0.0.1", "temp"));

    let sock = SockMock::new();
    let from = "127.0.0.1:5683".parse().unwrap();

    // a malformed frame (truncated token) and a response with a foreign
    // token; neither may complete the exchange
    let mut foreign = Packet::new();
    foreign.set_token(vec![0xDE, 0xAD]);
    sock.rx
        .lock()
        .unwrap()
        .push(Addrd(vec![0b0100_1000, 0, 0, 0], from));
    sock.rx
        .lock()
        .unwrap()
        .push(Addrd(foreign.to_bytes().unwrap(), from));

    let mut client = Client::new(config(10), sock);
    let err = client.retrieve(&registry, &temp).unwrap_err();

    assert!(matches!(err.what, What::Timeout));
    assert_eq!(temp.value(), b"");
  }

  #[test]
  fn sent_requests_are_confirmable_with_seeded_tokens() {
    let registry = Registry::new();
    let temp = registry.register(Resource::new("127.0.0.1", "temp"));

    let sock = SockMock::new();
    let tx = sock.tx.clone();

    let mut client = Client::new(Config { token_seed: 0xBEEF,
                                          ..config(10) },
                                 sock);
    let _ = client.retrieve(&registry, &temp);

    let sent = tx.lock().unwrap();
    let req = Packet::from_bytes(sent[0].data()).unwrap();

    assert_eq!(req.header.get_type(), MessageType::Confirmable);
    assert_eq!(req.get_token().len(), 8);
    assert_eq!(&req.get_token()[..2], &[0xBE, 0xEF]);

    let path = req.get_option(coap_lite::CoapOption::UriPath)
                  .and_then(|segments| segments.front())
                  .unwrap();
    assert_eq!(path.as_slice(), b"temp");
  }
}
