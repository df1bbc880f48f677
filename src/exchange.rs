use std::net::SocketAddr;

use crate::error::{Error, What, When};
use crate::registry::Registry;
use crate::req::Req;
use crate::resp::Resp;

/// One in-flight request/response pair.
///
/// Captured at send time from the outgoing request itself, matched against
/// incoming datagrams by token AND peer address, and consumed when the
/// answer is forwarded into the registry. Nothing here outlives the
/// exchange it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
  token: Vec<u8>,
  peer: SocketAddr,
  path: String,
}

impl Exchange {
  /// Capture correlation data for a request about to go to `peer`.
  ///
  /// The queried path is read back out of the request's own Uri-Path
  /// option with its exact length (a request without one targets the
  /// root path).
  pub fn for_req(req: &Req, peer: SocketAddr) -> Result<Self, Error> {
    let path = req.uri_path().unwrap_or(&[]);

    core::str::from_utf8(path).map_err(|e| When::Sending.what(What::PathInvalidUtf8(e)))
                              .map(|path| Self { token: req.msg_token().to_vec(),
                                                 peer,
                                                 path: String::from(path) })
  }

  /// The token the request was sent with
  pub fn token(&self) -> &[u8] {
    &self.token
  }

  /// Where the request went
  pub fn peer(&self) -> SocketAddr {
    self.peer
  }

  /// The path the request queried
  pub fn path(&self) -> &str {
    &self.path
  }

  /// Does `resp`, received from `from`, answer this exchange?
  pub fn matches(&self, resp: &Resp, from: SocketAddr) -> bool {
    from == self.peer && resp.msg_token() == self.token.as_slice()
  }

  /// Forward a matched response's payload to the local record.
  ///
  /// Looks the queried path up in the registry and stores the payload
  /// under the record's own lock. A path with no record is logged and
  /// swallowed - recoverable (e.g. a race with deregistration), and
  /// nothing is mutated. Errors here are terminal at the logging
  /// boundary; none propagate to the caller.
  pub fn complete(self, resp: &Resp, registry: &Registry) {
    match registry.find_by_path(self.path.as_bytes()) {
      | Some(resource) => {
        resource.set_value(resp.payload());

        match resp.payload_str() {
          | Ok(text) => log::info!("{}: answer {:?}", self.path, text),
          | Err(_) => log::info!("{}: answer {}b (not text)",
                                 self.path,
                                 resp.payload().len()),
        }
      },
      | None => log::error!("can't find resource {}", self.path),
    }
  }
}
