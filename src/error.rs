use std::io;

use coap_lite::error::MessageError;

/// The context that an error occurred in
#[derive(Debug, Clone, Copy)]
pub enum When {
  /// We were resolving a host string to a socket address
  Resolving,
  /// We were building or sending a request
  Sending,
  /// We were polling for a response
  Polling,
}

impl When {
  /// Construct a specific error from the context the error occurred in
  pub fn what(self, what: What) -> Error {
    Error { when: self, what }
  }
}

/// An error encounterable while retrieving a resource
#[derive(Debug)]
pub struct Error {
  /// What happened?
  pub what: What,
  /// What were we doing when it happened?
  pub when: When,
}

/// A contextless error with some additional debug data attached.
#[derive(Debug)]
pub enum What {
  /// The system name/service lookup itself failed.
  ///
  /// Carries the resolver's diagnostic for operator visibility.
  Lookup(io::Error),
  /// The lookup succeeded but yielded no usable IPv4/IPv6 candidate
  NoUsableAddress,
  /// Some socket operation (e.g. sending a datagram) failed
  Sock(io::Error),
  /// Serializing a message to bytes failed
  ToBytes(MessageError),
  /// Parsing a message from bytes failed
  FromBytes(MessageError),
  /// Uri-Path in a request was not a utf8 string
  PathInvalidUtf8(core::str::Utf8Error),
  /// The encoded request does not fit within the session's maximum PDU size
  PduTooLarge {
    /// Size of the encoded request
    size: usize,
    /// The session's ceiling
    max: usize,
  },
  /// A response frame claims a header and token larger than the
  /// datagram that carried it
  MalformedResponse {
    /// Bytes actually received
    size: usize,
    /// Bytes claimed by the header plus the token length it declares
    needed: usize,
  },
  /// The configured deadline elapsed without a correlated response
  Timeout,
}
