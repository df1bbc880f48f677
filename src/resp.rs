use coap_lite::Packet;

use crate::error::{Error, What, When};

/// Fixed size of a CoAP message header on the wire
pub const HEADER_SIZE: usize = 4;

/// Number of bytes in `dgram` left over once the fixed header and the token
/// length its first byte declares are accounted for.
///
/// This must never underflow: a frame whose declared header + token exceed
/// the datagram that carried them is [`What::MalformedResponse`], and none
/// of its bytes past the first are interpreted.
pub fn frame_capacity(dgram: &[u8]) -> Result<usize, Error> {
  let token_len = (dgram.first().copied().unwrap_or(0) & 0x0f) as usize;
  let needed = HEADER_SIZE + token_len;

  match dgram.len() {
    | size if size < needed => {
      Err(When::Polling.what(What::MalformedResponse { size, needed }))
    },
    | size => Ok(size - needed),
  }
}

/// A CoAP response, parsed from a received datagram.
///
/// The payload is a plain byte region with an explicit length; it is never
/// NUL-scanned, and text interpretation is opt-in via [`Resp::payload_str`].
#[derive(Debug, Clone)]
pub struct Resp(Packet);

impl Resp {
  /// Validate the datagram's frame arithmetic, then parse it.
  ///
  /// Frames failing the [`frame_capacity`] check are rejected before the
  /// codec ever sees them.
  pub fn try_from_dgram(dgram: &[u8]) -> Result<Self, Error> {
    frame_capacity(dgram)?;

    Packet::from_bytes(dgram).map(Self)
                             .map_err(|e| When::Polling.what(What::FromBytes(e)))
  }

  /// The payload's raw bytes, exactly as many as were received
  pub fn payload(&self) -> &[u8] {
    &self.0.payload
  }

  /// The payload interpreted as utf8 text
  pub fn payload_str(&self) -> Result<&str, core::str::Utf8Error> {
    core::str::from_utf8(self.payload())
  }

  /// Get the message token for this response
  pub fn msg_token(&self) -> &[u8] {
    self.0.get_token()
  }

  /// Get a copy of the message id for this response
  pub fn msg_id(&self) -> u16 {
    self.0.header.message_id
  }
}

#[cfg(test)]
mod tests {
  use coap_lite::{MessageClass, MessageType, ResponseType};

  use super::*;

  #[test]
  fn frame_capacity_subtracts_header_and_token() {
    // ver 1, CON, token length 2
    let mut dgram = vec![0u8; 10];
    dgram[0] = 0b0100_0010;

    assert_eq!(frame_capacity(&dgram).unwrap(), 4);
  }

  #[test]
  fn frame_capacity_of_bare_header_is_zero() {
    let dgram = [0b0100_0000u8, 0, 0, 0];
    assert_eq!(frame_capacity(&dgram).unwrap(), 0);
  }

  #[test]
  fn frame_capacity_underflow_is_malformed() {
    // claims an 8-byte token but only 5 bytes arrived
    let dgram = [0b0100_1000u8, 0, 0, 0, 0];
    let err = frame_capacity(&dgram).unwrap_err();

    assert!(matches!(err.what,
                     What::MalformedResponse { size: 5,
                                               needed: 12 }));
  }

  #[test]
  fn frame_capacity_of_empty_datagram_is_malformed() {
    let err = frame_capacity(&[]).unwrap_err();
    assert!(matches!(err.what,
                     What::MalformedResponse { size: 0,
                                               needed: 4 }));
  }

  #[test]
  fn try_from_dgram_parses_a_content_response() {
    let mut msg = Packet::new();
    msg.header.set_type(MessageType::Acknowledgement);
    msg.header.code = MessageClass::Response(ResponseType::Content);
    msg.header.message_id = 33;
    msg.set_token(vec![1, 2, 3, 4]);
    msg.payload = b"21.5".to_vec();

    let rep = Resp::try_from_dgram(&msg.to_bytes().unwrap()).unwrap();

    assert_eq!(rep.payload(), b"21.5");
    assert_eq!(rep.payload_str().unwrap(), "21.5");
    assert_eq!(rep.msg_token(), &[1, 2, 3, 4]);
    assert_eq!(rep.msg_id(), 33);
  }
}
