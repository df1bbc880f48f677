use coap_lite::{CoapOption, MessageClass, MessageType, Packet, RequestType};

use crate::error::{Error, What, When};

/// A CoAP GET request for a named resource path.
///
/// The request is Confirmable: the transport expects an acknowledgement
/// from the server, and a fresh message id and token are assigned by the
/// session at send time (until then the id is 0, "unassigned").
///
/// Exactly one Uri-Path option is attached, carrying the path's raw bytes
/// with their exact length - no terminator is encoded.
///
/// ```
/// use lilypad::req::Req;
///
/// let req = Req::get("sensors/temp");
/// assert_eq!(req.uri_path(), Some(&b"sensors/temp"[..]));
/// ```
#[derive(Debug, Clone)]
pub struct Req(Packet);

impl Req {
  /// Create a confirmable GET request for `path`
  pub fn get(path: impl AsRef<str>) -> Self {
    let mut msg = Packet::new();
    msg.header.set_type(MessageType::Confirmable);
    msg.header.code = MessageClass::Request(RequestType::Get);
    msg.header.message_id = 0;
    msg.add_option(CoapOption::UriPath, path.as_ref().as_bytes().to_vec());

    Self(msg)
  }

  /// The Uri-Path option's value, exactly as many bytes as were encoded
  pub fn uri_path(&self) -> Option<&[u8]> {
    self.0
        .get_option(CoapOption::UriPath)
        .and_then(|segments| segments.front())
        .map(|segment| segment.as_slice())
  }

  /// Get the request type (confirmable, non-confirmable)
  pub fn msg_type(&self) -> MessageType {
    self.0.header.get_type()
  }

  /// Get a copy of the message id for this request
  pub fn msg_id(&self) -> u16 {
    self.0.header.message_id
  }

  /// Updates the message id for this request
  pub fn set_msg_id(&mut self, id: u16) {
    self.0.header.message_id = id;
  }

  /// Get the message token for this request
  pub fn msg_token(&self) -> &[u8] {
    self.0.get_token()
  }

  /// Updates the message token for this request
  pub fn set_msg_token(&mut self, token: Vec<u8>) {
    self.0.set_token(token);
  }

  /// Serialize the request, enforcing the session's maximum PDU size.
  ///
  /// Fails with [`What::PduTooLarge`] when the encoding exceeds `max_size`
  /// and [`What::ToBytes`] when the codec rejects the message outright.
  pub fn try_into_bytes(self, max_size: usize) -> Result<Vec<u8>, Error> {
    self.0
        .to_bytes()
        .map_err(|e| When::Sending.what(What::ToBytes(e)))
        .and_then(|bytes| match bytes.len() {
          | size if size > max_size => {
            Err(When::Sending.what(What::PduTooLarge { size, max: max_size }))
          },
          | _ => Ok(bytes),
        })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn get_round_trips_uri_path() {
    let req = Req::get("sensors/temp");
    let path = req.uri_path().unwrap();

    assert_eq!(path, &b"sensors/temp"[..]);
    assert_eq!(path.len(), 12);
  }

  #[test]
  fn get_is_confirmable_with_unassigned_id() {
    let req = Req::get("temp");

    assert_eq!(req.msg_type(), MessageType::Confirmable);
    assert_eq!(req.msg_id(), 0);
    assert!(req.msg_token().is_empty());
  }

  #[test]
  fn try_into_bytes_enforces_max_pdu_size() {
    let err = Req::get("temp").try_into_bytes(4).unwrap_err();
    assert!(matches!(err.what, What::PduTooLarge { max: 4, .. }));
  }

  #[test]
  fn try_into_bytes_fits_the_default_pdu_size() {
    let bytes = Req::get("temp").try_into_bytes(1152).unwrap();
    assert!(!bytes.is_empty());
  }
}
