use crate::time::Timeout;

/// Runtime config
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
  /// UDP port requests are sent to.
  ///
  /// Defaults to 5683, the well-known CoAP port.
  ///
  /// ```
  /// use lilypad::config::Config;
  ///
  /// assert_eq!(Config::default().port, 5683);
  /// ```
  pub port: u16,

  /// Largest PDU we are willing to put on the wire.
  ///
  /// Requests that encode to more than this many bytes are
  /// rejected before sending.
  ///
  /// ```
  /// use lilypad::config::Config;
  ///
  /// assert_eq!(Config::default().max_pdu_size, 1152);
  /// ```
  pub max_pdu_size: usize,

  /// How long [`retrieve`](crate::client::Client::retrieve) waits for
  /// the correlated response before reporting
  /// [`Timeout`](crate::error::What::Timeout).
  ///
  /// Defaults to 2 seconds.
  ///
  /// ```
  /// use lilypad::config::Config;
  /// use lilypad::time::Timeout;
  ///
  /// assert_eq!(Config::default().timeout, Timeout::Millis(2_000));
  /// ```
  pub timeout: Timeout,

  /// Seed occupying the leading bytes of generated message tokens,
  /// customizable to allow for your application to generate tokens
  /// less guessably.
  ///
  /// The default value is 0, although it is
  /// best practice to set this to something else.
  /// (random integer, machine identifier)
  ///
  /// ```
  /// use lilypad::config::Config;
  ///
  /// assert_eq!(Config::default().token_seed, 0);
  /// ```
  pub token_seed: u16,
}

impl Default for Config {
  fn default() -> Self {
    Config { port: 5683,
             max_pdu_size: 1152,
             timeout: Timeout::Millis(2_000),
             token_seed: 0 }
  }
}
