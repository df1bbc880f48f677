use std::time::Duration;

/// Timeout configuration allowing for "never time out" as an option
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy)]
pub enum Timeout {
  /// Give up after some number of milliseconds has elapsed
  Millis(u64),
  /// Never time out
  Never,
}

impl Timeout {
  /// Has a wait that started `elapsed` ago outlived this timeout?
  ///
  /// ```
  /// use std::time::Duration;
  ///
  /// use lilypad::time::Timeout;
  ///
  /// assert!(Timeout::Millis(100).expired(Duration::from_millis(100)));
  /// assert!(!Timeout::Millis(100).expired(Duration::from_millis(99)));
  /// assert!(!Timeout::Never.expired(Duration::from_secs(u64::MAX)));
  /// ```
  pub fn expired(&self, elapsed: Duration) -> bool {
    match self {
      | Timeout::Millis(millis) => elapsed >= Duration::from_millis(*millis),
      | Timeout::Never => false,
    }
  }
}
