//! One-shot retrieval against a live CoAP server.
//!
//! Registers a single resource backed by the public `coap.me` test server
//! and mirrors its value into the local registry:
//!
//! ```text
//! cargo run --example fetch
//! ```

use lilypad::client::{Client, ClientResultExt};
use lilypad::config::Config;
use lilypad::registry::{Registry, Resource};

fn main() {
  simple_logger::SimpleLogger::new().init().unwrap();

  let registry = Registry::new();
  let hello = registry.register(Resource::new("coap.me", "hello"));

  let mut client = Client::try_new(1111, Config::default()).unwrap();

  match client.retrieve(&registry, &hello).timeout_ok().unwrap() {
    | Some(()) => println!("{} = {:?}",
                           hello.path(),
                           String::from_utf8_lossy(&hello.value())),
    | None => println!("{}: no answer before the deadline", hello.path()),
  }
}
