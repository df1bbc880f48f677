//! `lilypad` is a small blocking CoAP client that keeps local "resource"
//! records in sync with the values a remote CoAP server holds for them.
//!
//! ## What it does
//! A [`registry::Resource`] names a remote endpoint (a host string) and the
//! Uri-Path the endpoint serves the value under. [`client::Client::retrieve`]
//! resolves the endpoint, sends a single confirmable GET for that path, waits
//! (bounded by [`time::Timeout`]) for the correlated response, and stores the
//! received payload in the record - taking the record's lock for exactly the
//! writes that need it.
//!
//! The registry is safe to share with the rest of a larger system: lookups
//! and value updates serialize on internal locks, so a retrieval may run
//! while other threads read or write unrelated records.
//!
//! ## What it deliberately does not do
//! This crate speaks exactly as much CoAP as a one-shot GET needs. Blockwise
//! transfer, observe registrations, server-side handling and retransmission
//! policy are out of scope; the wire format itself comes from [`coap_lite`].
//!
//! ## Example
//! ```no_run
//! use lilypad::client::{Client, ClientResultExt};
//! use lilypad::config::Config;
//! use lilypad::registry::{Registry, Resource};
//!
//! let registry = Registry::new();
//! let temp = registry.register(Resource::new("127.0.0.1", "sensors/temp"));
//!
//! let mut client = Client::try_new(1111, Config::default()).unwrap();
//!
//! match client.retrieve(&registry, &temp).timeout_ok().unwrap() {
//!   | Some(()) => println!("temp = {:?}", temp.value()),
//!   | None => println!("server did not answer in time"),
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/lilypad/0.1.0")]
// -
// style
#![allow(clippy::unused_unit)]
// -
// deny
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![deny(missing_copy_implementations)]
#![cfg_attr(not(test), deny(unsafe_code))]
// -
// warnings
#![cfg_attr(not(test), warn(unreachable_pub))]


/// blocking retrieval client
pub mod client;

/// configuring runtime behavior
pub mod config;

/// errors encounterable during a retrieval
pub mod error;

/// request/response correlation
pub mod exchange;

/// network abstractions
pub mod net;

/// the shared resource registry
pub mod registry;

/// requests
pub mod req;

/// responses
pub mod resp;

/// time abstractions
pub mod time;
