//! Evntaly — Rust SDK
//!
//! Client for the Evntaly event-tracking API: formats event and user
//! payloads, checks the account limit before submitting, and ships them
//! over HTTP with the project credentials as headers. One blocking round
//! trip per call; no batching, queuing, or retries.
//!
//! Log lines go through the [`log`](https://docs.rs/log) facade; plug in
//! any compatible backend for visibility into SDK operations, or set
//! `Options::on_signal` to observe outcomes programmatically.
//!
//! # Example
//!
//! ```rust,no_run
//! use evntaly::{Event, EventUser, EvntalyClient, Options};
//!
//! fn main() -> Result<(), evntaly::Error> {
//!     let client = EvntalyClient::new(Options::new("dev_secret", "project_token"))?;
//!
//!     client.track(Event {
//!         title: "Payment received".to_string(),
//!         description: "$12.99 monthly subscription".to_string(),
//!         event_type: "transaction".to_string(),
//!         user: EventUser { id: "user-123".to_string() },
//!         ..Default::default()
//!     })?;
//!
//!     Ok(())
//! }
//! ```

mod client;
mod env;
mod error;
mod types;
mod validate;

/// SDK version reported in the context block of every tracked event.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use client::EvntalyClient;
pub use env::{Environment, HostEnvironment};
pub use error::Error;
pub use types::{
    DropReason, Event, EventContext, EventUser, Options, Signal, SignalCallback, User,
    DEFAULT_BASE_URL,
};