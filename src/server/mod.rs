//! Video server configuration API.
//!
//! Channels are listed with `GET configure/channels` and updated in bulk with
//! `PUT configure/channels`. Requests authenticate with HTTP basic auth using
//! the login and the credential resolved from the command line.

mod channel;
mod client;
mod retry;

pub use channel::{Channel, ConnectionSettings, MapSettings};
pub use client::{ServerClient, ServerError};
pub use retry::{
    calculate_backoff, RetryPolicy, DEFAULT_BACKOFF_BASE, DEFAULT_BACKOFF_MAX,
    DEFAULT_NETWORK_RETRIES,
};
