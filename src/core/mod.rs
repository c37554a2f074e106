//! Core components of the `yfinance-data` client.
//!
//! - The [`YfClient`] and its builder, with credential handling and the response cache.
//! - The primary [`YfError`] type.
//! - The [`Transport`] seam and its default `reqwest` implementation.

/// The client (`YfClient`), builder, session and request options.
pub mod client;
/// The primary error type (`YfError`) for the crate.
pub mod error;
/// The HTTP transport abstraction.
pub mod transport;

// convenient re-exports so most code can just `use crate::core::YfClient`
pub use client::{YfClient, YfClientBuilder};
pub use error::YfError;
pub use transport::{Cookie, HttpResponse, ReqwestTransport, Transport};
