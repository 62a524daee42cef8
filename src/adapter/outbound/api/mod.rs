//! REST backend adapter.
//!
//! [`ApiClient`] implements every gateway port against the JSON-over-POST
//! backend. Wire types live in [`dto`].

mod client;
pub mod dto;

pub use client::ApiClient;
