//! Adapters connecting the application to the outside world.
//!
//! - [`inbound`] drives the application (the terminal front end).
//! - [`outbound`] is driven by it (the REST backend, persisted state).

pub mod inbound;
pub mod outbound;
