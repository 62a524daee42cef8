//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the backend API and the persisted client state.

pub mod gateway;
pub mod storage;
