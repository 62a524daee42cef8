//! Outbound adapters (driven side): implementations of the outbound ports.

pub mod api;
pub mod storage;
