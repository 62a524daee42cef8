//! Shared test utilities for integration tests.
//!
//! Enabled via the `testkit` feature.
//!
//! # Modules
//!
//! - [`gateway`] - [`ScriptedGateway`](gateway::ScriptedGateway), an
//!   in-process backend implementing every gateway port.
//! - [`domain`] - Builders for events, questions, predictions and sessions.
//! - [`config`] - Canonical test configurations.

pub mod config;
pub mod domain;
pub mod gateway;
