//! Infrastructure layer.
//!
//! Technical concerns that support the application without containing
//! business logic.
//!
//! - [`bootstrap`] - Composition root
//! - [`config`] - Configuration loading, validation and logging setup

pub mod bootstrap;
pub mod config;
