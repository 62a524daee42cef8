//! juspredict - client core and terminal front end for the JusPredict sports
//! prediction backend.
//!
//! The backend owns every record. This crate fetches, groups and projects
//! those records for display, polls the prediction lists, and dispatches
//! the one order action a prediction's status allows.
//!
//! # Architecture
//!
//! - **`domain`** - View projections of server-owned records and pure
//!   formatting helpers
//! - **`port`** - Gateway traits for the backend and the key/value store
//! - **`application`** - Session, grouping, polling, feeds and order dispatch
//! - **`adapter::outbound`** - REST client and session storage
//! - **`adapter::inbound::cli`** - The `juspredict` command line
//! - **`infrastructure`** - Configuration, logging and wiring
//!
//! # Features
//!
//! - `testkit` - Scripted gateway and fixtures for integration tests
//!
//! # Example
//!
//! ```no_run
//! use juspredict::infrastructure::bootstrap::App;
//! use juspredict::infrastructure::config::Config;
//!
//! # async fn demo() -> juspredict::error::Result<()> {
//! let config = Config::load_or_default("config.toml")?;
//! let app = App::build(config, std::path::Path::new("session.json"));
//! let balance = app.balances().available().await?;
//! println!("{}", balance.available_balance);
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(feature = "testkit")]
pub mod testkit;
