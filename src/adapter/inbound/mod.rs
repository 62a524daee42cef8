//! Inbound adapters: the terminal front end.

pub mod cli;
