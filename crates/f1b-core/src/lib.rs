//! Core of the F1 chat bot: command parsing, identifier resolution, time
//! handling and report rendering, plus the command handlers built on them.
//!
//! This crate is framework-agnostic and performs no I/O itself. Telegram and
//! the Ergast data provider live behind ports (traits) implemented in adapter
//! crates.

pub mod command;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod ports;
pub mod report;
pub mod resolve;
pub mod timing;

pub use errors::{Error, Result};
