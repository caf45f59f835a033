//! `sales-yoy` library crate.
//!
//! The binary (`sales`) is a thin wrapper around this library so that:
//!
//! - the aggregation engine is testable without spawning processes
//! - the query service can be embedded behind another front-end (HTTP, GUI)
//! - code stays easy to navigate as the project grows

pub mod aggregate;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod plot;
pub mod report;
