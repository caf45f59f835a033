//! Text reports for query responses.

pub mod format;

pub use format::*;
