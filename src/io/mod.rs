//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - series/item exports to CSV (`export`)
//! - response JSON read/write (`response`)

pub mod export;
pub mod ingest;
pub mod response;

pub use export::*;
pub use ingest::*;
pub use response::*;
