//! Aggregation engine.
//!
//! Responsibilities:
//!
//! - merge the current/prior year sources into one observation set (`merge`)
//! - apply date/season/item predicates and sort by date (`filter`)
//! - group observations into day / fixed-7d / ISO-week / month buckets (`bucket`)
//! - derive YoY pct/ratio and cumulative totals per bucket (`derive`)
//! - build the item, progress and snapshot views (`views`)
//!
//! Every query path goes through these functions; nothing re-implements a
//! formula locally.

pub mod bucket;
pub mod derive;
pub mod filter;
pub mod merge;
pub mod views;

pub use bucket::*;
pub use derive::*;
pub use filter::*;
pub use merge::*;
pub use views::*;
