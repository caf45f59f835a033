//! Data sources.
//!
//! - file/URL sources and the parallel two-year load (`source`)
//! - the TTL + fingerprint dataset cache (`cache`)
//! - synthetic sample data (`sample`)

pub mod cache;
pub mod sample;
pub mod source;

pub use cache::*;
pub use sample::*;
pub use source::*;
