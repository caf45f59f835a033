//! Numeric utilities: half-up rounding and guarded ratios.

pub mod round;

pub use round::*;
