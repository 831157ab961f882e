//! # Strata State
//!
//! Report-step timeline and carry-forward state storage.

pub mod dynamic;
pub mod time_map;

pub use dynamic::DynamicState;
pub use time_map::TimeMap;
