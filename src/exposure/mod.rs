//! Exposure computation and aggregation

pub mod gex;
pub mod aggregate;

pub use gex::*;
pub use aggregate::*;
