//! Core data types for GEX analysis
//!
//! Defines fundamental types:
//! - OptionType / OptionRecord: normalized contract with derived fields
//! - OptionChain: all records for one underlying plus rejected inputs
//! - Symbol parsing for exchange option identifiers

pub mod option;
pub mod symbol;
pub mod error;

pub use option::*;
pub use symbol::*;
pub use error::*;
