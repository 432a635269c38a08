//! Command implementations.

pub mod fix;
pub mod info;
