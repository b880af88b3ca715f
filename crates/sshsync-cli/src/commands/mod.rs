//! Command implementations

pub mod sync;
pub mod template;
