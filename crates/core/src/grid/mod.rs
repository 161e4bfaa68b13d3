//! Grid partition modules

pub mod partition;

// Re-export main types
pub use partition::*;
