//! Library entry for molecule-cli used by integration tests and embedding.

pub mod commands;

// Re-export commonly used items
pub use crate::commands::{describe_error, lookup, registry};
