/// Depth-first crawler over nested mappings and sequences.
pub mod crawler;

/// Cycle detection for candidate substitutions.
pub mod cycle;

pub use crawler::{Crawler, Descend, Site};
pub use cycle::is_circular;
