// src/processing/mod.rs
pub mod calculator;
pub mod indices;

// Re-export main components
pub use calculator::{Calculator, IndexDefinition};
pub use indices::SpectralIndex;
