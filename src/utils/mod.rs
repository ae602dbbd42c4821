// src/utils/mod.rs
pub mod cache;
pub mod stats;

pub use cache::BandCache;
pub use stats::{IndexStats, IndexSummary};
