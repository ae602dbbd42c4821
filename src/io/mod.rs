// src/io/mod.rs
pub mod reader;
pub mod writer;

pub use reader::{GeoInfo, Raster};
pub use writer::{write_index, OutputNaming, WriteOptions};
