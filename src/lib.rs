// src/lib.rs
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod io;
pub mod processing;
pub mod utils;

pub use config::{BandMapping, RunConfig};
pub use error::{Error, Result};

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
