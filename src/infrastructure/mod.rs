//! Infrastructure layer - Framework implementations
//!
//! This layer contains:
//! - Configuration loading (config)
//! - CSV persistence of the flat table (storage)

pub mod config;
pub mod storage;

pub use config::Config;
