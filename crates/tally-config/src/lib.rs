//! tally-config
//!
//! Persistent application preferences: default settlement currency, the
//! static exchange-rate table, and the groups data directory. Owns the
//! Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
