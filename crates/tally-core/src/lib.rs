//! tally-core
//!
//! Service layer over the expense-group domain: participant validation,
//! commit-through-storage operations, and the persistence abstraction.
//! Depends on tally-domain. No terminal I/O, no concrete storage backend.

pub mod error;
pub mod group_service;
pub mod storage;

pub use error::CoreError;
pub use group_service::*;
pub use storage::*;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("tally_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}
