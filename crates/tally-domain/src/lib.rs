//! tally-domain
//!
//! Pure domain model for shared-expense groups (Person, Group, Transaction,
//! Debt) plus the settlement algorithms that derive who owes whom.
//! No I/O, no CLI, no storage. Only data types and core computations.

pub mod common;
pub mod currency;
pub mod debt;
pub mod group;
pub mod person;
pub mod settlement;
pub mod transaction;

pub use common::*;
pub use currency::*;
pub use debt::*;
pub use group::*;
pub use person::*;
pub use settlement::*;
pub use transaction::*;
