//! Directed settlement edges.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::person::Person;

/// A directed, amount-weighted edge in the settlement graph: `debtor`
/// owes `creditor` exactly `amount` minor units.
///
/// Debts compare as values on all three fields, but order strictly by
/// amount; the persons never take part in ordering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Debt {
    pub debtor: Person,
    pub creditor: Person,
    pub amount: i64,
}

impl Debt {
    pub fn new(debtor: Person, creditor: Person, amount: i64) -> Self {
        Self {
            debtor,
            creditor,
            amount,
        }
    }
}

impl PartialOrd for Debt {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Debt {
    fn cmp(&self, other: &Self) -> Ordering {
        self.amount.cmp(&other.amount)
    }
}

impl fmt::Display for Debt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} owes {} {}", self.debtor, self.creditor, self.amount)
    }
}
