//! Expense events and per-person shares.

use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::Identifiable;
use crate::currency::CurrencyCode;
use crate::person::Person;

/// One person's portion of a shared expense.
///
/// A share whose debtor is the payer contributes no debt.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebtorShare {
    pub debtor: Person,
    /// Minor units owed by the debtor for this transaction.
    pub split_amount: i64,
}

impl DebtorShare {
    pub fn new(debtor: Person, split_amount: i64) -> Self {
        Self {
            debtor,
            split_amount,
        }
    }
}

/// An expense paid by one person and split across a set of debtors.
///
/// Equality and hashing are by `id` only; the remaining fields are display
/// and accounting data. The shares are not required to sum to `amount` —
/// the aggregate computes debts from the shares alone and tolerates a
/// mismatching total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    id: Uuid,
    pub who_paid: Person,
    /// Total paid, in minor units of `currency`.
    pub amount: i64,
    pub currency: CurrencyCode,
    pub category: String,
    pub date_time: DateTime<Utc>,
    pub debtor_shares: Vec<DebtorShare>,
}

impl Transaction {
    pub fn new(
        who_paid: Person,
        amount: i64,
        currency: impl Into<CurrencyCode>,
        debtor_shares: Vec<DebtorShare>,
        category: impl Into<String>,
        date_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            who_paid,
            amount,
            currency: currency.into(),
            category: category.into(),
            date_time,
            debtor_shares,
        }
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Transaction {}

impl Hash for Transaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}
