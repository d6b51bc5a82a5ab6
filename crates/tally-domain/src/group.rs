//! The expense-group aggregate.

use std::collections::{HashMap, HashSet};

use thiserror::Error;
use uuid::Uuid;

use crate::common::{Identifiable, NamedEntity};
use crate::currency::{ConversionError, CurrencyCode, CurrencyConverter};
use crate::debt::Debt;
use crate::person::Person;
use crate::settlement;
use crate::transaction::Transaction;

#[derive(Debug, Error)]
pub enum GroupError {
    #[error("person already in group: {0}")]
    PersonAlreadyInGroup(String),
    #[error("person not found: {0}")]
    PersonNotFound(String),
    #[error("transaction not found: {0}")]
    TransactionNotFound(Uuid),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// A group of persons sharing expenses, the unit of consistency for all
/// mutations.
///
/// The aggregate owns the person set, the transaction sequence, and the
/// derived `debts` list. Every transaction mutation recomputes the debts
/// from scratch, so they can never drift from the transactions that
/// produced them; there is no setter for them. Callers must serialize
/// mutating calls on one group instance.
///
/// Membership is NOT checked here: feeding a transaction whose payer or
/// debtors are outside the group is a caller precondition (the service
/// layer validates it) and would silently produce debts for non-members.
#[derive(Debug, Clone)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    /// Settlement currency every debt is expressed in.
    pub currency: CurrencyCode,
    persons: HashSet<Person>,
    transactions: Vec<Transaction>,
    debts: Vec<Debt>,
    converter: CurrencyConverter,
}

impl Group {
    pub fn new(
        name: impl Into<String>,
        currency: impl Into<CurrencyCode>,
        converter: CurrencyConverter,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            currency: currency.into(),
            persons: HashSet::new(),
            transactions: Vec::new(),
            debts: Vec::new(),
            converter,
        }
    }

    /// Rebuilds a group from persisted parts and recomputes its debts so
    /// the derived state matches the transaction set it was stored with.
    pub fn restore(
        id: Uuid,
        name: impl Into<String>,
        currency: impl Into<CurrencyCode>,
        persons: HashSet<Person>,
        transactions: Vec<Transaction>,
        converter: CurrencyConverter,
    ) -> Result<Self, GroupError> {
        let mut group = Self {
            id,
            name: name.into(),
            currency: currency.into(),
            persons,
            transactions,
            debts: Vec::new(),
            converter,
        };
        group.recalculate_debts()?;
        Ok(group)
    }

    pub fn persons(&self) -> &HashSet<Person> {
        &self.persons
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The current minimized settlement list, always the exact output of
    /// minimizing the raw debts of the current transaction set.
    pub fn debts(&self) -> &[Debt] {
        &self.debts
    }

    pub fn converter(&self) -> &CurrencyConverter {
        &self.converter
    }

    pub fn add_person(&mut self, person: Person) -> Result<(), GroupError> {
        let name = person.name.clone();
        if !self.persons.insert(person) {
            return Err(GroupError::PersonAlreadyInGroup(name));
        }
        Ok(())
    }

    /// Removes a person from the member set only. Transactions and debts
    /// that already reference the person are left untouched.
    pub fn remove_person(&mut self, person: &Person) -> Result<(), GroupError> {
        if !self.persons.remove(person) {
            return Err(GroupError::PersonNotFound(person.name.clone()));
        }
        Ok(())
    }

    /// Renames a member. Identity is carried by the id, so debts and
    /// transactions referencing the person are unaffected.
    pub fn rename_person(&mut self, person: &Person, name: impl Into<String>) -> Result<(), GroupError> {
        let mut member = self
            .persons
            .take(person)
            .ok_or_else(|| GroupError::PersonNotFound(person.name.clone()))?;
        member.name = name.into();
        self.persons.insert(member);
        Ok(())
    }

    /// Appends a transaction and recomputes the debts. A conversion
    /// failure rejects the transaction and leaves the group unchanged.
    pub fn add_transaction(&mut self, transaction: Transaction) -> Result<(), GroupError> {
        self.transactions.push(transaction);
        if let Err(err) = self.recalculate_debts() {
            self.transactions.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Removes a transaction by identity and recomputes the debts, undoing
    /// the removal if the recompute fails.
    pub fn remove_transaction(&mut self, transaction_id: Uuid) -> Result<(), GroupError> {
        let index = self
            .transactions
            .iter()
            .position(|transaction| transaction.id() == transaction_id)
            .ok_or(GroupError::TransactionNotFound(transaction_id))?;
        let removed = self.transactions.remove(index);
        if let Err(err) = self.recalculate_debts() {
            self.transactions.insert(index, removed);
            return Err(err);
        }
        Ok(())
    }

    pub fn transaction(&self, transaction_id: Uuid) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| transaction.id() == transaction_id)
    }

    /// Sums every debtor share per person across all transactions, in each
    /// transaction's original currency units. Unlike `debts`, this is not
    /// currency-normalized.
    pub fn total_share(&self) -> HashMap<Person, i64> {
        let mut totals: HashMap<Person, i64> = HashMap::new();
        for transaction in &self.transactions {
            for share in &transaction.debtor_shares {
                *totals.entry(share.debtor.clone()).or_insert(0) += share.split_amount;
            }
        }
        totals
    }

    /// Derives one raw debt per non-payer share, converted into the group
    /// currency, and replaces `debts` with the minimized result. Only
    /// assigns on success, so callers can roll back their own mutation on
    /// error without repairing the debt list.
    fn recalculate_debts(&mut self) -> Result<(), GroupError> {
        let mut raw = Vec::new();
        for transaction in &self.transactions {
            let rate = self.converter.rate(&transaction.currency, &self.currency)?;
            for share in &transaction.debtor_shares {
                if share.debtor == transaction.who_paid {
                    continue;
                }
                let amount = (share.split_amount as f64 * rate).round() as i64;
                raw.push(Debt::new(
                    share.debtor.clone(),
                    transaction.who_paid.clone(),
                    amount,
                ));
            }
        }
        self.debts = settlement::minimize(&raw);
        Ok(())
    }
}

impl Identifiable for Group {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Group {
    fn name(&self) -> &str {
        &self.name
    }
}
