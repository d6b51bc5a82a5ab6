//! Balance netting and greedy debt minimization.
//!
//! `net_balances` collapses a debt list into one signed balance per person;
//! `minimize` turns those balances into the smallest set of settling
//! payments by repeatedly matching the deepest debtor with the largest
//! creditor.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use uuid::Uuid;

use crate::common::Identifiable;
use crate::debt::Debt;
use crate::person::Person;

/// Nets a debt list into one signed balance per person.
///
/// Each debt lowers the debtor's balance and raises the creditor's by the
/// same amount, so the values always sum to zero. Persons appearing in no
/// debt are absent from the result. Summation is commutative; the input
/// order never changes the resulting map.
pub fn net_balances(debts: &[Debt]) -> HashMap<Person, i64> {
    let mut balances: HashMap<Person, i64> = HashMap::new();
    for debt in debts {
        *balances.entry(debt.debtor.clone()).or_insert(0) -= debt.amount;
        *balances.entry(debt.creditor.clone()).or_insert(0) += debt.amount;
    }
    balances
}

/// Heap entry carrying a running balance and the sequence number assigned
/// when the person was first seen. The sequence number breaks balance ties
/// and survives re-insertion, keeping the pairing deterministic.
#[derive(Debug, Clone)]
struct Entry {
    balance: i64,
    seq: usize,
    person: Person,
}

/// Pops the most negative balance first; earlier sequence wins ties.
#[derive(Debug, Clone)]
struct Owing(Entry);

impl PartialEq for Owing {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Owing {}

impl PartialOrd for Owing {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Owing {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .balance
            .cmp(&self.0.balance)
            .then_with(|| other.0.seq.cmp(&self.0.seq))
    }
}

/// Pops the most positive balance first; earlier sequence wins ties.
#[derive(Debug, Clone)]
struct Owed(Entry);

impl PartialEq for Owed {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Owed {}

impl PartialOrd for Owed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Owed {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .balance
            .cmp(&other.0.balance)
            .then_with(|| other.0.seq.cmp(&self.0.seq))
    }
}

/// Reduces an arbitrary debt list to a minimal set of settling payments
/// with the same net balances.
///
/// Persons are enqueued in first-appearance order over the input (debtor
/// before creditor within a debt), which pins the tie-breaking and makes
/// the output reproducible for a given debt sequence. The result holds at
/// most `debtors + creditors - 1` payments, each strictly positive.
pub fn minimize(debts: &[Debt]) -> Vec<Debt> {
    let balances = net_balances(debts);

    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut owing: BinaryHeap<Owing> = BinaryHeap::new();
    let mut owed: BinaryHeap<Owed> = BinaryHeap::new();
    let mut seq = 0usize;
    for debt in debts {
        for person in [&debt.debtor, &debt.creditor] {
            if !seen.insert(person.id()) {
                continue;
            }
            let balance = balances.get(person).copied().unwrap_or(0);
            match balance.cmp(&0) {
                Ordering::Less => owing.push(Owing(Entry {
                    balance,
                    seq,
                    person: person.clone(),
                })),
                Ordering::Greater => owed.push(Owed(Entry {
                    balance,
                    seq,
                    person: person.clone(),
                })),
                Ordering::Equal => {}
            }
            seq += 1;
        }
    }

    let mut settlements = Vec::new();
    while let (Some(Owing(mut debtor)), Some(Owed(mut creditor))) = (owing.pop(), owed.pop()) {
        let settled = (-debtor.balance).min(creditor.balance);
        settlements.push(Debt::new(
            debtor.person.clone(),
            creditor.person.clone(),
            settled,
        ));
        debtor.balance += settled;
        creditor.balance -= settled;
        if debtor.balance < 0 {
            owing.push(Owing(debtor));
        }
        if creditor.balance > 0 {
            owed.push(Owed(creditor));
        }
    }

    // Numerical-noise guard: never emit a zero-amount settlement.
    settlements.retain(|debt| debt.amount > 0);
    settlements
}
