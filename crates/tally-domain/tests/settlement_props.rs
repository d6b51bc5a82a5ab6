//! Property tests for balance netting and debt minimization.

use std::collections::HashMap;

use proptest::prelude::*;
use uuid::Uuid;

use tally_domain::{minimize, net_balances, Debt, Identifiable, Person};

/// Random debt lists over a small roster of persons.
fn arb_debts() -> impl Strategy<Value = Vec<Debt>> {
    (2usize..=6).prop_flat_map(|count| {
        proptest::collection::vec(
            (0..count, 0..count, 1i64..=10_000)
                .prop_filter("a person cannot owe themselves", |(debtor, creditor, _)| {
                    debtor != creditor
                }),
            0..20,
        )
        .prop_map(move |raw| {
            let roster: Vec<Person> = (0..count)
                .map(|index| Person::new(format!("person-{index}")))
                .collect();
            raw.into_iter()
                .map(|(debtor, creditor, amount)| {
                    Debt::new(roster[debtor].clone(), roster[creditor].clone(), amount)
                })
                .collect()
        })
    })
}

fn nonzero_balances(debts: &[Debt]) -> HashMap<Person, i64> {
    net_balances(debts)
        .into_iter()
        .filter(|(_, balance)| *balance != 0)
        .collect()
}

fn settlement_key(debt: &Debt) -> (i64, Uuid, Uuid) {
    (debt.amount, debt.debtor.id(), debt.creditor.id())
}

proptest! {
    #[test]
    fn balances_always_sum_to_zero(debts in arb_debts()) {
        prop_assert_eq!(net_balances(&debts).values().sum::<i64>(), 0);
    }

    #[test]
    fn settlements_preserve_every_net_balance(debts in arb_debts()) {
        let settled = minimize(&debts);
        prop_assert_eq!(nonzero_balances(&settled), nonzero_balances(&debts));
    }

    #[test]
    fn settlement_count_stays_below_participant_count(debts in arb_debts()) {
        let settled = minimize(&debts);
        let participants = nonzero_balances(&debts).len();
        if participants == 0 {
            prop_assert!(settled.is_empty());
        } else {
            prop_assert!(settled.len() <= participants - 1);
        }
    }

    #[test]
    fn every_settlement_is_strictly_positive(debts in arb_debts()) {
        for settlement in minimize(&debts) {
            prop_assert!(settlement.amount > 0);
        }
    }

    #[test]
    fn minimize_is_idempotent_up_to_settlement_set(debts in arb_debts()) {
        let once = minimize(&debts);
        let twice = minimize(&once);

        let mut once_sorted = once.clone();
        once_sorted.sort_by_key(settlement_key);
        let mut twice_sorted = twice;
        twice_sorted.sort_by_key(settlement_key);
        prop_assert_eq!(once_sorted, twice_sorted);
    }

    #[test]
    fn input_order_never_changes_the_netted_outcome(debts in arb_debts()) {
        let forward = minimize(&debts);
        let mut reversed = debts.clone();
        reversed.reverse();
        let backward = minimize(&reversed);

        prop_assert_eq!(forward.len(), backward.len());
        prop_assert_eq!(nonzero_balances(&forward), nonzero_balances(&backward));
    }
}
