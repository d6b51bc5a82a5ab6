use uuid::Uuid;

use tally_domain::{Group, Identifiable};

use crate::CoreError;

/// Abstraction over persistence backends capable of storing groups.
///
/// A save must persist the group's id, name, settlement currency, full
/// person set, full transaction set with shares, and the current minimized
/// debt list; the debt list is a cache of derived data, never a source of
/// truth. A load must hand back a group whose debts were recomputed from
/// its transactions.
pub trait GroupStorage: Send + Sync {
    fn save_group(&self, group: &Group) -> Result<(), CoreError>;
    fn load_group(&self, group_id: Uuid) -> Result<Group, CoreError>;
    fn list_groups(&self) -> Result<Vec<Uuid>, CoreError>;
    fn delete_group(&self, group_id: Uuid) -> Result<(), CoreError>;
}

/// Detects dangling references within a group snapshot: transactions or
/// settled debts naming persons outside the member set. These are legal
/// states (member removal never rewrites history) but worth surfacing.
pub fn group_warnings(group: &Group) -> Vec<String> {
    let mut warnings = Vec::new();

    for transaction in group.transactions() {
        if !group.persons().contains(&transaction.who_paid) {
            warnings.push(format!(
                "transaction {} paid by non-member {}",
                transaction.id(),
                transaction.who_paid
            ));
        }
        for share in &transaction.debtor_shares {
            if !group.persons().contains(&share.debtor) {
                warnings.push(format!(
                    "transaction {} splits against non-member {}",
                    transaction.id(),
                    share.debtor
                ));
            }
        }
    }
    for debt in group.debts() {
        for person in [&debt.debtor, &debt.creditor] {
            if !group.persons().contains(person) {
                warnings.push(format!("debt `{}` references non-member {}", debt, person));
            }
        }
    }
    warnings
}
