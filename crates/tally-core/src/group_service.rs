//! Commit-through-storage group operations.

use tracing::debug;
use uuid::Uuid;

use tally_domain::{CurrencyCode, CurrencyConverter, Group, Identifiable, Person, Transaction};

use crate::storage::GroupStorage;
use crate::CoreError;

/// Returns whether the payer and every debtor of a transaction belong to
/// the group. The domain aggregate does not check this itself; calling
/// [`Group::add_transaction`] with outside participants is a precondition
/// violation.
pub fn are_participants_valid(transaction: &Transaction, group: &Group) -> bool {
    group.persons().contains(&transaction.who_paid)
        && transaction
            .debtor_shares
            .iter()
            .all(|share| group.persons().contains(&share.debtor))
}

/// Loads a group per operation, applies one mutation, and saves the full
/// aggregate back, enforcing the membership precondition the domain layer
/// leaves to its callers.
pub struct GroupService<S: GroupStorage> {
    storage: S,
}

impl<S: GroupStorage> GroupService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn create_group(
        &self,
        name: impl Into<String>,
        currency: impl Into<CurrencyCode>,
        converter: CurrencyConverter,
    ) -> Result<Group, CoreError> {
        let group = Group::new(name, currency, converter);
        self.storage.save_group(&group)?;
        debug!(group = %group.id, "created group");
        Ok(group)
    }

    pub fn add_person(&self, group_id: Uuid, person: Person) -> Result<Group, CoreError> {
        let mut group = self.storage.load_group(group_id)?;
        group.add_person(person)?;
        self.storage.save_group(&group)?;
        Ok(group)
    }

    pub fn remove_person(&self, group_id: Uuid, person: &Person) -> Result<Group, CoreError> {
        let mut group = self.storage.load_group(group_id)?;
        group.remove_person(person)?;
        self.storage.save_group(&group)?;
        Ok(group)
    }

    /// Validates the transaction's participants against the group before
    /// the domain ever sees it, then commits.
    pub fn add_transaction(
        &self,
        group_id: Uuid,
        transaction: Transaction,
    ) -> Result<Group, CoreError> {
        let mut group = self.storage.load_group(group_id)?;
        if !are_participants_valid(&transaction, &group) {
            return Err(CoreError::InvalidParticipant(format!(
                "not every participant of transaction {} is in group {}",
                transaction.id(),
                group.name
            )));
        }
        let transaction_id = transaction.id();
        group.add_transaction(transaction)?;
        self.storage.save_group(&group)?;
        debug!(group = %group.id, transaction = %transaction_id, "committed transaction");
        Ok(group)
    }

    pub fn remove_transaction(
        &self,
        group_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<Group, CoreError> {
        let mut group = self.storage.load_group(group_id)?;
        group.remove_transaction(transaction_id)?;
        self.storage.save_group(&group)?;
        debug!(group = %group.id, transaction = %transaction_id, "removed transaction");
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use tally_domain::DebtorShare;

    /// Clone-backed map storage, enough to exercise the service contract.
    #[derive(Default)]
    struct InMemoryStorage {
        groups: Mutex<HashMap<Uuid, Group>>,
    }

    impl GroupStorage for InMemoryStorage {
        fn save_group(&self, group: &Group) -> Result<(), CoreError> {
            self.groups
                .lock()
                .expect("lock")
                .insert(group.id, group.clone());
            Ok(())
        }

        fn load_group(&self, group_id: Uuid) -> Result<Group, CoreError> {
            self.groups
                .lock()
                .expect("lock")
                .get(&group_id)
                .cloned()
                .ok_or(CoreError::GroupNotFound(group_id))
        }

        fn list_groups(&self) -> Result<Vec<Uuid>, CoreError> {
            Ok(self.groups.lock().expect("lock").keys().copied().collect())
        }

        fn delete_group(&self, group_id: Uuid) -> Result<(), CoreError> {
            self.groups
                .lock()
                .expect("lock")
                .remove(&group_id)
                .map(|_| ())
                .ok_or(CoreError::GroupNotFound(group_id))
        }
    }

    fn service_with_pair() -> (GroupService<InMemoryStorage>, Uuid, Person, Person) {
        let service = GroupService::new(InMemoryStorage::default());
        let group = service
            .create_group("group1", "EUR", CurrencyConverter::default())
            .expect("create group");
        let luigi = Person::new("Luigi");
        let mario = Person::new("Mario");
        service
            .add_person(group.id, luigi.clone())
            .expect("add luigi");
        service
            .add_person(group.id, mario.clone())
            .expect("add mario");
        (service, group.id, luigi, mario)
    }

    fn trip(payer: &Person, debtor: &Person, amount: i64) -> Transaction {
        Transaction::new(
            payer.clone(),
            amount,
            "EUR",
            vec![DebtorShare::new(debtor.clone(), amount)],
            "Trip",
            Utc::now(),
        )
    }

    #[test]
    fn valid_transaction_is_committed_to_storage() {
        let (service, group_id, luigi, mario) = service_with_pair();

        service
            .add_transaction(group_id, trip(&luigi, &mario, 100))
            .expect("commit");

        let reloaded = service.storage().load_group(group_id).expect("reload");
        assert_eq!(reloaded.transactions().len(), 1);
        assert_eq!(reloaded.debts().len(), 1);
    }

    #[test]
    fn outside_payer_is_rejected_before_the_domain_mutates() {
        let (service, group_id, _, mario) = service_with_pair();
        let outsider = Person::new("Wario");

        let err = service
            .add_transaction(group_id, trip(&outsider, &mario, 100))
            .expect_err("payer is not a member");
        assert!(matches!(err, CoreError::InvalidParticipant(_)));

        let reloaded = service.storage().load_group(group_id).expect("reload");
        assert!(reloaded.transactions().is_empty());
    }

    #[test]
    fn outside_debtor_is_rejected() {
        let (service, group_id, luigi, _) = service_with_pair();
        let outsider = Person::new("Wario");

        let err = service
            .add_transaction(group_id, trip(&luigi, &outsider, 100))
            .expect_err("debtor is not a member");
        assert!(matches!(err, CoreError::InvalidParticipant(_)));
    }

    #[test]
    fn unknown_group_surfaces_not_found() {
        let service = GroupService::new(InMemoryStorage::default());
        let missing = Uuid::new_v4();
        let err = service
            .add_person(missing, Person::new("Luigi"))
            .expect_err("group never created");
        assert!(matches!(err, CoreError::GroupNotFound(id) if id == missing));
    }

    #[test]
    fn remove_transaction_round_trips_through_storage() {
        let (service, group_id, luigi, mario) = service_with_pair();
        let transaction = trip(&luigi, &mario, 100);
        let transaction_id = transaction.id();
        service
            .add_transaction(group_id, transaction)
            .expect("commit");

        let group = service
            .remove_transaction(group_id, transaction_id)
            .expect("remove");
        assert!(group.transactions().is_empty());
        assert!(group.debts().is_empty());
    }
}
