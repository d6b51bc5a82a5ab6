//! Filesystem-backed JSON persistence for expense groups.
//!
//! One pretty-printed JSON file per group, written atomically via a tmp
//! file and rename. The persisted debt list is a cache: loading always
//! recomputes the debts from the stored transactions, so a group can never
//! come back with derived state that disagrees with its transaction set.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use tally_core::{group_warnings, CoreError, GroupStorage};
use tally_domain::{CurrencyCode, CurrencyConverter, Debt, Group, Person, Transaction};

const GROUP_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Serialized form of a group. The converter is configuration, not state,
/// so it is injected by the storage rather than persisted.
#[derive(Debug, Serialize, Deserialize)]
struct StoredGroup {
    id: Uuid,
    name: String,
    currency: CurrencyCode,
    persons: Vec<Person>,
    transactions: Vec<Transaction>,
    /// Cache of the derived settlement list at save time.
    debts: Vec<Debt>,
}

impl StoredGroup {
    fn from_group(group: &Group) -> Self {
        Self {
            id: group.id,
            name: group.name.clone(),
            currency: group.currency.clone(),
            persons: group.persons().iter().cloned().collect(),
            transactions: group.transactions().to_vec(),
            debts: group.debts().to_vec(),
        }
    }

    fn into_group(self, converter: CurrencyConverter) -> Result<Group, CoreError> {
        let cached = self.debts;
        let persons: HashSet<Person> = self.persons.into_iter().collect();
        let group = Group::restore(
            self.id,
            self.name,
            self.currency,
            persons,
            self.transactions,
            converter,
        )?;
        if group.debts() != cached.as_slice() {
            warn!(group = %group.id, "persisted debt cache was stale, recomputed from transactions");
        }
        Ok(group)
    }
}

/// JSON file storage for groups under a single directory.
#[derive(Clone)]
pub struct JsonGroupStorage {
    groups_dir: PathBuf,
    converter: CurrencyConverter,
}

impl JsonGroupStorage {
    pub fn new(groups_dir: PathBuf, converter: CurrencyConverter) -> Result<Self, CoreError> {
        fs::create_dir_all(&groups_dir)?;
        Ok(Self {
            groups_dir,
            converter,
        })
    }

    pub fn group_path(&self, group_id: Uuid) -> PathBuf {
        self.groups_dir
            .join(format!("{}.{}", group_id, GROUP_EXTENSION))
    }
}

impl GroupStorage for JsonGroupStorage {
    fn save_group(&self, group: &Group) -> Result<(), CoreError> {
        let record = StoredGroup::from_group(group);
        let json = serde_json::to_string_pretty(&record)
            .map_err(|err| CoreError::Serde(err.to_string()))?;
        let path = self.group_path(group.id);
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn load_group(&self, group_id: Uuid) -> Result<Group, CoreError> {
        let path = self.group_path(group_id);
        if !path.exists() {
            return Err(CoreError::GroupNotFound(group_id));
        }
        let data = fs::read_to_string(&path)?;
        let record: StoredGroup =
            serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))?;
        let group = record.into_group(self.converter.clone())?;
        for warning in group_warnings(&group) {
            warn!(group = %group.id, "{warning}");
        }
        Ok(group)
    }

    fn list_groups(&self) -> Result<Vec<Uuid>, CoreError> {
        if !self.groups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.groups_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some(GROUP_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if let Ok(id) = stem.parse::<Uuid>() {
                    ids.push(id);
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn delete_group(&self, group_id: Uuid) -> Result<(), CoreError> {
        let path = self.group_path(group_id);
        if !path.exists() {
            return Err(CoreError::GroupNotFound(group_id));
        }
        fs::remove_file(path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
