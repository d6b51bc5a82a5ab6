use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use tally_domain::{CurrencyConverter, RateEntry, RateTable};

/// Stores user-configurable defaults and the exchange-rate table the
/// converter is built from. Rates live here so tests and deployments can
/// inject independent tables instead of sharing a module-level constant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub default_currency: String,
    #[serde(default)]
    pub rates: Vec<RateEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom root directory for group files. Defaults to
    /// `~/Documents/Tally`.
    pub groups_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_currency: "EUR".into(),
            rates: Vec::new(),
            groups_root: None,
        }
    }
}

impl Config {
    pub fn rate_table(&self) -> RateTable {
        RateTable::from_entries(&self.rates)
    }

    pub fn converter(&self) -> CurrencyConverter {
        CurrencyConverter::new(self.rate_table())
    }

    pub fn resolve_groups_root(&self) -> PathBuf {
        if let Some(path) = &self.groups_root {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("Tally")
    }
}
