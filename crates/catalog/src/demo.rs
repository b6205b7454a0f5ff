//! The "golden path" demo table.
//!
//! A handful of input combinations map straight to a pre-baked reading so
//! demos never depend on upstream services. Matching is exact on the
//! canonical demo key; there is no fuzzy matching.

use crate::catalog::Catalog;
use crate::error::{CatalogError, Result};
use crate::types::{ResultRecord, TasteInput};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::info;

const EMBEDDED_DEMOS: &str = include_str!("../data/demo.json");

/// Separator between names in a demo key
const KEY_SEPARATOR: &str = "_";

/// Trimmed, lowercased form of a taste name. Two inputs with the same
/// normalized name are the same taste.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Build the canonical demo key for a set of input names.
///
/// Names are trimmed and lower-cased, empty names are dropped, and the rest
/// are sorted before joining, so input order never matters.
///
/// ```
/// use catalog::demo_key;
///
/// let a = demo_key(["Blade Runner", "Street Fighter II"]);
/// let b = demo_key(["street fighter ii ", "Blade Runner"]);
/// assert_eq!(a, "blade runner_street fighter ii");
/// assert_eq!(a, b);
/// ```
pub fn demo_key<I, S>(names: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut normalized: Vec<String> = names
        .into_iter()
        .map(|name| normalize_name(name.as_ref()))
        .filter(|name| !name.is_empty())
        .collect();
    normalized.sort();
    normalized.join(KEY_SEPARATOR)
}

/// Demo key for a request's taste inputs.
pub fn demo_key_for(inputs: &[TasteInput]) -> String {
    demo_key(inputs.iter().map(|input| input.name.as_str()))
}

/// On-disk shape of a demo entry: the inputs that trigger it and the
/// literal result to return.
#[derive(Debug, Deserialize)]
struct DemoEntry {
    inputs: Vec<String>,
    result: ResultRecord,
}

/// Exact-match table from demo key to a pre-baked result.
#[derive(Debug, Clone, Default)]
pub struct DemoTable {
    entries: HashMap<String, ResultRecord>,
}

impl DemoTable {
    /// Load the demo table compiled into the binary, checking every entry
    /// against `catalog`.
    pub fn embedded(catalog: &Catalog) -> Result<Self> {
        Self::from_json(EMBEDDED_DEMOS, catalog)
    }

    /// Parse a demo document. Keys are derived from each entry's inputs with
    /// [`demo_key`], so the document never has to spell keys out.
    pub fn from_json(raw: &str, catalog: &Catalog) -> Result<Self> {
        let entries: Vec<DemoEntry> =
            serde_json::from_str(raw).map_err(|source| CatalogError::Parse {
                document: "demo table".to_string(),
                source,
            })?;

        let mut table = Self::default();
        for entry in entries {
            let key = demo_key(&entry.inputs);
            if !catalog.contains(entry.result.name()) {
                return Err(CatalogError::UnknownDemoSign {
                    key,
                    sign: entry.result.name().to_string(),
                });
            }
            table.insert(key, entry.result);
        }

        info!("Loaded {} demo entries", table.len());
        Ok(table)
    }

    fn insert(&mut self, key: impl Into<String>, result: ResultRecord) {
        self.entries.insert(key.into(), result);
    }

    /// Look up a canonical key.
    pub fn get(&self, key: &str) -> Option<&ResultRecord> {
        self.entries.get(key)
    }

    /// Build the key for `inputs` and look it up.
    pub fn lookup(&self, inputs: &[TasteInput]) -> Option<ResultRecord> {
        self.get(&demo_key_for(inputs)).cloned()
    }

    /// Every canonical key, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys.into_iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
