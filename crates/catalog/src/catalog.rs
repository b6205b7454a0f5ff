//! Loading, validating and querying the sign catalog.
//!
//! The catalog ships inside the binary as `data/signs.json`. Operators can
//! swap in a different file, which goes through the same validation.

use crate::error::{CatalogError, Result};
use crate::types::SignRecord;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

const EMBEDDED_SIGNS: &str = include_str!("../data/signs.json");

/// Allowed range for `SignRecord::absurdity`
const ABSURDITY_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// The immutable, ordered list of signs.
///
/// Order is the order of the source document and is preserved in every
/// response's `all_signs`.
#[derive(Debug, Clone)]
pub struct Catalog {
    signs: Vec<SignRecord>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Load the catalog compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_json(EMBEDDED_SIGNS, "embedded catalog")
    }

    /// Load a catalog from a JSON file on disk.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading sign catalog from {:?}", path);
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&raw, &path.display().to_string())
    }

    /// Parse and validate a catalog document.
    ///
    /// `document` only labels errors and log lines.
    pub fn from_json(raw: &str, document: &str) -> Result<Self> {
        let signs: Vec<SignRecord> =
            serde_json::from_str(raw).map_err(|source| CatalogError::Parse {
                document: document.to_string(),
                source,
            })?;
        let catalog = Self::from_signs(signs)?;
        info!(
            "Loaded {} signs in {} constellations from {}",
            catalog.len(),
            catalog.constellations().len(),
            document
        );
        Ok(catalog)
    }

    /// Build a catalog from already-constructed records.
    pub fn from_signs(signs: Vec<SignRecord>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(signs.len());
        for (position, sign) in signs.iter().enumerate() {
            if by_name.insert(sign.name.clone(), position).is_some() {
                return Err(CatalogError::DuplicateSign(sign.name.clone()));
            }
        }
        let catalog = Self { signs, by_name };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check the hard invariants and report soft ones.
    ///
    /// Compatibility text is only expected to mention another sign; a miss
    /// is logged, never rejected.
    pub fn validate(&self) -> Result<()> {
        if self.signs.is_empty() {
            return Err(CatalogError::Empty);
        }

        for sign in &self.signs {
            if sign.name.trim().is_empty() {
                return Err(CatalogError::InvalidValue {
                    sign: sign.name.clone(),
                    field: "name".to_string(),
                    value: "<empty>".to_string(),
                });
            }
            if !ABSURDITY_RANGE.contains(&sign.absurdity) {
                return Err(CatalogError::InvalidValue {
                    sign: sign.name.clone(),
                    field: "absurdity".to_string(),
                    value: sign.absurdity.to_string(),
                });
            }
        }

        for sign in &self.signs {
            if self.compatibility_partner(sign).is_none() {
                warn!(
                    sign = %sign.name,
                    "Compatibility text does not mention any other catalog sign"
                );
            }
        }

        debug!("Catalog validated ({} signs)", self.signs.len());
        Ok(())
    }

    /// All signs, in catalog order.
    pub fn signs(&self) -> &[SignRecord] {
        &self.signs
    }

    /// Exact, case-sensitive lookup by sign name.
    pub fn get(&self, name: &str) -> Option<&SignRecord> {
        self.by_name.get(name).map(|&position| &self.signs[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.signs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signs.is_empty()
    }

    /// Signs grouped by constellation label, groups in alphabetical order and
    /// members in catalog order.
    pub fn constellations(&self) -> BTreeMap<&str, Vec<&SignRecord>> {
        let mut groups: BTreeMap<&str, Vec<&SignRecord>> = BTreeMap::new();
        for sign in &self.signs {
            groups
                .entry(sign.constellation.as_str())
                .or_default()
                .push(sign);
        }
        groups
    }

    /// First other sign whose name appears in `sign.compatibility`.
    pub fn compatibility_partner(&self, sign: &SignRecord) -> Option<&SignRecord> {
        self.signs
            .iter()
            .find(|other| other.name != sign.name && sign.compatibility.contains(&other.name))
    }

    /// Signs whose compatibility text references no catalog sign.
    pub fn dangling_compatibility(&self) -> Vec<&SignRecord> {
        self.signs
            .iter()
            .filter(|s| self.compatibility_partner(s).is_none())
            .collect()
    }

    /// Count of distinct constellation labels.
    pub fn constellation_count(&self) -> usize {
        self.signs
            .iter()
            .map(|s| s.constellation.as_str())
            .collect::<HashSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign(name: &str, constellation: &str, compatibility: &str) -> SignRecord {
        SignRecord {
            name: name.to_string(),
            emoji: "✨".to_string(),
            keywords: vec!["test".to_string()],
            mood: "Calm".to_string(),
            era: "Modern".to_string(),
            absurdity: 3,
            rare: false,
            description: "A test sign.".to_string(),
            constellation: constellation.to_string(),
            compatibility: compatibility.to_string(),
        }
    }

    #[test]
    fn test_embedded_catalog_loads() {
        let catalog = Catalog::embedded().unwrap();

        assert_eq!(catalog.len(), 16);
        assert_eq!(catalog.signs()[0].name, "Neon Graveyard Poet");
        assert_eq!(catalog.signs()[15].name, "Haunted Smart Fridge Ambient");
        assert_eq!(catalog.constellation_count(), 4);
    }

    #[test]
    fn test_embedded_catalog_constellations_have_four_signs_each() {
        let catalog = Catalog::embedded().unwrap();
        let groups = catalog.constellations();

        assert_eq!(groups.len(), 4);
        for (label, members) in groups {
            assert_eq!(members.len(), 4, "constellation {label}");
        }
    }

    #[test]
    fn test_embedded_compatibility_all_resolve() {
        let catalog = Catalog::embedded().unwrap();
        assert!(catalog.dangling_compatibility().is_empty());

        let heartthrob = catalog.get("Abandoned Arcade Heartthrob").unwrap();
        let partner = catalog.compatibility_partner(heartthrob).unwrap();
        assert_eq!(partner.name, "Abandoned Space Station Disco");
    }

    #[test]
    fn test_get_is_exact_match() {
        let catalog = Catalog::embedded().unwrap();

        assert!(catalog.get("Lunar Elevator Muzak").is_some());
        assert!(catalog.get("lunar elevator muzak").is_none());
        assert!(catalog.get("Lunar Elevator Muzak ").is_none());
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let result = Catalog::from_signs(vec![sign("A", "X", ""), sign("A", "Y", "")]);
        assert!(matches!(result, Err(CatalogError::DuplicateSign(name)) if name == "A"));
    }

    #[test]
    fn test_absurdity_out_of_range_is_rejected() {
        let mut bad = sign("A", "X", "");
        bad.absurdity = 6;

        let result = Catalog::from_signs(vec![bad]);
        assert!(matches!(
            result,
            Err(CatalogError::InvalidValue { ref field, .. }) if field == "absurdity"
        ));
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        assert!(matches!(Catalog::from_signs(Vec::new()), Err(CatalogError::Empty)));
    }

    #[test]
    fn test_dangling_compatibility_is_tolerated() {
        let catalog = Catalog::from_signs(vec![
            sign("A", "X", "Loves the 'B' sign."),
            sign("B", "X", "Loves nobody in particular."),
        ])
        .unwrap();

        let dangling: Vec<&str> = catalog
            .dangling_compatibility()
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(dangling, vec!["B"]);
        assert_eq!(catalog.compatibility_partner(&catalog.signs()[0]).unwrap().name, "B");
    }

    #[test]
    fn test_malformed_json_reports_document() {
        let err = Catalog::from_json("{not json", "broken.json").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
