//! Alias index: alternate spellings that resolve to canonical city names.
//!
//! Two kinds of aliases are indexed: variants generated from every catalog
//! city (the lowercased name and the name with spaces removed), and a
//! hand-curated supplement of abbreviations seen in real job postings
//! ("ft collins", "colo springs", "gj", ...). Lookups always go through
//! [`normalize_key`], so callers never have to pre-clean their input.

use std::collections::BTreeMap;

use job_map_catalog_models::CityRecord;
use serde::Deserialize;

/// Hand-curated alias supplement embedded at compile time.
const ALIAS_SUPPLEMENT_TOML: &str = include_str!("../data/city_aliases.toml");

/// Layout of the alias supplement file.
#[derive(Debug, Deserialize)]
struct AliasSupplement {
    aliases: BTreeMap<String, String>,
}

/// Normalizes text into the catalog's key form: lowercase, punctuation
/// replaced by spaces, whitespace collapsed, ends trimmed.
///
/// This is the shared normal form for alias keys and cleaned location
/// fragments, so `"Ft. Collins"` and `"ft collins"` index identically.
#[must_use]
pub fn normalize_key(raw: &str) -> String {
    let mut scrubbed = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            scrubbed.extend(ch.to_lowercase());
        } else {
            scrubbed.push(' ');
        }
    }
    scrubbed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Maps normalized alias spellings to canonical city names.
#[derive(Debug, Clone, Default)]
pub struct AliasIndex {
    map: BTreeMap<String, String>,
}

impl AliasIndex {
    /// Builds the index from the catalog cities plus the embedded
    /// hand-curated supplement.
    ///
    /// # Panics
    ///
    /// Panics if the embedded supplement TOML is malformed (this is a
    /// compile-time guarantee since the file is embedded).
    #[must_use]
    pub fn build(cities: &[CityRecord]) -> Self {
        let mut index = Self::default();

        for city in cities {
            let key = normalize_key(&city.city);
            index.insert(key.clone(), city.city.clone());
            index.insert(key.replace(' ', ""), city.city.clone());
        }

        let supplement: AliasSupplement = toml::from_str(ALIAS_SUPPLEMENT_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded alias supplement: {e}"));
        for (alias, city) in supplement.aliases {
            if !cities.iter().any(|c| c.city == city) {
                log::debug!("alias '{alias}' targets '{city}', which is not in the city table");
            }
            index.insert(normalize_key(&alias), city);
        }

        index
    }

    /// Inserts an alias, letting later entries win so the hand-curated
    /// supplement can override generated variants.
    fn insert(&mut self, alias: String, city: String) {
        if alias.is_empty() {
            return;
        }
        if let Some(previous) = self.map.insert(alias.clone(), city) {
            log::debug!("alias '{alias}' redefined (was '{previous}')");
        }
    }

    /// Resolves an alias to its canonical city name.
    #[must_use]
    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.map.get(&normalize_key(alias)).map(String::as_str)
    }

    /// Iterates over `(alias, canonical city)` pairs in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of indexed aliases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether the index holds no aliases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city(name: &str) -> CityRecord {
        CityRecord {
            city: name.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            population: None,
        }
    }

    #[test]
    fn normalize_key_scrubs_punctuation_and_case() {
        assert_eq!(normalize_key("Ft. Collins"), "ft collins");
        assert_eq!(normalize_key("  Security-Widefield "), "security widefield");
        assert_eq!(normalize_key("DENVER"), "denver");
        assert_eq!(normalize_key("..."), "");
    }

    #[test]
    fn generates_lowercase_and_spaceless_variants() {
        let index = AliasIndex::build(&[city("Colorado Springs")]);
        assert_eq!(index.resolve("colorado springs"), Some("Colorado Springs"));
        assert_eq!(index.resolve("coloradosprings"), Some("Colorado Springs"));
    }

    #[test]
    fn supplement_covers_common_abbreviations() {
        let index = AliasIndex::build(&[city("Fort Collins"), city("Grand Junction")]);
        assert_eq!(index.resolve("ft collins"), Some("Fort Collins"));
        assert_eq!(index.resolve("gj"), Some("Grand Junction"));
    }

    #[test]
    fn lookup_normalizes_its_input() {
        let index = AliasIndex::build(&[city("Castle Rock")]);
        assert_eq!(index.resolve("Castle Rock"), Some("Castle Rock"));
        assert_eq!(index.resolve("CASTLEROCK"), Some("Castle Rock"));
    }

    #[test]
    fn supplement_applies_even_when_target_city_is_absent() {
        // The fallback catalog has no Security-Widefield entry, but the
        // alias still resolves; coordinates are simply unavailable later.
        let index = AliasIndex::build(&[city("Denver")]);
        assert_eq!(index.resolve("widefield"), Some("Security-Widefield"));
    }

    #[test]
    fn unknown_alias_is_none() {
        let index = AliasIndex::build(&[city("Denver")]);
        assert_eq!(index.resolve("nowhereville"), None);
    }
}
