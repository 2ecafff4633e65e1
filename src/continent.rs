//! Continent aliases: continent name -> GID_0 country codes.
//!
//! Continents are stored as code lists rather than extra table rows so that
//! no country row is duplicated. A continent alias expands before the main
//! resolution runs.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

const CONTINENT_JSON: &str = include_str!("../data/gadm_continent.json");

static CONTINENTS: Lazy<BTreeMap<String, Vec<String>>> = Lazy::new(|| {
    serde_json::from_str(CONTINENT_JSON).expect("bundled continent table is well-formed")
});

/// Country codes for a continent alias, matched case-insensitively.
/// `None` when the identifier is not a continent.
pub fn continent_countries(name: &str) -> Option<&'static [String]> {
    CONTINENTS.get(&name.to_lowercase()).map(Vec::as_slice)
}

/// All known continents with their country lists.
pub fn continents() -> impl Iterator<Item = (&'static str, &'static [String])> {
    CONTINENTS
        .iter()
        .map(|(name, codes)| (name.as_str(), codes.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::database;

    #[test]
    fn test_lookup_case_insensitive() {
        let codes = continent_countries("Antartica").unwrap();
        assert_eq!(codes, ["ATA"]);
        assert_eq!(continent_countries("ANTARTICA"), Some(codes));
        assert_eq!(continent_countries("atlantis"), None);
    }

    #[test]
    fn test_no_country_under_two_continents() {
        let mut seen = std::collections::HashMap::new();
        for (continent, codes) in continents() {
            for code in codes {
                if let Some(previous) = seen.insert(code.clone(), continent) {
                    panic!("{code} appears under both {previous} and {continent}");
                }
            }
        }
    }

    #[test]
    fn test_no_orphan_country() {
        // Every GID_0 of the reference table belongs to exactly one continent.
        let known: Vec<&str> = continents()
            .flat_map(|(_, codes)| codes.iter().map(String::as_str))
            .collect();
        for country in database().countries() {
            assert!(known.contains(&country), "{country} is not in any continent");
        }
    }
}
