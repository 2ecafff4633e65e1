//! Bundled GADM reference table.
//!
//! One row per administrative unit across the 6 hierarchy levels
//! (0 = country .. 5 = finest), with per-level name and code columns. The
//! empty string, not an option, is the "absent" sentinel for levels deeper
//! than the row's own level; string comparisons throughout the crate rely
//! on it.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Deepest hierarchy level in the GADM nomenclature.
pub const MAX_LEVEL: u8 = 5;

/// Number of name/code column pairs.
pub const LEVELS: usize = 6;

const DATABASE_CSV: &str = include_str!("../data/gadm_database.csv");

/// A single administrative unit row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    #[serde(rename = "UID")]
    pub uid: u32,
    #[serde(rename = "GID_0")]
    gid_0: String,
    #[serde(rename = "GID_1")]
    gid_1: String,
    #[serde(rename = "GID_2")]
    gid_2: String,
    #[serde(rename = "GID_3")]
    gid_3: String,
    #[serde(rename = "GID_4")]
    gid_4: String,
    #[serde(rename = "GID_5")]
    gid_5: String,
    #[serde(rename = "NAME_0")]
    name_0: String,
    #[serde(rename = "NAME_1")]
    name_1: String,
    #[serde(rename = "NAME_2")]
    name_2: String,
    #[serde(rename = "NAME_3")]
    name_3: String,
    #[serde(rename = "NAME_4")]
    name_4: String,
    #[serde(rename = "NAME_5")]
    name_5: String,
}

impl Unit {
    /// Code column at `level`, empty when the level does not apply.
    pub fn gid(&self, level: u8) -> &str {
        match level {
            0 => &self.gid_0,
            1 => &self.gid_1,
            2 => &self.gid_2,
            3 => &self.gid_3,
            4 => &self.gid_4,
            5 => &self.gid_5,
            _ => "",
        }
    }

    /// Name column at `level`, empty when the level does not apply.
    pub fn name(&self, level: u8) -> &str {
        match level {
            0 => &self.name_0,
            1 => &self.name_1,
            2 => &self.name_2,
            3 => &self.name_3,
            4 => &self.name_4,
            5 => &self.name_5,
            _ => "",
        }
    }

    pub fn set_gid(&mut self, level: u8, value: String) {
        match level {
            0 => self.gid_0 = value,
            1 => self.gid_1 = value,
            2 => self.gid_2 = value,
            3 => self.gid_3 = value,
            4 => self.gid_4 = value,
            5 => self.gid_5 = value,
            _ => {}
        }
    }

    pub fn set_name(&mut self, level: u8, value: String) {
        match level {
            0 => self.name_0 = value,
            1 => self.name_1 = value,
            2 => self.name_2 = value,
            3 => self.name_3 = value,
            4 => self.name_4 = value,
            5 => self.name_5 = value,
            _ => {}
        }
    }

    /// Deepest level populated on this row.
    pub fn level(&self) -> u8 {
        (0..=MAX_LEVEL)
            .rev()
            .find(|&level| !self.gid(level).is_empty())
            .unwrap_or(0)
    }
}

/// The in-memory reference table.
#[derive(Debug)]
pub struct Database {
    units: Vec<Unit>,
}

impl Database {
    /// Parse a reference table from CSV content (`UID,GID_0..5,NAME_0..5`).
    pub fn from_csv(content: &str) -> Result<Self, csv::Error> {
        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let mut units = Vec::new();
        for record in reader.deserialize() {
            units.push(record?);
        }
        Ok(Self { units })
    }

    /// All rows in table order.
    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Distinct GID_0 codes in first-seen order.
    pub fn countries(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.units
            .iter()
            .map(|unit| unit.gid(0))
            .filter(|code| seen.insert(*code))
            .collect()
    }
}

static DATABASE: Lazy<Database> =
    Lazy::new(|| Database::from_csv(DATABASE_CSV).expect("bundled GADM table is well-formed"));

/// Process-wide reference table, loaded on first access and kept for the
/// process lifetime. Read-only after construction; never reloaded.
pub fn database() -> &'static Database {
    &DATABASE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_once() {
        let db = database();
        assert!(!db.is_empty());
        assert!(std::ptr::eq(db, database()));
    }

    #[test]
    fn test_name_and_gid_paired() {
        // GID_k and NAME_k are both set for k <= level and both empty above.
        for unit in database().units() {
            let level = unit.level();
            for k in 0..=MAX_LEVEL {
                if k <= level {
                    assert!(!unit.gid(k).is_empty(), "UID {} missing GID_{k}", unit.uid);
                    assert!(!unit.name(k).is_empty(), "UID {} missing NAME_{k}", unit.uid);
                } else {
                    assert!(unit.gid(k).is_empty(), "UID {} stray GID_{k}", unit.uid);
                    assert!(unit.name(k).is_empty(), "UID {} stray NAME_{k}", unit.uid);
                }
            }
        }
    }

    #[test]
    fn test_gid_unique_within_level() {
        let db = database();
        for level in 0..=MAX_LEVEL {
            let mut seen = std::collections::HashSet::new();
            for unit in db.units() {
                // Ancestor columns repeat across rows; uniqueness applies to
                // a unit's own level.
                if unit.level() == level && !unit.gid(level).is_empty() {
                    assert!(
                        seen.insert(unit.gid(level)),
                        "duplicate GID_{level}: {}",
                        unit.gid(level)
                    );
                }
            }
        }
    }

    #[test]
    fn test_level_accessor() {
        let db = database();
        let country = db.units().iter().find(|u| u.gid(0) == "SGP").unwrap();
        assert_eq!(country.level(), 0);
        let region = db.units().iter().find(|u| u.gid(1) == "SGP.1_1").unwrap();
        assert_eq!(region.level(), 1);
        assert_eq!(region.name(1), "Central");
        assert_eq!(region.name(2), "");
    }

    #[test]
    fn test_countries_first_seen_order() {
        let countries = database().countries();
        assert_eq!(countries.first(), Some(&"ATA"));
        assert!(countries.contains(&"SGP"));
        assert_eq!(
            countries.len(),
            countries.iter().collect::<std::collections::HashSet<_>>().len()
        );
    }
}
