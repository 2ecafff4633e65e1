//! Name listings at a hierarchy level. Pure table work, no I/O.

use std::collections::HashSet;

use crate::database::{database, Unit, MAX_LEVEL};
use crate::error::{Error, Warning};
use crate::resolver::{resolve, IdKind};

/// Lookup request for [`names`].
///
/// `name` and `admin` are mutually exclusive; with neither set the whole
/// world is listed (level 0 unless a content level is given).
#[derive(Debug, Clone, Default)]
pub struct NamesQuery {
    pub name: Option<String>,
    pub admin: Option<String>,
    pub content_level: Option<u8>,
}

impl NamesQuery {
    /// Whole-world listing.
    pub fn world() -> Self {
        Self::default()
    }

    /// Look an area up by its name.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Look an area up by its GADM code.
    pub fn admin(code: impl Into<String>) -> Self {
        Self {
            admin: Some(code.into()),
            ..Self::default()
        }
    }

    /// Request a specific level for the returned rows.
    pub fn at_level(mut self, level: u8) -> Self {
        self.content_level = Some(level);
        self
    }
}

/// A single (name, code) pair at the content level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    pub name: String,
    pub gid: String,
}

/// Deduplicated name listing for an area at one content level.
///
/// [`NameTable::entries`] is the two-column view; [`NameTable::rows`] keeps
/// the complete 12-column hierarchy for callers that need ancestor names.
#[derive(Debug, Clone, PartialEq)]
pub struct NameTable {
    content_level: u8,
    rows: Vec<Unit>,
    warnings: Vec<Warning>,
}

impl NameTable {
    /// Level at which the rows are listed, after clamping.
    pub fn content_level(&self) -> u8 {
        self.content_level
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The `(NAME, GID)` pairs at the content level.
    pub fn entries(&self) -> Vec<NameEntry> {
        self.rows
            .iter()
            .map(|unit| NameEntry {
                name: unit.name(self.content_level).to_string(),
                gid: unit.gid(self.content_level).to_string(),
            })
            .collect()
    }

    /// The complete rows, ancestors included.
    pub fn rows(&self) -> &[Unit] {
        &self.rows
    }

    /// Advisory notices collected while resolving.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub(crate) fn push_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }
}

/// List the names available in an administrative layer.
///
/// The area can be requested either by name or by GADM code; the level is
/// identified on the fly. A requested content level outside the area's
/// valid range is clamped and reported through [`NameTable::warnings`].
pub fn names(query: &NamesQuery) -> Result<NameTable, Error> {
    build(
        query.name.as_deref(),
        query.admin.as_deref(),
        query.content_level,
    )
}

pub(crate) fn build(
    name: Option<&str>,
    admin: Option<&str>,
    content_level: Option<u8>,
) -> Result<NameTable, Error> {
    // The empty string doubles as "unset" so that batch placeholders behave
    // like absent parameters.
    let name = name.filter(|s| !s.is_empty());
    let admin = admin.filter(|s| !s.is_empty());
    if name.is_some() && admin.is_some() {
        return Err(Error::MutuallyExclusiveArgs);
    }

    let db = database();
    let (rows, level, warnings) = if let Some(id) = name {
        let resolution = resolve(db, id, IdKind::Name, content_level)?;
        (resolution.rows, resolution.content_level, resolution.warnings)
    } else if let Some(id) = admin {
        let resolution = resolve(db, id, IdKind::Admin, content_level)?;
        (resolution.rows, resolution.content_level, resolution.warnings)
    } else {
        // Whole-world listing: no area to infer a level from.
        let rows: Vec<&Unit> = db.units().iter().collect();
        (rows, content_level.unwrap_or(0).min(MAX_LEVEL), Vec::new())
    };

    // Ancestor rows above the content depth all share an empty (name, gid)
    // pair; dedup first, then drop the empty-name leftovers.
    let mut seen = HashSet::new();
    let mut kept = Vec::new();
    for unit in rows {
        let key = (unit.name(level).to_string(), unit.gid(level).to_string());
        if seen.insert(key) && !unit.name(level).is_empty() {
            kept.push(unit.clone());
        }
    }

    Ok(NameTable {
        content_level: level,
        rows: kept,
        warnings,
    })
}
