//! Identifier resolution.
//!
//! Given one name or admin code, find which hierarchy level it belongs to,
//! keep the matching rows (including same-name areas in other countries),
//! and validate the requested content level against the area's actual
//! depth.

use std::collections::HashSet;

use tracing::warn;

use crate::database::{Database, Unit, MAX_LEVEL};
use crate::error::{Error, Warning};

/// Which column family an identifier is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdKind {
    /// Match against `NAME_0..NAME_5`.
    Name,
    /// Match against `GID_0..GID_5`.
    Admin,
}

impl IdKind {
    fn column<'a>(&self, unit: &'a Unit, level: u8) -> &'a str {
        match self {
            IdKind::Name => unit.name(level),
            IdKind::Admin => unit.gid(level),
        }
    }
}

/// Outcome of a single identifier resolution.
#[derive(Debug)]
pub struct Resolution<'a> {
    /// Level at which the identifier was found.
    pub level: u8,
    /// GID_0 of the matched row.
    pub country: String,
    /// Requested level after clamping into [level, max available].
    pub content_level: u8,
    /// Rows whose matched-level column equals the identifier.
    pub rows: Vec<&'a Unit>,
    /// Advisory notices emitted while clamping.
    pub warnings: Vec<Warning>,
}

/// Resolve one identifier against the reference table.
///
/// The first matching row in table order fixes the matched level; columns
/// are scanned 0..=5, so a row that happens to match at several levels
/// keeps the shallowest one. This reproduces the reference behavior for
/// colliding names (see the "Italy" test below) and must not be reordered.
pub fn resolve<'a>(
    db: &'a Database,
    identifier: &str,
    kind: IdKind,
    requested_level: Option<u8>,
) -> Result<Resolution<'a>, Error> {
    if identifier.is_empty() {
        return Err(Error::MissingArgs);
    }
    let needle = identifier.to_lowercase();

    let mut matched: Option<(&Unit, u8)> = None;
    'rows: for unit in db.units() {
        for level in 0..=MAX_LEVEL {
            if kind.column(unit, level).to_lowercase() == needle {
                matched = Some((unit, level));
                break 'rows;
            }
        }
    }

    let Some((row, level)) = matched else {
        let suggestions = match kind {
            IdKind::Name => closest_names(db, &needle, 5),
            IdKind::Admin => Vec::new(),
        };
        return Err(Error::NotFound {
            query: identifier.to_string(),
            suggestions,
        });
    };
    let country = row.gid(0).to_string();

    // Every row carrying the identifier at the matched level, across all
    // countries; the ambiguity check for geometry retrieval happens on the
    // caller side.
    let rows: Vec<&Unit> = db
        .units()
        .iter()
        .filter(|unit| kind.column(unit, level).to_lowercase() == needle)
        .collect();

    // Deepest level with any recorded subdivision in the matched subset.
    let max_level = (0..=MAX_LEVEL)
        .rev()
        .find(|&l| rows.iter().any(|unit| !unit.gid(l).is_empty()))
        .unwrap_or(level);

    let mut warnings = Vec::new();
    let mut content_level = requested_level.unwrap_or(level);
    if content_level < level {
        let warning = Warning::LevelTooHigh {
            requested: content_level,
            fallback: level,
        };
        warn!("{warning}");
        warnings.push(warning);
        content_level = level;
    }
    if content_level > max_level {
        let warning = Warning::LevelTooLow {
            requested: content_level,
            fallback: max_level,
        };
        warn!("{warning}");
        warnings.push(warning);
        content_level = max_level;
    }

    Ok(Resolution {
        level,
        country,
        content_level,
        rows,
        warnings,
    })
}

/// Up to `limit` closest names to the (lowercased) needle, drawn from the
/// distinct values of all six name columns. The similarity cutoff is 0.6,
/// like difflib's close matches; candidates come back capitalized in the
/// style of typical entries.
fn closest_names(db: &Database, needle: &str, limit: usize) -> Vec<String> {
    let needle_len = needle.chars().count();
    let mut seen = HashSet::new();
    let mut scored: Vec<(usize, String)> = Vec::new();

    for unit in db.units() {
        for level in 0..=MAX_LEVEL {
            let name = unit.name(level);
            if name.is_empty() {
                continue;
            }
            let lower = name.to_lowercase();
            if !seen.insert(lower.clone()) {
                continue;
            }
            let max_len = needle_len.max(lower.chars().count());
            // similarity >= 0.6 means distance <= 0.4 * max_len
            let cap = max_len * 2 / 5;
            let distance = levenshtein_capped(needle, &lower, cap);
            if distance <= cap {
                scored.push((distance, capitalize(&lower)));
            }
        }
    }

    // Stable sort keeps table order among equally close candidates.
    scored.sort_by_key(|(distance, _)| *distance);
    scored.truncate(limit);
    scored.into_iter().map(|(_, name)| name).collect()
}

/// Levenshtein distance with an early-exit cap; returns `cap + 1` as soon
/// as the distance is known to exceed the cap.
fn levenshtein_capped(a: &str, b: &str, cap: usize) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > cap {
        return cap + 1;
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        let mut row_min = curr[0];
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost)
                .min(prev[j + 1] + 1)
                .min(curr[j] + 1);
            row_min = row_min.min(curr[j + 1]);
        }
        if row_min > cap {
            return cap + 1;
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
