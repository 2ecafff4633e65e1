//! Easy access to the administrative boundaries defined by GADM.
//!
//! Resolves a place name or GADM code against the bundled reference table,
//! identifies the hierarchy level on the fly, and returns either the name
//! listing ([`names`]) or the boundary geometries ([`items`]) at a
//! requested content level. The current dataset version (GADM 4.1)
//! delimits 400,276 administrative areas across 6 levels.
//!
//! The data are freely available for academic and other non-commercial
//! use; see the GADM license for redistribution terms.

pub mod continent;
pub mod database;
pub mod error;
pub mod fetch;
pub mod geojson;
pub mod items;
pub mod names;
pub mod resolver;

use tracing::warn;

pub use error::{Error, Warning};
pub use items::{items, Feature, FeatureCollection, ItemsQuery};
pub use names::{names, NameEntry, NameTable, NamesQuery};
pub use resolver::{resolve, IdKind, Resolution};

/// Legacy entry point, kept for backward compatibility.
#[deprecated(since = "0.1.0", note = "use `names` instead")]
pub fn get_names(query: &NamesQuery) -> Result<NameTable, Error> {
    let notice = Warning::Deprecated {
        old: "get_names",
        new: "names",
    };
    warn!("{notice}");
    let mut table = names(query)?;
    table.push_warning(notice);
    Ok(table)
}

/// Legacy entry point, kept for backward compatibility.
#[deprecated(since = "0.1.0", note = "use `items` instead")]
pub fn get_items(query: &ItemsQuery) -> Result<FeatureCollection, Error> {
    let notice = Warning::Deprecated {
        old: "get_items",
        new: "items",
    };
    warn!("{notice}");
    let mut collection = items(query)?;
    collection.push_warning(notice);
    Ok(collection)
}
