//! Boundary geometry retrieval and multi-identifier batching.
//!
//! A single identifier resolves to one (country, level) boundary file on
//! the GADM server; lists of identifiers and continent aliases fan out into
//! several single resolutions whose results are concatenated in pairing
//! order.

use once_cell::sync::Lazy;
use tracing::warn;

use crate::continent::continent_countries;
use crate::database::Unit;
use crate::error::{Error, Warning};
use crate::fetch::{boundary_url, BoundaryClient};
use crate::geojson::{unit_from_properties, RawCollection};
use crate::names;
use crate::resolver::IdKind;

/// Lookup request for [`items`].
///
/// Identifiers may be single values or ordered lists; name and admin are
/// mutually exclusive. A single name matching a continent alias expands to
/// that continent's country codes.
#[derive(Debug, Clone, Default)]
pub struct ItemsQuery {
    pub names: Vec<String>,
    pub admins: Vec<String>,
    pub content_level: Option<u8>,
}

impl ItemsQuery {
    /// Request one area by name.
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            names: vec![name.into()],
            ..Self::default()
        }
    }

    /// Request several areas by name, order preserved.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Request one area by GADM code.
    pub fn admin(code: impl Into<String>) -> Self {
        Self {
            admins: vec![code.into()],
            ..Self::default()
        }
    }

    /// Request several areas by GADM code, order preserved.
    pub fn admins<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            admins: codes.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Request a specific level for the returned features.
    pub fn at_level(mut self, level: u8) -> Self {
        self.content_level = Some(level);
        self
    }
}

/// One administrative boundary with its full name/code hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub unit: Unit,
    pub geometry: geo_types::Geometry<f64>,
}

/// Ordered set of boundary features returned by [`items`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    features: Vec<Feature>,
    warnings: Vec<Warning>,
}

impl FeatureCollection {
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Advisory notices collected across all sub-requests.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub(crate) fn push_warning(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    fn merge(&mut self, other: FeatureCollection) {
        self.features.extend(other.features);
        self.warnings.extend(other.warnings);
    }
}

static CLIENT: Lazy<BoundaryClient> = Lazy::new(BoundaryClient::new);

/// Retrieve the requested administrative boundaries.
///
/// The area level is identified on the fly, the matching per-level boundary
/// file is fetched (cached by URL), and the reference table's canonical
/// names overwrite the feed's inconsistent casing.
pub fn items(query: &ItemsQuery) -> Result<FeatureCollection, Error> {
    items_with_client(&CLIENT, query)
}

pub(crate) fn items_with_client(
    client: &BoundaryClient,
    query: &ItemsQuery,
) -> Result<FeatureCollection, Error> {
    let (names, admins) = expand(query)?;

    let mut collections = Vec::new();
    for admin in &admins {
        for name in &names {
            collections.push(single(client, name, admin, query.content_level)?);
        }
    }

    // A single pair comes back unmodified; concatenation only runs for
    // actual batches.
    let mut collections = collections.into_iter();
    let mut merged = collections.next().unwrap_or_default();
    for collection in collections {
        merged.merge(collection);
    }
    Ok(merged)
}

/// Normalize the name/admin slots for pairing. Empty slots become the
/// single `""` placeholder so the Cartesian product degenerates to the
/// non-empty list; a lone continent name swaps into the admin slot.
fn expand(query: &ItemsQuery) -> Result<(Vec<String>, Vec<String>), Error> {
    let mut names = if query.names.is_empty() {
        vec![String::new()]
    } else {
        query.names.clone()
    };
    let mut admins = if query.admins.is_empty() {
        vec![String::new()]
    } else {
        query.admins.clone()
    };

    if names.iter().all(String::is_empty) && admins.iter().all(String::is_empty) {
        return Err(Error::MissingArgs);
    }

    if names.len() == 1 {
        if let Some(countries) = continent_countries(&names[0]) {
            admins = countries.to_vec();
            names = vec![String::new()];
        }
    }

    Ok((names, admins))
}

fn single(
    client: &BoundaryClient,
    name: &str,
    admin: &str,
    content_level: Option<u8>,
) -> Result<FeatureCollection, Error> {
    let name = (!name.is_empty()).then_some(name);
    let admin = (!admin.is_empty()).then_some(admin);

    // Level left unset so duplicate names across countries surface before
    // any network traffic.
    let probe = names::build(name, admin, None)?;
    if probe.len() > 1 {
        return Err(Error::Ambiguous {
            name: name.or(admin).unwrap_or_default().to_string(),
            count: probe.len(),
        });
    }
    let level = probe.content_level();
    let country = match probe.rows().first() {
        Some(row) => row.gid(0).to_string(),
        None => {
            return Err(Error::NotFound {
                query: name.or(admin).unwrap_or_default().to_string(),
                suggestions: Vec::new(),
            })
        }
    };

    // Second pass with the real requested level for the clamped value.
    let table = names::build(name, admin, content_level)?;
    let content = table.content_level();
    let warnings = table.warnings().to_vec();

    let url = boundary_url(&country, content);
    let body = client.get(&url)?;
    let raw: RawCollection = serde_json::from_str(&body).map_err(|e| Error::Fetch {
        url: url.clone(),
        reason: e.to_string(),
    })?;

    let kind = if name.is_some() {
        IdKind::Name
    } else {
        IdKind::Admin
    };
    let needle = name.or(admin).unwrap_or_default().to_lowercase();

    let mut features = Vec::new();
    for feature in raw.features {
        let unit = unit_from_properties(&feature.properties);
        let column = match kind {
            IdKind::Name => unit.name(level),
            IdKind::Admin => unit.gid(level),
        };
        if column.to_lowercase() != needle {
            continue;
        }
        let geometry = feature.geometry.into_geometry().map_err(|reason| Error::Fetch {
            url: url.clone(),
            reason,
        })?;
        features.push(Feature { unit, geometry });
    }

    // The feed's name casing is unreliable; the reference table is
    // authoritative up to the content level. The feed lists features in
    // table order, so the overwrite is positional.
    for (feature, row) in features.iter_mut().zip(table.rows()) {
        for l in 0..=content {
            feature.unit.set_name(l, row.name(l).to_string());
        }
    }

    if features.is_empty() {
        warn!(%url, "no feature left after filtering");
    }

    Ok(FeatureCollection { features, warnings })
}
