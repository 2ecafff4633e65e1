//! GeoJSON payloads of the boundary service.
//!
//! The per-level files are feature collections whose properties hold a
//! subset of the `GID_k`/`NAME_k` columns plus an ad-hoc `COUNTRY` field in
//! place of `NAME_0`. Geometries are polygons or multipolygons.

use std::collections::HashMap;

use geo_types::{Coord, Geometry, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use serde_json::Value;

use crate::database::{Unit, MAX_LEVEL};

/// A boundary feature collection as served by GADM.
#[derive(Debug, Deserialize)]
pub struct RawCollection {
    #[serde(default)]
    pub features: Vec<RawFeature>,
}

/// One feature: flat properties plus a geometry payload.
#[derive(Debug, Deserialize)]
pub struct RawFeature {
    #[serde(default)]
    pub properties: HashMap<String, Value>,
    pub geometry: RawGeometry,
}

/// Geometry member of a feature, kept raw until conversion.
#[derive(Debug, Deserialize)]
pub struct RawGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Value,
}

impl RawGeometry {
    /// Convert into a typed geometry. Anything other than a polygon or
    /// multipolygon is treated as a parse failure.
    pub fn into_geometry(self) -> Result<Geometry<f64>, String> {
        match self.kind.as_str() {
            "Polygon" => Ok(Geometry::Polygon(parse_polygon(&self.coordinates)?)),
            "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_multi_polygon(
                &self.coordinates,
            )?)),
            other => Err(format!("unsupported geometry type: {other}")),
        }
    }
}

/// Build a reference-table row from feature properties, renaming the
/// service's `COUNTRY` field to the canonical `NAME_0` column.
pub fn unit_from_properties(properties: &HashMap<String, Value>) -> Unit {
    let get = |key: &str| {
        properties
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let mut unit = Unit::default();
    unit.set_gid(0, get("GID_0"));
    unit.set_name(0, get("COUNTRY"));
    for level in 1..=MAX_LEVEL {
        unit.set_gid(level, get(&format!("GID_{level}")));
        unit.set_name(level, get(&format!("NAME_{level}")));
    }
    unit
}

fn parse_coord(value: &Value) -> Result<Coord<f64>, String> {
    let pair = value.as_array().ok_or("coordinate is not an array")?;
    let x = pair
        .first()
        .and_then(Value::as_f64)
        .ok_or("missing longitude")?;
    let y = pair
        .get(1)
        .and_then(Value::as_f64)
        .ok_or("missing latitude")?;
    Ok(Coord { x, y })
}

fn parse_ring(value: &Value) -> Result<LineString<f64>, String> {
    let coords = value
        .as_array()
        .ok_or("ring is not an array")?
        .iter()
        .map(parse_coord)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(LineString::new(coords))
}

fn parse_polygon(value: &Value) -> Result<Polygon<f64>, String> {
    let rings = value.as_array().ok_or("polygon is not an array")?;
    let mut rings = rings.iter();
    let exterior = parse_ring(rings.next().ok_or("polygon without exterior ring")?)?;
    let interiors = rings.map(parse_ring).collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn parse_multi_polygon(value: &Value) -> Result<MultiPolygon<f64>, String> {
    let polygons = value
        .as_array()
        .ok_or("multipolygon is not an array")?
        .iter()
        .map(parse_polygon)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MultiPolygon::new(polygons))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(json: &str) -> RawFeature {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_polygon_feature() {
        let raw = feature(
            r#"{
                "properties": {"GID_0": "SGP", "COUNTRY": "Singapore"},
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[103.6, 1.2], [104.0, 1.2], [104.0, 1.5], [103.6, 1.2]]]
                }
            }"#,
        );
        let geometry = raw.geometry.into_geometry().unwrap();
        let Geometry::Polygon(polygon) = geometry else {
            panic!("expected polygon");
        };
        assert_eq!(polygon.exterior().0.len(), 4);
    }

    #[test]
    fn test_parse_multi_polygon_feature() {
        let raw = feature(
            r#"{
                "properties": {},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]],
                        [[[2.0, 2.0], [3.0, 2.0], [3.0, 3.0], [2.0, 2.0]]]
                    ]
                }
            }"#,
        );
        let Geometry::MultiPolygon(multi) = raw.geometry.into_geometry().unwrap() else {
            panic!("expected multipolygon");
        };
        assert_eq!(multi.0.len(), 2);
    }

    #[test]
    fn test_unsupported_geometry_rejected() {
        let raw = feature(
            r#"{
                "properties": {},
                "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}
            }"#,
        );
        assert!(raw.geometry.into_geometry().is_err());
    }

    #[test]
    fn test_country_renamed_to_name_0() {
        let raw = feature(
            r#"{
                "properties": {
                    "GID_0": "SGP",
                    "COUNTRY": "Singapore",
                    "GID_1": "SGP.1_1",
                    "NAME_1": "Central"
                },
                "geometry": {"type": "Polygon", "coordinates": []}
            }"#,
        );
        let unit = unit_from_properties(&raw.properties);
        assert_eq!(unit.name(0), "Singapore");
        assert_eq!(unit.gid(0), "SGP");
        assert_eq!(unit.name(1), "Central");
        assert_eq!(unit.name(2), "");
    }
}
