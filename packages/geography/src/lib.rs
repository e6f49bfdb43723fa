#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Borough boundary polygons and the choropleth join.
//!
//! Boundaries are read once from a `GeoJSON` `FeatureCollection` in which
//! every feature names its borough in the [`BOROUGH_NAME_PROPERTY`]
//! property. The choropleth renderer needs both the boundaries and the
//! per-borough crash counts; [`join_counts`] is that join point.

use std::collections::BTreeMap;
use std::path::Path;

use geo::{BoundingRect, MultiPolygon};
use geojson::{Feature, GeoJson};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Feature property holding the borough name.
pub const BOROUGH_NAME_PROPERTY: &str = "boro_name";

/// Errors that can occur while loading boundary data.
#[derive(Debug, Error)]
pub enum GeographyError {
    /// I/O error reading the boundary file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid `GeoJSON`.
    #[error("GeoJSON parse error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The document parsed but has the wrong shape.
    #[error("Invalid boundary data: {message}")]
    Invalid {
        /// Description of what went wrong.
        message: String,
    },
}

/// An axis-aligned bounding box in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingBox {
    /// Minimum longitude.
    pub west: f64,
    /// Minimum latitude.
    pub south: f64,
    /// Maximum longitude.
    pub east: f64,
    /// Maximum latitude.
    pub north: f64,
}

impl BoundingBox {
    /// Grows this box to also cover `other`.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }
}

/// One borough's outline.
#[derive(Debug, Clone)]
pub struct BoroughBoundary {
    /// Borough name as given by the boundary data (e.g. `"Staten Island"`).
    pub name: String,
    /// Borough outline. Single polygons are stored as one-member
    /// multipolygons.
    pub polygon: MultiPolygon<f64>,
}

/// All borough outlines, in document order.
#[derive(Debug, Clone, Default)]
pub struct BoroughBoundaries {
    boundaries: Vec<BoroughBoundary>,
}

impl BoroughBoundaries {
    /// Parses a `GeoJSON` `FeatureCollection` of borough outlines.
    ///
    /// Features without a name or without polygonal geometry are skipped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`GeographyError`] if the document is not valid `GeoJSON` or
    /// is not a `FeatureCollection`.
    pub fn parse(geojson_str: &str) -> Result<Self, GeographyError> {
        let geojson: GeoJson = geojson_str.parse()?;

        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(GeographyError::Invalid {
                message: "expected a FeatureCollection".to_string(),
            });
        };

        let boundaries: Vec<BoroughBoundary> = collection
            .features
            .iter()
            .enumerate()
            .filter_map(|(i, feature)| {
                let boundary = feature_to_boundary(feature);
                if boundary.is_none() {
                    log::warn!("Skipping boundary feature {i}: missing name or polygon geometry");
                }
                boundary
            })
            .collect();

        log::info!("Loaded {} borough boundaries", boundaries.len());

        Ok(Self { boundaries })
    }

    /// Reads and parses a boundary file.
    ///
    /// # Errors
    ///
    /// Returns [`GeographyError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, GeographyError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Returns the boundaries in document order.
    #[must_use]
    pub fn boundaries(&self) -> &[BoroughBoundary] {
        &self.boundaries
    }

    /// Returns the borough names in document order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.boundaries.iter().map(|b| b.name.as_str()).collect()
    }

    /// Number of boroughs with an outline.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    /// Returns `true` if no outline was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Bounding box of all outlines, used by renderers to fit the map
    /// projection. `None` when there are no outlines.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.boundaries
            .iter()
            .filter_map(|b| b.polygon.bounding_rect())
            .map(|rect| BoundingBox {
                west: rect.min().x,
                south: rect.min().y,
                east: rect.max().x,
                north: rect.max().y,
            })
            .reduce(BoundingBox::union)
    }
}

fn feature_to_boundary(feature: &Feature) -> Option<BoroughBoundary> {
    let name = feature
        .property(BOROUGH_NAME_PROPERTY)
        .and_then(serde_json::Value::as_str)?
        .trim();
    if name.is_empty() {
        return None;
    }

    let geometry = feature.geometry.clone()?;
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    let polygon = match geo_geom {
        geo::Geometry::MultiPolygon(mp) => mp,
        geo::Geometry::Polygon(p) => MultiPolygon(vec![p]),
        _ => return None,
    };

    Some(BoroughBoundary {
        name: name.to_string(),
        polygon,
    })
}

/// A borough outline paired with its crash count, ready for a choropleth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoroughShade {
    /// Borough name from the boundary data.
    pub name: String,
    /// Crashes in the working set attributed to this borough.
    pub count: u64,
}

/// Joins per-borough counts onto the boundary outlines.
///
/// Every outline yields exactly one shade, in boundary order. Names are
/// matched exactly first and then ignoring ASCII case, since the crash
/// dataset spells boroughs in upper case (`"STATEN ISLAND"`) while boundary
/// files use title case (`"Staten Island"`). Boroughs with no crashes get
/// a count of zero.
#[must_use]
pub fn join_counts(
    boundaries: &BoroughBoundaries,
    counts: &BTreeMap<String, u64>,
) -> Vec<BoroughShade> {
    boundaries
        .boundaries()
        .iter()
        .map(|boundary| {
            let count = counts.get(&boundary.name).copied().unwrap_or_else(|| {
                counts
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(&boundary.name))
                    .map_or(0, |(_, count)| *count)
            });
            BoroughShade {
                name: boundary.name.clone(),
                count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "boro_name": "Bronx" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-73.9, 40.8], [-73.8, 40.8], [-73.8, 40.9], [-73.9, 40.9], [-73.9, 40.8]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "boro_name": "Queens" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[-73.8, 40.6], [-73.7, 40.6], [-73.7, 40.7], [-73.8, 40.7], [-73.8, 40.6]]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "boro_name": "Nowhere" },
                "geometry": { "type": "Point", "coordinates": [-74.0, 40.0] }
            }
        ]
    }"#;

    #[test]
    fn parses_polygon_and_multipolygon_features() {
        let boundaries = BoroughBoundaries::parse(BOUNDARIES).unwrap();
        assert_eq!(boundaries.names(), vec!["Bronx", "Queens"]);
    }

    #[test]
    fn rejects_non_collection() {
        let result = BoroughBoundaries::parse(r#"{"type": "Point", "coordinates": [0.0, 0.0]}"#);
        assert!(matches!(result, Err(GeographyError::Invalid { .. })));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            BoroughBoundaries::parse("{not json"),
            Err(GeographyError::GeoJson(_))
        ));
    }

    #[test]
    fn bounding_box_covers_all_outlines() {
        let bbox = BoroughBoundaries::parse(BOUNDARIES)
            .unwrap()
            .bounding_box()
            .unwrap();
        assert!((bbox.west - -73.9).abs() < f64::EPSILON);
        assert!((bbox.east - -73.7).abs() < f64::EPSILON);
        assert!((bbox.south - 40.6).abs() < f64::EPSILON);
        assert!((bbox.north - 40.9).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_boundaries_have_no_bbox() {
        assert!(BoroughBoundaries::default().bounding_box().is_none());
    }

    #[test]
    fn join_matches_case_insensitively_and_fills_zero() {
        let boundaries = BoroughBoundaries::parse(BOUNDARIES).unwrap();
        let counts = BTreeMap::from([("BRONX".to_string(), 2), ("MANHATTAN".to_string(), 7)]);

        let shades = join_counts(&boundaries, &counts);

        assert_eq!(
            shades,
            vec![
                BoroughShade {
                    name: "Bronx".to_string(),
                    count: 2,
                },
                BoroughShade {
                    name: "Queens".to_string(),
                    count: 0,
                },
            ]
        );
    }

    #[test]
    fn join_prefers_exact_match() {
        let boundaries = BoroughBoundaries::parse(BOUNDARIES).unwrap();
        let counts = BTreeMap::from([("BRONX".to_string(), 2), ("Bronx".to_string(), 5)]);

        let shades = join_counts(&boundaries, &counts);

        assert_eq!(shades[0].count, 5);
    }
}
