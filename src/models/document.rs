//! Boundary documents: GeoJSON feature collections.
//!
//! Only what the partitioning needs is modelled. Positions may carry an
//! altitude, which is ignored.

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ZoneMapError};

pub type Position = Vec<f64>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionKind {
    #[default]
    FeatureCollection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureKind {
    #[default]
    Feature,
}

/// A GeoJSON `FeatureCollection`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundaryDocument {
    #[serde(rename = "type")]
    pub kind: CollectionKind,
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type", default)]
    pub kind: FeatureKind,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl BoundaryDocument {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: CollectionKind::FeatureCollection,
            features,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        match value.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => Ok(serde_json::from_value(value)?),
            // A bare feature is accepted as a collection of one
            Some("Feature") => Ok(Self::new(vec![serde_json::from_value(value)?])),
            Some(other) => Err(ZoneMapError::InvalidDocument(format!(
                "expected a FeatureCollection, found {}",
                other
            ))),
            None => Err(ZoneMapError::InvalidDocument(
                "missing \"type\" member".to_string(),
            )),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Every areal shape in document order, with multi-parts split and
    /// line boundaries closed into polygons.
    pub fn polygons(&self) -> Vec<Polygon<f64>> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .flat_map(Geometry::polygons)
            .collect()
    }
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            kind: FeatureKind::Feature,
            geometry: Some(geometry),
            properties: Some(properties),
        }
    }

    /// Property value as a non-empty string; numbers are stringified.
    pub fn label(&self, key: &str) -> Option<String> {
        let value = self.properties.as_ref()?.get(key)?;
        let label = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        (!label.is_empty()).then_some(label)
    }
}

impl Geometry {
    /// Flatten into polygons. Points yield nothing; line strings with at
    /// least three positions are closed.
    pub fn polygons(&self) -> Vec<Polygon<f64>> {
        match self {
            Geometry::Point { .. } | Geometry::MultiPoint { .. } => Vec::new(),
            Geometry::LineString { coordinates } => close_line(coordinates).into_iter().collect(),
            Geometry::MultiLineString { coordinates } => {
                coordinates.iter().filter_map(|l| close_line(l)).collect()
            }
            Geometry::Polygon { coordinates } => polygon_from_rings(coordinates).into_iter().collect(),
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .filter_map(|rings| polygon_from_rings(rings))
                .collect(),
            Geometry::GeometryCollection { geometries } => {
                geometries.iter().flat_map(Geometry::polygons).collect()
            }
        }
    }

    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(self.polygons())
    }
}

impl From<&Polygon<f64>> for Geometry {
    fn from(polygon: &Polygon<f64>) -> Self {
        Geometry::Polygon {
            coordinates: polygon_positions(polygon),
        }
    }
}

impl From<&MultiPolygon<f64>> for Geometry {
    fn from(multi: &MultiPolygon<f64>) -> Self {
        Geometry::MultiPolygon {
            coordinates: multi.iter().map(polygon_positions).collect(),
        }
    }
}

fn to_coords(positions: &[Position]) -> Vec<Coord<f64>> {
    positions
        .iter()
        .filter(|p| p.len() >= 2)
        .map(|p| Coord { x: p[0], y: p[1] })
        .collect()
}

fn close_line(positions: &[Position]) -> Option<Polygon<f64>> {
    let coords = to_coords(positions);
    if coords.len() < 3 {
        return None;
    }
    // Polygon::new closes the ring
    Some(Polygon::new(LineString::new(coords), vec![]))
}

fn polygon_from_rings(rings: &[Vec<Position>]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    let exterior = to_coords(exterior);
    if exterior.len() < 3 {
        return None;
    }
    let interiors = interiors
        .iter()
        .map(|r| to_coords(r))
        .filter(|r| r.len() >= 3)
        .map(LineString::new)
        .collect();
    Some(Polygon::new(LineString::new(exterior), interiors))
}

fn ring_positions(ring: &LineString<f64>) -> Vec<Position> {
    ring.coords().map(|c| vec![c.x, c.y]).collect()
}

fn polygon_positions(polygon: &Polygon<f64>) -> Vec<Vec<Position>> {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .map(ring_positions)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"circo_nom": "IEN STRASBOURG 1", "code_dept": 67},
                "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[7.0, 48.0], [8.0, 48.0], [8.0, 49.0], [7.0, 49.0], [7.0, 48.0]]],
                    [[[8.5, 48.0], [8.6, 48.0], [8.6, 48.1], [8.5, 48.0]]]
                ]}
            },
            {
                "type": "Feature",
                "properties": null,
                "geometry": {"type": "LineString", "coordinates": [[7.0, 48.0, 150.0], [7.5, 48.0], [7.5, 48.5]]}
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": {"type": "Point", "coordinates": [7.2, 48.2]}
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn test_parse_and_flatten() {
        let doc = BoundaryDocument::from_json(SAMPLE).unwrap();
        assert_eq!(doc.features.len(), 4);

        // Two parts of the multipolygon plus the closed line string
        let polygons = doc.polygons();
        assert_eq!(polygons.len(), 3);
        let closed = &polygons[2];
        assert_eq!(closed.exterior().0.first(), closed.exterior().0.last());
    }

    #[test]
    fn test_labels() {
        let doc = BoundaryDocument::from_json(SAMPLE).unwrap();
        assert_eq!(
            doc.features[0].label("circo_nom").as_deref(),
            Some("IEN STRASBOURG 1")
        );
        assert_eq!(doc.features[0].label("code_dept").as_deref(), Some("67"));
        assert_eq!(doc.features[1].label("circo_nom"), None);
    }

    #[test]
    fn test_bare_feature_is_a_collection_of_one() {
        let doc = BoundaryDocument::from_json(
            r#"{"type": "Feature", "properties": {}, "geometry":
                {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}}"#,
        )
        .unwrap();
        assert_eq!(doc.polygons().len(), 1);
    }

    #[test]
    fn test_rejects_other_documents() {
        assert!(BoundaryDocument::from_json(r#"{"type": "Topology"}"#).is_err());
        assert!(BoundaryDocument::from_json(r#"{"features": []}"#).is_err());
        assert!(BoundaryDocument::from_json("not json").is_err());
    }

    #[test]
    fn test_serialized_geometry_is_geojson() {
        let square = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
            vec![],
        );
        let geometry = Geometry::from(&MultiPolygon::new(vec![square]));
        let value = serde_json::to_value(&geometry).unwrap();
        assert_eq!(value["type"], "MultiPolygon");
        assert_eq!(value["coordinates"][0][0].as_array().unwrap().len(), 5);
    }
}
