//! Partition output types.

use geo::MultiPolygon;
use hashbrown::HashSet;
use serde_json::{Map, Value};

use super::document::{BoundaryDocument, Feature, Geometry};

/// Zones requested for display
#[derive(Debug, Clone, Default)]
pub enum ZoneFilter {
    /// Every zone present in the data
    #[default]
    All,
    Only(HashSet<String>),
}

impl ZoneFilter {
    pub fn only<I, S>(zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ZoneFilter::Only(zones.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, zone: &str) -> bool {
        match self {
            ZoneFilter::All => true,
            ZoneFilter::Only(zones) => zones.contains(zone),
        }
    }
}

/// Feature property holding the zone label in rendered output
pub const ZONE_PROPERTY: &str = "pas";

/// One dissolved territory per zone label
#[derive(Debug, Clone, PartialEq)]
pub struct ZonePolygon {
    pub zone: String,
    /// CSS `hsl(...)` colour
    pub color: String,
    pub geometry: MultiPolygon<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionResult {
    pub zones: Vec<ZonePolygon>,
    /// Mask(s) the cells were clipped against
    pub mask: Option<MultiPolygon<f64>>,
}

impl PartitionResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zone(&self, name: &str) -> Option<&ZonePolygon> {
        self.zones.iter().find(|z| z.zone == name)
    }

    /// Zones as GeoJSON features carrying `pas` (the zone label) and `color`
    /// properties
    pub fn to_feature_collection(&self) -> BoundaryDocument {
        let features = self
            .zones
            .iter()
            .map(|z| {
                let mut properties = Map::new();
                properties.insert(ZONE_PROPERTY.to_string(), Value::String(z.zone.clone()));
                properties.insert("color".to_string(), Value::String(z.color.clone()));
                Feature::new(Geometry::from(&z.geometry), properties)
            })
            .collect();
        BoundaryDocument::new(features)
    }
}
