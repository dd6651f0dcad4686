//! Facility records and the labeled sites derived from them.

use geo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

/// A school as handed over by the ingestion side.
///
/// Numeric fields are already normalised; anything unparseable arrives as 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Facility {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub latitude: f64,
    /// Support-zone label
    #[serde(default)]
    pub zone: String,
    /// Sub-region label; empty when unknown
    #[serde(default)]
    pub sub_region: String,
}

/// A tessellation site: position plus the labels carried into clipping.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledPoint {
    pub position: Point<f64>,
    pub zone: String,
    pub sub_region: String,
}

impl Facility {
    pub fn new(
        id: impl Into<String>,
        longitude: f64,
        latitude: f64,
        zone: impl Into<String>,
        sub_region: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            longitude,
            latitude,
            zone: zone.into(),
            sub_region: sub_region.into(),
        }
    }

    /// Parse a JSON array of facilities
    pub fn list_from_json(json: &str) -> Result<Vec<Facility>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Both coordinates set and a zone assigned
    pub fn qualifies(&self) -> bool {
        let located = |v: f64| v != 0.0 && v.is_finite();
        located(self.longitude) && located(self.latitude) && !self.zone.is_empty()
    }

    pub fn labeled_point(&self) -> Option<LabeledPoint> {
        if !self.qualifies() {
            return None;
        }
        Some(LabeledPoint {
            position: Point::new(self.longitude, self.latitude),
            zone: self.zone.clone(),
            sub_region: self.sub_region.clone(),
        })
    }
}

/// Sites for every qualifying facility, in input order.
pub fn prepare_points(facilities: &[Facility]) -> Vec<LabeledPoint> {
    facilities
        .iter()
        .filter_map(Facility::labeled_point)
        .collect()
}

/// Group sites by sub-region label.
///
/// Groups come out in label order and keep input order inside each group.
/// The empty label is a group of its own.
pub fn group_by_sub_region(points: &[LabeledPoint]) -> BTreeMap<String, Vec<LabeledPoint>> {
    let mut groups: BTreeMap<String, Vec<LabeledPoint>> = BTreeMap::new();
    for point in points {
        groups
            .entry(point.sub_region.clone())
            .or_default()
            .push(point.clone());
    }
    groups
}
