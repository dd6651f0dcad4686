//! Boundary selection: which shape a group of cells is clipped against.

use geo::{Area, ConvexHull, MultiPoint, MultiPolygon, Point, Polygon};
use hashbrown::HashMap;
use tracing::{debug, info};

use super::repair::clean_mask;
use crate::config::BoundaryConfig;
use crate::geometry;
use crate::models::{BoundaryDocument, Feature, LabeledPoint};

/// Department mask: the largest shape of the document, cleaned.
pub fn resolve_department_mask(document: &BoundaryDocument) -> Option<Polygon<f64>> {
    let largest = geometry::largest(document.polygons())?;
    clean_mask(&MultiPolygon::new(vec![largest]))
}

/// How a sub-region boundary was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaskSource {
    /// Boundary label equal to the sub-region label
    Exact(String),
    /// Boundary label containing, or contained in, the sub-region label
    Substring(String),
    /// No boundary; hull of the group's own sites
    ConvexHull,
}

/// Mask resolution for one sub-region group
#[derive(Debug, Clone)]
pub enum GroupMask {
    Clean {
        polygon: Polygon<f64>,
        source: MaskSource,
    },
    /// A boundary was found but nothing survived repair; cells stay uncut
    Unusable { source: MaskSource },
    /// No boundary and no usable hull; the group is skipped
    Unresolved,
}

pub struct BoundaryMatch<'a> {
    pub label: &'a str,
    pub shape: &'a MultiPolygon<f64>,
    pub exact: bool,
}

/// Sub-region boundaries by label, in document order.
#[derive(Debug, Clone, Default)]
pub struct SubRegionIndex {
    entries: Vec<(String, MultiPolygon<f64>)>,
    by_label: HashMap<String, usize>,
}

impl SubRegionIndex {
    pub fn from_document(document: &BoundaryDocument, config: &BoundaryConfig) -> Self {
        let mut index = Self::default();
        let mut filtered = 0usize;

        for feature in &document.features {
            if !in_department(feature, config) {
                filtered += 1;
                continue;
            }
            let Some(label) = feature.label(&config.sub_region_key) else {
                continue;
            };
            let Some(geometry) = &feature.geometry else {
                continue;
            };
            let shape = geometry.to_multi_polygon();
            if shape.0.is_empty() {
                debug!("Boundary '{}' has no areal geometry", label);
                continue;
            }
            index.insert(label, shape);
        }

        info!(
            "Indexed {} sub-region boundaries ({} outside department)",
            index.len(),
            filtered
        );
        index
    }

    /// Add a boundary. A repeated label replaces the earlier shape but keeps
    /// its position in iteration order.
    pub fn insert(&mut self, label: impl Into<String>, shape: MultiPolygon<f64>) {
        let label = label.into();
        if label.is_empty() {
            return;
        }
        match self.by_label.get(&label) {
            Some(&slot) => self.entries[slot].1 = shape,
            None => {
                self.by_label.insert(label.clone(), self.entries.len());
                self.entries.push((label, shape));
            }
        }
    }

    /// Exact label first, then the first boundary (in document order) whose
    /// label contains or is contained in `label`.
    ///
    /// The substring fallback is a loose heuristic: "STRASBOURG 1" also
    /// matches "IEN STRASBOURG 10" if that one comes first.
    pub fn lookup(&self, label: &str) -> Option<BoundaryMatch<'_>> {
        if let Some(&slot) = self.by_label.get(label) {
            let (name, shape) = &self.entries[slot];
            return Some(BoundaryMatch {
                label: name,
                shape,
                exact: true,
            });
        }
        if label.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(name, _)| label.contains(name.as_str()) || name.contains(label))
            .map(|(name, shape)| BoundaryMatch {
                label: name,
                shape,
                exact: false,
            })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Department filter. Without a configured code every feature passes.
fn in_department(feature: &Feature, config: &BoundaryConfig) -> bool {
    let Some(code) = &config.department_code else {
        return true;
    };
    let by_key = config
        .department_keys
        .iter()
        .any(|key| feature.label(key).as_deref() == Some(code.as_str()));
    if by_key {
        return true;
    }
    let prefix = format!("{:0>3}", code);
    feature
        .label(&config.district_code_key)
        .is_some_and(|district| district.starts_with(&prefix))
}

/// Hull of the sites, or `None` when they do not span an area
pub fn convex_hull(points: &[LabeledPoint]) -> Option<Polygon<f64>> {
    let sites: Vec<Point<f64>> = points.iter().map(|p| p.position).collect();
    let hull = MultiPoint::new(sites).convex_hull();
    (hull.unsigned_area() > 0.0).then_some(hull)
}

pub fn resolve_group_mask(
    index: &SubRegionIndex,
    label: &str,
    points: &[LabeledPoint],
) -> GroupMask {
    let (shape, source) = match index.lookup(label) {
        Some(found) => {
            let source = if found.exact {
                MaskSource::Exact(found.label.to_string())
            } else {
                MaskSource::Substring(found.label.to_string())
            };
            (found.shape.clone(), source)
        }
        None => match convex_hull(points) {
            Some(hull) => (MultiPolygon::new(vec![hull]), MaskSource::ConvexHull),
            None => return GroupMask::Unresolved,
        },
    };

    match clean_mask(&shape) {
        Some(polygon) => GroupMask::Clean { polygon, source },
        None => GroupMask::Unusable { source },
    }
}
