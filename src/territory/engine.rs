//! The two partition pipelines.

use geo::{MultiPolygon, Point, Polygon};
use tracing::{debug, info, warn};

use super::clip::{clip_zones, label_cells};
use super::dissolve::{dissolve_by_zone, ZonePiece};
use super::style::zone_color;
use super::tessellate::{voronoi_cells, MIN_SITES};
use crate::config::EngineConfig;
use crate::mask::{resolve_department_mask, resolve_group_mask, GroupMask, MaskSource, SubRegionIndex};
use crate::models::{
    group_by_sub_region, prepare_points, BoundaryDocument, Facility, LabeledPoint,
    PartitionResult, ZoneFilter, ZonePolygon,
};

/// Fewest qualifying facilities for any partition at all
pub const MIN_TOTAL_SITES: usize = 3;

/// Builds zone territories from facility sites.
///
/// Every call is independent: the result depends only on the arguments and
/// the configuration.
pub struct PartitionEngine {
    config: EngineConfig,
}

impl PartitionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// One diagram over all sites, clipped to the largest shape of the
    /// department boundary document.
    pub fn partition_department(
        &self,
        facilities: &[Facility],
        boundaries: &BoundaryDocument,
        filter: &ZoneFilter,
    ) -> PartitionResult {
        let points = prepare_points(facilities);
        if points.len() < MIN_TOTAL_SITES {
            info!("Only {} usable facilities, nothing to partition", points.len());
            return PartitionResult::empty();
        }

        let Some(mask) = resolve_department_mask(boundaries) else {
            warn!("No usable department boundary");
            return PartitionResult::empty();
        };

        let zones = self.finish(self.clip_group(&points, Some(&mask), filter));

        info!("Partitioned {} facilities into {} zones", points.len(), zones.len());

        PartitionResult {
            zones,
            mask: Some(MultiPolygon::new(vec![mask])),
        }
    }

    /// One diagram per sub-region, each clipped to that sub-region's
    /// boundary, then zones spanning several sub-regions merged.
    pub fn partition_by_sub_region(
        &self,
        facilities: &[Facility],
        sub_regions: &SubRegionIndex,
        filter: &ZoneFilter,
    ) -> PartitionResult {
        let points = prepare_points(facilities);
        if points.len() < MIN_TOTAL_SITES {
            info!("Only {} usable facilities, nothing to partition", points.len());
            return PartitionResult::empty();
        }

        let groups = group_by_sub_region(&points);
        let mut regional: Vec<ZonePiece> = Vec::new();
        let mut masks: Vec<Polygon<f64>> = Vec::new();

        for (label, group) in &groups {
            if group.len() < MIN_SITES {
                debug!("Sub-region '{}' has a single site, skipped", label);
                continue;
            }

            let mask = match resolve_group_mask(sub_regions, label, group) {
                GroupMask::Clean { polygon, source } => {
                    match &source {
                        MaskSource::Exact(_) => {}
                        MaskSource::Substring(found) => {
                            debug!("Sub-region '{}' matched boundary '{}'", label, found)
                        }
                        MaskSource::ConvexHull => {
                            warn!("No boundary for sub-region '{}', using hull of its sites", label)
                        }
                    }
                    Some(polygon)
                }
                GroupMask::Unusable { source } => {
                    warn!(
                        "Boundary for sub-region '{}' ({:?}) unusable after repair, cells left uncut",
                        label, source
                    );
                    None
                }
                GroupMask::Unresolved => {
                    warn!("No boundary for sub-region '{}' and no hull, skipped", label);
                    continue;
                }
            };

            regional.extend(self.clip_group(group, mask.as_ref(), filter));
            masks.extend(mask);
        }

        let zones = self.finish(dissolve_by_zone(regional));

        info!(
            "Partitioned {} facilities in {} sub-regions into {} zones",
            points.len(),
            groups.len(),
            zones.len()
        );

        PartitionResult {
            zones,
            mask: (!masks.is_empty()).then(|| MultiPolygon::new(masks)),
        }
    }

    /// One clipped piece per zone of the group
    fn clip_group(
        &self,
        points: &[LabeledPoint],
        mask: Option<&Polygon<f64>>,
        filter: &ZoneFilter,
    ) -> Vec<ZonePiece> {
        let sites: Vec<Point<f64>> = points.iter().map(|p| p.position).collect();
        let cells = voronoi_cells(&sites, &self.config.tessellation.bbox_rect());
        clip_zones(label_cells(points, cells, filter), mask)
    }

    fn finish(&self, pieces: Vec<ZonePiece>) -> Vec<ZonePolygon> {
        pieces
            .into_iter()
            .map(|piece| ZonePolygon {
                color: zone_color(&piece.zone, &self.config.style),
                zone: piece.zone,
                geometry: piece.geometry,
            })
            .collect()
    }
}

impl Default for PartitionEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
