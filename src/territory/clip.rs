//! Clipping zone territories to their mask.
//!
//! Cells are dissolved per zone before the cut so that neighbouring cells of
//! a zone share one intersection and come out as a single shape.

use geo::{MultiPolygon, Polygon};
use tracing::{debug, warn};

use super::dissolve::{dissolve_by_zone, ZonePiece};
use crate::geometry::{self, GeometryOutcome};
use crate::models::{LabeledPoint, ZoneFilter};

/// Attach each cell to its site's zone.
///
/// Cells that are missing, or whose zone is filtered out, are skipped.
pub fn label_cells(
    points: &[LabeledPoint],
    cells: Vec<Option<Polygon<f64>>>,
    filter: &ZoneFilter,
) -> Vec<ZonePiece> {
    points
        .iter()
        .zip(cells)
        .filter_map(|(point, cell)| {
            let cell = cell?;
            filter.contains(&point.zone).then(|| ZonePiece {
                zone: point.zone.clone(),
                geometry: MultiPolygon::new(vec![cell]),
            })
        })
        .collect()
}

/// Dissolve `cells` per zone and cut each zone to `mask`.
///
/// A zone lying entirely outside the mask is dropped. Without a mask the
/// zones are kept uncut. When the cut of a whole zone fails, its cells are
/// cut one by one instead and any cell that still fails is kept uncut.
pub fn clip_zones(cells: Vec<ZonePiece>, mask: Option<&Polygon<f64>>) -> Vec<ZonePiece> {
    let Some(mask) = mask else {
        return dissolve_by_zone(cells);
    };
    let mask = MultiPolygon::new(vec![mask.clone()]);
    let mut result = Vec::new();

    for zone in dissolve_by_zone(cells.iter().cloned()) {
        match geometry::intersect(&zone.geometry, &mask) {
            GeometryOutcome::Done(inter) => result.push(ZonePiece {
                zone: zone.zone,
                geometry: inter,
            }),
            GeometryOutcome::Empty => {
                debug!("Zone '{}' lies outside its mask", zone.zone);
            }
            GeometryOutcome::Failed(reason) => {
                warn!(
                    "Intersection failed for '{}' ({}), cutting its cells one by one",
                    zone.zone, reason
                );
                let pieces = cells
                    .iter()
                    .filter(|cell| cell.zone == zone.zone)
                    .filter_map(|cell| clip_cell(cell, &mask));
                result.extend(dissolve_by_zone(pieces));
            }
        }
    }

    result
}

fn clip_cell(cell: &ZonePiece, mask: &MultiPolygon<f64>) -> Option<ZonePiece> {
    match geometry::intersect(&cell.geometry, mask) {
        GeometryOutcome::Done(inter) => Some(ZonePiece {
            zone: cell.zone.clone(),
            geometry: inter,
        }),
        GeometryOutcome::Empty => None,
        GeometryOutcome::Failed(reason) => {
            warn!("Intersection failed for a cell of '{}' ({}), keeping it uncut", cell.zone, reason);
            Some(cell.clone())
        }
    }
}
