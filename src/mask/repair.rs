//! Mask cleaning.

use geo::{MultiPolygon, Polygon};
use tracing::{debug, warn};

use crate::geometry::{self, GeometryOutcome};

/// Repair a boundary before it is used as a clipping mask.
///
/// Keeps the largest piece when the repair splits the shape. Returns `None`
/// when nothing usable is left. A repair that cannot run keeps the
/// unrepaired shape.
pub fn clean_mask(shape: &MultiPolygon<f64>) -> Option<Polygon<f64>> {
    match geometry::repair(shape) {
        GeometryOutcome::Done(repaired) => {
            if repaired.0.len() > 1 {
                debug!(
                    "Mask repair produced {} pieces, keeping the largest",
                    repaired.0.len()
                );
            }
            geometry::largest(repaired)
        }
        GeometryOutcome::Empty => {
            debug!("Mask repair left nothing");
            None
        }
        GeometryOutcome::Failed(reason) => {
            warn!("Mask repair failed ({}), using boundary as is", reason);
            geometry::largest(shape.clone())
        }
    }
}
