//! Dissolving same-zone pieces into one territory.
//!
//! Pieces are unioned pairwise, left to right, in the order they arrive.

use geo::MultiPolygon;
use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::geometry::{self, GeometryOutcome};

/// A piece of territory belonging to one zone
#[derive(Debug, Clone, PartialEq)]
pub struct ZonePiece {
    pub zone: String,
    pub geometry: MultiPolygon<f64>,
}

struct Accumulator {
    zone: String,
    /// Kept in case no piece of the zone is operable
    first: MultiPolygon<f64>,
    merged: Option<MultiPolygon<f64>>,
    dropped: usize,
}

impl Accumulator {
    fn new(piece: ZonePiece) -> Self {
        let mut acc = Self {
            zone: piece.zone,
            first: piece.geometry.clone(),
            merged: None,
            dropped: 0,
        };
        acc.absorb(piece.geometry);
        acc
    }

    fn absorb(&mut self, geometry: MultiPolygon<f64>) {
        match self.merged.take() {
            None => match geometry::check_operable(&geometry) {
                Ok(()) => self.merged = Some(geometry),
                Err(reason) => {
                    debug!("Skipping unusable piece of '{}': {}", self.zone, reason);
                    self.dropped += 1;
                }
            },
            Some(merged) => match geometry::union(&merged, &geometry) {
                GeometryOutcome::Done(result) => self.merged = Some(result),
                GeometryOutcome::Empty | GeometryOutcome::Failed(_) => {
                    warn!("Union failed for a piece of '{}', keeping previous shape", self.zone);
                    self.dropped += 1;
                    self.merged = Some(merged);
                }
            },
        }
    }

    fn finish(self) -> ZonePiece {
        if self.dropped > 0 {
            debug!("Zone '{}' dissolved with {} pieces dropped", self.zone, self.dropped);
        }
        ZonePiece {
            zone: self.zone,
            geometry: self.merged.unwrap_or(self.first),
        }
    }
}

/// One piece per zone, zones in order of first appearance.
///
/// A union that fails leaves the running shape unchanged, so a zone is never
/// lost to a bad piece.
pub fn dissolve_by_zone<I>(pieces: I) -> Vec<ZonePiece>
where
    I: IntoIterator<Item = ZonePiece>,
{
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut accumulators: Vec<Accumulator> = Vec::new();

    for piece in pieces {
        match slots.get(&piece.zone) {
            Some(&slot) => accumulators[slot].absorb(piece.geometry),
            None => {
                slots.insert(piece.zone.clone(), accumulators.len());
                accumulators.push(Accumulator::new(piece));
            }
        }
    }

    accumulators.into_iter().map(Accumulator::finish).collect()
}
