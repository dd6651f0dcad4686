//! Territory partitioning.
//!
//! Sites are tessellated into Voronoi cells, same-zone cells are dissolved
//! into one territory per zone, and each territory is clipped to its
//! administrative mask.

mod clip;
mod dissolve;
mod engine;
mod style;
mod tessellate;

pub use clip::{clip_zones, label_cells};
pub use dissolve::{dissolve_by_zone, ZonePiece};
pub use engine::{PartitionEngine, MIN_TOTAL_SITES};
pub use style::{zone_color, zone_hue};
pub use tessellate::{voronoi_cells, MIN_SITES};
