//! Core data models for the partitioning engine.

pub mod document;
pub mod facility;
pub mod zone;

pub use document::{BoundaryDocument, Feature, Geometry};
pub use facility::{group_by_sub_region, prepare_points, Facility, LabeledPoint};
pub use zone::{PartitionResult, ZoneFilter, ZonePolygon};
