//! Zonemap - territory partitioning for school support zones
//!
//! Turns schools labeled with a support zone and a sub-region into one
//! polygon per zone, tiling the administrative boundary.

pub mod config;
pub mod error;
pub mod geometry;
pub mod mask;
pub mod models;
pub mod territory;

pub use config::EngineConfig;
pub use error::ZoneMapError;
pub use mask::SubRegionIndex;
pub use models::{BoundaryDocument, Facility, PartitionResult, ZoneFilter, ZonePolygon};
pub use territory::PartitionEngine;
