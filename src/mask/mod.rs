//! Mask resolution.
//!
//! Turns raw boundary documents into the clean polygons Voronoi cells are
//! clipped against, either one for the whole department or one per
//! sub-region.

mod repair;
mod resolver;

pub use repair::clean_mask;
pub use resolver::{
    convex_hull, resolve_department_mask, resolve_group_mask, BoundaryMatch, GroupMask,
    MaskSource, SubRegionIndex,
};
