//! Error types for everything around the partitioning core.
//!
//! The core itself never fails: geometry problems degrade the output instead
//! (see [`crate::geometry::GeometryOutcome`]). Errors here cover parsing the
//! facility lists and boundary documents that feed it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZoneMapError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid boundary document: {0}")]
    InvalidDocument(String),
}

pub type Result<T> = std::result::Result<T, ZoneMapError>;
