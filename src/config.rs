use anyhow::{Context, Result};
use geo::{Coord, Rect};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Rectangle every Voronoi diagram is bounded by: `[min_lon, min_lat, max_lon, max_lat]`.
///
/// Covers the whole department with margin. Never derived from the data.
pub const DEFAULT_BBOX: [f64; 4] = [6.5, 47.5, 9.0, 50.0];

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub tessellation: TessellationConfig,
    pub boundary: BoundaryConfig,
    pub style: StyleConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TessellationConfig {
    pub bbox: [f64; 4],
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BoundaryConfig {
    /// Property holding the sub-region name of a boundary feature
    pub sub_region_key: String,
    /// Keep only sub-region boundaries of this department
    pub department_code: Option<String>,
    pub department_keys: Vec<String>,
    pub district_code_key: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StyleConfig {
    pub saturation: u8,
    pub lightness: u8,
}

impl Default for TessellationConfig {
    fn default() -> Self {
        Self { bbox: DEFAULT_BBOX }
    }
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            sub_region_key: "circo_nom".to_string(),
            department_code: None,
            department_keys: vec![
                "code_departement".to_string(),
                "code_dept".to_string(),
                "dep".to_string(),
            ],
            district_code_key: "circo_code".to_string(),
        }
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            saturation: 65,
            lightness: 60,
        }
    }
}

impl TessellationConfig {
    pub fn bbox_rect(&self) -> Rect<f64> {
        let [min_x, min_y, max_x, max_y] = self.bbox;
        Rect::new(Coord { x: min_x, y: min_y }, Coord { x: max_x, y: max_y })
    }
}

impl EngineConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.tessellation.bbox, DEFAULT_BBOX);
        assert_eq!(config.boundary.sub_region_key, "circo_nom");
        assert!(config.boundary.department_code.is_none());
        assert_eq!(config.style.saturation, 65);
        assert_eq!(config.style.lightness, 60);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            [boundary]
            department_code = "67"

            [style]
            lightness = 50
            "#,
        )
        .unwrap();

        assert_eq!(config.boundary.department_code.as_deref(), Some("67"));
        assert_eq!(config.boundary.district_code_key, "circo_code");
        assert_eq!(config.style.lightness, 50);
        assert_eq!(config.style.saturation, 65);
        assert_eq!(config.tessellation.bbox, DEFAULT_BBOX);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tessellation]\nbbox = [0.0, 0.0, 10.0, 10.0]").unwrap();

        let config = EngineConfig::load_from_file(file.path()).unwrap();
        let rect = config.tessellation.bbox_rect();
        assert_eq!(rect.min(), Coord { x: 0.0, y: 0.0 });
        assert_eq!(rect.max(), Coord { x: 10.0, y: 10.0 });
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(EngineConfig::from_toml("[tessellation]\nbbox = \"wide\"").is_err());
    }
}
