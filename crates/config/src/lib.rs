//! Section manifest models and loaders.
//!
//! A manifest is an ordered list of aero sections; report blocks are
//! numbered by manifest order.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// One aero section: a polar file plus the spanwise station it applies to.
#[derive(Debug, Deserialize, Clone)]
pub struct SectionConfig {
    /// Polar data file, XFLR5 export or generic numeric text.
    pub polar: PathBuf,
    /// Normalized radial position r/R along the blade. Supplied here, never
    /// derived from the polar.
    #[serde(default)]
    pub r_over_r: f64,
    /// Hand-tuned scalar replacements applied after a successful fit.
    #[serde(default)]
    pub overrides: Option<ModelOverrides>,
}

/// Optional per-scalar replacements for a fitted model. Absent fields keep
/// the fitted value.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ModelOverrides {
    pub zero_lift_alpha: Option<f64>,
    pub dcl_dalpha: Option<f64>,
    pub dcl_dalpha_stall: Option<f64>,
    pub max_cl: Option<f64>,
    pub min_cl: Option<f64>,
    pub cl_increment_to_stall: Option<f64>,
    pub min_cd: Option<f64>,
    pub cl_at_min_cd: Option<f64>,
    pub dcd_ddcl: Option<f64>,
    pub reynolds: Option<f64>,
}

/// Errors that can occur while loading a manifest.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// TOML manifests wrap the list in `[[section]]` tables.
#[derive(Debug, Deserialize)]
struct SectionManifest {
    section: Vec<SectionConfig>,
}

/// Load the ordered section list from a YAML or TOML manifest.
pub fn load_sections<P: AsRef<Path>>(path: P) -> Result<Vec<SectionConfig>, ConfigError> {
    let path = path.as_ref();
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let manifest: SectionManifest = toml::from_str(&contents)?;
        Ok(manifest.section)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}
