//! Dashboard configuration.
//!
//! Read from a TOML file whose path comes from the command line or the
//! [`CONFIG_ENV_VAR`] environment variable. Every key is optional:
//!
//! ```toml
//! factor_sentinel = "none"
//! multi_select = true
//! pie_threshold = 2
//! map_mode = "boroughs"
//!
//! [vehicles]
//! mode = "bounded"           # or "open"
//! types = ["Sedan", "Taxi"]  # bounded only; defaults to the full taxonomy
//! ```

use std::path::{Path, PathBuf};

use crash_map_analytics_models::{AggregationOptions, VehicleVocabulary};
use crash_map_crash_models::FACTOR_NONE;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::DashboardError;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "CRASH_MAP_CONFIG";

/// Selected vehicle count at which factor bubbles become pies.
pub const DEFAULT_PIE_THRESHOLD: usize = 2;

/// Which map the borough view shows.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MapMode {
    /// Choropleth of crash counts per borough
    #[default]
    Boroughs,
    /// One dot per located crash
    Points,
}

impl MapMode {
    /// Returns the other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Boroughs => Self::Points,
            Self::Points => Self::Boroughs,
        }
    }
}

/// Settings for one dashboard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Factor value meaning "not applicable".
    pub factor_sentinel: String,
    /// Whether vehicle filters also accumulate a selection set.
    pub multi_select: bool,
    /// Number of selected vehicles at which factors are shown as pies.
    pub pie_threshold: usize,
    /// Initial map mode.
    pub map_mode: MapMode,
    /// Vehicle vocabulary used by the vehicle chart. Kept last so it
    /// serializes as a trailing `[vehicles]` table.
    pub vehicles: VehicleVocabulary,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            factor_sentinel: FACTOR_NONE.to_string(),
            multi_select: true,
            pie_threshold: DEFAULT_PIE_THRESHOLD,
            map_mode: MapMode::default(),
            vehicles: VehicleVocabulary::default(),
        }
    }
}

impl DashboardConfig {
    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Config`] if the TOML is malformed or a key
    /// has the wrong type.
    pub fn parse(toml_str: &str) -> Result<Self, DashboardError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self, DashboardError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Loads the configuration from `path` if given, else from the file
    /// named by [`CONFIG_ENV_VAR`], else returns the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError`] if a named file cannot be read or parsed.
    pub fn resolve(path: Option<&Path>) -> Result<Self, DashboardError> {
        let path: Option<PathBuf> = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from));

        match path {
            Some(path) => {
                log::info!("Loading dashboard config from {}", path.display());
                Self::from_path(&path)
            }
            None => {
                log::debug!("No dashboard config given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// The aggregator settings implied by this configuration.
    #[must_use]
    pub fn aggregation_options(&self) -> AggregationOptions {
        AggregationOptions {
            factor_sentinel: self.factor_sentinel.clone(),
            vehicles: self.vehicles.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(DashboardConfig::parse("").unwrap(), DashboardConfig::default());
    }

    #[test]
    fn parses_all_keys() {
        let config = DashboardConfig::parse(
            r#"
            factor_sentinel = "Unspecified"
            multi_select = false
            pie_threshold = 3
            map_mode = "points"

            [vehicles]
            mode = "bounded"
            types = ["Sedan", "Taxi"]
            "#,
        )
        .unwrap();

        assert_eq!(config.factor_sentinel, "Unspecified");
        assert!(!config.multi_select);
        assert_eq!(config.pie_threshold, 3);
        assert_eq!(config.map_mode, MapMode::Points);
        assert_eq!(
            config.vehicles,
            VehicleVocabulary::Bounded {
                types: vec!["Sedan".to_string(), "Taxi".to_string()],
            }
        );
    }

    #[test]
    fn rejects_unknown_vehicle_mode() {
        let result = DashboardConfig::parse("[vehicles]\nmode = \"fuzzy\"\n");
        assert!(matches!(result, Err(DashboardError::Config(_))));
    }

    #[test]
    fn default_round_trips_through_toml() {
        let serialized = toml::to_string(&DashboardConfig::default()).unwrap();
        assert_eq!(
            DashboardConfig::parse(&serialized).unwrap(),
            DashboardConfig::default()
        );
    }

    #[test]
    fn explicit_path_wins() {
        let path = std::env::temp_dir().join("crash_map_dashboard_config_explicit.toml");
        std::fs::write(&path, "pie_threshold = 4\n").unwrap();

        let config = DashboardConfig::resolve(Some(&path)).unwrap();

        assert_eq!(config.pie_threshold, 4);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result =
            DashboardConfig::resolve(Some(Path::new("/nonexistent/crash_map_dashboard.toml")));
        assert!(matches!(result, Err(DashboardError::Io(_))));
    }

    #[test]
    fn map_mode_toggles() {
        assert_eq!(MapMode::Boroughs.toggled(), MapMode::Points);
        assert_eq!(MapMode::Points.toggled().to_string(), "boroughs");
    }
}
