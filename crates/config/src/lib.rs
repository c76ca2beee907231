//! Configuration models and loaders for aircraft and mission definitions.

mod mission;

pub use mission::{AltitudeConfig, MissionConfig, PhaseConfig, PhaseNumber, SettingsConfig};

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Aircraft technology and requirement constants.
#[derive(Debug, Deserialize, Clone)]
pub struct AircraftConfig {
    pub name: String,
    pub aerodynamics: AerodynamicsConfig,
    pub propulsion: PropulsionConfig,
    pub structure: StructureConfig,
    pub payload: PayloadConfig,
    #[serde(default)]
    pub geometry: GeometryConfig,
}

/// Drag polar coefficients.
#[derive(Debug, Deserialize, Clone)]
pub struct AerodynamicsConfig {
    pub k1: f64,
    pub k2: f64,
}

/// Engine technology factor.
#[derive(Debug, Deserialize, Clone)]
pub struct PropulsionConfig {
    pub ktsfc: f64,
}

/// Empirical empty-weight factor.
#[derive(Debug, Deserialize, Clone)]
pub struct StructureConfig {
    pub kwe: f64,
}

/// Fixed weights carried on the mission (lbf).
#[derive(Debug, Deserialize, Clone)]
pub struct PayloadConfig {
    pub crew_weight_lbf: f64,
    pub payload_weight_lbf: f64,
}

/// Planform inputs used for derived geometry.
#[derive(Debug, Deserialize, Clone)]
pub struct GeometryConfig {
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: f64,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: default_aspect_ratio(),
        }
    }
}

fn default_aspect_ratio() -> f64 {
    9.0
}

impl AircraftConfig {
    /// Reject values the sizing relations cannot use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("aerodynamics.k1", self.aerodynamics.k1, self.aerodynamics.k1 > 0.0),
            ("aerodynamics.k2", self.aerodynamics.k2, self.aerodynamics.k2.is_finite()),
            ("propulsion.ktsfc", self.propulsion.ktsfc, self.propulsion.ktsfc > 0.0),
            ("structure.kwe", self.structure.kwe, self.structure.kwe > 0.0),
            (
                "payload.crew_weight_lbf",
                self.payload.crew_weight_lbf,
                self.payload.crew_weight_lbf >= 0.0,
            ),
            (
                "payload.payload_weight_lbf",
                self.payload.payload_weight_lbf,
                self.payload.payload_weight_lbf >= 0.0,
            ),
            (
                "geometry.aspect_ratio",
                self.geometry.aspect_ratio,
                self.geometry.aspect_ratio > 0.0,
            ),
        ];
        for (field, value, ok) in checks {
            if !ok || !value.is_finite() {
                return Err(ConfigError::Invalid {
                    field: field.to_string(),
                    reason: format!("unsupported value {value}"),
                });
            }
        }
        if self.payload.crew_weight_lbf + self.payload.payload_weight_lbf <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "payload".to_string(),
                reason: "crew plus payload weight must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value for '{field}': {reason}")]
    Invalid { field: String, reason: String },
    #[error("aircraft '{0}' not found in catalog")]
    NotFound(String),
    #[error("no aircraft definitions found at {0}")]
    EmptyCatalog(PathBuf),
}

/// Load aircraft definitions from a YAML list, a TOML file, or a directory of TOML files.
pub fn load_aircraft_configs<P: AsRef<Path>>(path: P) -> Result<Vec<AircraftConfig>, ConfigError> {
    let path = path.as_ref();
    let configs: Vec<AircraftConfig> = load_records(path)?;
    if configs.is_empty() {
        return Err(ConfigError::EmptyCatalog(path.to_path_buf()));
    }
    for config in &configs {
        config.validate()?;
    }
    Ok(configs)
}

/// Pick an aircraft by case-insensitive name, defaulting to the first entry.
pub fn select_aircraft(
    configs: &[AircraftConfig],
    requested: Option<&str>,
) -> Result<AircraftConfig, ConfigError> {
    match requested {
        Some(name) => {
            let upper = name.to_uppercase();
            configs
                .iter()
                .find(|cfg| cfg.name.to_uppercase() == upper)
                .cloned()
                .ok_or_else(|| ConfigError::NotFound(name.to_string()))
        }
        None => configs
            .first()
            .cloned()
            .ok_or_else(|| ConfigError::EmptyCatalog(PathBuf::new())),
    }
}

/// Load a mission profile from a YAML or TOML file.
pub fn load_mission<P: AsRef<Path>>(path: P) -> Result<MissionConfig, ConfigError> {
    load_record(path)
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}

fn load_record<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}
