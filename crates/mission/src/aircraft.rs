//! Immutable aircraft technology constants shared by every sizing component.

use sizing_aerodynamics::DragPolar;
use sizing_config::AircraftConfig;
use sizing_propulsion::EngineModel;

use crate::error::SizingError;

/// Empirical allowance applied to mission fuel for reserves and trapped fuel.
pub const FUEL_ALLOWANCE_FACTOR: f64 = 1.06;
/// Exponent of the empty-weight fraction fit `KWE / WTO^0.06`.
pub const EMPTY_WEIGHT_EXPONENT: f64 = 0.06;

/// Aircraft constants loaded once per run.
#[derive(Debug, Clone)]
pub struct AircraftConstants {
    pub name: String,
    pub polar: DragPolar,
    pub engine: EngineModel,
    pub kwe: f64,
    pub crew_weight_lbf: f64,
    pub payload_weight_lbf: f64,
    pub aspect_ratio: f64,
}

impl AircraftConstants {
    pub fn from_config(config: &AircraftConfig) -> Result<Self, SizingError> {
        config.validate()?;
        Ok(Self {
            name: config.name.clone(),
            polar: DragPolar::new(config.aerodynamics.k1, config.aerodynamics.k2)?,
            engine: EngineModel::new(config.propulsion.ktsfc),
            kwe: config.structure.kwe,
            crew_weight_lbf: config.payload.crew_weight_lbf,
            payload_weight_lbf: config.payload.payload_weight_lbf,
            aspect_ratio: config.geometry.aspect_ratio,
        })
    }

    /// Crew plus payload weight (lbf).
    pub fn fixed_weight_lbf(&self) -> f64 {
        self.crew_weight_lbf + self.payload_weight_lbf
    }

    /// Empty-weight fraction `KWE / WTO^0.06`.
    pub fn empty_weight_fraction(&self, takeoff_weight_lbf: f64) -> f64 {
        self.kwe / takeoff_weight_lbf.powf(EMPTY_WEIGHT_EXPONENT)
    }

    /// Fuel-weight fraction including the allowance factor.
    pub fn fuel_weight_fraction(&self, final_weight_fraction: f64) -> f64 {
        FUEL_ALLOWANCE_FACTOR * (1.0 - final_weight_fraction)
    }
}
