//! Atmosphere model and airspeed conversion utilities.
//!
//! The sizing core only ever sees the [`Atmosphere`] trait, so any model that
//! maps altitude to density/pressure/temperature ratios can be swapped in.
//! [`StandardAtmosphere`] provides the ICAO/US76 layered model.

pub mod speed;
mod standard;

pub use standard::StandardAtmosphere;

use thiserror::Error;

/// Atmospheric state at a given altitude, expressed relative to sea level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtmosphereState {
    /// Density ratio σ = ρ/ρ0.
    pub density_ratio: f64,
    /// Pressure ratio δ = p/p0.
    pub pressure_ratio: f64,
    /// Temperature ratio θ = T/T0.
    pub temperature_ratio: f64,
    /// Local speed of sound (m/s).
    pub speed_of_sound_m_s: f64,
}

impl AtmosphereState {
    /// Local density in slug/ft³.
    pub fn density_slug_ft3(&self) -> f64 {
        self.density_ratio * sizing_core::constants::RHO0_SLUG_FT3
    }
}

/// Errors raised by atmosphere lookups and speed conversions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AtmosphereError {
    #[error("altitude {altitude_ft} ft is outside the model range [{min_ft}, {max_ft}] ft")]
    OutOfRange {
        altitude_ft: f64,
        min_ft: f64,
        max_ft: f64,
    },
    #[error("no crossover altitude below {ceiling_ft} ft for Mach {mach} at {keas} KEAS")]
    NoCrossover { mach: f64, keas: f64, ceiling_ft: f64 },
    #[error("airspeed must be finite and non-negative (got {0})")]
    InvalidSpeed(f64),
}

/// Maps altitude to atmospheric state.
pub trait Atmosphere {
    /// Atmospheric ratios at `altitude_ft` (geometric altitude, feet).
    fn properties(&self, altitude_ft: f64) -> Result<AtmosphereState, AtmosphereError>;

    /// Highest altitude the model accepts (ft).
    fn ceiling_ft(&self) -> f64;
}
