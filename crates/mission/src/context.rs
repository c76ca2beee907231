//! Shared evaluation context and flight-condition lookups.

use sizing_aerodynamics::{DragPolar, zero_lift_drag};
use sizing_atmosphere::{Atmosphere, speed};
use sizing_core::units::kt_to_ft_s;

use crate::aircraft::AircraftConstants;
use crate::error::SizingError;

/// Airspeed schedule of a segment: held at constant KEAS or constant Mach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Airspeed {
    Keas(f64),
    Mach(f64),
}

impl Airspeed {
    /// Build from a pair of optional inputs, requiring exactly one.
    pub fn exactly_one(keas: Option<f64>, mach: Option<f64>) -> Result<Self, SizingError> {
        match (keas, mach) {
            (Some(keas), None) => Ok(Airspeed::Keas(keas)),
            (None, Some(mach)) => Ok(Airspeed::Mach(mach)),
            (Some(_), Some(_)) => Err(SizingError::invalid(
                "both KEAS and Mach given; exactly one speed must be set",
            )),
            (None, None) => Err(SizingError::invalid(
                "neither KEAS nor Mach given; exactly one speed must be set",
            )),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), SizingError> {
        let ok = match *self {
            Airspeed::Keas(keas) => keas.is_finite() && keas > 0.0,
            Airspeed::Mach(mach) => mach.is_finite() && mach > 0.0 && mach < 1.0,
        };
        if ok {
            Ok(())
        } else {
            Err(SizingError::invalid(format!("unsupported airspeed {self:?}")))
        }
    }
}

/// Everything a segment needs to know about one point of its flight path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightCondition {
    pub altitude_ft: f64,
    pub mach: f64,
    pub keas: f64,
    /// True airspeed (ft/s).
    pub tas_ft_s: f64,
    /// Dynamic pressure (lb/ft²).
    pub dynamic_pressure: f64,
    pub density_ratio: f64,
    pub temperature_ratio: f64,
    pub cd0: f64,
    pub thrust_lapse: f64,
    /// Thrust-specific fuel consumption (1/s).
    pub tsfc: f64,
}

impl FlightCondition {
    /// Arithmetic mean of two conditions, field by field.
    pub fn mean(&self, other: &FlightCondition) -> FlightCondition {
        let avg = |a: f64, b: f64| 0.5 * (a + b);
        FlightCondition {
            altitude_ft: avg(self.altitude_ft, other.altitude_ft),
            mach: avg(self.mach, other.mach),
            keas: avg(self.keas, other.keas),
            tas_ft_s: avg(self.tas_ft_s, other.tas_ft_s),
            dynamic_pressure: avg(self.dynamic_pressure, other.dynamic_pressure),
            density_ratio: avg(self.density_ratio, other.density_ratio),
            temperature_ratio: avg(self.temperature_ratio, other.temperature_ratio),
            cd0: avg(self.cd0, other.cd0),
            thrust_lapse: avg(self.thrust_lapse, other.thrust_lapse),
            tsfc: avg(self.tsfc, other.tsfc),
        }
    }

    /// Specific energy height `h + V²/2g` (ft).
    pub fn energy_height_ft(&self) -> f64 {
        self.altitude_ft
            + self.tas_ft_s * self.tas_ft_s / (2.0 * sizing_core::constants::G0_FT_S2)
    }
}

/// Aircraft constants plus the atmosphere model, passed by reference into every evaluation.
#[derive(Clone, Copy)]
pub struct SizingContext<'a> {
    pub aircraft: &'a AircraftConstants,
    pub atmosphere: &'a dyn Atmosphere,
}

impl<'a> SizingContext<'a> {
    pub fn new(aircraft: &'a AircraftConstants, atmosphere: &'a dyn Atmosphere) -> Self {
        Self {
            aircraft,
            atmosphere,
        }
    }

    pub fn polar(&self) -> &DragPolar {
        &self.aircraft.polar
    }

    /// Flight condition at `altitude_ft` flying the given airspeed.
    pub fn condition(
        &self,
        airspeed: Airspeed,
        altitude_ft: f64,
    ) -> Result<FlightCondition, SizingError> {
        let state = self.atmosphere.properties(altitude_ft)?;
        let (mach, keas) = match airspeed {
            Airspeed::Keas(keas) => (
                speed::keas_to_mach(self.atmosphere, keas, altitude_ft)?,
                keas,
            ),
            Airspeed::Mach(mach) => (
                mach,
                speed::mach_to_keas(self.atmosphere, mach, altitude_ft)?,
            ),
        };
        let ktas = keas / state.density_ratio.sqrt();
        let engine = &self.aircraft.engine;
        Ok(FlightCondition {
            altitude_ft,
            mach,
            keas,
            tas_ft_s: kt_to_ft_s(ktas),
            dynamic_pressure: speed::dynamic_pressure_keas(keas),
            density_ratio: state.density_ratio,
            temperature_ratio: state.temperature_ratio,
            cd0: zero_lift_drag(mach, altitude_ft)?,
            thrust_lapse: engine.thrust_lapse(mach, state.density_ratio),
            tsfc: engine.tsfc_per_second(mach, state.temperature_ratio),
        })
    }

    /// Flight condition for a true airspeed (knots), e.g. a ground taxi speed.
    pub fn condition_true_airspeed(
        &self,
        ktas: f64,
        altitude_ft: f64,
    ) -> Result<FlightCondition, SizingError> {
        let keas = speed::ktas_to_keas(self.atmosphere, ktas, altitude_ft)?;
        self.condition(Airspeed::Keas(keas), altitude_ft)
    }
}
