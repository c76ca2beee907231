//! Conversions between equivalent airspeed, true airspeed, and Mach number.
//!
//! Speeds are in knots unless the name says otherwise; altitudes in feet.

use sizing_core::constants::{A0_M_S, RHO0_SLUG_FT3};
use sizing_core::units::{kt_to_ft_s, kt_to_m_s, m_s_to_kt};

use crate::{Atmosphere, AtmosphereError};

/// Altitude at which the crossover search starts (ft).
pub const CROSSOVER_SEARCH_START_FT: f64 = 20_000.0;
/// Altitude increment of the crossover search (ft).
pub const CROSSOVER_SEARCH_STEP_FT: f64 = 100.0;

fn check_speed(v: f64) -> Result<f64, AtmosphereError> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(AtmosphereError::InvalidSpeed(v))
    }
}

/// Mach number for an equivalent airspeed at altitude.
pub fn keas_to_mach(
    atmosphere: &dyn Atmosphere,
    keas: f64,
    altitude_ft: f64,
) -> Result<f64, AtmosphereError> {
    let state = atmosphere.properties(altitude_ft)?;
    Ok(kt_to_m_s(check_speed(keas)?) / A0_M_S / state.pressure_ratio.sqrt())
}

/// Equivalent airspeed for a Mach number at altitude.
pub fn mach_to_keas(
    atmosphere: &dyn Atmosphere,
    mach: f64,
    altitude_ft: f64,
) -> Result<f64, AtmosphereError> {
    let state = atmosphere.properties(altitude_ft)?;
    Ok(m_s_to_kt(check_speed(mach)? * A0_M_S * state.pressure_ratio.sqrt()))
}

/// True airspeed for an equivalent airspeed at altitude.
pub fn keas_to_ktas(
    atmosphere: &dyn Atmosphere,
    keas: f64,
    altitude_ft: f64,
) -> Result<f64, AtmosphereError> {
    let state = atmosphere.properties(altitude_ft)?;
    Ok(check_speed(keas)? / state.density_ratio.sqrt())
}

/// Equivalent airspeed for a true airspeed at altitude.
pub fn ktas_to_keas(
    atmosphere: &dyn Atmosphere,
    ktas: f64,
    altitude_ft: f64,
) -> Result<f64, AtmosphereError> {
    let state = atmosphere.properties(altitude_ft)?;
    Ok(check_speed(ktas)? * state.density_ratio.sqrt())
}

/// Dynamic pressure (lb/ft²) for an equivalent airspeed.
pub fn dynamic_pressure_keas(keas: f64) -> f64 {
    let v = kt_to_ft_s(keas);
    0.5 * RHO0_SLUG_FT3 * v * v
}

/// Equivalent airspeed (knots) producing the given dynamic pressure (lb/ft²).
pub fn keas_for_dynamic_pressure(q: f64) -> f64 {
    (2.0 * q / RHO0_SLUG_FT3).sqrt() / sizing_core::units::KT_TO_FT_S
}

/// Altitude at which a constant-KEAS climb reaches `mach`.
///
/// Searches upward from 20 000 ft in 100 ft steps and returns the first
/// altitude whose Mach is at or above the target.
pub fn crossover_altitude(
    atmosphere: &dyn Atmosphere,
    mach: f64,
    keas: f64,
) -> Result<f64, AtmosphereError> {
    let ceiling = atmosphere.ceiling_ft();
    let mut altitude = CROSSOVER_SEARCH_START_FT;
    while altitude <= ceiling {
        if keas_to_mach(atmosphere, keas, altitude)? >= mach {
            return Ok(altitude);
        }
        altitude += CROSSOVER_SEARCH_STEP_FT;
    }
    Err(AtmosphereError::NoCrossover {
        mach,
        keas,
        ceiling_ft: ceiling,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StandardAtmosphere;

    #[test]
    fn keas_equals_ktas_at_sea_level() {
        let atm = StandardAtmosphere;
        let ktas = keas_to_ktas(&atm, 250.0, 0.0).expect("ktas");
        assert!((ktas - 250.0).abs() < 0.2);
    }

    #[test]
    fn mach_round_trips_through_keas() {
        let atm = StandardAtmosphere;
        let keas = mach_to_keas(&atm, 0.78, 35_000.0).expect("keas");
        let mach = keas_to_mach(&atm, keas, 35_000.0).expect("mach");
        assert!((mach - 0.78).abs() < 1e-9);
    }

    #[test]
    fn crossover_for_transport_climb_schedule() {
        let atm = StandardAtmosphere;
        let alt = crossover_altitude(&atm, 0.78, 290.0).expect("crossover");
        assert!((27_000.0..=30_000.0).contains(&alt), "got {alt}");
        assert!(keas_to_mach(&atm, 290.0, alt).expect("mach") >= 0.78);
    }

    #[test]
    fn negative_speed_is_rejected() {
        let atm = StandardAtmosphere;
        assert!(matches!(
            keas_to_mach(&atm, -10.0, 0.0),
            Err(AtmosphereError::InvalidSpeed(_))
        ));
    }
}
