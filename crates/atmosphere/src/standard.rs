use sizing_core::constants::{G0, GAMMA_AIR, P0_PA, R_AIR, RHO0_KG_M3, T0_K};
use sizing_core::units::ft_to_m;

use crate::{Atmosphere, AtmosphereError, AtmosphereState};

/// Effective Earth radius used for the geopotential conversion (m).
const EARTH_RADIUS_M: f64 = 6_356_766.0;
const MIN_ALTITUDE_FT: f64 = -1_000.0;
const MAX_ALTITUDE_FT: f64 = 280_000.0;

#[derive(Debug, Clone, Copy)]
struct Layer {
    /// Geopotential base altitude (m).
    base_altitude_m: f64,
    base_temperature_k: f64,
    base_pressure_pa: f64,
    /// Temperature lapse rate (K/m).
    lapse_rate: f64,
}

const LAYERS: &[Layer] = &[
    Layer {
        base_altitude_m: 0.0,
        base_temperature_k: 288.15,
        base_pressure_pa: 101_325.0,
        lapse_rate: -0.0065,
    },
    Layer {
        base_altitude_m: 11_000.0,
        base_temperature_k: 216.65,
        base_pressure_pa: 22_632.06,
        lapse_rate: 0.0,
    },
    Layer {
        base_altitude_m: 20_000.0,
        base_temperature_k: 216.65,
        base_pressure_pa: 5_474.889,
        lapse_rate: 0.001,
    },
    Layer {
        base_altitude_m: 32_000.0,
        base_temperature_k: 228.65,
        base_pressure_pa: 868.0187,
        lapse_rate: 0.0028,
    },
    Layer {
        base_altitude_m: 47_000.0,
        base_temperature_k: 270.65,
        base_pressure_pa: 110.9063,
        lapse_rate: 0.0,
    },
    Layer {
        base_altitude_m: 51_000.0,
        base_temperature_k: 270.65,
        base_pressure_pa: 66.938_87,
        lapse_rate: -0.0028,
    },
    Layer {
        base_altitude_m: 71_000.0,
        base_temperature_k: 214.65,
        base_pressure_pa: 3.956_420,
        lapse_rate: -0.002,
    },
];

/// ICAO standard atmosphere (identical to US76 below 86 km).
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardAtmosphere;

impl StandardAtmosphere {
    pub fn new() -> Self {
        Self
    }

    /// Temperature (K) and pressure (Pa) at a geometric altitude in metres.
    fn temperature_pressure(altitude_m: f64) -> (f64, f64) {
        let geopotential = EARTH_RADIUS_M * altitude_m / (EARTH_RADIUS_M + altitude_m);
        let layer = LAYERS
            .iter()
            .rev()
            .find(|layer| geopotential >= layer.base_altitude_m)
            .unwrap_or(&LAYERS[0]);

        let dh = geopotential - layer.base_altitude_m;
        let temperature = layer.base_temperature_k + layer.lapse_rate * dh;
        let pressure = if layer.lapse_rate.abs() < 1e-12 {
            layer.base_pressure_pa * (-G0 * dh / (R_AIR * layer.base_temperature_k)).exp()
        } else {
            layer.base_pressure_pa
                * (temperature / layer.base_temperature_k).powf(-G0 / (layer.lapse_rate * R_AIR))
        };
        (temperature, pressure)
    }
}

impl Atmosphere for StandardAtmosphere {
    fn properties(&self, altitude_ft: f64) -> Result<AtmosphereState, AtmosphereError> {
        if !(MIN_ALTITUDE_FT..=MAX_ALTITUDE_FT).contains(&altitude_ft) {
            return Err(AtmosphereError::OutOfRange {
                altitude_ft,
                min_ft: MIN_ALTITUDE_FT,
                max_ft: MAX_ALTITUDE_FT,
            });
        }

        let (temperature, pressure) = Self::temperature_pressure(ft_to_m(altitude_ft));
        let density = pressure / (R_AIR * temperature);
        Ok(AtmosphereState {
            density_ratio: density / RHO0_KG_M3,
            pressure_ratio: pressure / P0_PA,
            temperature_ratio: temperature / T0_K,
            speed_of_sound_m_s: (GAMMA_AIR * R_AIR * temperature).sqrt(),
        })
    }

    fn ceiling_ft(&self) -> f64 {
        MAX_ALTITUDE_FT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sea_level_ratios_are_unity() {
        let state = StandardAtmosphere.properties(0.0).expect("sea level");
        assert!((state.density_ratio - 1.0).abs() < 1e-3);
        assert!((state.pressure_ratio - 1.0).abs() < 1e-9);
        assert!((state.temperature_ratio - 1.0).abs() < 1e-9);
        assert!((state.speed_of_sound_m_s - 340.29).abs() < 0.05);
    }

    #[test]
    fn tropopause_temperature_is_constant() {
        let a = StandardAtmosphere.properties(37_000.0).expect("37k");
        let b = StandardAtmosphere.properties(45_000.0).expect("45k");
        assert!((a.temperature_ratio - b.temperature_ratio).abs() < 1e-9);
        assert!(b.density_ratio < a.density_ratio);
    }

    #[test]
    fn rejects_altitudes_outside_model() {
        assert!(StandardAtmosphere.properties(-5_000.0).is_err());
        assert!(StandardAtmosphere.properties(f64::NAN).is_err());
        assert!(StandardAtmosphere.properties(300_000.0).is_err());
    }
}
