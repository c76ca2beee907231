//! Core units, constants, and shared primitives for the aircraft sizing workspace.
//!
//! Sizing works in US customary units: feet, seconds, pounds-force, slugs.
//! Speeds enter the models as knots (equivalent or true) and are converted
//! to ft/s at the point of use.

/// Physical constants (US customary unless stated otherwise).
pub mod constants {
    /// Standard gravity (m/s²).
    pub const G0: f64 = 9.80665;
    /// Standard gravity (ft/s²).
    pub const G0_FT_S2: f64 = 32.174;
    /// Sea-level standard density (kg/m³).
    pub const RHO0_KG_M3: f64 = 1.225;
    /// Sea-level standard density (slug/ft³).
    pub const RHO0_SLUG_FT3: f64 = RHO0_KG_M3 * super::units::KG_M3_TO_SLUG_FT3;
    /// Sea-level standard temperature (K).
    pub const T0_K: f64 = 288.15;
    /// Sea-level standard pressure (Pa).
    pub const P0_PA: f64 = 101_325.0;
    /// Specific gas constant for dry air (J/(kg·K)).
    pub const R_AIR: f64 = 287.0531;
    /// Ratio of specific heats for air.
    pub const GAMMA_AIR: f64 = 1.4;
    /// Sea-level standard speed of sound (m/s).
    pub const A0_M_S: f64 = 340.294;
}

/// Unit conversion helpers.
pub mod units {
    /// Knots to feet per second.
    pub const KT_TO_FT_S: f64 = 1.687_81;
    /// Knots to metres per second.
    pub const KT_TO_M_S: f64 = 1_852.0 / 3_600.0;
    /// Nautical miles to feet.
    pub const NMI_TO_FT: f64 = 6_076.115_5;
    /// Feet to metres.
    pub const FT_TO_M: f64 = 0.3048;
    /// Density conversion factor, kg/m³ to slug/ft³.
    pub const KG_M3_TO_SLUG_FT3: f64 = 0.001_940_320_325_930_4;

    /// Convert knots to ft/s.
    #[inline]
    pub fn kt_to_ft_s(v: f64) -> f64 {
        v * KT_TO_FT_S
    }

    /// Convert ft/s to knots.
    #[inline]
    pub fn ft_s_to_kt(v: f64) -> f64 {
        v / KT_TO_FT_S
    }

    /// Convert knots to m/s.
    #[inline]
    pub fn kt_to_m_s(v: f64) -> f64 {
        v * KT_TO_M_S
    }

    /// Convert m/s to knots.
    #[inline]
    pub fn m_s_to_kt(v: f64) -> f64 {
        v / KT_TO_M_S
    }

    /// Convert feet to metres.
    #[inline]
    pub fn ft_to_m(v: f64) -> f64 {
        v * FT_TO_M
    }

    /// Convert nautical miles to feet.
    #[inline]
    pub fn nmi_to_ft(v: f64) -> f64 {
        v * NMI_TO_FT
    }

    /// Convert minutes to seconds.
    #[inline]
    pub fn minutes_to_seconds(v: f64) -> f64 {
        v * 60.0
    }

    /// Convert a climb rate in ft/min to ft/s.
    #[inline]
    pub fn ft_min_to_ft_s(v: f64) -> f64 {
        v / 60.0
    }

    /// Convert a per-hour rate (e.g. TSFC in 1/hr) to per-second.
    #[inline]
    pub fn per_hour_to_per_second(v: f64) -> f64 {
        v / 3_600.0
    }
}

#[cfg(test)]
mod tests {
    use super::{constants, units};

    #[test]
    fn sea_level_density_in_slugs() {
        assert!((constants::RHO0_SLUG_FT3 - 0.002_376_9).abs() < 1e-6);
    }

    #[test]
    fn knot_conversions_are_inverse() {
        let v = 250.0;
        assert!((units::ft_s_to_kt(units::kt_to_ft_s(v)) - v).abs() < 1e-9);
        assert!((units::m_s_to_kt(units::kt_to_m_s(v)) - v).abs() < 1e-9);
    }
}
