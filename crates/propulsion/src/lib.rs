//! Turbofan thrust lapse and thrust-specific fuel consumption fits.

/// Installed engine characterised by its TSFC technology factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineModel {
    /// TSFC technology factor (1/hr at Mach 0, θ = 1, before the Mach term).
    pub ktsfc: f64,
}

impl EngineModel {
    pub fn new(ktsfc: f64) -> Self {
        Self { ktsfc }
    }

    /// Ratio of available thrust to sea-level static thrust.
    pub fn thrust_lapse(&self, mach: f64, density_ratio: f64) -> f64 {
        thrust_lapse(mach, density_ratio)
    }

    /// Thrust-specific fuel consumption in 1/hr.
    pub fn tsfc_per_hour(&self, mach: f64, temperature_ratio: f64) -> f64 {
        temperature_ratio.sqrt() * self.ktsfc * (0.45 + 0.54 * mach)
    }

    /// Thrust-specific fuel consumption in 1/s.
    pub fn tsfc_per_second(&self, mach: f64, temperature_ratio: f64) -> f64 {
        sizing_core::units::per_hour_to_per_second(self.tsfc_per_hour(mach, temperature_ratio))
    }
}

/// High-bypass turbofan thrust lapse `(0.568 + 0.25(1.2 − M)³)·σ^0.6`.
pub fn thrust_lapse(mach: f64, density_ratio: f64) -> f64 {
    let m = 1.2 - mach;
    (0.568 + 0.25 * m * m * m) * density_ratio.powf(0.6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_sea_level_lapse() {
        assert!((thrust_lapse(0.0, 1.0) - (0.568 + 0.25 * 1.728)).abs() < 1e-12);
    }

    #[test]
    fn lapse_drops_with_altitude_density() {
        assert!(thrust_lapse(0.78, 0.31) < thrust_lapse(0.78, 1.0));
    }

    #[test]
    fn tsfc_units() {
        let engine = EngineModel::new(0.64);
        let per_hour = engine.tsfc_per_hour(0.78, 0.75);
        assert!((engine.tsfc_per_second(0.78, 0.75) * 3_600.0 - per_hour).abs() < 1e-12);
        assert!(per_hour > 0.4 && per_hour < 0.7);
    }
}
