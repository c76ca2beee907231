//! Drag polar and zero-lift drag curve fits.
//!
//! The polar is `Cd = Cd0 + K1·Cl² + K2·Cl`. `Cd0` is an empirical fit in
//! Mach number and altitude valid for subsonic transports only.

use thiserror::Error;

/// Errors raised when a curve fit is evaluated outside its domain.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AeroError {
    #[error("zero-lift drag fit requires 0 <= Mach < 1 (got {0})")]
    MachOutOfRange(f64),
    #[error("lift coefficient must be non-zero to form L/D")]
    ZeroLift,
    #[error("induced drag factor K1 must be positive (got {0})")]
    InvalidK1(f64),
}

/// Quadratic drag polar coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragPolar {
    pub k1: f64,
    pub k2: f64,
}

impl DragPolar {
    pub fn new(k1: f64, k2: f64) -> Result<Self, AeroError> {
        if !(k1.is_finite() && k1 > 0.0) {
            return Err(AeroError::InvalidK1(k1));
        }
        Ok(Self { k1, k2 })
    }

    /// Lift-dependent drag `K1·Cl² + K2·Cl`.
    #[inline]
    pub fn induced_drag(&self, cl: f64) -> f64 {
        self.k1 * cl * cl + self.k2 * cl
    }

    /// Total drag coefficient for a given zero-lift drag and lift coefficient.
    #[inline]
    pub fn drag_coefficient(&self, cd0: f64, cl: f64) -> f64 {
        cd0 + self.induced_drag(cl)
    }

    /// Lift-to-drag ratio; fails for zero lift.
    pub fn lift_to_drag(&self, cd0: f64, cl: f64) -> Result<f64, AeroError> {
        if cl == 0.0 {
            return Err(AeroError::ZeroLift);
        }
        Ok(cl / self.drag_coefficient(cd0, cl))
    }

    /// Lift coefficient that maximises L/D, `√(Cd0/K1)`.
    #[inline]
    pub fn best_lift_coefficient(&self, cd0: f64) -> f64 {
        (cd0 / self.k1).sqrt()
    }

    /// Drag-to-lift ratio at best L/D, `K2 + 2√(K1·Cd0)`.
    #[inline]
    pub fn min_drag_to_lift(&self, cd0: f64) -> f64 {
        self.k2 + 2.0 * (self.k1 * cd0).sqrt()
    }
}

/// Zero-lift drag coefficient as a function of Mach number and altitude (ft).
pub fn zero_lift_drag(mach: f64, altitude_ft: f64) -> Result<f64, AeroError> {
    if !(0.0..1.0).contains(&mach) {
        return Err(AeroError::MachOutOfRange(mach));
    }
    let beta = (1.0 - mach * mach).sqrt();
    let compressibility = 1.0 / beta - 1.273;
    Ok(0.0311 * compressibility * compressibility - 0.0027 / beta + 7.86e-8 * altitude_ft + 0.0215)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cd0_at_cruise_is_transport_like() {
        let cd0 = zero_lift_drag(0.78, 35_000.0).expect("cd0");
        assert!((0.015..0.03).contains(&cd0), "got {cd0}");
    }

    #[test]
    fn cd0_rejects_supersonic() {
        assert_eq!(zero_lift_drag(1.0, 0.0), Err(AeroError::MachOutOfRange(1.0)));
        assert!(zero_lift_drag(-0.1, 0.0).is_err());
    }

    #[test]
    fn best_lift_coefficient_maximises_lift_to_drag() {
        let polar = DragPolar::new(0.0556, -0.0197).expect("polar");
        let cd0 = 0.02;
        let cl_star = polar.best_lift_coefficient(cd0);
        let best = polar.lift_to_drag(cd0, cl_star).expect("l/d");
        for cl in [0.8 * cl_star, 1.2 * cl_star] {
            assert!(polar.lift_to_drag(cd0, cl).expect("l/d") <= best);
        }
        assert!((1.0 / best - polar.min_drag_to_lift(cd0)).abs() < 1e-12);
    }
}
