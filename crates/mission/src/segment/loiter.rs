//! Loiter at the speed that maximises lift-to-drag.

use sizing_aerodynamics::zero_lift_drag;
use sizing_atmosphere::speed::{keas_for_dynamic_pressure, keas_to_mach};
use sizing_core::units::minutes_to_seconds;

use super::{
    SegmentKind, SegmentPhysics, check_positive, checked_ratio, constraint_thrust_to_weight,
    lift_coefficient, require_non_negative,
};
use crate::context::{Airspeed, FlightCondition, SizingContext};
use crate::error::{LoopStage, SizingError};

/// Parameters of the best-L/D speed fixed-point search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSearch {
    pub seed_mach: f64,
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Turn an exhausted budget into [`SizingError::NonConvergence`].
    pub require_convergence: bool,
}

impl Default for SpeedSearch {
    fn default() -> Self {
        Self {
            seed_mach: 0.5,
            tolerance: 1e-3,
            max_iterations: 50,
            require_convergence: false,
        }
    }
}

/// Result of [`best_endurance_speed`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedSearchOutcome {
    pub keas: f64,
    pub mach: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// Equivalent airspeed that maximises L/D at the given weight and altitude.
///
/// `Cd0` depends on Mach, so the speed is found by iterating
/// Mach → Cd0 → best Cl → KEAS → Mach until the Mach change drops below
/// `search.tolerance`. Returns the last iterate with `converged == false`
/// when the budget runs out, or an error if `search.require_convergence`.
pub fn best_endurance_speed(
    ctx: &SizingContext<'_>,
    altitude_ft: f64,
    beta: f64,
    wing_loading: f64,
    search: &SpeedSearch,
) -> Result<SpeedSearchOutcome, SizingError> {
    check_positive(beta, "weight fraction")?;
    check_positive(wing_loading, "wing loading")?;
    let polar = ctx.polar();
    let mut mach = search.seed_mach;
    let mut keas = 0.0;
    let mut residual = f64::INFINITY;

    for iteration in 1..=search.max_iterations {
        let cd0 = zero_lift_drag(mach, altitude_ft)?;
        let cl_star = check_positive(polar.best_lift_coefficient(cd0), "best lift coefficient")?;
        keas = keas_for_dynamic_pressure(beta * wing_loading / cl_star);
        let next = keas_to_mach(ctx.atmosphere, keas, altitude_ft)?;
        if next >= 1.0 {
            return Err(SizingError::domain(format!(
                "best-L/D speed at {altitude_ft} ft is supersonic (Mach {next:.3})"
            )));
        }
        residual = (next - mach).abs();
        mach = next;
        if residual < search.tolerance {
            return Ok(SpeedSearchOutcome {
                keas,
                mach,
                iterations: iteration,
                converged: true,
            });
        }
    }

    let iterations = search.max_iterations;
    if search.require_convergence {
        return Err(SizingError::NonConvergence {
            stage: LoopStage::LoiterSpeed,
            iterations,
            residual,
        });
    }
    log::warn!(
        "best-L/D speed search at {altitude_ft} ft stopped after {iterations} iterations at Mach {mach:.4}"
    );
    Ok(SpeedSearchOutcome {
        keas,
        mach,
        iterations,
        converged: false,
    })
}

/// Loiter for `time_min` at constant altitude and best-L/D speed.
#[derive(Debug, Clone, PartialEq)]
pub struct Loiter {
    pub altitude_ft: f64,
    pub time_min: f64,
    pub search: SpeedSearch,
}

impl Loiter {
    pub fn new(altitude_ft: f64, time_min: f64) -> Result<Self, SizingError> {
        require_non_negative(time_min, "loiter time")?;
        Ok(Self {
            altitude_ft,
            time_min,
            search: SpeedSearch::default(),
        })
    }

    fn condition(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<FlightCondition, SizingError> {
        let best = best_endurance_speed(ctx, self.altitude_ft, beta, wing_loading, &self.search)?;
        ctx.condition(Airspeed::Keas(best.keas), self.altitude_ft)
    }
}

impl SegmentPhysics for Loiter {
    fn kind(&self) -> SegmentKind {
        SegmentKind::Loiter
    }

    /// Endurance relation at best L/D: `exp(−tsfc·t·(K2 + 2√(K1·Cd0)))`.
    fn weight_fraction_ratio(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
        _thrust_to_weight: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.condition(ctx, beta, wing_loading)?;
        let drag_to_lift = ctx.polar().min_drag_to_lift(condition.cd0);
        checked_ratio(
            (-condition.tsfc * minutes_to_seconds(self.time_min) * drag_to_lift).exp(),
            "loiter",
        )
    }

    fn required_thrust_to_weight(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.condition(ctx, beta, wing_loading)?;
        constraint_thrust_to_weight(ctx, beta, &condition, wing_loading, 1.0, 0.0)
    }

    fn lift_coefficient(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.condition(ctx, beta, wing_loading)?;
        lift_coefficient(beta, wing_loading, condition.dynamic_pressure, 1.0)
    }

    fn drag_coefficient(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.condition(ctx, beta, wing_loading)?;
        let cl = lift_coefficient(beta, wing_loading, condition.dynamic_pressure, 1.0)?;
        Ok(ctx.polar().drag_coefficient(condition.cd0, cl))
    }

    fn lift_to_drag(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.condition(ctx, beta, wing_loading)?;
        let cl = lift_coefficient(beta, wing_loading, condition.dynamic_pressure, 1.0)?;
        Ok(ctx.polar().lift_to_drag(condition.cd0, cl)?)
    }

    fn thrust_lapse(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        Ok(self.condition(ctx, beta, wing_loading)?.thrust_lapse)
    }

    fn specific_fuel_consumption(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        Ok(self.condition(ctx, beta, wing_loading)?.tsfc)
    }
}
