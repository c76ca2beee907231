//! Mission profile evaluation: propagate the weight fraction β through the
//! segment list, sub-stepping the legs whose governing quantities drift.

use serde::Serialize;

use crate::context::SizingContext;
use crate::error::SizingError;
use crate::segment::{
    Acceleration, Approach, Climb, Cruise, Segment, SegmentKind, SegmentModel, SegmentPhysics,
};

/// Numerical integration step sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntegrationSettings {
    /// Altitude increment for climbs (ft).
    pub climb_step_ft: f64,
    /// Speed increment for accelerations (kt).
    pub acceleration_step_kt: f64,
    /// Number of equal range slices per cruise.
    pub cruise_steps: usize,
    /// Altitude decrement for approaches (ft).
    pub approach_step_ft: f64,
}

impl Default for IntegrationSettings {
    fn default() -> Self {
        Self {
            climb_step_ft: 500.0,
            acceleration_step_kt: 5.0,
            cruise_steps: 10,
            approach_step_ft: 100.0,
        }
    }
}

impl IntegrationSettings {
    pub fn validate(&self) -> Result<(), SizingError> {
        for (value, what) in [
            (self.climb_step_ft, "climb step"),
            (self.acceleration_step_kt, "acceleration step"),
            (self.approach_step_ft, "approach step"),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SizingError::invalid(format!(
                    "{what} must be positive (got {value})"
                )));
            }
        }
        if self.cruise_steps == 0 {
            return Err(SizingError::invalid("cruise needs at least one integration step"));
        }
        Ok(())
    }

    /// Same settings with every step halved (twice as many cruise slices).
    pub fn refined(&self) -> Self {
        Self {
            climb_step_ft: self.climb_step_ft / 2.0,
            acceleration_step_kt: self.acceleration_step_kt / 2.0,
            cruise_steps: self.cruise_steps * 2,
            approach_step_ft: self.approach_step_ft / 2.0,
        }
    }
}

/// Result of one pass over the mission.
#[derive(Debug, Clone)]
pub struct MissionEvaluation {
    /// Copies of the input segments with `weight_fraction` set to the β at their start.
    pub segments: Vec<Segment>,
    /// β at the end of each segment, in mission order.
    pub weight_fractions: Vec<f64>,
}

impl MissionEvaluation {
    /// β after the last segment (1.0 for an empty mission).
    pub fn final_weight_fraction(&self) -> f64 {
        self.weight_fractions.last().copied().unwrap_or(1.0)
    }
}

/// Walk the mission at a fixed (WSR, TWR) and chain the per-segment β ratios.
///
/// The input segments are left untouched; the evaluation returns new copies
/// carrying their start-of-segment β.
pub fn evaluate(
    ctx: &SizingContext<'_>,
    wing_loading: f64,
    thrust_to_weight: f64,
    segments: &[Segment],
    settings: &IntegrationSettings,
) -> Result<MissionEvaluation, SizingError> {
    settings.validate()?;
    let mut beta = 1.0;
    let mut updated = Vec::with_capacity(segments.len());
    let mut weight_fractions = Vec::with_capacity(segments.len());

    for segment in segments {
        let start = beta;
        beta = integrate(ctx, &segment.model, start, wing_loading, thrust_to_weight, settings)
            .map_err(|err| err.with_phase(&format!("{} ({})", segment.phase, segment.name)))?;
        log::trace!(
            "phase {} '{}': beta {start:.5} -> {beta:.5}",
            segment.phase,
            segment.name
        );
        updated.push(segment.clone().with_weight_fraction(start));
        weight_fractions.push(beta);
    }

    Ok(MissionEvaluation {
        segments: updated,
        weight_fractions,
    })
}

/// β at the end of one segment flown from `beta`.
pub fn integrate(
    ctx: &SizingContext<'_>,
    model: &SegmentModel,
    beta: f64,
    wing_loading: f64,
    thrust_to_weight: f64,
    settings: &IntegrationSettings,
) -> Result<f64, SizingError> {
    match model {
        SegmentModel::Climb(climb) if climb.kind() == SegmentKind::Climb => {
            integrate_climb(ctx, climb, beta, wing_loading, thrust_to_weight, settings.climb_step_ft)
        }
        SegmentModel::Acceleration(accel) if accel.kind() == SegmentKind::Acceleration => {
            integrate_acceleration(
                ctx,
                accel,
                beta,
                wing_loading,
                thrust_to_weight,
                settings.acceleration_step_kt,
            )
        }
        SegmentModel::Cruise(cruise) => {
            integrate_cruise(ctx, cruise, beta, wing_loading, thrust_to_weight, settings.cruise_steps)
        }
        SegmentModel::Approach(approach) => integrate_approach(
            ctx,
            approach,
            beta,
            wing_loading,
            thrust_to_weight,
            settings.approach_step_ft,
        ),
        other => Ok(beta * other.weight_fraction_ratio(ctx, beta, wing_loading, thrust_to_weight)?),
    }
}

// Floating-point slack when deciding whether a leg has been fully covered.
const STEP_EPSILON: f64 = 1e-9;

fn integrate_climb(
    ctx: &SizingContext<'_>,
    climb: &Climb,
    mut beta: f64,
    wing_loading: f64,
    thrust_to_weight: f64,
    step_ft: f64,
) -> Result<f64, SizingError> {
    let mut altitude = climb.start_altitude_ft;
    while climb.end_altitude_ft - altitude > STEP_EPSILON {
        let next = (altitude + step_ft).min(climb.end_altitude_ft);
        beta *= climb
            .with_altitudes(altitude, next)
            .weight_fraction_ratio(ctx, beta, wing_loading, thrust_to_weight)?;
        altitude = next;
    }
    Ok(beta)
}

fn integrate_acceleration(
    ctx: &SizingContext<'_>,
    accel: &Acceleration,
    mut beta: f64,
    wing_loading: f64,
    thrust_to_weight: f64,
    step_kt: f64,
) -> Result<f64, SizingError> {
    let mut keas = accel.keas_start;
    while accel.keas_end - keas > STEP_EPSILON {
        let next = (keas + step_kt).min(accel.keas_end);
        beta *= accel
            .with_speeds(keas, next)
            .weight_fraction_ratio(ctx, beta, wing_loading, thrust_to_weight)?;
        keas = next;
    }
    Ok(beta)
}

fn integrate_cruise(
    ctx: &SizingContext<'_>,
    cruise: &Cruise,
    mut beta: f64,
    wing_loading: f64,
    thrust_to_weight: f64,
    steps: usize,
) -> Result<f64, SizingError> {
    let slice = cruise.with_range(cruise.range_nmi / steps as f64);
    for _ in 0..steps {
        beta *= slice.weight_fraction_ratio(ctx, beta, wing_loading, thrust_to_weight)?;
    }
    Ok(beta)
}

fn integrate_approach(
    ctx: &SizingContext<'_>,
    approach: &Approach,
    mut beta: f64,
    wing_loading: f64,
    thrust_to_weight: f64,
    step_ft: f64,
) -> Result<f64, SizingError> {
    let mut altitude = approach.start_altitude_ft;
    while altitude - approach.end_altitude_ft > STEP_EPSILON {
        let next = (altitude - step_ft).max(approach.end_altitude_ft);
        beta *= approach
            .with_altitudes(altitude, next)
            .weight_fraction_ratio(ctx, beta, wing_loading, thrust_to_weight)?;
        altitude = next;
    }
    Ok(beta)
}
