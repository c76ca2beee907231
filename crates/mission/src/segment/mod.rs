//! Segment physics models, one per mission-phase kind.
//!
//! Every model implements [`SegmentPhysics`]. Capabilities that do not apply
//! to a kind return an explicit constant in that model's impl, so the
//! evaluator and envelope analyzer can treat all segments alike.

mod acceleration;
mod approach;
mod climb;
mod cruise;
mod landing;
mod loiter;
mod takeoff;
mod taxi;

pub use acceleration::Acceleration;
pub use approach::Approach;
pub use climb::{Climb, ClimbGradient};
pub use cruise::Cruise;
pub use landing::Landing;
pub use loiter::{Loiter, SpeedSearch, SpeedSearchOutcome, best_endurance_speed};
pub use takeoff::Takeoff;
pub use taxi::Taxi;

use std::fmt;

use serde::Serialize;
use sizing_config::PhaseNumber;

use crate::context::{FlightCondition, SizingContext};
use crate::error::SizingError;

/// Segment kind, derived from the model and the sign of its climb rate or speed change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SegmentKind {
    Taxi,
    Takeoff,
    Climb,
    Descent,
    Acceleration,
    Deceleration,
    Cruise,
    Loiter,
    Approach,
    Landing,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Capability interface shared by all segment models.
///
/// `beta` is the weight fraction at the start of the segment and
/// `wing_loading` the takeoff wing loading WSR (lb/ft²).
pub trait SegmentPhysics {
    fn kind(&self) -> SegmentKind;

    /// End-of-segment over start-of-segment weight, in (0, 1].
    fn weight_fraction_ratio(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
        thrust_to_weight: f64,
    ) -> Result<f64, SizingError>;

    /// Sea-level static thrust-to-weight required to fly the segment.
    /// `f64::INFINITY` marks a wing loading no thrust can satisfy.
    fn required_thrust_to_weight(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError>;

    fn lift_coefficient(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError>;

    fn drag_coefficient(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError>;

    fn lift_to_drag(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError>;

    fn thrust_lapse(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError>;

    /// Thrust-specific fuel consumption (1/s).
    fn specific_fuel_consumption(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError>;
}

/// Closed set of segment models.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentModel {
    Taxi(Taxi),
    Takeoff(Takeoff),
    Climb(Climb),
    Acceleration(Acceleration),
    Cruise(Cruise),
    Loiter(Loiter),
    Approach(Approach),
    Landing(Landing),
}

macro_rules! dispatch {
    ($self:ident, $model:ident => $call:expr) => {
        match $self {
            SegmentModel::Taxi($model) => $call,
            SegmentModel::Takeoff($model) => $call,
            SegmentModel::Climb($model) => $call,
            SegmentModel::Acceleration($model) => $call,
            SegmentModel::Cruise($model) => $call,
            SegmentModel::Loiter($model) => $call,
            SegmentModel::Approach($model) => $call,
            SegmentModel::Landing($model) => $call,
        }
    };
}

impl SegmentPhysics for SegmentModel {
    fn kind(&self) -> SegmentKind {
        dispatch!(self, m => m.kind())
    }

    fn weight_fraction_ratio(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
        thrust_to_weight: f64,
    ) -> Result<f64, SizingError> {
        dispatch!(self, m => m.weight_fraction_ratio(ctx, beta, wing_loading, thrust_to_weight))
    }

    fn required_thrust_to_weight(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        dispatch!(self, m => m.required_thrust_to_weight(ctx, beta, wing_loading))
    }

    fn lift_coefficient(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        dispatch!(self, m => m.lift_coefficient(ctx, beta, wing_loading))
    }

    fn drag_coefficient(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        dispatch!(self, m => m.drag_coefficient(ctx, beta, wing_loading))
    }

    fn lift_to_drag(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        dispatch!(self, m => m.lift_to_drag(ctx, beta, wing_loading))
    }

    fn thrust_lapse(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        dispatch!(self, m => m.thrust_lapse(ctx, beta, wing_loading))
    }

    fn specific_fuel_consumption(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        dispatch!(self, m => m.specific_fuel_consumption(ctx, beta, wing_loading))
    }
}

/// One mission phase: identity, start-of-segment weight fraction, and its physics model.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub phase: PhaseNumber,
    pub name: String,
    /// Weight fraction β at the start of the segment.
    pub weight_fraction: f64,
    pub model: SegmentModel,
}

impl Segment {
    pub fn new(phase: impl Into<PhaseNumber>, name: impl Into<String>, model: SegmentModel) -> Self {
        Self {
            phase: phase.into(),
            name: name.into(),
            weight_fraction: 1.0,
            model,
        }
    }

    pub fn with_weight_fraction(mut self, weight_fraction: f64) -> Self {
        self.weight_fraction = weight_fraction;
        self
    }

    pub fn kind(&self) -> SegmentKind {
        self.model.kind()
    }

    /// β ratio at this segment's own start weight fraction.
    pub fn weight_fraction_ratio(
        &self,
        ctx: &SizingContext<'_>,
        wing_loading: f64,
        thrust_to_weight: f64,
    ) -> Result<f64, SizingError> {
        self.model
            .weight_fraction_ratio(ctx, self.weight_fraction, wing_loading, thrust_to_weight)
    }

    /// Required T/W at this segment's own start weight fraction.
    pub fn required_thrust_to_weight(
        &self,
        ctx: &SizingContext<'_>,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        self.model
            .required_thrust_to_weight(ctx, self.weight_fraction, wing_loading)
    }

    /// Required T/W evaluated across a wing-loading sweep.
    pub fn thrust_to_weight_curve(
        &self,
        ctx: &SizingContext<'_>,
        wing_loadings: &[f64],
    ) -> Result<Vec<f64>, SizingError> {
        wing_loadings
            .iter()
            .map(|&wsr| self.required_thrust_to_weight(ctx, wsr))
            .collect()
    }

    /// Landing wing-loading bound, if this is a landing segment.
    pub fn landing_wing_loading(&self) -> Option<f64> {
        match &self.model {
            SegmentModel::Landing(landing) => Some(landing.landing_wing_loading(self.weight_fraction)),
            _ => None,
        }
    }
}

/// Constraint T/W from the master equation with load factor `n` and an
/// additive excess-power term (climb gradient, acceleration, or glide slope).
///
/// `(β/α)·(K1·n²·β·WSR/q + K2·n + Cd0/(β·WSR/q) + excess)`
pub(crate) fn constraint_thrust_to_weight(
    ctx: &SizingContext<'_>,
    beta: f64,
    condition: &FlightCondition,
    wing_loading: f64,
    load_factor: f64,
    excess: f64,
) -> Result<f64, SizingError> {
    check_positive(beta, "weight fraction")?;
    check_positive(wing_loading, "wing loading")?;
    let q = check_positive(condition.dynamic_pressure, "dynamic pressure")?;
    let alpha = check_positive(condition.thrust_lapse, "thrust lapse")?;
    let polar = ctx.polar();
    let loading = beta * wing_loading / q;
    let twr = (beta / alpha)
        * (polar.k1 * load_factor * load_factor * loading
            + polar.k2 * load_factor
            + condition.cd0 / loading
            + excess);
    crate::error::ensure_finite(twr, "required thrust-to-weight")
}

/// Lift coefficient `n·β·WSR/q`.
pub(crate) fn lift_coefficient(
    beta: f64,
    wing_loading: f64,
    dynamic_pressure: f64,
    load_factor: f64,
) -> Result<f64, SizingError> {
    check_positive(dynamic_pressure, "dynamic pressure")?;
    Ok(load_factor * beta * wing_loading / dynamic_pressure)
}

/// Fuel-to-drag correction `u = Cd·β/(α·Cl·TWR)` used by the energy method.
pub(crate) fn drag_correction(
    cd: f64,
    cl: f64,
    beta: f64,
    thrust_lapse: f64,
    thrust_to_weight: f64,
) -> Result<f64, SizingError> {
    check_positive(cl, "lift coefficient")?;
    check_positive(thrust_lapse, "thrust lapse")?;
    check_positive(thrust_to_weight, "thrust-to-weight")?;
    let u = cd * beta / (thrust_lapse * cl * thrust_to_weight);
    if u >= 1.0 {
        return Err(SizingError::domain(format!(
            "available thrust does not exceed drag (u = {u:.4})"
        )));
    }
    Ok(u)
}

pub(crate) fn check_positive(value: f64, what: &str) -> Result<f64, SizingError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SizingError::domain(format!("{what} must be positive (got {value})")))
    }
}

/// Ensure a computed β ratio lies in (0, 1].
pub(crate) fn checked_ratio(ratio: f64, what: &str) -> Result<f64, SizingError> {
    if ratio.is_finite() && ratio > 0.0 && ratio <= 1.0 {
        Ok(ratio)
    } else {
        Err(SizingError::domain(format!(
            "{what} weight fraction ratio {ratio} outside (0, 1]"
        )))
    }
}

pub(crate) fn require_non_negative(value: f64, what: &str) -> Result<f64, SizingError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SizingError::invalid(format!("{what} must be non-negative (got {value})")))
    }
}

pub(crate) fn require_positive(value: f64, what: &str) -> Result<f64, SizingError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SizingError::invalid(format!("{what} must be positive (got {value})")))
    }
}
