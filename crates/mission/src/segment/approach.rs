//! Powered descent on a fixed glide slope at constant KEAS.

use super::{
    SegmentKind, SegmentPhysics, check_positive, checked_ratio, constraint_thrust_to_weight,
    lift_coefficient, require_positive,
};
use crate::context::{Airspeed, FlightCondition, SizingContext};
use crate::error::SizingError;

/// Approach from `start_altitude_ft` down to `end_altitude_ft`.
///
/// The flight-path angle is a descent whatever its sign; only its magnitude
/// enters the relations. The envelope constraint is evaluated at
/// `weight_fraction_constraint`, not at the propagated mission weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Approach {
    pub start_altitude_ft: f64,
    pub end_altitude_ft: f64,
    pub keas: f64,
    pub flight_path_angle_deg: f64,
    pub percent_fuel_flow: f64,
    pub weight_fraction_constraint: f64,
}

impl Approach {
    pub const DEFAULT_PERCENT_FUEL_FLOW: f64 = 0.2;
    pub const DEFAULT_WEIGHT_FRACTION_CONSTRAINT: f64 = 0.85;

    pub fn new(
        start_altitude_ft: f64,
        end_altitude_ft: f64,
        keas: f64,
        flight_path_angle_deg: f64,
    ) -> Result<Self, SizingError> {
        Self {
            start_altitude_ft,
            end_altitude_ft,
            keas,
            flight_path_angle_deg,
            percent_fuel_flow: Self::DEFAULT_PERCENT_FUEL_FLOW,
            weight_fraction_constraint: Self::DEFAULT_WEIGHT_FRACTION_CONSTRAINT,
        }
        .validated()
    }

    pub fn validated(self) -> Result<Self, SizingError> {
        require_positive(self.keas, "approach KEAS")?;
        let angle = self.flight_path_angle_deg.abs();
        if !(angle > 0.0 && angle < 90.0) {
            return Err(SizingError::invalid(format!(
                "approach flight-path angle must be non-zero and below 90 degrees (got {})",
                self.flight_path_angle_deg
            )));
        }
        if !(self.start_altitude_ft.is_finite() && self.end_altitude_ft.is_finite())
            || self.end_altitude_ft > self.start_altitude_ft
        {
            return Err(SizingError::invalid(format!(
                "approach must descend (from {} ft to {} ft)",
                self.start_altitude_ft, self.end_altitude_ft
            )));
        }
        require_positive(self.percent_fuel_flow, "percent fuel flow")?;
        require_positive(self.weight_fraction_constraint, "constraint weight fraction")?;
        Ok(self)
    }

    /// Same approach over a sub-range of altitudes.
    pub fn with_altitudes(&self, start_altitude_ft: f64, end_altitude_ft: f64) -> Self {
        Self {
            start_altitude_ft,
            end_altitude_ft,
            ..self.clone()
        }
    }

    fn glide_slope_sine(&self) -> f64 {
        self.flight_path_angle_deg.abs().to_radians().sin()
    }

    fn average(&self, ctx: &SizingContext<'_>) -> Result<FlightCondition, SizingError> {
        let start = ctx.condition(Airspeed::Keas(self.keas), self.start_altitude_ft)?;
        let end = ctx.condition(Airspeed::Keas(self.keas), self.end_altitude_ft)?;
        Ok(start.mean(&end))
    }
}

impl SegmentPhysics for Approach {
    fn kind(&self) -> SegmentKind {
        SegmentKind::Approach
    }

    /// Fuel flow at reduced power over the time needed to descend the altitude band.
    fn weight_fraction_ratio(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        _wing_loading: f64,
        thrust_to_weight: f64,
    ) -> Result<f64, SizingError> {
        check_positive(beta, "weight fraction")?;
        let average = self.average(ctx)?;
        let descent_rate = check_positive(average.tas_ft_s, "true airspeed")? * self.glide_slope_sine();
        let duration_s = (self.start_altitude_ft - self.end_altitude_ft) / descent_rate;
        let burn = average.tsfc
            * self.percent_fuel_flow
            * thrust_to_weight
            * average.thrust_lapse
            * duration_s
            / beta;
        checked_ratio(1.0 - burn, "approach")
    }

    fn required_thrust_to_weight(
        &self,
        ctx: &SizingContext<'_>,
        _beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let average = self.average(ctx)?;
        constraint_thrust_to_weight(
            ctx,
            self.weight_fraction_constraint,
            &average,
            wing_loading,
            1.0,
            -self.glide_slope_sine(),
        )
    }

    fn lift_coefficient(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let average = self.average(ctx)?;
        lift_coefficient(beta, wing_loading, average.dynamic_pressure, 1.0)
    }

    fn drag_coefficient(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let average = self.average(ctx)?;
        let cl = lift_coefficient(beta, wing_loading, average.dynamic_pressure, 1.0)?;
        Ok(ctx.polar().drag_coefficient(average.cd0, cl))
    }

    fn lift_to_drag(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let average = self.average(ctx)?;
        let cl = lift_coefficient(beta, wing_loading, average.dynamic_pressure, 1.0)?;
        Ok(ctx.polar().lift_to_drag(average.cd0, cl)?)
    }

    fn thrust_lapse(
        &self,
        ctx: &SizingContext<'_>,
        _beta: f64,
        _wing_loading: f64,
    ) -> Result<f64, SizingError> {
        Ok(self.average(ctx)?.thrust_lapse)
    }

    fn specific_fuel_consumption(
        &self,
        ctx: &SizingContext<'_>,
        _beta: f64,
        _wing_loading: f64,
    ) -> Result<f64, SizingError> {
        Ok(self.average(ctx)?.tsfc)
    }
}
