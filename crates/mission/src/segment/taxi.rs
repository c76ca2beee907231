//! Ground taxi at reduced power.

use sizing_core::units::minutes_to_seconds;

use super::{
    SegmentKind, SegmentPhysics, check_positive, checked_ratio, require_non_negative,
    require_positive,
};
use crate::context::{FlightCondition, SizingContext};
use crate::error::SizingError;

/// Taxi at a fixed fraction of full fuel flow; no aerodynamic forces are modelled.
#[derive(Debug, Clone, PartialEq)]
pub struct Taxi {
    pub time_min: f64,
    pub percent_fuel_flow: f64,
    /// Ground speed (knots, true).
    pub speed_kt: f64,
    pub altitude_ft: f64,
}

impl Taxi {
    pub fn new(
        time_min: f64,
        percent_fuel_flow: f64,
        speed_kt: f64,
        altitude_ft: f64,
    ) -> Result<Self, SizingError> {
        require_non_negative(time_min, "taxi time")?;
        require_positive(percent_fuel_flow, "percent fuel flow")?;
        if percent_fuel_flow > 1.0 {
            return Err(SizingError::invalid(format!(
                "percent fuel flow is a fraction of full power, got {percent_fuel_flow}"
            )));
        }
        require_non_negative(speed_kt, "taxi speed")?;
        Ok(Self {
            time_min,
            percent_fuel_flow,
            speed_kt,
            altitude_ft,
        })
    }

    fn condition(&self, ctx: &SizingContext<'_>) -> Result<FlightCondition, SizingError> {
        ctx.condition_true_airspeed(self.speed_kt, self.altitude_ft)
    }
}

impl SegmentPhysics for Taxi {
    fn kind(&self) -> SegmentKind {
        SegmentKind::Taxi
    }

    fn weight_fraction_ratio(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        _wing_loading: f64,
        thrust_to_weight: f64,
    ) -> Result<f64, SizingError> {
        check_positive(beta, "weight fraction")?;
        let condition = self.condition(ctx)?;
        let burn = condition.tsfc
            * self.percent_fuel_flow
            * thrust_to_weight
            * minutes_to_seconds(self.time_min)
            * condition.thrust_lapse
            / beta;
        checked_ratio(1.0 - burn, "taxi")
    }

    fn required_thrust_to_weight(
        &self,
        _ctx: &SizingContext<'_>,
        _beta: f64,
        _wing_loading: f64,
    ) -> Result<f64, SizingError> {
        Ok(0.0)
    }

    fn lift_coefficient(
        &self,
        _ctx: &SizingContext<'_>,
        _beta: f64,
        _wing_loading: f64,
    ) -> Result<f64, SizingError> {
        Ok(0.0)
    }

    fn drag_coefficient(
        &self,
        _ctx: &SizingContext<'_>,
        _beta: f64,
        _wing_loading: f64,
    ) -> Result<f64, SizingError> {
        Ok(0.0)
    }

    fn lift_to_drag(
        &self,
        _ctx: &SizingContext<'_>,
        _beta: f64,
        _wing_loading: f64,
    ) -> Result<f64, SizingError> {
        Ok(0.0)
    }

    fn thrust_lapse(
        &self,
        ctx: &SizingContext<'_>,
        _beta: f64,
        _wing_loading: f64,
    ) -> Result<f64, SizingError> {
        Ok(self.condition(ctx)?.thrust_lapse)
    }

    fn specific_fuel_consumption(
        &self,
        ctx: &SizingContext<'_>,
        _beta: f64,
        _wing_loading: f64,
    ) -> Result<f64, SizingError> {
        Ok(self.condition(ctx)?.tsfc)
    }
}
