//! Landing: no thrust requirement, only a wing-loading ceiling.

use sizing_atmosphere::speed::dynamic_pressure_keas;

use super::{SegmentKind, SegmentPhysics, require_positive};
use crate::context::{Airspeed, FlightCondition, SizingContext};
use crate::error::SizingError;

/// Landing at `keas` with an approach speed of `landing_speed_factor` times stall.
#[derive(Debug, Clone, PartialEq)]
pub struct Landing {
    pub keas: f64,
    pub cl_max: f64,
    pub landing_speed_factor: f64,
}

impl Landing {
    pub const DEFAULT_CL_MAX: f64 = 3.0;
    pub const DEFAULT_SPEED_FACTOR: f64 = 1.3;

    pub fn new(keas: f64, cl_max: f64, landing_speed_factor: f64) -> Result<Self, SizingError> {
        require_positive(keas, "landing KEAS")?;
        require_positive(cl_max, "Cl max")?;
        require_positive(landing_speed_factor, "landing speed factor")?;
        Ok(Self {
            keas,
            cl_max,
            landing_speed_factor,
        })
    }

    /// Highest takeoff wing loading (lb/ft²) that can still land at `keas`.
    ///
    /// The landing weight fraction is recalibrated as `0.05 + 0.95·β`.
    pub fn landing_wing_loading(&self, beta: f64) -> f64 {
        let beta_landing = 0.05 + 0.95 * beta;
        self.cl_max * dynamic_pressure_keas(self.keas)
            / (beta_landing * self.landing_speed_factor * self.landing_speed_factor)
    }

    fn touchdown_lift_coefficient(&self) -> f64 {
        self.cl_max / (self.landing_speed_factor * self.landing_speed_factor)
    }

    fn condition(&self, ctx: &SizingContext<'_>) -> Result<FlightCondition, SizingError> {
        ctx.condition(Airspeed::Keas(self.keas), 0.0)
    }
}

impl SegmentPhysics for Landing {
    fn kind(&self) -> SegmentKind {
        SegmentKind::Landing
    }

    fn weight_fraction_ratio(
        &self,
        _ctx: &SizingContext<'_>,
        _beta: f64,
        _wing_loading: f64,
        _thrust_to_weight: f64,
    ) -> Result<f64, SizingError> {
        Ok(1.0)
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
        Ok(self.touchdown_lift_coefficient())
    }

    fn drag_coefficient(
        &self,
        ctx: &SizingContext<'_>,
        _beta: f64,
        _wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.condition(ctx)?;
        Ok(ctx
            .polar()
            .drag_coefficient(condition.cd0, self.touchdown_lift_coefficient()))
    }

    fn lift_to_drag(
        &self,
        ctx: &SizingContext<'_>,
        _beta: f64,
        _wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.condition(ctx)?;
        Ok(ctx
            .polar()
            .lift_to_drag(condition.cd0, self.touchdown_lift_coefficient())?)
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
