//! Steady level or banked cruise.

use sizing_core::units::nmi_to_ft;

use super::{
    SegmentKind, SegmentPhysics, check_positive, checked_ratio, constraint_thrust_to_weight,
    lift_coefficient, require_non_negative,
};
use crate::context::{Airspeed, FlightCondition, SizingContext};
use crate::error::SizingError;

/// Cruise over `range_nmi` at constant altitude and airspeed.
#[derive(Debug, Clone, PartialEq)]
pub struct Cruise {
    pub altitude_ft: f64,
    pub range_nmi: f64,
    pub airspeed: Airspeed,
    pub bank_angle_deg: f64,
}

impl Cruise {
    pub fn new(
        altitude_ft: f64,
        range_nmi: f64,
        airspeed: Airspeed,
        bank_angle_deg: f64,
    ) -> Result<Self, SizingError> {
        airspeed.validate()?;
        require_non_negative(range_nmi, "cruise range")?;
        if !(0.0..90.0).contains(&bank_angle_deg) {
            return Err(SizingError::invalid(format!(
                "bank angle must lie in [0, 90) degrees (got {bank_angle_deg})"
            )));
        }
        Ok(Self {
            altitude_ft,
            range_nmi,
            airspeed,
            bank_angle_deg,
        })
    }

    /// Same cruise flown over a different range.
    pub fn with_range(&self, range_nmi: f64) -> Self {
        Self {
            range_nmi,
            ..self.clone()
        }
    }

    /// Load factor `1/cos(bank)`.
    pub fn load_factor(&self) -> f64 {
        1.0 / self.bank_angle_deg.to_radians().cos()
    }

    fn condition(&self, ctx: &SizingContext<'_>) -> Result<FlightCondition, SizingError> {
        ctx.condition(self.airspeed, self.altitude_ft)
    }

    fn lift(&self, condition: &FlightCondition, beta: f64, wing_loading: f64) -> Result<f64, SizingError> {
        lift_coefficient(beta, wing_loading, condition.dynamic_pressure, self.load_factor())
    }
}

impl SegmentPhysics for Cruise {
    fn kind(&self) -> SegmentKind {
        SegmentKind::Cruise
    }

    /// Breguet range relation over the whole leg.
    fn weight_fraction_ratio(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
        _thrust_to_weight: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.condition(ctx)?;
        let cl = check_positive(self.lift(&condition, beta, wing_loading)?, "lift coefficient")?;
        let cd = ctx.polar().drag_coefficient(condition.cd0, cl);
        let tas = check_positive(condition.tas_ft_s, "true airspeed")?;
        checked_ratio(
            (-condition.tsfc / tas * nmi_to_ft(self.range_nmi) * cd / cl).exp(),
            "cruise",
        )
    }

    fn required_thrust_to_weight(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.condition(ctx)?;
        constraint_thrust_to_weight(ctx, beta, &condition, wing_loading, self.load_factor(), 0.0)
    }

    fn lift_coefficient(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.condition(ctx)?;
        self.lift(&condition, beta, wing_loading)
    }

    fn drag_coefficient(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.condition(ctx)?;
        let cl = self.lift(&condition, beta, wing_loading)?;
        Ok(ctx.polar().drag_coefficient(condition.cd0, cl))
    }

    fn lift_to_drag(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.condition(ctx)?;
        let cl = self.lift(&condition, beta, wing_loading)?;
        Ok(ctx.polar().lift_to_drag(condition.cd0, cl)?)
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
