//! Climb and descent between two altitudes at constant KEAS or constant Mach.

use super::{
    SegmentKind, SegmentPhysics, check_positive, checked_ratio, constraint_thrust_to_weight,
    drag_correction, lift_coefficient,
};
use crate::context::{Airspeed, FlightCondition, SizingContext};
use crate::error::SizingError;

/// How steeply the segment climbs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClimbGradient {
    /// Rate of climb (ft/min); negative for descent.
    Rate(f64),
    /// Flight-path angle (degrees); negative for descent.
    Angle(f64),
}

impl ClimbGradient {
    /// Build from a pair of optional inputs, requiring exactly one.
    pub fn exactly_one(
        climb_rate_ft_min: Option<f64>,
        flight_path_angle_deg: Option<f64>,
    ) -> Result<Self, SizingError> {
        match (climb_rate_ft_min, flight_path_angle_deg) {
            (Some(rate), None) => Ok(ClimbGradient::Rate(rate)),
            (None, Some(angle)) => Ok(ClimbGradient::Angle(angle)),
            (Some(_), Some(_)) => Err(SizingError::invalid(
                "both climb rate and flight-path angle given; exactly one must be set",
            )),
            (None, None) => Err(SizingError::invalid(
                "neither climb rate nor flight-path angle given; exactly one must be set",
            )),
        }
    }

    fn is_descent(&self) -> bool {
        match *self {
            ClimbGradient::Rate(rate) => rate < 0.0,
            ClimbGradient::Angle(angle) => angle < 0.0,
        }
    }
}

/// Climb (or descent, by sign of the gradient) from `start_altitude_ft` to `end_altitude_ft`.
#[derive(Debug, Clone, PartialEq)]
pub struct Climb {
    pub start_altitude_ft: f64,
    pub end_altitude_ft: f64,
    pub airspeed: Airspeed,
    pub gradient: ClimbGradient,
}

impl Climb {
    pub fn new(
        start_altitude_ft: f64,
        end_altitude_ft: f64,
        airspeed: Airspeed,
        gradient: ClimbGradient,
    ) -> Result<Self, SizingError> {
        airspeed.validate()?;
        let finite = match gradient {
            ClimbGradient::Rate(rate) => rate.is_finite(),
            ClimbGradient::Angle(angle) => angle.is_finite() && angle.abs() < 90.0,
        };
        if !finite {
            return Err(SizingError::invalid(format!("unsupported climb gradient {gradient:?}")));
        }
        if !(start_altitude_ft.is_finite() && end_altitude_ft.is_finite()) {
            return Err(SizingError::invalid("climb altitudes must be finite"));
        }
        let climb = Self {
            start_altitude_ft,
            end_altitude_ft,
            airspeed,
            gradient,
        };
        let descending = climb.kind() == SegmentKind::Descent;
        if descending && end_altitude_ft > start_altitude_ft {
            return Err(SizingError::invalid(format!(
                "descent from {start_altitude_ft} ft cannot end higher at {end_altitude_ft} ft"
            )));
        }
        if !descending && end_altitude_ft < start_altitude_ft {
            return Err(SizingError::invalid(format!(
                "climb from {start_altitude_ft} ft cannot end lower at {end_altitude_ft} ft"
            )));
        }
        Ok(climb)
    }

    /// Same schedule over a sub-range of altitudes.
    pub fn with_altitudes(&self, start_altitude_ft: f64, end_altitude_ft: f64) -> Self {
        Self {
            start_altitude_ft,
            end_altitude_ft,
            ..self.clone()
        }
    }

    fn endpoints(
        &self,
        ctx: &SizingContext<'_>,
    ) -> Result<(FlightCondition, FlightCondition), SizingError> {
        Ok((
            ctx.condition(self.airspeed, self.start_altitude_ft)?,
            ctx.condition(self.airspeed, self.end_altitude_ft)?,
        ))
    }

    fn average(&self, ctx: &SizingContext<'_>) -> Result<FlightCondition, SizingError> {
        let (start, end) = self.endpoints(ctx)?;
        Ok(start.mean(&end))
    }

    /// Excess specific power term of the master equation.
    fn gradient_term(&self, average: &FlightCondition) -> Result<f64, SizingError> {
        match self.gradient {
            ClimbGradient::Rate(rate) => {
                let tas = check_positive(average.tas_ft_s, "true airspeed")?;
                Ok(sizing_core::units::ft_min_to_ft_s(rate) / tas)
            }
            ClimbGradient::Angle(angle) => Ok(angle.to_radians().sin()),
        }
    }
}

impl SegmentPhysics for Climb {
    fn kind(&self) -> SegmentKind {
        if self.gradient.is_descent() {
            SegmentKind::Descent
        } else {
            SegmentKind::Climb
        }
    }

    /// Energy-height method between the two endpoints; descents burn no fuel.
    fn weight_fraction_ratio(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
        thrust_to_weight: f64,
    ) -> Result<f64, SizingError> {
        if self.kind() == SegmentKind::Descent {
            return Ok(1.0);
        }
        let (start, end) = self.endpoints(ctx)?;
        let average = start.mean(&end);
        let cl = lift_coefficient(beta, wing_loading, average.dynamic_pressure, 1.0)?;
        let cd = ctx.polar().drag_coefficient(average.cd0, cl);
        let u = drag_correction(cd, cl, beta, average.thrust_lapse, thrust_to_weight)?;
        let tas = check_positive(average.tas_ft_s, "true airspeed")?;
        let energy_gain = end.energy_height_ft() - start.energy_height_ft();
        checked_ratio(
            (-average.tsfc / tas * energy_gain / (1.0 - u)).exp(),
            "climb",
        )
    }

    fn required_thrust_to_weight(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        if self.kind() == SegmentKind::Descent {
            return Ok(0.0);
        }
        let average = self.average(ctx)?;
        let excess = self.gradient_term(&average)?;
        constraint_thrust_to_weight(ctx, beta, &average, wing_loading, 1.0, excess)
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
