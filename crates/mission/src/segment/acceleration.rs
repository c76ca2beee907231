//! Level acceleration or deceleration between two equivalent airspeeds.

use sizing_core::constants::G0_FT_S2;
use sizing_core::units::kt_to_ft_s;

use super::{
    SegmentKind, SegmentPhysics, check_positive, checked_ratio, constraint_thrust_to_weight,
    drag_correction, lift_coefficient, require_positive,
};
use crate::context::{Airspeed, FlightCondition, SizingContext};
use crate::error::SizingError;

/// Level speed change at a fixed altitude over `time_s`.
#[derive(Debug, Clone, PartialEq)]
pub struct Acceleration {
    pub keas_start: f64,
    pub keas_end: f64,
    pub time_s: f64,
    pub altitude_ft: f64,
}

impl Acceleration {
    pub fn new(
        keas_start: f64,
        keas_end: f64,
        time_s: f64,
        altitude_ft: f64,
    ) -> Result<Self, SizingError> {
        require_positive(keas_start, "start KEAS")?;
        require_positive(keas_end, "end KEAS")?;
        require_positive(time_s, "acceleration time")?;
        Ok(Self {
            keas_start,
            keas_end,
            time_s,
            altitude_ft,
        })
    }

    /// Sub-interval of the speed range, keeping the average acceleration.
    pub fn with_speeds(&self, keas_start: f64, keas_end: f64) -> Self {
        let span = self.keas_end - self.keas_start;
        let time_s = if span != 0.0 {
            self.time_s * (keas_end - keas_start) / span
        } else {
            self.time_s
        };
        Self {
            keas_start,
            keas_end,
            time_s,
            altitude_ft: self.altitude_ft,
        }
    }

    fn endpoints(
        &self,
        ctx: &SizingContext<'_>,
    ) -> Result<(FlightCondition, FlightCondition), SizingError> {
        Ok((
            ctx.condition(Airspeed::Keas(self.keas_start), self.altitude_ft)?,
            ctx.condition(Airspeed::Keas(self.keas_end), self.altitude_ft)?,
        ))
    }

    fn average(&self, ctx: &SizingContext<'_>) -> Result<FlightCondition, SizingError> {
        let (start, end) = self.endpoints(ctx)?;
        Ok(start.mean(&end))
    }

    /// Average longitudinal acceleration in g.
    fn acceleration_term(&self) -> f64 {
        kt_to_ft_s(self.keas_end - self.keas_start) / (self.time_s * G0_FT_S2)
    }
}

impl SegmentPhysics for Acceleration {
    fn kind(&self) -> SegmentKind {
        if self.keas_end > self.keas_start {
            SegmentKind::Acceleration
        } else {
            SegmentKind::Deceleration
        }
    }

    /// Kinetic-energy gain over the segment; decelerations burn no fuel.
    fn weight_fraction_ratio(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
        thrust_to_weight: f64,
    ) -> Result<f64, SizingError> {
        if self.kind() == SegmentKind::Deceleration {
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
            "acceleration",
        )
    }

    fn required_thrust_to_weight(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        if self.kind() == SegmentKind::Deceleration {
            return Ok(0.0);
        }
        let average = self.average(ctx)?;
        constraint_thrust_to_weight(
            ctx,
            beta,
            &average,
            wing_loading,
            1.0,
            self.acceleration_term(),
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
