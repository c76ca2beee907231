//! Takeoff as a ground roll followed by a rotation to the obstacle height.

use sizing_core::constants::{G0_FT_S2, RHO0_SLUG_FT3};
use sizing_core::units::ft_s_to_kt;

use super::{
    SegmentKind, SegmentPhysics, check_positive, checked_ratio, require_non_negative,
    require_positive,
};
use crate::context::{Airspeed, FlightCondition, SizingContext};
use crate::error::SizingError;

/// Takeoff from a runway of given length, clearing an obstacle on a circular-arc rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Takeoff {
    pub takeoff_distance_ft: f64,
    pub obstacle_height_ft: f64,
    /// Ground friction coefficient μ.
    pub friction_coefficient: f64,
    /// Drag coefficient increment of the rolling configuration.
    pub rolling_drag_coefficient: f64,
    pub cl_max: f64,
    /// Liftoff speed as a multiple of stall speed.
    pub speed_factor: f64,
    pub rotation_time_s: f64,
    pub runway_altitude_ft: f64,
}

impl Takeoff {
    pub const DEFAULT_FRICTION: f64 = 0.05;
    pub const DEFAULT_ROLLING_DRAG: f64 = 0.07;
    pub const DEFAULT_CL_MAX: f64 = 2.56;
    pub const DEFAULT_SPEED_FACTOR: f64 = 1.2;
    pub const DEFAULT_ROTATION_TIME_S: f64 = 3.0;

    /// Takeoff with the transport defaults for everything but distance and obstacle.
    pub fn new(takeoff_distance_ft: f64, obstacle_height_ft: f64) -> Result<Self, SizingError> {
        Self {
            takeoff_distance_ft,
            obstacle_height_ft,
            friction_coefficient: Self::DEFAULT_FRICTION,
            rolling_drag_coefficient: Self::DEFAULT_ROLLING_DRAG,
            cl_max: Self::DEFAULT_CL_MAX,
            speed_factor: Self::DEFAULT_SPEED_FACTOR,
            rotation_time_s: Self::DEFAULT_ROTATION_TIME_S,
            runway_altitude_ft: 0.0,
        }
        .validated()
    }

    /// Check a fully specified takeoff.
    pub fn validated(self) -> Result<Self, SizingError> {
        require_positive(self.takeoff_distance_ft, "takeoff distance")?;
        require_non_negative(self.obstacle_height_ft, "obstacle height")?;
        require_non_negative(self.friction_coefficient, "friction coefficient")?;
        require_non_negative(self.rolling_drag_coefficient, "rolling drag coefficient")?;
        require_positive(self.cl_max, "Cl max")?;
        require_non_negative(self.rotation_time_s, "rotation time")?;
        // The rotation arc needs a positive load factor increment: 0.8·kTO² > 1.
        if !self.speed_factor.is_finite() || 0.8 * self.speed_factor * self.speed_factor <= 1.0 {
            return Err(SizingError::invalid(format!(
                "takeoff speed factor {} too low for the rotation model",
                self.speed_factor
            )));
        }
        Ok(self)
    }

    /// Liftoff equivalent airspeed (ft/s) for a weight fraction and wing loading.
    pub fn takeoff_eas_ft_s(&self, beta: f64, wing_loading: f64) -> f64 {
        (self.speed_factor * self.speed_factor * 2.0 * beta * wing_loading
            / (RHO0_SLUG_FT3 * self.cl_max))
            .sqrt()
    }

    /// Liftoff equivalent airspeed (knots).
    pub fn takeoff_keas(&self, beta: f64, wing_loading: f64) -> f64 {
        ft_s_to_kt(self.takeoff_eas_ft_s(beta, wing_loading))
    }

    fn liftoff_condition(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<FlightCondition, SizingError> {
        check_positive(beta, "weight fraction")?;
        check_positive(wing_loading, "wing loading")?;
        ctx.condition(
            Airspeed::Keas(self.takeoff_keas(beta, wing_loading)),
            self.runway_altitude_ft,
        )
    }

    fn rolling_lift_coefficient(&self) -> f64 {
        self.cl_max / (self.speed_factor * self.speed_factor)
    }
}

impl SegmentPhysics for Takeoff {
    fn kind(&self) -> SegmentKind {
        SegmentKind::Takeoff
    }

    /// Acceleration fuel burn chained with a rotation burn at the post-roll weight.
    fn weight_fraction_ratio(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
        thrust_to_weight: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.liftoff_condition(ctx, beta, wing_loading)?;
        check_positive(thrust_to_weight, "thrust-to-weight")?;
        let alpha = check_positive(condition.thrust_lapse, "thrust lapse")?;
        let cl = self.rolling_lift_coefficient();
        let cd = ctx.polar().drag_coefficient(condition.cd0, cl);
        let ksi = cd + self.rolling_drag_coefficient - self.friction_coefficient * cl;
        let u = (ksi / cl + self.friction_coefficient) * beta / (alpha * thrust_to_weight);
        if u >= 1.0 {
            return Err(SizingError::domain(format!(
                "takeoff thrust does not exceed drag and friction (u = {u:.4})"
            )));
        }

        let velocity = self.takeoff_eas_ft_s(beta, wing_loading);
        let acceleration = (-condition.tsfc / G0_FT_S2 * velocity / (1.0 - u)).exp();
        let rotation = 1.0
            - condition.tsfc * alpha / (beta * acceleration)
                * thrust_to_weight
                * self.rotation_time_s;
        checked_ratio(rotation * acceleration, "takeoff")
    }

    /// Ground-roll energy balance; `f64::INFINITY` once rotation and obstacle
    /// clearance alone need the whole runway.
    fn required_thrust_to_weight(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        check_positive(beta, "weight fraction")?;
        check_positive(wing_loading, "wing loading")?;
        let state = ctx.atmosphere.properties(self.runway_altitude_ft)?;
        let rho = state.density_slug_ft3();
        let alpha = ctx.aircraft.engine.thrust_lapse(0.0, state.density_ratio);
        let kto2 = self.speed_factor * self.speed_factor;

        let velocity = (kto2 * 2.0 * beta * wing_loading / (rho * self.cl_max)).sqrt();
        let rotation_distance = self.rotation_time_s * velocity;
        let arc_radius = velocity * velocity / ((0.8 * kto2 - 1.0) * G0_FT_S2);
        let cos_angle = 1.0 - self.obstacle_height_ft / arc_radius;
        if !(-1.0..=1.0).contains(&cos_angle) {
            return Err(SizingError::domain(format!(
                "obstacle height {} ft unreachable on rotation arc of radius {arc_radius:.1} ft",
                self.obstacle_height_ft
            )));
        }
        let obstacle_distance = arc_radius * cos_angle.acos().sin();
        let ground_roll = self.takeoff_distance_ft - obstacle_distance - rotation_distance;
        // Rotation and obstacle clearance use the whole runway: no thrust suffices.
        if ground_roll <= 0.0 {
            return Ok(f64::INFINITY);
        }
        let roll_term = beta * beta * kto2 * wing_loading / (alpha * rho * self.cl_max * G0_FT_S2);
        Ok(roll_term / ground_roll)
    }

    fn lift_coefficient(
        &self,
        _ctx: &SizingContext<'_>,
        _beta: f64,
        _wing_loading: f64,
    ) -> Result<f64, SizingError> {
        Ok(self.rolling_lift_coefficient())
    }

    fn drag_coefficient(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.liftoff_condition(ctx, beta, wing_loading)?;
        Ok(ctx
            .polar()
            .drag_coefficient(condition.cd0, self.rolling_lift_coefficient()))
    }

    fn lift_to_drag(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        let condition = self.liftoff_condition(ctx, beta, wing_loading)?;
        Ok(ctx
            .polar()
            .lift_to_drag(condition.cd0, self.rolling_lift_coefficient())?)
    }

    fn thrust_lapse(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        Ok(self.liftoff_condition(ctx, beta, wing_loading)?.thrust_lapse)
    }

    fn specific_fuel_consumption(
        &self,
        ctx: &SizingContext<'_>,
        beta: f64,
        wing_loading: f64,
    ) -> Result<f64, SizingError> {
        Ok(self.liftoff_condition(ctx, beta, wing_loading)?.tsfc)
    }
}
