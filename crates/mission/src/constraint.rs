//! Constraint envelope: required T/W of every segment swept over wing loading.

use serde::Serialize;
use sizing_config::PhaseNumber;

use crate::context::{Airspeed, SizingContext};
use crate::error::SizingError;
use crate::segment::{Climb, ClimbGradient, Cruise, Segment, SegmentPhysics, Takeoff};

/// Uniform wing-loading sweep (lb/ft²).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WingLoadingGrid {
    pub min: f64,
    pub max: f64,
    pub points: usize,
}

impl Default for WingLoadingGrid {
    fn default() -> Self {
        Self {
            min: 30.0,
            max: 170.0,
            points: 700,
        }
    }
}

impl WingLoadingGrid {
    pub fn new(min: f64, max: f64, points: usize) -> Result<Self, SizingError> {
        let grid = Self { min, max, points };
        grid.validate()?;
        Ok(grid)
    }

    pub fn validate(&self) -> Result<(), SizingError> {
        if !(self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.max > self.min)
        {
            return Err(SizingError::invalid(format!(
                "wing-loading grid needs 0 < min < max (got {} to {})",
                self.min, self.max
            )));
        }
        if self.points < 2 {
            return Err(SizingError::invalid("wing-loading grid needs at least two points"));
        }
        Ok(())
    }

    pub fn spacing(&self) -> f64 {
        (self.max - self.min) / (self.points - 1) as f64
    }

    pub fn values(&self) -> Vec<f64> {
        let spacing = self.spacing();
        (0..self.points)
            .map(|i| self.min + spacing * i as f64)
            .collect()
    }

    /// Index of the grid point closest to `wing_loading`, clamped to the grid.
    pub fn nearest_index(&self, wing_loading: f64) -> usize {
        let position = ((wing_loading - self.min) / self.spacing()).round();
        position.clamp(0.0, (self.points - 1) as f64) as usize
    }
}

/// Constraints flown outside the mission itself.
///
/// The first three are evaluated at the top-of-climb weight fraction; the
/// one-engine-inoperative climb at takeoff weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuxiliaryConstraints {
    pub service_ceiling_ft: f64,
    pub service_ceiling_mach: f64,
    /// Residual climb rate defining the ceiling (ft/min).
    pub service_ceiling_climb_rate_ft_min: f64,
    pub max_mach: f64,
    pub max_mach_altitude_ft: f64,
    pub turn_altitude_ft: f64,
    pub turn_mach: f64,
    pub turn_bank_angle_deg: f64,
    /// Climb gradient (rise over run) with one engine out.
    pub engine_out_gradient: f64,
    /// Climb speed as a multiple of the liftoff speed.
    pub engine_out_speed_factor: f64,
    pub engine_out_end_altitude_ft: f64,
    /// Installed over remaining thrust, 2 for a twin.
    pub engine_out_thrust_factor: f64,
}

impl Default for AuxiliaryConstraints {
    fn default() -> Self {
        Self {
            service_ceiling_ft: 41_000.0,
            service_ceiling_mach: 0.78,
            service_ceiling_climb_rate_ft_min: 300.0,
            max_mach: 0.82,
            max_mach_altitude_ft: 35_000.0,
            turn_altitude_ft: 39_000.0,
            turn_mach: 0.78,
            turn_bank_angle_deg: 45.0,
            engine_out_gradient: 0.05,
            engine_out_speed_factor: 1.2,
            engine_out_end_altitude_ft: 3_000.0,
            engine_out_thrust_factor: 2.0,
        }
    }
}

impl AuxiliaryConstraints {
    pub const SERVICE_CEILING: &'static str = "Service Ceiling";
    pub const MAX_MACH: &'static str = "Maximum Mach Number";
    pub const STEEP_TURN: &'static str = "Steep Turn";
    pub const ENGINE_OUT_CLIMB: &'static str = "Climb with one engine";

    /// Required-T/W curves over `grid`.
    pub fn curves(
        &self,
        ctx: &SizingContext<'_>,
        grid: &[f64],
        top_of_climb_fraction: f64,
    ) -> Result<Vec<ConstraintCurve>, SizingError> {
        let ceiling = Climb::new(
            self.service_ceiling_ft,
            self.service_ceiling_ft,
            Airspeed::Mach(self.service_ceiling_mach),
            ClimbGradient::Rate(self.service_ceiling_climb_rate_ft_min),
        )?;
        let dash = Cruise::new(
            self.max_mach_altitude_ft,
            0.0,
            Airspeed::Mach(self.max_mach),
            0.0,
        )?;
        let turn = Cruise::new(
            self.turn_altitude_ft,
            0.0,
            Airspeed::Mach(self.turn_mach),
            self.turn_bank_angle_deg,
        )?;

        let sweep = |model: &dyn SegmentPhysics| -> Result<Vec<f64>, SizingError> {
            grid.iter()
                .map(|&wsr| model.required_thrust_to_weight(ctx, top_of_climb_fraction, wsr))
                .collect()
        };

        Ok(vec![
            ConstraintCurve::auxiliary(Self::SERVICE_CEILING, sweep(&ceiling)?),
            ConstraintCurve::auxiliary(Self::MAX_MACH, sweep(&dash)?),
            ConstraintCurve::auxiliary(Self::STEEP_TURN, sweep(&turn)?),
            ConstraintCurve::auxiliary(Self::ENGINE_OUT_CLIMB, self.engine_out_curve(ctx, grid)?),
        ])
    }

    fn engine_out_curve(
        &self,
        ctx: &SizingContext<'_>,
        grid: &[f64],
    ) -> Result<Vec<f64>, SizingError> {
        let liftoff = Takeoff::new(5_500.0, 35.0)?;
        let angle_deg = self.engine_out_gradient.atan().to_degrees();
        grid.iter()
            .map(|&wsr| {
                let keas = self.engine_out_speed_factor * liftoff.takeoff_keas(1.0, wsr);
                let climb = Climb::new(
                    0.0,
                    self.engine_out_end_altitude_ft,
                    Airspeed::Keas(keas),
                    ClimbGradient::Angle(angle_deg),
                )?;
                Ok(self.engine_out_thrust_factor * climb.required_thrust_to_weight(ctx, 1.0, wsr)?)
            })
            .collect()
    }
}

/// Envelope analysis options.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSettings {
    pub grid: WingLoadingGrid,
    /// Phase whose start β feeds the auxiliary constraints.
    pub top_of_climb: Option<PhaseNumber>,
    /// β used when no top-of-climb phase is named.
    pub top_of_climb_fallback: f64,
    pub auxiliary: Option<AuxiliaryConstraints>,
}

impl Default for ConstraintSettings {
    fn default() -> Self {
        Self {
            grid: WingLoadingGrid::default(),
            top_of_climb: None,
            top_of_climb_fallback: 0.95,
            auxiliary: Some(AuxiliaryConstraints::default()),
        }
    }
}

/// One required-T/W curve over the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintCurve {
    pub name: String,
    /// Mission phase the curve comes from; `None` for auxiliary constraints.
    pub phase: Option<PhaseNumber>,
    pub values: Vec<f64>,
}

impl ConstraintCurve {
    fn auxiliary(name: &str, values: Vec<f64>) -> Self {
        Self {
            name: name.to_string(),
            phase: None,
            values,
        }
    }
}

/// A (WSR, TWR) pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DesignPoint {
    pub wing_loading: f64,
    pub thrust_to_weight: f64,
}

/// Full output of one envelope analysis.
#[derive(Debug, Clone, Serialize)]
pub struct EnvelopeAnalysis {
    /// Design point after the landing override.
    pub design: DesignPoint,
    /// Minimum of the envelope before the landing override.
    pub unconstrained: DesignPoint,
    pub grid: Vec<f64>,
    pub curves: Vec<ConstraintCurve>,
    /// Pointwise maximum of all curves.
    pub envelope: Vec<f64>,
    pub landing_wing_loading: Option<f64>,
    pub landing_limited: bool,
    /// Name of the curve setting the envelope at the design point.
    pub active_constraint: String,
    pub top_of_climb_fraction: f64,
}

/// Sweep every segment's required T/W over the grid, envelope it, and pick the design point.
///
/// Segments are read at the `weight_fraction` they carry, normally the
/// start-of-segment β from the last mission evaluation.
pub fn analyze(
    ctx: &SizingContext<'_>,
    segments: &[Segment],
    settings: &ConstraintSettings,
) -> Result<EnvelopeAnalysis, SizingError> {
    if segments.is_empty() {
        return Err(SizingError::EmptyMission);
    }
    settings.grid.validate()?;
    let grid = settings.grid.values();

    let mut curves = segments
        .iter()
        .map(|segment| {
            Ok(ConstraintCurve {
                name: segment.name.clone(),
                phase: Some(segment.phase.clone()),
                values: segment.thrust_to_weight_curve(ctx, &grid)?,
            })
        })
        .collect::<Result<Vec<_>, SizingError>>()?;

    let top_of_climb_fraction = match &settings.top_of_climb {
        Some(label) => segments
            .iter()
            .find(|segment| &segment.phase == label)
            .map(|segment| segment.weight_fraction)
            .ok_or_else(|| SizingError::MissingPhase(label.to_string()))?,
        None => settings.top_of_climb_fallback,
    };
    if let Some(auxiliary) = &settings.auxiliary {
        curves.extend(auxiliary.curves(ctx, &grid, top_of_climb_fraction)?);
    }

    let envelope: Vec<f64> = (0..grid.len())
        .map(|i| {
            curves
                .iter()
                .map(|curve| curve.values[i])
                .fold(f64::NEG_INFINITY, f64::max)
        })
        .collect();

    let minimum = envelope
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(index, _)| index)
        .ok_or(SizingError::EmptyMission)?;
    let unconstrained = DesignPoint {
        wing_loading: grid[minimum],
        thrust_to_weight: envelope[minimum],
    };
    if !unconstrained.thrust_to_weight.is_finite() {
        return Err(SizingError::domain(format!(
            "no wing loading in [{}, {}] lb/ft² satisfies every constraint",
            settings.grid.min, settings.grid.max
        )));
    }

    let landing_wing_loading = segments
        .iter()
        .filter_map(Segment::landing_wing_loading)
        .reduce(f64::min);

    let (design, design_index, landing_limited) = match landing_wing_loading {
        Some(landing) if unconstrained.wing_loading > landing => {
            let index = settings.grid.nearest_index(landing);
            if (grid[index] - landing).abs() > settings.grid.spacing() {
                return Err(SizingError::LandingOutsideGrid {
                    landing,
                    min: settings.grid.min,
                    max: settings.grid.max,
                });
            }
            log::debug!(
                "landing limits wing loading to {landing:.2} lb/ft² (unconstrained {:.2})",
                unconstrained.wing_loading
            );
            if !envelope[index].is_finite() {
                return Err(SizingError::domain(format!(
                    "landing wing loading {landing:.2} lb/ft² is infeasible for another constraint"
                )));
            }
            let design = DesignPoint {
                wing_loading: landing,
                thrust_to_weight: envelope[index],
            };
            (design, index, true)
        }
        _ => (unconstrained, minimum, false),
    };

    let active_constraint = curves
        .iter()
        .max_by(|a, b| a.values[design_index].total_cmp(&b.values[design_index]))
        .map(|curve| curve.name.clone())
        .unwrap_or_default();

    Ok(EnvelopeAnalysis {
        design,
        unconstrained,
        grid,
        curves,
        envelope,
        landing_wing_loading,
        landing_limited,
        active_constraint,
        top_of_climb_fraction,
    })
}
