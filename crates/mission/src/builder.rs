//! Build segment models and numeric settings from mission configuration records.

use sizing_atmosphere::{Atmosphere, speed};
use sizing_config::{AltitudeConfig, MissionConfig, PhaseConfig, PhaseNumber};

use crate::constraint::{AuxiliaryConstraints, ConstraintSettings, WingLoadingGrid};
use crate::context::Airspeed;
use crate::convergence::{BetaLoopSettings, TakeoffWeightSettings};
use crate::error::SizingError;
use crate::profile::IntegrationSettings;
use crate::segment::{
    Acceleration, Approach, Climb, ClimbGradient, Cruise, Landing, Loiter, Segment, SegmentModel,
    Takeoff, Taxi,
};

/// Screen height cleared at the end of the takeoff distance when none is given (ft).
const DEFAULT_OBSTACLE_HEIGHT_FT: f64 = 35.0;

/// Build the full segment list of a mission, in file order.
pub fn build_mission(
    config: &MissionConfig,
    atmosphere: &dyn Atmosphere,
) -> Result<Vec<Segment>, SizingError> {
    if config.phases.is_empty() {
        return Err(SizingError::EmptyMission);
    }
    config
        .phases
        .iter()
        .enumerate()
        .map(|(index, phase)| build_segment(phase, index, atmosphere))
        .collect()
}

/// Build one segment. `index` is the zero-based position in the mission and
/// numbers the phase when the record carries no `phase_number`.
pub fn build_segment(
    phase: &PhaseConfig,
    index: usize,
    atmosphere: &dyn Atmosphere,
) -> Result<Segment, SizingError> {
    let number = phase
        .phase_number
        .clone()
        .unwrap_or_else(|| PhaseNumber::from((index + 1).to_string().as_str()));
    let label = format!("{number} ({})", phase.name);
    let model = build_model(phase, &label, atmosphere).map_err(|err| err.with_phase(&label))?;
    if !(phase.weight_fraction.is_finite() && phase.weight_fraction > 0.0) {
        return Err(SizingError::InvalidSegmentConfiguration {
            phase: Some(label),
            reason: format!(
                "initial weight fraction must be positive (got {})",
                phase.weight_fraction
            ),
        });
    }
    Ok(Segment::new(number, phase.name.clone(), model).with_weight_fraction(phase.weight_fraction))
}

fn build_model(
    phase: &PhaseConfig,
    label: &str,
    atmosphere: &dyn Atmosphere,
) -> Result<SegmentModel, SizingError> {
    let need = |value: Option<f64>, parameter: &'static str| {
        value.ok_or_else(|| SizingError::MissingParameter {
            phase: label.to_string(),
            parameter,
        })
    };
    let altitude = |value: Option<AltitudeConfig>,
                    parameter: &'static str|
     -> Result<f64, SizingError> {
        resolve_altitude(value, atmosphere)?.ok_or_else(|| SizingError::MissingParameter {
            phase: label.to_string(),
            parameter,
        })
    };

    let kind = phase.phase_type.trim().to_ascii_lowercase();
    let model = match kind.as_str() {
        "taxi" => SegmentModel::Taxi(Taxi::new(
            need(phase.time_min, "time_min")?,
            need(phase.percent_fuel_flow, "percent_fuel_flow")?,
            need(phase.speed_kt, "speed_kt")?,
            resolve_altitude(phase.altitude_ft, atmosphere)?.unwrap_or(0.0),
        )?),
        "takeoff" => {
            let mut takeoff = Takeoff::new(
                need(phase.takeoff_distance_ft, "takeoff_distance_ft")?,
                phase.obstacle_height_ft.unwrap_or(DEFAULT_OBSTACLE_HEIGHT_FT),
            )?;
            if let Some(mu) = phase.friction_coefficient {
                takeoff.friction_coefficient = mu;
            }
            if let Some(cdr) = phase.rolling_drag_coefficient {
                takeoff.rolling_drag_coefficient = cdr;
            }
            if let Some(cl_max) = phase.cl_max {
                takeoff.cl_max = cl_max;
            }
            if let Some(factor) = phase.takeoff_speed_factor {
                takeoff.speed_factor = factor;
            }
            if let Some(rotation) = phase.rotation_time_s {
                takeoff.rotation_time_s = rotation;
            }
            if let Some(runway) = phase.runway_altitude_ft {
                takeoff.runway_altitude_ft = runway;
            }
            SegmentModel::Takeoff(takeoff.validated()?)
        }
        "climb" | "descent" => {
            let mut gradient =
                ClimbGradient::exactly_one(phase.climb_rate_ft_min, phase.flight_path_angle_deg)?;
            // A phase typed `descent` descends whatever sign its gradient was written with.
            if kind == "descent" {
                gradient = match gradient {
                    ClimbGradient::Rate(rate) => ClimbGradient::Rate(-rate.abs()),
                    ClimbGradient::Angle(angle) => ClimbGradient::Angle(-angle.abs()),
                };
            }
            SegmentModel::Climb(Climb::new(
                altitude(phase.start_altitude_ft, "start_altitude_ft")?,
                altitude(phase.end_altitude_ft, "end_altitude_ft")?,
                Airspeed::exactly_one(phase.keas, phase.mach)?,
                gradient,
            )?)
        }
        "acceleration" | "deceleration" => SegmentModel::Acceleration(Acceleration::new(
            need(phase.keas_start, "keas_start")?,
            need(phase.keas_end, "keas_end")?,
            need(phase.time_s, "time_s")?,
            altitude(phase.altitude_ft, "altitude_ft")?,
        )?),
        "cruise" => SegmentModel::Cruise(Cruise::new(
            altitude(phase.altitude_ft, "altitude_ft")?,
            need(phase.range_nmi, "range_nmi")?,
            Airspeed::exactly_one(phase.keas, phase.mach)?,
            phase.bank_angle_deg.unwrap_or(0.0),
        )?),
        "loiter" => SegmentModel::Loiter(Loiter::new(
            altitude(phase.altitude_ft, "altitude_ft")?,
            need(phase.time_min, "time_min")?,
        )?),
        "approach" => {
            let mut approach = Approach::new(
                altitude(phase.start_altitude_ft, "start_altitude_ft")?,
                altitude(phase.end_altitude_ft, "end_altitude_ft")?,
                need(phase.keas, "keas")?,
                need(phase.flight_path_angle_deg, "flight_path_angle_deg")?,
            )?;
            if let Some(pff) = phase.percent_fuel_flow {
                approach.percent_fuel_flow = pff;
            }
            if let Some(fraction) = phase.weight_fraction_constraint {
                approach.weight_fraction_constraint = fraction;
            }
            SegmentModel::Approach(approach.validated()?)
        }
        "landing" => SegmentModel::Landing(Landing::new(
            need(phase.keas, "keas")?,
            phase.cl_max.unwrap_or(Landing::DEFAULT_CL_MAX),
            phase
                .landing_speed_factor
                .unwrap_or(Landing::DEFAULT_SPEED_FACTOR),
        )?),
        _ => return Err(SizingError::UnknownPhaseType(phase.phase_type.clone())),
    };
    Ok(model)
}

fn resolve_altitude(
    value: Option<AltitudeConfig>,
    atmosphere: &dyn Atmosphere,
) -> Result<Option<f64>, SizingError> {
    match value {
        None => Ok(None),
        Some(AltitudeConfig::Feet(feet)) => Ok(Some(feet)),
        Some(AltitudeConfig::Crossover {
            crossover_mach,
            keas,
        }) => Ok(Some(speed::crossover_altitude(atmosphere, crossover_mach, keas)?)),
    }
}

/// Every numeric knob of a sizing run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizingSettings {
    pub integration: IntegrationSettings,
    pub constraints: ConstraintSettings,
    pub beta_loop: BetaLoopSettings,
    pub takeoff_weight: TakeoffWeightSettings,
}

impl SizingSettings {
    /// Defaults overridden by the mission's `settings` block and `top_of_climb` label.
    pub fn from_mission(config: &MissionConfig) -> Result<Self, SizingError> {
        let overrides = &config.settings;
        let defaults = Self::default();

        let integration = IntegrationSettings {
            climb_step_ft: overrides
                .climb_step_ft
                .unwrap_or(defaults.integration.climb_step_ft),
            acceleration_step_kt: overrides
                .acceleration_step_kt
                .unwrap_or(defaults.integration.acceleration_step_kt),
            cruise_steps: overrides
                .cruise_steps
                .unwrap_or(defaults.integration.cruise_steps),
            approach_step_ft: overrides
                .approach_step_ft
                .unwrap_or(defaults.integration.approach_step_ft),
        };
        integration.validate()?;

        let grid = WingLoadingGrid::new(
            overrides.wing_loading_min.unwrap_or(defaults.constraints.grid.min),
            overrides.wing_loading_max.unwrap_or(defaults.constraints.grid.max),
            overrides
                .wing_loading_points
                .unwrap_or(defaults.constraints.grid.points),
        )?;
        let constraints = ConstraintSettings {
            grid,
            top_of_climb: config.top_of_climb.clone(),
            auxiliary: overrides
                .auxiliary_constraints
                .unwrap_or(true)
                .then(AuxiliaryConstraints::default),
            ..defaults.constraints
        };

        let beta_loop = BetaLoopSettings {
            tolerance: overrides.beta_tolerance.unwrap_or(defaults.beta_loop.tolerance),
            max_iterations: overrides
                .beta_max_iterations
                .unwrap_or(defaults.beta_loop.max_iterations),
            wing_loading_guess: overrides
                .wing_loading_guess
                .unwrap_or(defaults.beta_loop.wing_loading_guess),
            thrust_to_weight_guess: overrides
                .thrust_to_weight_guess
                .unwrap_or(defaults.beta_loop.thrust_to_weight_guess),
            ..defaults.beta_loop
        };
        beta_loop.validate()?;

        let takeoff_weight = TakeoffWeightSettings {
            initial_guess_lbf: overrides
                .takeoff_weight_guess_lbf
                .unwrap_or(defaults.takeoff_weight.initial_guess_lbf),
            tolerance_lbf: overrides
                .takeoff_weight_tolerance_lbf
                .unwrap_or(defaults.takeoff_weight.tolerance_lbf),
            max_iterations: overrides
                .takeoff_weight_max_iterations
                .unwrap_or(defaults.takeoff_weight.max_iterations),
            ..defaults.takeoff_weight
        };
        takeoff_weight.validate()?;

        Ok(Self {
            integration,
            constraints,
            beta_loop,
            takeoff_weight,
        })
    }

    /// Fail instead of reporting the last iterate when a loop runs out of budget.
    pub fn strict(mut self) -> Self {
        self.beta_loop.require_convergence = true;
        self.takeoff_weight.require_convergence = true;
        self
    }
}
