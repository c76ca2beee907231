//! Fixed-point loops: (WSR, TWR) against the mission fuel fractions, then
//! takeoff weight against the final fuel fraction.

use serde::Serialize;

use crate::aircraft::AircraftConstants;
use crate::constraint::{ConstraintSettings, EnvelopeAnalysis, analyze};
use crate::context::SizingContext;
use crate::error::{LoopStage, SizingError};
use crate::profile::{IntegrationSettings, MissionEvaluation, evaluate};
use crate::segment::Segment;

/// How a fixed-point loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConvergenceStatus {
    Converged { iterations: usize },
    /// Budget ran out; the last iterate is reported.
    Exhausted { iterations: usize, residual: f64 },
}

impl ConvergenceStatus {
    pub fn is_converged(&self) -> bool {
        matches!(self, ConvergenceStatus::Converged { .. })
    }

    pub fn iterations(&self) -> usize {
        match *self {
            ConvergenceStatus::Converged { iterations }
            | ConvergenceStatus::Exhausted { iterations, .. } => iterations,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BetaLoopSettings {
    pub tolerance: f64,
    pub max_iterations: usize,
    pub wing_loading_guess: f64,
    pub thrust_to_weight_guess: f64,
    /// Turn an exhausted budget into [`SizingError::NonConvergence`].
    pub require_convergence: bool,
}

impl Default for BetaLoopSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            max_iterations: 20,
            wing_loading_guess: 110.0,
            thrust_to_weight_guess: 0.3,
            require_convergence: false,
        }
    }
}

impl BetaLoopSettings {
    pub fn validate(&self) -> Result<(), SizingError> {
        validate_loop(self.tolerance, self.max_iterations, "beta loop")?;
        if !(self.wing_loading_guess.is_finite() && self.wing_loading_guess > 0.0) {
            return Err(SizingError::invalid(format!(
                "wing loading guess must be positive (got {})",
                self.wing_loading_guess
            )));
        }
        if !(self.thrust_to_weight_guess.is_finite() && self.thrust_to_weight_guess > 0.0) {
            return Err(SizingError::invalid(format!(
                "thrust-to-weight guess must be positive (got {})",
                self.thrust_to_weight_guess
            )));
        }
        Ok(())
    }
}

/// One pass of the beta loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BetaIteration {
    pub iteration: usize,
    pub wing_loading: f64,
    pub thrust_to_weight: f64,
    pub final_weight_fraction: f64,
    pub residual: f64,
}

#[derive(Debug, Clone)]
pub struct BetaLoopOutcome {
    pub wing_loading: f64,
    pub thrust_to_weight: f64,
    pub status: ConvergenceStatus,
    /// Mission evaluation of the last iteration.
    pub evaluation: MissionEvaluation,
    /// Envelope analysis of the last iteration.
    pub envelope: EnvelopeAnalysis,
    pub history: Vec<BetaIteration>,
}

impl BetaLoopOutcome {
    pub fn final_weight_fraction(&self) -> f64 {
        self.evaluation.final_weight_fraction()
    }
}

/// Alternate mission evaluation and envelope analysis until (WSR, TWR) stop moving.
pub fn run_beta_loop(
    ctx: &SizingContext<'_>,
    segments: &[Segment],
    integration: &IntegrationSettings,
    constraints: &ConstraintSettings,
    settings: &BetaLoopSettings,
) -> Result<BetaLoopOutcome, SizingError> {
    settings.validate()?;
    if segments.is_empty() {
        return Err(SizingError::EmptyMission);
    }

    let mut wing_loading = settings.wing_loading_guess;
    let mut thrust_to_weight = settings.thrust_to_weight_guess;
    let mut current = segments.to_vec();
    let mut history = Vec::with_capacity(settings.max_iterations);
    let mut last = None;

    for iteration in 1..=settings.max_iterations {
        let evaluation = evaluate(ctx, wing_loading, thrust_to_weight, &current, integration)?;
        let envelope = analyze(ctx, &evaluation.segments, constraints)?;
        let next = envelope.design;
        let residual = (next.wing_loading - wing_loading)
            .abs()
            .max((next.thrust_to_weight - thrust_to_weight).abs());
        let converged = (next.wing_loading - wing_loading).abs() < settings.tolerance
            && (next.thrust_to_weight - thrust_to_weight).abs() < settings.tolerance;

        log::debug!(
            "beta loop {iteration}: WSR {:.3} TWR {:.4} final beta {:.5} (active: {})",
            next.wing_loading,
            next.thrust_to_weight,
            evaluation.final_weight_fraction(),
            envelope.active_constraint
        );
        history.push(BetaIteration {
            iteration,
            wing_loading: next.wing_loading,
            thrust_to_weight: next.thrust_to_weight,
            final_weight_fraction: evaluation.final_weight_fraction(),
            residual,
        });

        wing_loading = next.wing_loading;
        thrust_to_weight = next.thrust_to_weight;
        current.clone_from(&evaluation.segments);

        if converged {
            log::info!(
                "beta loop converged in {iteration} iterations: WSR {wing_loading:.3} lb/ft², TWR {thrust_to_weight:.4}"
            );
            return Ok(BetaLoopOutcome {
                wing_loading,
                thrust_to_weight,
                status: ConvergenceStatus::Converged {
                    iterations: iteration,
                },
                evaluation,
                envelope,
                history,
            });
        }
        last = Some((evaluation, envelope, residual));
    }

    let (evaluation, envelope, residual) =
        last.ok_or_else(|| SizingError::invalid("beta loop ran no iterations"))?;
    let iterations = settings.max_iterations;
    if settings.require_convergence {
        return Err(SizingError::NonConvergence {
            stage: LoopStage::BetaLoop,
            iterations,
            residual,
        });
    }
    log::warn!(
        "beta loop did not converge after {iterations} iterations (residual {residual:.3e}); reporting last iterate"
    );
    Ok(BetaLoopOutcome {
        wing_loading,
        thrust_to_weight,
        status: ConvergenceStatus::Exhausted {
            iterations,
            residual,
        },
        evaluation,
        envelope,
        history,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TakeoffWeightSettings {
    pub initial_guess_lbf: f64,
    /// Absolute tolerance on successive iterates (lbf).
    pub tolerance_lbf: f64,
    pub max_iterations: usize,
    pub require_convergence: bool,
}

impl Default for TakeoffWeightSettings {
    fn default() -> Self {
        Self {
            initial_guess_lbf: 10_000.0,
            tolerance_lbf: 1.0,
            max_iterations: 20,
            require_convergence: false,
        }
    }
}

impl TakeoffWeightSettings {
    pub fn validate(&self) -> Result<(), SizingError> {
        validate_loop(self.tolerance_lbf, self.max_iterations, "takeoff weight loop")?;
        if !(self.initial_guess_lbf.is_finite() && self.initial_guess_lbf > 0.0) {
            return Err(SizingError::invalid(format!(
                "takeoff weight guess must be positive (got {})",
                self.initial_guess_lbf
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TakeoffWeightOutcome {
    pub takeoff_weight_lbf: f64,
    pub status: ConvergenceStatus,
    /// Successive iterates, starting with the initial guess.
    pub history: Vec<f64>,
}

/// Solve `WTO = (W_crew + W_payload) / (1 − Wf/WTO − We/WTO)` by fixed-point iteration.
pub fn takeoff_weight_iteration(
    aircraft: &AircraftConstants,
    final_weight_fraction: f64,
    settings: &TakeoffWeightSettings,
) -> Result<TakeoffWeightOutcome, SizingError> {
    settings.validate()?;
    let fuel_fraction = aircraft.fuel_weight_fraction(final_weight_fraction);
    let mut guess = settings.initial_guess_lbf;
    let mut history = vec![guess];
    let mut residual = f64::INFINITY;

    for iteration in 1..=settings.max_iterations {
        let denominator = 1.0 - fuel_fraction - aircraft.empty_weight_fraction(guess);
        if !(denominator.is_finite() && denominator > 0.0) {
            return Err(SizingError::domain(format!(
                "fuel and empty weight fractions leave no room for payload at WTO {guess:.1} lbf \
                 (denominator {denominator:.4})"
            )));
        }
        let next = aircraft.fixed_weight_lbf() / denominator;
        residual = (next - guess).abs();
        log::debug!("takeoff weight {iteration}: {next:.1} lbf (change {residual:.2})");
        history.push(next);
        guess = next;
        if residual < settings.tolerance_lbf {
            log::info!("takeoff weight converged in {iteration} iterations: {next:.1} lbf");
            return Ok(TakeoffWeightOutcome {
                takeoff_weight_lbf: next,
                status: ConvergenceStatus::Converged {
                    iterations: iteration,
                },
                history,
            });
        }
    }

    let iterations = settings.max_iterations;
    if settings.require_convergence {
        return Err(SizingError::NonConvergence {
            stage: LoopStage::TakeoffWeight,
            iterations,
            residual,
        });
    }
    log::warn!(
        "takeoff weight did not converge after {iterations} iterations (residual {residual:.2} lbf)"
    );
    Ok(TakeoffWeightOutcome {
        takeoff_weight_lbf: guess,
        status: ConvergenceStatus::Exhausted {
            iterations,
            residual,
        },
        history,
    })
}

fn validate_loop(tolerance: f64, max_iterations: usize, what: &str) -> Result<(), SizingError> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(SizingError::invalid(format!(
            "{what} tolerance must be positive (got {tolerance})"
        )));
    }
    if max_iterations == 0 {
        return Err(SizingError::invalid(format!("{what} needs at least one iteration")));
    }
    Ok(())
}
