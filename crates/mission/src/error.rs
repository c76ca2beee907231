use std::fmt;

use sizing_aerodynamics::AeroError;
use sizing_atmosphere::AtmosphereError;
use sizing_config::ConfigError;
use thiserror::Error;

/// Fixed-point iteration that can run out of budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStage {
    BetaLoop,
    TakeoffWeight,
    LoiterSpeed,
}

impl fmt::Display for LoopStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LoopStage::BetaLoop => "wing loading / thrust-to-weight loop",
            LoopStage::TakeoffWeight => "takeoff weight loop",
            LoopStage::LoiterSpeed => "loiter best L/D speed search",
        };
        f.write_str(label)
    }
}

/// Errors raised by segment construction, mission analysis, and the sizing loops.
#[derive(Debug, Error)]
pub enum SizingError {
    #[error("invalid segment configuration{}: {reason}", phase_suffix(.phase))]
    InvalidSegmentConfiguration {
        phase: Option<String>,
        reason: String,
    },
    #[error("unknown phase type '{0}'")]
    UnknownPhaseType(String),
    #[error("phase {phase}: missing required parameter '{parameter}'")]
    MissingParameter {
        phase: String,
        parameter: &'static str,
    },
    #[error("{stage} did not converge after {iterations} iterations (residual {residual:.3e})")]
    NonConvergence {
        stage: LoopStage,
        iterations: usize,
        residual: f64,
    },
    #[error("numeric domain error: {0}")]
    DomainError(String),
    #[error("phase '{0}' not found in mission")]
    MissingPhase(String),
    #[error("mission has no phases")]
    EmptyMission,
    #[error("landing wing loading {landing:.2} lb/ft² lies outside the swept grid [{min}, {max}]")]
    LandingOutsideGrid { landing: f64, min: f64, max: f64 },
    #[error(transparent)]
    Atmosphere(#[from] AtmosphereError),
    #[error(transparent)]
    Aerodynamics(#[from] AeroError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn phase_suffix(phase: &Option<String>) -> String {
    phase
        .as_ref()
        .map(|p| format!(" in phase {p}"))
        .unwrap_or_default()
}

impl SizingError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        SizingError::InvalidSegmentConfiguration {
            phase: None,
            reason: reason.into(),
        }
    }

    pub(crate) fn domain(reason: impl Into<String>) -> Self {
        SizingError::DomainError(reason.into())
    }

    /// Attach a phase label to a configuration error raised before the phase was known.
    pub fn with_phase(self, label: &str) -> Self {
        match self {
            SizingError::InvalidSegmentConfiguration { phase: None, reason } => {
                SizingError::InvalidSegmentConfiguration {
                    phase: Some(label.to_string()),
                    reason,
                }
            }
            other => other,
        }
    }
}

/// Reject NaN and infinities produced by pathological inputs.
pub(crate) fn ensure_finite(value: f64, what: &str) -> Result<f64, SizingError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SizingError::domain(format!("{what} is not finite ({value})")))
    }
}
