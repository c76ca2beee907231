//! Mission profile records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordering label of a mission phase, either numeric (`7`) or compound (`"11a"`).
///
/// Numeric and string spellings of the same label compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawPhaseNumber", into = "String")]
pub struct PhaseNumber(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPhaseNumber {
    Index(u64),
    Label(String),
}

impl From<RawPhaseNumber> for PhaseNumber {
    fn from(raw: RawPhaseNumber) -> Self {
        match raw {
            RawPhaseNumber::Index(index) => Self(index.to_string()),
            RawPhaseNumber::Label(label) => Self(label.trim().to_string()),
        }
    }
}

impl From<PhaseNumber> for String {
    fn from(phase: PhaseNumber) -> Self {
        phase.0
    }
}

impl From<&str> for PhaseNumber {
    fn from(label: &str) -> Self {
        Self(label.trim().to_string())
    }
}

impl From<u32> for PhaseNumber {
    fn from(index: u32) -> Self {
        Self(index.to_string())
    }
}

impl PhaseNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhaseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Altitude given directly in feet, or as the crossover altitude of a climb schedule.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AltitudeConfig {
    Feet(f64),
    Crossover { crossover_mach: f64, keas: f64 },
}

/// One mission phase. `type` selects the segment model; the remaining
/// fields are read according to that model.
#[derive(Debug, Clone, Deserialize)]
pub struct PhaseConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub phase_type: String,
    pub phase_number: Option<PhaseNumber>,
    #[serde(default = "default_weight_fraction")]
    pub weight_fraction: f64,

    // Taxi and loiter
    pub time_min: Option<f64>,
    pub percent_fuel_flow: Option<f64>,
    pub speed_kt: Option<f64>,

    // Takeoff
    pub takeoff_distance_ft: Option<f64>,
    pub obstacle_height_ft: Option<f64>,
    pub friction_coefficient: Option<f64>,
    pub rolling_drag_coefficient: Option<f64>,
    pub takeoff_speed_factor: Option<f64>,
    pub rotation_time_s: Option<f64>,
    pub runway_altitude_ft: Option<f64>,

    // Shared lift/speed/altitude parameters
    pub cl_max: Option<f64>,
    pub keas: Option<f64>,
    pub mach: Option<f64>,
    pub altitude_ft: Option<AltitudeConfig>,
    pub start_altitude_ft: Option<AltitudeConfig>,
    pub end_altitude_ft: Option<AltitudeConfig>,

    // Climb, descent and approach
    pub climb_rate_ft_min: Option<f64>,
    pub flight_path_angle_deg: Option<f64>,
    pub weight_fraction_constraint: Option<f64>,

    // Acceleration
    pub keas_start: Option<f64>,
    pub keas_end: Option<f64>,
    pub time_s: Option<f64>,

    // Cruise
    pub range_nmi: Option<f64>,
    pub bank_angle_deg: Option<f64>,

    // Landing
    pub landing_speed_factor: Option<f64>,
}

fn default_weight_fraction() -> f64 {
    1.0
}

/// Optional numeric overrides for the sizing loops.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    pub climb_step_ft: Option<f64>,
    pub acceleration_step_kt: Option<f64>,
    pub cruise_steps: Option<usize>,
    pub approach_step_ft: Option<f64>,
    pub wing_loading_min: Option<f64>,
    pub wing_loading_max: Option<f64>,
    pub wing_loading_points: Option<usize>,
    pub beta_tolerance: Option<f64>,
    pub beta_max_iterations: Option<usize>,
    pub wing_loading_guess: Option<f64>,
    pub thrust_to_weight_guess: Option<f64>,
    pub takeoff_weight_guess_lbf: Option<f64>,
    pub takeoff_weight_tolerance_lbf: Option<f64>,
    pub takeoff_weight_max_iterations: Option<usize>,
    pub auxiliary_constraints: Option<bool>,
}

/// A complete mission profile.
#[derive(Debug, Clone, Deserialize)]
pub struct MissionConfig {
    pub name: String,
    /// Phase whose start weight fraction feeds the auxiliary constraints.
    #[serde(default)]
    pub top_of_climb: Option<PhaseNumber>,
    #[serde(default)]
    pub settings: SettingsConfig,
    pub phases: Vec<PhaseConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_numbers_accept_integers_and_labels() {
        let yaml = "name: m\ntop_of_climb: 7\nphases:\n  - {name: a, type: taxi, phase_number: 7}\n  - {name: b, type: takeoff, phase_number: \"11a\"}\n";
        let mission: MissionConfig = serde_yaml::from_str(yaml).expect("mission");
        assert_eq!(mission.top_of_climb, Some(PhaseNumber::from("7")));
        assert_eq!(mission.phases[0].phase_number, Some(PhaseNumber::from(7u32)));
        assert_eq!(mission.phases[1].phase_number.as_ref().map(|p| p.as_str()), Some("11a"));
        assert_eq!(mission.phases[0].weight_fraction, 1.0);
    }

    #[test]
    fn altitude_accepts_crossover_form() {
        let yaml = "name: c\ntype: climb\nstart_altitude_ft: 10000\nend_altitude_ft: {crossover_mach: 0.78, keas: 290}\n";
        let phase: PhaseConfig = serde_yaml::from_str(yaml).expect("phase");
        assert_eq!(phase.start_altitude_ft, Some(AltitudeConfig::Feet(10_000.0)));
        assert_eq!(
            phase.end_altitude_ft,
            Some(AltitudeConfig::Crossover {
                crossover_mach: 0.78,
                keas: 290.0
            })
        );
    }
}
