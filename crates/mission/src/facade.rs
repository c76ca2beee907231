use sizing_atmosphere::Atmosphere;
use sizing_config::{AircraftConfig, MissionConfig};

use crate::aircraft::AircraftConstants;
use crate::builder::{SizingSettings, build_mission};
use crate::context::SizingContext;
use crate::convergence::{
    BetaLoopOutcome, TakeoffWeightOutcome, run_beta_loop, takeoff_weight_iteration,
};
use crate::error::SizingError;
use crate::report::AircraftDesign;
use crate::segment::{Segment, SegmentModel};

/// Everything needed to size one aircraft for one mission.
#[derive(Debug, Clone)]
pub struct SizingCase {
    pub aircraft: AircraftConstants,
    pub mission_name: String,
    pub segments: Vec<Segment>,
    pub settings: SizingSettings,
}

impl SizingCase {
    pub fn from_configs(
        aircraft: &AircraftConfig,
        mission: &MissionConfig,
        atmosphere: &dyn Atmosphere,
    ) -> Result<Self, SizingError> {
        Ok(Self {
            aircraft: AircraftConstants::from_config(aircraft)?,
            mission_name: mission.name.clone(),
            segments: build_mission(mission, atmosphere)?,
            settings: SizingSettings::from_mission(mission)?,
        })
    }

    /// Fail on any exhausted iteration budget: both sizing loops and every
    /// loiter speed search.
    pub fn strict(mut self) -> Self {
        self.settings = self.settings.strict();
        for segment in &mut self.segments {
            if let SegmentModel::Loiter(loiter) = &mut segment.model {
                loiter.search.require_convergence = true;
            }
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct SizingResult {
    pub design: AircraftDesign,
    pub beta_loop: BetaLoopOutcome,
    pub takeoff_weight: TakeoffWeightOutcome,
}

/// Run the beta loop, then the takeoff weight loop, and assemble the design.
pub fn size_aircraft(
    case: &SizingCase,
    atmosphere: &dyn Atmosphere,
) -> Result<SizingResult, SizingError> {
    let ctx = SizingContext::new(&case.aircraft, atmosphere);
    log::info!(
        "sizing '{}' for mission '{}' ({} phases)",
        case.aircraft.name,
        case.mission_name,
        case.segments.len()
    );
    let beta_loop = run_beta_loop(
        &ctx,
        &case.segments,
        &case.settings.integration,
        &case.settings.constraints,
        &case.settings.beta_loop,
    )?;
    if beta_loop.envelope.landing_limited {
        log::info!(
            "design wing loading set by landing at {:.2} lb/ft²",
            beta_loop.wing_loading
        );
    }
    let takeoff_weight = takeoff_weight_iteration(
        &case.aircraft,
        beta_loop.final_weight_fraction(),
        &case.settings.takeoff_weight,
    )?;
    let design = AircraftDesign::assemble(&ctx, &case.mission_name, &beta_loop, &takeoff_weight);
    Ok(SizingResult {
        design,
        beta_loop,
        takeoff_weight,
    })
}
