//! Sized-aircraft report assembled from the converged loops.

use serde::Serialize;
use sizing_config::PhaseNumber;

use crate::aircraft::AircraftConstants;
use crate::context::SizingContext;
use crate::convergence::{BetaLoopOutcome, ConvergenceStatus, TakeoffWeightOutcome};
use crate::segment::{SegmentKind, SegmentPhysics};

/// Weight and aero/propulsion state of one phase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseReport {
    pub phase: PhaseNumber,
    pub name: String,
    pub kind: SegmentKind,
    pub start_weight_fraction: f64,
    pub end_weight_fraction: f64,
    pub start_weight_lbf: f64,
    pub end_weight_lbf: f64,
    pub fuel_burned_lbf: f64,
    /// Aero and engine values at the phase start; `None` where undefined.
    pub lift_coefficient: Option<f64>,
    pub drag_coefficient: Option<f64>,
    pub lift_to_drag: Option<f64>,
    pub thrust_lapse: Option<f64>,
    /// TSFC (1/hr).
    pub tsfc_per_hour: Option<f64>,
    pub available_thrust_lbf: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightBreakdown {
    pub takeoff_lbf: f64,
    pub empty_lbf: f64,
    pub fuel_lbf: f64,
    pub payload_lbf: f64,
    pub crew_lbf: f64,
}

impl WeightBreakdown {
    pub fn empty_fraction(&self) -> f64 {
        self.empty_lbf / self.takeoff_lbf
    }

    pub fn fuel_fraction(&self) -> f64 {
        self.fuel_lbf / self.takeoff_lbf
    }

    /// Takeoff weight minus all components; zero at a converged takeoff weight.
    pub fn closure_error_lbf(&self) -> f64 {
        self.takeoff_lbf - self.empty_lbf - self.fuel_lbf - self.payload_lbf - self.crew_lbf
    }
}

/// Final sized aircraft.
#[derive(Debug, Clone, Serialize)]
pub struct AircraftDesign {
    pub aircraft: String,
    pub mission: String,
    pub takeoff_weight_lbf: f64,
    /// WSR (lb/ft²).
    pub wing_loading: f64,
    pub thrust_to_weight: f64,
    pub wing_area_ft2: f64,
    /// Sea-level static thrust (lbf).
    pub thrust_lbf: f64,
    pub wing_span_ft: f64,
    pub fuel_weight_lbf: f64,
    pub empty_weight_lbf: f64,
    pub final_weight_fraction: f64,
    pub landing_limited: bool,
    pub active_constraint: String,
    pub beta_loop: ConvergenceStatus,
    pub takeoff_weight_loop: ConvergenceStatus,
    pub weights: WeightBreakdown,
    pub phases: Vec<PhaseReport>,
}

impl AircraftDesign {
    pub fn assemble(
        ctx: &SizingContext<'_>,
        mission: &str,
        beta: &BetaLoopOutcome,
        takeoff: &TakeoffWeightOutcome,
    ) -> Self {
        let aircraft: &AircraftConstants = ctx.aircraft;
        let wto = takeoff.takeoff_weight_lbf;
        let wing_loading = beta.wing_loading;
        let thrust_to_weight = beta.thrust_to_weight;
        let final_weight_fraction = beta.final_weight_fraction();

        let wing_area_ft2 = wto / wing_loading;
        let fuel_weight_lbf = aircraft.fuel_weight_fraction(final_weight_fraction) * wto;
        let empty_weight_lbf = aircraft.empty_weight_fraction(wto) * wto;
        let thrust_lbf = thrust_to_weight * wto;

        let phases = beta
            .evaluation
            .segments
            .iter()
            .zip(&beta.evaluation.weight_fractions)
            .map(|(segment, &end)| {
                let start = segment.weight_fraction;
                let model = &segment.model;
                let thrust_lapse = model.thrust_lapse(ctx, start, wing_loading).ok();
                PhaseReport {
                    phase: segment.phase.clone(),
                    name: segment.name.clone(),
                    kind: segment.kind(),
                    start_weight_fraction: start,
                    end_weight_fraction: end,
                    start_weight_lbf: start * wto,
                    end_weight_lbf: end * wto,
                    fuel_burned_lbf: (start - end) * wto,
                    lift_coefficient: model.lift_coefficient(ctx, start, wing_loading).ok(),
                    drag_coefficient: model.drag_coefficient(ctx, start, wing_loading).ok(),
                    lift_to_drag: model.lift_to_drag(ctx, start, wing_loading).ok(),
                    thrust_lapse,
                    tsfc_per_hour: model
                        .specific_fuel_consumption(ctx, start, wing_loading)
                        .ok()
                        .map(|tsfc| tsfc * 3600.0),
                    available_thrust_lbf: thrust_lapse.map(|alpha| alpha * thrust_lbf),
                }
            })
            .collect();

        Self {
            aircraft: aircraft.name.clone(),
            mission: mission.to_string(),
            takeoff_weight_lbf: wto,
            wing_loading,
            thrust_to_weight,
            wing_area_ft2,
            thrust_lbf,
            wing_span_ft: (aircraft.aspect_ratio * wing_area_ft2).sqrt(),
            fuel_weight_lbf,
            empty_weight_lbf,
            final_weight_fraction,
            landing_limited: beta.envelope.landing_limited,
            active_constraint: beta.envelope.active_constraint.clone(),
            beta_loop: beta.status,
            takeoff_weight_loop: takeoff.status,
            weights: WeightBreakdown {
                takeoff_lbf: wto,
                empty_lbf: empty_weight_lbf,
                fuel_lbf: fuel_weight_lbf,
                payload_lbf: aircraft.payload_weight_lbf,
                crew_lbf: aircraft.crew_weight_lbf,
            },
            phases,
        }
    }

    /// β at the end of each phase, in mission order.
    pub fn weight_fractions(&self) -> Vec<f64> {
        self.phases.iter().map(|p| p.end_weight_fraction).collect()
    }
}
