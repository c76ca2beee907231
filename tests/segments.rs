use aircraft_sizing::atmosphere::StandardAtmosphere;
use aircraft_sizing::config::load_aircraft_configs;
use aircraft_sizing::mission::aircraft::AircraftConstants;
use aircraft_sizing::mission::context::{Airspeed, SizingContext};
use aircraft_sizing::mission::error::{LoopStage, SizingError};
use aircraft_sizing::mission::segment::{
    Acceleration, Approach, Climb, ClimbGradient, Cruise, Landing, Loiter, SegmentKind,
    SegmentPhysics, SpeedSearch, Takeoff, Taxi, best_endurance_speed,
};

fn transport() -> AircraftConstants {
    let configs = load_aircraft_configs("configs/aircraft").expect("aircraft catalog");
    AircraftConstants::from_config(&configs[0]).expect("transport constants")
}

#[test]
fn taxi_burns_a_little_fuel() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let taxi = Taxi::new(20.0, 0.1, 15.0, 0.0).expect("taxi");
    let ratio = taxi
        .weight_fraction_ratio(&ctx, 1.0, 110.0, 0.3)
        .expect("taxi ratio");
    assert!(ratio < 1.0 && ratio > 0.95, "taxi ratio {ratio}");
    assert_eq!(taxi.required_thrust_to_weight(&ctx, 1.0, 110.0).unwrap(), 0.0);
    assert_eq!(taxi.lift_coefficient(&ctx, 1.0, 110.0).unwrap(), 0.0);
    assert_eq!(taxi.drag_coefficient(&ctx, 1.0, 110.0).unwrap(), 0.0);
}

#[test]
fn taxi_rejects_fuel_flow_above_full_power() {
    let err = Taxi::new(20.0, 1.5, 15.0, 0.0).unwrap_err();
    assert!(matches!(err, SizingError::InvalidSegmentConfiguration { .. }));
}

#[test]
fn takeoff_thrust_to_weight_is_transport_like() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let takeoff = Takeoff::new(5500.0, 35.0).expect("takeoff");
    let twr = takeoff
        .required_thrust_to_weight(&ctx, 1.0, 110.0)
        .expect("takeoff T/W");
    assert!(twr.is_finite() && (0.15..=0.6).contains(&twr), "takeoff T/W {twr}");

    // Heavier wing loading needs more thrust to make the same field length.
    let heavier = takeoff
        .required_thrust_to_weight(&ctx, 1.0, 140.0)
        .expect("takeoff T/W");
    assert!(heavier > twr);

    let ratio = takeoff
        .weight_fraction_ratio(&ctx, 1.0, 110.0, 0.3)
        .expect("takeoff ratio");
    assert!(ratio > 0.99 && ratio < 1.0, "takeoff ratio {ratio}");
}

#[test]
fn short_runway_is_infeasible_at_heavy_wing_loading() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let takeoff = Takeoff::new(1800.0, 35.0).expect("takeoff");
    let light = takeoff
        .required_thrust_to_weight(&ctx, 1.0, 30.0)
        .expect("light T/W");
    assert!(light.is_finite() && light > 0.0);
    let heavy = takeoff
        .required_thrust_to_weight(&ctx, 1.0, 160.0)
        .expect("heavy T/W");
    assert_eq!(heavy, f64::INFINITY);
}

#[test]
fn takeoff_speed_scales_with_wing_loading() {
    let takeoff = Takeoff::new(5500.0, 35.0).expect("takeoff");
    let low = takeoff.takeoff_keas(1.0, 80.0);
    let high = takeoff.takeoff_keas(1.0, 160.0);
    assert!((high / low - 2.0_f64.sqrt()).abs() < 1e-9);
}

#[test]
fn cruise_burns_fuel_monotonically_with_range() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let cruise = Cruise::new(35_000.0, 3000.0, Airspeed::Mach(0.78), 0.0).expect("cruise");
    let ratio = cruise
        .weight_fraction_ratio(&ctx, 1.0, 110.0, 0.3)
        .expect("cruise ratio");
    assert!(ratio < 0.9 && ratio > 0.7, "3000 nmi cruise ratio {ratio}");

    let mut previous = 1.0;
    for range in [500.0, 1000.0, 2000.0, 3000.0, 4000.0] {
        let r = cruise
            .with_range(range)
            .weight_fraction_ratio(&ctx, 1.0, 110.0, 0.3)
            .expect("cruise ratio");
        assert!(r < previous, "ratio at {range} nmi should drop below {previous}, got {r}");
        previous = r;
    }
}

#[test]
fn banked_cruise_needs_more_thrust() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let level = Cruise::new(39_000.0, 0.0, Airspeed::Mach(0.78), 0.0).expect("cruise");
    let turn = Cruise::new(39_000.0, 0.0, Airspeed::Mach(0.78), 45.0).expect("turn");
    assert!((turn.load_factor() - 2.0_f64.sqrt()).abs() < 1e-12);
    let level_tw = level.required_thrust_to_weight(&ctx, 0.95, 110.0).unwrap();
    let turn_tw = turn.required_thrust_to_weight(&ctx, 0.95, 110.0).unwrap();
    assert!(turn_tw > level_tw);
}

#[test]
fn climb_requires_exactly_one_speed_and_gradient() {
    let both_speeds = Airspeed::exactly_one(Some(250.0), Some(0.78)).unwrap_err();
    assert!(matches!(both_speeds, SizingError::InvalidSegmentConfiguration { .. }));
    let no_speed = Airspeed::exactly_one(None, None).unwrap_err();
    assert!(matches!(no_speed, SizingError::InvalidSegmentConfiguration { .. }));

    let both_gradients = ClimbGradient::exactly_one(Some(3000.0), Some(3.0)).unwrap_err();
    assert!(matches!(both_gradients, SizingError::InvalidSegmentConfiguration { .. }));
    let no_gradient = ClimbGradient::exactly_one(None, None).unwrap_err();
    assert!(matches!(no_gradient, SizingError::InvalidSegmentConfiguration { .. }));

    assert_eq!(
        ClimbGradient::exactly_one(Some(1500.0), None).unwrap(),
        ClimbGradient::Rate(1500.0)
    );
}

#[test]
fn climb_burns_fuel_and_needs_thrust() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let climb = Climb::new(0.0, 10_000.0, Airspeed::Keas(250.0), ClimbGradient::Rate(3000.0))
        .expect("climb");
    assert_eq!(climb.kind(), SegmentKind::Climb);
    let ratio = climb
        .weight_fraction_ratio(&ctx, 0.99, 110.0, 0.3)
        .expect("climb ratio");
    assert!(ratio > 0.97 && ratio < 1.0, "climb ratio {ratio}");
    let twr = climb.required_thrust_to_weight(&ctx, 0.99, 110.0).unwrap();
    assert!(twr > 0.0 && twr < 1.0, "climb T/W {twr}");
}

#[test]
fn descent_deceleration_and_landing_are_fuel_neutral() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);

    let descent = Climb::new(
        35_000.0,
        3_000.0,
        Airspeed::Keas(250.0),
        ClimbGradient::Rate(-1500.0),
    )
    .expect("descent");
    assert_eq!(descent.kind(), SegmentKind::Descent);
    assert_eq!(descent.weight_fraction_ratio(&ctx, 0.8, 110.0, 0.3).unwrap(), 1.0);
    assert_eq!(descent.required_thrust_to_weight(&ctx, 0.8, 110.0).unwrap(), 0.0);

    let deceleration = Acceleration::new(250.0, 135.0, 60.0, 3000.0).expect("deceleration");
    assert_eq!(deceleration.kind(), SegmentKind::Deceleration);
    assert_eq!(deceleration.weight_fraction_ratio(&ctx, 0.8, 110.0, 0.3).unwrap(), 1.0);
    assert_eq!(deceleration.required_thrust_to_weight(&ctx, 0.8, 110.0).unwrap(), 0.0);

    let landing = Landing::new(135.0, 3.0, 1.2).expect("landing");
    assert_eq!(landing.weight_fraction_ratio(&ctx, 0.8, 110.0, 0.3).unwrap(), 1.0);
    assert_eq!(landing.required_thrust_to_weight(&ctx, 0.8, 110.0).unwrap(), 0.0);
}

#[test]
fn descent_cannot_end_above_its_start() {
    let err = Climb::new(3_000.0, 35_000.0, Airspeed::Keas(250.0), ClimbGradient::Rate(-1500.0))
        .unwrap_err();
    assert!(matches!(err, SizingError::InvalidSegmentConfiguration { .. }));
}

#[test]
fn acceleration_adds_excess_thrust_over_cruise() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let accel = Acceleration::new(250.0, 290.0, 60.0, 10_000.0).expect("acceleration");
    assert_eq!(accel.kind(), SegmentKind::Acceleration);
    let ratio = accel.weight_fraction_ratio(&ctx, 0.98, 110.0, 0.3).unwrap();
    assert!(ratio > 0.99 && ratio < 1.0, "acceleration ratio {ratio}");

    // Halving the time doubles the average acceleration term.
    let quick = Acceleration::new(250.0, 290.0, 30.0, 10_000.0).expect("acceleration");
    assert!(
        quick.required_thrust_to_weight(&ctx, 0.98, 110.0).unwrap()
            > accel.required_thrust_to_weight(&ctx, 0.98, 110.0).unwrap()
    );
}

#[test]
fn approach_constraint_uses_its_own_weight_fraction() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let approach = Approach::new(3000.0, 0.0, 135.0, 3.0).expect("approach");
    let at_mission_beta = approach.required_thrust_to_weight(&ctx, 0.7, 110.0).unwrap();
    let at_takeoff_beta = approach.required_thrust_to_weight(&ctx, 1.0, 110.0).unwrap();
    assert_eq!(at_mission_beta, at_takeoff_beta);

    let mut lighter = approach.clone();
    lighter.weight_fraction_constraint = 0.6;
    let lighter_tw = lighter.required_thrust_to_weight(&ctx, 0.7, 110.0).unwrap();
    assert_ne!(lighter_tw, at_mission_beta);

    let ratio = approach.weight_fraction_ratio(&ctx, 0.7, 110.0, 0.3).unwrap();
    assert!(ratio > 0.99 && ratio < 1.0, "approach ratio {ratio}");
}

#[test]
fn approach_angle_sign_does_not_matter() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let up = Approach::new(3000.0, 0.0, 135.0, 3.0).expect("approach");
    let down = Approach::new(3000.0, 0.0, 135.0, -3.0).expect("approach");
    assert_eq!(
        up.required_thrust_to_weight(&ctx, 0.8, 110.0).unwrap(),
        down.required_thrust_to_weight(&ctx, 0.8, 110.0).unwrap()
    );
    assert!(Approach::new(3000.0, 0.0, 135.0, 0.0).is_err());
}

#[test]
fn landing_wing_loading_follows_calibrated_weight_fraction() {
    let landing = Landing::new(135.0, 3.0, 1.2).expect("landing");
    let q = aircraft_sizing::atmosphere::speed::dynamic_pressure_keas(135.0);
    let beta = 0.7;
    let expected = 3.0 * q / ((0.05 + 0.95 * beta) * 1.44);
    assert!((landing.landing_wing_loading(beta) - expected).abs() < 1e-9);
    // Lighter landing weight allows a higher takeoff wing loading.
    assert!(landing.landing_wing_loading(0.6) > landing.landing_wing_loading(0.9));
}

#[test]
fn loiter_speed_search_converges_subsonic() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let outcome = best_endurance_speed(&ctx, 15_000.0, 0.75, 110.0, &SpeedSearch::default())
        .expect("speed search");
    assert!(outcome.converged, "search should converge: {outcome:?}");
    assert!(outcome.iterations <= 50);
    assert!(outcome.mach > 0.2 && outcome.mach < 0.9, "loiter Mach {}", outcome.mach);

    let loiter = Loiter::new(15_000.0, 45.0).expect("loiter");
    let ratio = loiter.weight_fraction_ratio(&ctx, 0.75, 110.0, 0.3).unwrap();
    assert!(ratio > 0.95 && ratio < 1.0, "loiter ratio {ratio}");
}

#[test]
fn loiter_speed_search_respects_its_iteration_budget() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let relaxed = SpeedSearch {
        max_iterations: 1,
        ..SpeedSearch::default()
    };
    let outcome =
        best_endurance_speed(&ctx, 15_000.0, 0.75, 110.0, &relaxed).expect("best effort");
    assert!(!outcome.converged);
    assert_eq!(outcome.iterations, 1);

    let strict = SpeedSearch {
        require_convergence: true,
        ..relaxed
    };
    let err = best_endurance_speed(&ctx, 15_000.0, 0.75, 110.0, &strict).unwrap_err();
    assert!(matches!(
        err,
        SizingError::NonConvergence {
            stage: LoopStage::LoiterSpeed,
            iterations: 1,
            ..
        }
    ));

    let mut loiter = Loiter::new(15_000.0, 45.0).expect("loiter");
    loiter.search = strict;
    assert!(loiter.weight_fraction_ratio(&ctx, 0.75, 110.0, 0.3).is_err());
}

#[test]
fn zero_wing_loading_is_a_domain_error() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let cruise = Cruise::new(35_000.0, 100.0, Airspeed::Mach(0.78), 0.0).expect("cruise");
    let err = cruise.required_thrust_to_weight(&ctx, 1.0, 0.0).unwrap_err();
    assert!(matches!(err, SizingError::DomainError(_)), "got {err:?}");
}
