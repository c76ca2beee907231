use aircraft_sizing::atmosphere::StandardAtmosphere;
use aircraft_sizing::config::{load_aircraft_configs, load_mission};
use aircraft_sizing::mission::aircraft::AircraftConstants;
use aircraft_sizing::mission::builder::build_mission;
use aircraft_sizing::mission::context::{Airspeed, SizingContext};
use aircraft_sizing::mission::profile::{IntegrationSettings, evaluate, integrate};
use aircraft_sizing::mission::segment::{
    Acceleration, Approach, Climb, ClimbGradient, Cruise, Segment, SegmentKind, SegmentModel,
    SegmentPhysics,
};

fn transport() -> AircraftConstants {
    let configs = load_aircraft_configs("configs/aircraft").expect("aircraft catalog");
    AircraftConstants::from_config(&configs[0]).expect("transport constants")
}

fn transport_mission() -> Vec<Segment> {
    let mission = load_mission("configs/missions/transport.yaml").expect("mission");
    build_mission(&mission, &StandardAtmosphere).expect("segments")
}

#[test]
fn evaluation_threads_weight_fraction_through_the_mission() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let segments = transport_mission();
    let evaluation = evaluate(&ctx, 110.0, 0.3, &segments, &IntegrationSettings::default())
        .expect("evaluation");

    assert_eq!(evaluation.segments.len(), segments.len());
    assert_eq!(evaluation.weight_fractions.len(), segments.len());
    assert_eq!(evaluation.segments[0].weight_fraction, 1.0);

    // Each segment starts at the previous segment's end weight fraction.
    for (next, previous_end) in evaluation
        .segments
        .iter()
        .skip(1)
        .zip(&evaluation.weight_fractions)
    {
        assert_eq!(next.weight_fraction, *previous_end);
    }

    let mut previous = 1.0;
    for (segment, &end) in evaluation.segments.iter().zip(&evaluation.weight_fractions) {
        assert!(end <= previous, "{} increased beta", segment.name);
        if matches!(
            segment.kind(),
            SegmentKind::Descent | SegmentKind::Deceleration | SegmentKind::Landing
        ) {
            assert_eq!(end, previous, "{} should not burn fuel", segment.name);
        }
        previous = end;
    }

    let final_beta = evaluation.final_weight_fraction();
    assert!(final_beta > 0.6 && final_beta < 0.85, "final beta {final_beta}");
}

#[test]
fn evaluation_leaves_input_segments_untouched() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let segments = transport_mission();
    let before: Vec<f64> = segments.iter().map(|s| s.weight_fraction).collect();
    let first = evaluate(&ctx, 110.0, 0.3, &segments, &IntegrationSettings::default())
        .expect("evaluation");
    let after: Vec<f64> = segments.iter().map(|s| s.weight_fraction).collect();
    assert_eq!(before, after);

    // Re-evaluating the returned segments gives the same answer.
    let second = evaluate(&ctx, 110.0, 0.3, &first.segments, &IntegrationSettings::default())
        .expect("evaluation");
    assert_eq!(first.weight_fractions, second.weight_fractions);
}

fn relative_change(coarse: f64, fine: f64) -> f64 {
    ((coarse - fine) / fine).abs()
}

#[test]
fn halving_integration_steps_barely_moves_beta() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let coarse = IntegrationSettings::default();
    let fine = coarse.refined();

    let models = [
        SegmentModel::Climb(
            Climb::new(0.0, 10_000.0, Airspeed::Keas(250.0), ClimbGradient::Rate(3000.0))
                .expect("climb"),
        ),
        SegmentModel::Acceleration(
            Acceleration::new(250.0, 290.0, 60.0, 10_000.0).expect("acceleration"),
        ),
        SegmentModel::Cruise(
            Cruise::new(35_000.0, 3000.0, Airspeed::Mach(0.78), 0.0).expect("cruise"),
        ),
        SegmentModel::Approach(Approach::new(3000.0, 0.0, 135.0, 3.0).expect("approach")),
    ];

    for model in &models {
        let a = integrate(&ctx, model, 0.95, 110.0, 0.3, &coarse).expect("coarse");
        let b = integrate(&ctx, model, 0.95, 110.0, 0.3, &fine).expect("fine");
        assert!(
            relative_change(a, b) < 1e-3,
            "{} moved by {} when refined",
            model.kind(),
            relative_change(a, b)
        );
    }
}

#[test]
fn climb_with_partial_last_step_reaches_the_top() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let climb = Climb::new(0.0, 1_200.0, Airspeed::Keas(250.0), ClimbGradient::Rate(3000.0))
        .expect("climb");
    let settings = IntegrationSettings::default();

    // 500 + 500 + 200 ft, chained by hand.
    let mut expected = 1.0;
    for (start, end) in [(0.0, 500.0), (500.0, 1000.0), (1000.0, 1200.0)] {
        expected *= climb
            .with_altitudes(start, end)
            .weight_fraction_ratio(&ctx, expected, 110.0, 0.3)
            .expect("ratio");
    }
    let integrated = integrate(&ctx, &SegmentModel::Climb(climb), 1.0, 110.0, 0.3, &settings)
        .expect("integrated");
    assert!((integrated - expected).abs() < 1e-12);
}

#[test]
fn invalid_integration_settings_are_rejected() {
    let aircraft = transport();
    let ctx = SizingContext::new(&aircraft, &StandardAtmosphere);
    let settings = IntegrationSettings {
        cruise_steps: 0,
        ..IntegrationSettings::default()
    };
    assert!(evaluate(&ctx, 110.0, 0.3, &transport_mission(), &settings).is_err());
}
