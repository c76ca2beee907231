use std::fs;

use aircraft_sizing::atmosphere::StandardAtmosphere;
use aircraft_sizing::config::{
    ConfigError, PhaseNumber, load_aircraft_configs, load_mission, select_aircraft,
};
use aircraft_sizing::mission::builder::{SizingSettings, build_mission};
use aircraft_sizing::mission::error::SizingError;
use aircraft_sizing::mission::segment::{ClimbGradient, SegmentKind, SegmentModel};
use tempfile::tempdir;

#[test]
fn bundled_configs_load() {
    let aircraft = load_aircraft_configs("configs/aircraft").expect("aircraft catalog");
    let transport = select_aircraft(&aircraft, Some("transport")).expect("transport");
    assert_eq!(transport.structure.kwe, 1.15);
    assert_eq!(transport.payload.payload_weight_lbf, 30_000.0);
    assert!(matches!(
        select_aircraft(&aircraft, Some("glider")),
        Err(ConfigError::NotFound(_))
    ));

    let mission = load_mission("configs/missions/transport.yaml").expect("mission");
    assert_eq!(mission.top_of_climb, Some(PhaseNumber::from("7")));
    let segments = build_mission(&mission, &StandardAtmosphere).expect("segments");
    assert_eq!(segments.len(), 19);
    assert_eq!(segments[10].phase.as_str(), "11a");
    assert_eq!(segments[10].kind(), SegmentKind::Takeoff);
}

#[test]
fn crossover_altitude_joins_the_climb_schedule() {
    let mission = load_mission("configs/missions/transport.yaml").expect("mission");
    let segments = build_mission(&mission, &StandardAtmosphere).expect("segments");
    let (SegmentModel::Climb(to_crossover), SegmentModel::Climb(to_cruise)) =
        (&segments[4].model, &segments[5].model)
    else {
        panic!("phases 5 and 6 should be climbs");
    };
    let crossover = to_crossover.end_altitude_ft;
    assert!(crossover > 27_000.0 && crossover < 31_000.0, "crossover {crossover}");
    assert_eq!(to_cruise.start_altitude_ft, crossover);
}

#[test]
fn descent_type_forces_a_negative_gradient() {
    let yaml = r#"
name: Descent only
phases:
  - name: Let down
    type: descent
    start_altitude_ft: 20000
    end_altitude_ft: 5000
    climb_rate_ft_min: 1500
    keas: 250
"#;
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("descent.yaml");
    fs::write(&path, yaml).expect("write mission");
    let mission = load_mission(&path).expect("mission");
    let segments = build_mission(&mission, &StandardAtmosphere).expect("segments");

    let SegmentModel::Climb(descent) = &segments[0].model else {
        panic!("descent should build a climb model");
    };
    assert_eq!(descent.gradient, ClimbGradient::Rate(-1500.0));
    assert_eq!(segments[0].kind(), SegmentKind::Descent);
    // Unnumbered phases are numbered by position.
    assert_eq!(segments[0].phase.as_str(), "1");
}

#[test]
fn toml_missions_are_accepted() {
    let toml = r#"
name = "Ferry"
top_of_climb = "2"

[settings]
cruise_steps = 20
wing_loading_points = 350
auxiliary_constraints = false
beta_max_iterations = 40

[[phases]]
name = "Taxi"
type = "taxi"
time_min = 10
percent_fuel_flow = 0.1
speed_kt = 15

[[phases]]
name = "Cruise"
type = "cruise"
altitude_ft = 30000
range_nmi = 1000
mach = 0.7

[[phases]]
name = "Landing"
type = "landing"
keas = 130
"#;
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("ferry.toml");
    fs::write(&path, toml).expect("write mission");
    let mission = load_mission(&path).expect("mission");
    assert_eq!(mission.phases.len(), 3);

    let settings = SizingSettings::from_mission(&mission).expect("settings");
    let defaults = SizingSettings::default();
    assert_eq!(settings.integration.cruise_steps, 20);
    assert_eq!(
        settings.integration.climb_step_ft,
        defaults.integration.climb_step_ft
    );
    assert_eq!(settings.constraints.grid.points, 350);
    assert!(settings.constraints.auxiliary.is_none());
    assert_eq!(settings.constraints.top_of_climb, Some(PhaseNumber::from("2")));
    assert_eq!(settings.beta_loop.max_iterations, 40);
    assert_eq!(settings.takeoff_weight, defaults.takeoff_weight);

    let segments = build_mission(&mission, &StandardAtmosphere).expect("segments");
    let SegmentModel::Landing(landing) = &segments[2].model else {
        panic!("third phase should be a landing");
    };
    assert_eq!(landing.cl_max, 3.0);
    assert_eq!(landing.landing_speed_factor, 1.3);
}

fn mission_error(yaml: &str) -> SizingError {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("mission.yaml");
    fs::write(&path, yaml).expect("write mission");
    let mission = load_mission(&path).expect("mission");
    build_mission(&mission, &StandardAtmosphere).unwrap_err()
}

#[test]
fn unknown_phase_type_is_rejected() {
    let err = mission_error("name: bad\nphases:\n  - {name: Hover, type: hover, time_min: 5}\n");
    assert!(matches!(err, SizingError::UnknownPhaseType(ref kind) if kind == "hover"));
    assert!(err.to_string().contains("unknown phase type"));
}

#[test]
fn missing_parameters_name_the_phase() {
    let err = mission_error(
        "name: bad\nphases:\n  - {name: Cruise, type: cruise, phase_number: 7, altitude_ft: 35000, mach: 0.78}\n",
    );
    match err {
        SizingError::MissingParameter { phase, parameter } => {
            assert_eq!(phase, "7 (Cruise)");
            assert_eq!(parameter, "range_nmi");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn conflicting_speeds_are_rejected() {
    let err = mission_error(
        "name: bad\nphases:\n  - {name: Cruise, type: cruise, altitude_ft: 35000, range_nmi: 100, mach: 0.78, keas: 250}\n",
    );
    assert!(matches!(
        err,
        SizingError::InvalidSegmentConfiguration { phase: Some(_), .. }
    ));
}

#[test]
fn empty_mission_is_rejected() {
    let err = mission_error("name: empty\nphases: []\n");
    assert!(matches!(err, SizingError::EmptyMission));
}

#[test]
fn bad_settings_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("mission.yaml");
    fs::write(
        &path,
        "name: m\nsettings: {wing_loading_min: 170, wing_loading_max: 30}\nphases:\n  - {name: Landing, type: landing, keas: 130}\n",
    )
    .expect("write mission");
    let mission = load_mission(&path).expect("mission");
    assert!(SizingSettings::from_mission(&mission).is_err());
}

#[test]
fn invalid_aircraft_values_are_rejected() {
    let dir = tempdir().expect("tempdir");
    fs::write(
        dir.path().join("bad.toml"),
        r#"
name = "Bad"
[aerodynamics]
k1 = -0.05
k2 = 0.0
[propulsion]
ktsfc = 0.64
[structure]
kwe = 1.15
[payload]
crew_weight_lbf = 1000
payload_weight_lbf = 30000
"#,
    )
    .expect("write aircraft");
    let err = load_aircraft_configs(dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "aerodynamics.k1"));
}
