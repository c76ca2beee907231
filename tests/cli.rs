use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

#[test]
fn size_aircraft_writes_envelope_and_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("out/envelope.csv");
    let json_path = dir.path().join("out/summary.json");

    Command::cargo_bin("size_aircraft")
        .expect("size_aircraft bin")
        .args([
            "--envelope-csv",
            csv_path.to_str().unwrap(),
            "--summary-json",
            json_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Aircraft Design ==="))
        .stdout(predicate::str::contains("Takeoff weight  :"))
        .stdout(predicate::str::contains("Beta loop       : converged"))
        .stdout(predicate::str::contains("11a"));

    let mut reader = csv::Reader::from_path(&csv_path).expect("envelope csv");
    let headers = reader.headers().expect("headers").clone();
    assert_eq!(headers.get(0), Some("wing_loading_lb_ft2"));
    assert_eq!(headers.iter().last(), Some("envelope"));
    assert!(headers.iter().any(|h| h == "7 Main cruise"));
    assert!(headers.iter().any(|h| h == "Service Ceiling"));

    let envelope_column = headers.len() - 1;
    let mut rows = 0;
    for record in reader.records() {
        let record = record.expect("row");
        let envelope: f64 = record[envelope_column].parse().expect("envelope value");
        for value in record.iter().skip(1).take(envelope_column - 1) {
            let value: f64 = value.parse().expect("curve value");
            assert!(value <= envelope + 1e-6);
        }
        rows += 1;
    }
    assert_eq!(rows, 700);

    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("summary json"))
            .expect("parse summary");
    let wto = summary["design"]["takeoff_weight_lbf"]
        .as_f64()
        .expect("takeoff weight");
    assert!(wto > 100_000.0 && wto < 250_000.0, "WTO {wto}");
    assert_eq!(summary["design"]["beta_loop"]["status"], "converged");
    assert_eq!(
        summary["design"]["phases"].as_array().map(Vec::len),
        Some(19)
    );
    assert!(summary["beta_history"].as_array().is_some_and(|h| !h.is_empty()));
    assert_eq!(summary["takeoff_weight_history"][0], 10_000.0);
}

#[test]
fn unknown_phase_type_fails_with_message() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mission = dir.path().join("bad.yaml");
    fs::write(
        &mission,
        "name: Bad\nphases:\n  - {name: Hover, type: hover, time_min: 5}\n",
    )
    .expect("write mission");

    Command::cargo_bin("size_aircraft")
        .expect("size_aircraft bin")
        .args(["--mission", mission.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown phase type 'hover'"));
}

#[test]
fn missing_aircraft_name_fails() {
    Command::cargo_bin("size_aircraft")
        .expect("size_aircraft bin")
        .args(["--name", "Glider"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn summary_on_stdout_is_pure_json_and_report_goes_to_stderr() {
    let output = Command::cargo_bin("size_aircraft")
        .expect("size_aircraft bin")
        .args(["--summary-json", "-"])
        .output()
        .expect("run size_aircraft");
    assert!(output.status.success());

    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is one JSON document");
    assert_eq!(summary["design"]["beta_loop"]["status"], "converged");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("=== Aircraft Design ==="));
    assert!(stderr.contains("of WTO)"));
}

#[test]
fn report_lists_weight_fractions() {
    Command::cargo_bin("size_aircraft")
        .expect("size_aircraft bin")
        .assert()
        .success()
        .stdout(
            predicate::str::is_match(r"Empty weight    : [0-9.]+ lbf \(0\.[0-9]{3} of WTO\)")
                .expect("regex"),
        )
        .stdout(
            predicate::str::is_match(r"Fuel weight     : [0-9.]+ lbf \(0\.[0-9]{3} of WTO\)")
                .expect("regex"),
        );
}

#[test]
fn both_exports_on_stdout_are_rejected() {
    Command::cargo_bin("size_aircraft")
        .expect("size_aircraft bin")
        .args(["--envelope-csv", "-", "--summary-json", "-"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot both write to stdout"));
}
