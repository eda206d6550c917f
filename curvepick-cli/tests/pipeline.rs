use std::{fmt::Write as _, fs, path::Path};

use approx::assert_relative_eq;
use tempfile::{TempDir, tempdir};

use curvepick_cli::{Settings, run};
use curvepick_data::store::{Status, Store};

/// Writes a small data set to `dir`:
///
/// - ideal functions `y1 = x`, `y2 = 2x`, `y3 = x²/10`, `y4 = -x` on `x = 0..=10`
/// - training `y1 ≈ x` and `y2 ≈ -x`, each off by exactly ±0.1
/// - four test points: near `y1`, near `y4`, far from everything, off the grid
fn write_inputs(dir: &Path) {
    let mut train = String::from("x,y1,y2\n");
    let mut ideal = String::from("x,y1,y2,y3,y4\n");

    for i in 0..=10 {
        let x = f64::from(i);
        let noise = if i % 2 == 0 { 0.1 } else { -0.1 };
        writeln!(train, "{x},{},{}", x + noise, -x - noise).unwrap();
        writeln!(ideal, "{x},{x},{},{},{}", 2.0 * x, x * x / 10.0, -x).unwrap();
    }

    fs::write(dir.join("train.csv"), train).unwrap();
    fs::write(dir.join("ideal.csv"), ideal).unwrap();
    fs::write(
        dir.join("test.csv"),
        "x,y\n2.5,2.55\n3.0,-3.1\n5.0,20.0\n12.0,0.0\n",
    )
    .unwrap();
}

fn settings(dir: &TempDir) -> Settings {
    let root = dir.path();
    write_inputs(root);

    Settings {
        train: root.join("train.csv"),
        ideal: root.join("ideal.csv"),
        test: root.join("test.csv"),
        database: root.join("output").join("ideal_functions.db"),
        report: Some(root.join("report.json")),
        ..Settings::default()
    }
}

#[test]
fn selects_classifies_and_stores() {
    let dir = tempdir().unwrap();
    let settings = settings(&dir);

    let outcome = run(&settings).unwrap();

    let picked: Vec<_> = outcome
        .matches
        .iter()
        .map(|s| (s.training.name.as_str(), s.candidate.name.as_str()))
        .collect();
    assert_eq!(picked, [("y1", "y1"), ("y2", "y4")]);
    assert_relative_eq!(outcome.matches.as_slice()[0].total_deviation, 0.11, epsilon = 1e-9);
    assert_relative_eq!(outcome.matches.as_slice()[1].max_deviation, 0.1, epsilon = 1e-9);

    assert_eq!(outcome.summary.total, 4);
    assert_eq!(outcome.summary.assigned, 2);
    assert_eq!(outcome.summary.unassigned, 1);
    assert_eq!(outcome.summary.rejected, 1);

    let store = Store::open(&settings.database).unwrap();
    let mappings = store.read_mappings().unwrap();
    let statuses: Vec<_> = mappings.iter().map(|m| m.status).collect();
    assert_eq!(
        statuses,
        [
            Status::Assigned,
            Status::Assigned,
            Status::Unassigned,
            Status::Rejected
        ]
    );
    assert_eq!(mappings[0].ideal_function.as_deref(), Some("y1"));
    assert_eq!(mappings[1].ideal_function.as_deref(), Some("y4"));
    assert_relative_eq!(mappings[0].delta_y.unwrap(), 0.05, epsilon = 1e-9);

    let selected = store.read_selections().unwrap();
    assert_eq!(selected.len(), 2);
}

#[test]
fn writes_a_json_report() {
    let dir = tempdir().unwrap();
    let settings = settings(&dir);

    run(&settings).unwrap();

    let text = fs::read_to_string(settings.report.as_ref().unwrap()).unwrap();
    let report: serde_json::Value = serde_json::from_str(&text).unwrap();

    assert_eq!(report["summary"]["assigned"], 2);
    assert_eq!(report["summary"]["per_candidate"]["y4"], 1);
    assert_eq!(report["selections"][1]["candidate"]["name"], "y4");
    assert_eq!(report["classifications"].as_array().unwrap().len(), 4);
    assert_eq!(report["classifications"][2]["outcome"], "Unassigned");
}

#[test]
fn rerunning_leaves_the_same_database() {
    let dir = tempdir().unwrap();
    let settings = settings(&dir);

    run(&settings).unwrap();
    let first = Store::open(&settings.database)
        .unwrap()
        .read_mappings()
        .unwrap();

    run(&settings).unwrap();
    let second = Store::open(&settings.database)
        .unwrap()
        .read_mappings()
        .unwrap();

    assert_eq!(first, second);
}

#[test]
fn missing_input_names_the_file() {
    let dir = tempdir().unwrap();
    let mut settings = settings(&dir);
    settings.ideal = dir.path().join("nowhere.csv");

    let err = run(&settings).unwrap_err();

    assert!(format!("{err:#}").contains("nowhere.csv"));
}
