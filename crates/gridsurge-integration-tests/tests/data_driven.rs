//! Integration test: incidents configured from data files.
//!
//! Writes a surge config and a string table into a temp directory, loads
//! them with `gridsurge-data` and fires the incident with the result.

use std::fs;
use std::path::{Path, PathBuf};

use gridsurge_core::grid::PowerGrid;
use gridsurge_core::outcome::Classification;
use gridsurge_core::report::{EnglishStrings, Letter};
use gridsurge_core::rng::SimRng;
use gridsurge_core::test_utils::single_network;
use gridsurge_data::{DataLoadError, load_incident_data};

fn make_test_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "gridsurge_integration_{suffix}_{}",
        std::process::id()
    ));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn cleanup(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
}

#[test]
fn lowered_threshold_from_toml() {
    let dir = make_test_dir("threshold");
    fs::write(dir.join("surge.toml"), "min_stored_energy = 20.0\n").unwrap();

    let data = load_incident_data(&dir).unwrap();
    let incident = data.incident();
    let mut grid = PowerGrid::new();
    single_network(&mut grid, &[30.0], 1, &[]);

    // 30 Wd is below the stock threshold but above the loaded one.
    assert!(!gridsurge_core::incident::ShortCircuitIncident::default().can_fire_now(&grid));
    assert!(incident.can_fire_now(&grid));
    let report = incident
        .try_execute(&mut grid, &mut SimRng::new(1))
        .unwrap()
        .unwrap();
    assert_eq!(report.classification, Classification::FullSurge);
    cleanup(&dir);
}

#[test]
fn tuned_severity_from_ron() {
    let dir = make_test_dir("severity");
    fs::write(
        dir.join("surge.ron"),
        "(large_radius: 2.0, huge_radius: 3.0, direct_hit_damage: 0)",
    )
    .unwrap();

    let incident = load_incident_data(&dir).unwrap().incident();
    let mut grid = PowerGrid::new();
    let layout = single_network(&mut grid, &[400.0], 1, &[]);

    // r = sqrt(20) ~ 4.47: huge under the tuned thresholds.
    let report = incident
        .try_execute(&mut grid, &mut SimRng::new(2))
        .unwrap()
        .unwrap();
    assert!(report.severity.large);
    assert!(report.severity.huge);
    // Flame 10 + bomb 50, and the direct hit was tuned away.
    assert_eq!(grid.hit_points(layout.conduits[0]), Some(20));
    cleanup(&dir);
}

#[test]
fn translated_letter_with_english_fallback() {
    let dir = make_test_dir("strings");
    fs::write(
        dir.join("strings.json"),
        r#"{
            "shortcircuit.letter_label": "Kurzschluss",
            "shortcircuit.subject_conduit": "einer Stromleitung",
            "shortcircuit.full_surge": "Ein Kurzschluss in {0} hat {1} Wd freigesetzt."
        }"#,
    )
    .unwrap();

    let data = load_incident_data(&dir).unwrap();
    let strings = data
        .strings
        .clone()
        .expect("strings file present")
        .with_fallback(EnglishStrings);
    let incident = data.incident();

    let mut grid = PowerGrid::new();
    single_network(&mut grid, &[2_000.0], 1, &[]);
    let mut letters: Vec<Letter> = Vec::new();
    incident
        .fire(&mut grid, &mut SimRng::new(3), &strings, &mut letters)
        .unwrap();

    let letter = &letters[0];
    assert_eq!(letter.label, "Kurzschluss");
    assert!(
        letter
            .text
            .starts_with("Ein Kurzschluss in einer Stromleitung hat 2000 Wd freigesetzt.")
    );
    // Severity lines were not translated, so English fills in.
    assert!(letter.text.contains("The explosion was huge."));
    cleanup(&dir);
}

#[test]
fn invalid_config_is_rejected_before_firing() {
    let dir = make_test_dir("invalid");
    fs::write(dir.join("surge.json"), r#"{ "epsilon": -1.0 }"#).unwrap();

    match load_incident_data(&dir).unwrap_err() {
        DataLoadError::Invalid { source, .. } => assert_eq!(source.field, "epsilon"),
        other => panic!("expected invalid config, got {other:?}"),
    }
    cleanup(&dir);
}
