//! Tests for saved configurations, the JSON store and the comparator

use pretty_assertions::assert_eq;
use racetools_core::calculator::{recompute, CalculatorInputs};
use racetools_core::configs::{
    compare, comparison_curves, ComparisonSelection, ConfigStore, JsonConfigStore,
    MemoryConfigStore, SavedConfiguration, StoreError, CONFIGS_FILE_NAME,
};
use racetools_core::gearing::GearSet;
use tempfile::tempdir;

fn snapshot(name: &str, gear_count: usize, existing: &[SavedConfiguration]) -> SavedConfiguration {
    let mut inputs = CalculatorInputs::default();
    inputs.parameters.gear_count = gear_count;
    let derived = recompute(&inputs);
    SavedConfiguration::capture(name, &inputs, &derived, existing).unwrap()
}

#[test]
fn test_compare_aligns_by_gear_index() {
    let a = snapshot("Five speed", 5, &[]);
    let b = snapshot("Six speed", 6, std::slice::from_ref(&a));
    let table = compare(&[a.clone(), b.clone()]);

    assert_eq!(table.column_count(), 2);
    assert_eq!(table.gear_rows.len(), 6);
    assert!(table.gear_rows[5].cells[0].is_none());
    assert!(table.gear_rows[5].cells[1].is_some());

    let rows = table.rows();
    assert_eq!(rows.len(), 6 + 4);
    assert_eq!(rows[5].label, "Gear 6");
    assert_eq!(rows[5].cells[0], "-");
    assert_eq!(rows[6].label, "Final Drive");
    assert_eq!(rows[6].cells, vec!["4.10", "4.10"]);

    // Each config is evaluated at its own ceiling
    let cell = table.gear_rows[0].cells[0].unwrap();
    assert!((cell.speed_mph - a.drivetrain.speed_at_max_rpm(3.5)).abs() < 1e-9);
}

#[test]
fn test_compare_uses_first_four_only() {
    let mut saved = Vec::new();
    for i in 0..5 {
        let config = snapshot(&format!("Config {i}"), 5, &saved);
        saved.push(config);
    }
    let table = compare(&saved);
    assert_eq!(table.column_count(), 4);
    assert_eq!(table.columns[3].name, "Config 3");
}

#[test]
fn test_compare_config_without_gears_or_estimate() {
    let full = snapshot("Five speed", 5, &[]);
    let mut bare = snapshot("Bare", 5, std::slice::from_ref(&full));
    bare.gears = GearSet::default();
    bare.parameters.gear_count = 0;
    bare.performance = None;

    let table = compare(&[bare, full]);
    assert_eq!(table.gear_rows.len(), 5);
    assert!(table.gear_rows.iter().all(|row| row.cells[0].is_none()));

    let rows = table.rows();
    assert_eq!(rows.len(), 5 + 4);
    for label in ["Top Speed", "1/4 Mile", "1/2 Mile"] {
        let row = rows.iter().find(|r| r.label == label).unwrap();
        assert_eq!(row.cells[0], "-", "{label}");
        assert_ne!(row.cells[1], "-", "{label}");
    }
    assert!(rows[..5].iter().all(|r| r.cells[0] == "-"));
}

#[test]
fn test_comparison_curves_share_one_axis() {
    let a = snapshot("A", 5, &[]);
    let mut b = snapshot("B", 6, std::slice::from_ref(&a));
    b.drivetrain.max_rpm = 9000;

    let (max_speed, curves) = comparison_curves(&[a, b], 50);
    assert_eq!(curves.len(), 2);
    assert_eq!(curves[1].curves.len(), 6);
    assert_eq!(curves[1].max_rpm, 9000);
    // Fastest gear of B at 9000 rpm sets the axis
    let fastest = curves[1].curves[5].last().unwrap().speed_mph;
    assert!(fastest < max_speed);
    assert!(curves[0].curves[4].last().unwrap().speed_mph < fastest);
}

#[test]
fn test_selection_resolves_in_pick_order() {
    let a = snapshot("A", 5, &[]);
    let b = snapshot("B", 5, std::slice::from_ref(&a));
    let mut selection = ComparisonSelection::new();
    selection.toggle(&b.id);
    selection.toggle(&a.id);
    selection.toggle("missing");

    let picked = selection.resolve(&[a.clone(), b.clone()]);
    let names: Vec<&str> = picked.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["B", "A"]);
}

#[test]
fn test_memory_store_save_and_delete() {
    let mut store = MemoryConfigStore::new();
    let config = snapshot("A", 5, &[]);
    let id = store.save(config.clone()).unwrap();

    assert!(matches!(store.save(config), Err(StoreError::DuplicateId(_))));
    store.delete(&id).unwrap();
    assert!(matches!(store.delete(&id), Err(StoreError::NotFound(_))));
    assert!(store.load_all().unwrap().is_empty());
}

#[test]
fn test_json_store_persists_across_instances() {
    let dir = tempdir().unwrap();
    let mut store = JsonConfigStore::in_dir(dir.path().join("nested"));
    assert!(store.load_all().unwrap().is_empty());

    let a = snapshot("A", 5, &[]);
    let b = snapshot("B", 6, std::slice::from_ref(&a));
    store.save(a.clone()).unwrap();
    store.save(b.clone()).unwrap();

    let reopened = JsonConfigStore::in_dir(dir.path().join("nested"));
    assert_eq!(reopened.path(), dir.path().join("nested").join(CONFIGS_FILE_NAME));
    let loaded = reopened.load_all().unwrap();
    let ids: Vec<&str> = loaded.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec![a.id.as_str(), b.id.as_str()]);
    assert_eq!(loaded[1].gears, b.gears);
    assert_eq!(loaded[1].created_at, b.created_at);

    store.delete(&a.id).unwrap();
    assert_eq!(reopened.load_all().unwrap().len(), 1);
}

#[test]
fn test_json_store_reports_corrupt_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join(CONFIGS_FILE_NAME);
    std::fs::write(&path, "{ not json").unwrap();

    let store = JsonConfigStore::at_path(&path);
    assert!(matches!(store.load_all(), Err(StoreError::InvalidData(_))));
}
