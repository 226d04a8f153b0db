//! Tests for bracket layout and the settings file

use pretty_assertions::assert_eq;
use racetools_core::bracket::{single_elimination_rounds, BYE, TO_BE_DECIDED};
use racetools_core::reaction::TreeTiming;
use racetools_core::settings::AppSettings;
use tempfile::tempdir;

fn names(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("Racer {i}")).collect()
}

#[test]
fn test_bracket_pairs_in_order() {
    let rounds = single_elimination_rounds(&names(4));
    assert_eq!(rounds.len(), 2);
    assert_eq!(rounds[0].len(), 2);
    assert_eq!(rounds[0][1].left, "Racer 3");
    assert_eq!(rounds[0][1].right, "Racer 4");
    assert_eq!(rounds[1][0].left, TO_BE_DECIDED);
}

#[test]
fn test_bracket_pads_with_byes() {
    let rounds = single_elimination_rounds(&names(5));
    let match_counts: Vec<usize> = rounds.iter().map(|r| r.len()).collect();
    assert_eq!(match_counts, vec![4, 2, 1]);
    assert_eq!(rounds[0][2].left, "Racer 5");
    assert_eq!(rounds[0][2].right, BYE);
    assert_eq!(rounds[0][3].left, BYE);
}

#[test]
fn test_bracket_needs_two_racers() {
    assert!(single_elimination_rounds(&names(1)).is_empty());
    assert!(single_elimination_rounds(&[]).is_empty());
}

#[test]
fn test_settings_round_trip_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config").join("settings.json");

    let missing = AppSettings::load_or_default(&path).unwrap();
    assert_eq!(missing, AppSettings::default());

    let settings = AppSettings {
        leaderboard_limit: 5,
        tree_timing: TreeTiming::Simple,
        data_dir: Some(dir.path().join("data")),
        ..Default::default()
    };
    settings.save(&path).unwrap();

    let loaded = AppSettings::load_or_default(&path).unwrap();
    assert_eq!(loaded.leaderboard_limit, 5);
    assert_eq!(loaded.tree_timing, TreeTiming::Simple);
    assert_eq!(loaded.resolved_data_dir().unwrap(), dir.path().join("data"));
}

#[test]
fn test_settings_reject_garbage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(AppSettings::load_or_default(&path).is_err());
}
