//! Basic CLI E2E tests.
//!
//! Tests invoke the `rounds` binary with a temporary data directory and
//! verify outputs.

mod common;

use common::{assert_contains, parse_json, run_cli_failure, run_cli_success};
use serde_json::Value;

#[test]
fn test_preset_list_seeds_default() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["preset", "list"]);
    assert_contains(&out, "Default");
    assert_contains(&out, "47:15");
}

#[test]
fn test_preset_list_json() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["preset", "list", "--json"]);
    let presets: Vec<Value> = parse_json(&out);
    assert_eq!(presets.len(), 1);
    assert_eq!(presets[0]["rounds"], 12);
    assert_eq!(presets[0]["round_length_secs"], 180);
}

#[test]
fn test_preset_create_and_use() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(
        dir.path(),
        &[
            "preset", "create", "Pads", "--rounds", "5", "--round-length", "2:00", "--rest",
            "30", "--prep", "10", "--activate",
        ],
    );
    assert_contains(&out, "Preset created");

    let shown = run_cli_success(dir.path(), &["preset", "show", "--json"]);
    let preset: Value = parse_json(&shown);
    assert_eq!(preset["name"], "Pads");
    assert_eq!(preset["round_length_secs"], 120);
    assert_eq!(preset["rest_secs"], 30);
}

#[test]
fn test_preset_create_rejects_bad_duration() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, _) = run_cli_failure(
        dir.path(),
        &["preset", "create", "Broken", "--round-length", "2:75"],
    );
    assert_contains(&stderr, "error:");
}

#[test]
fn test_preset_adjust_stops_at_limit() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(
        dir.path(),
        &["preset", "adjust", "prep", "dec", "--times", "5"],
    );
    // 15s prep steps down to 5s and stays there.
    assert_contains(&out, "Prep:         00:05");
}

#[test]
fn test_preset_duplicate_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["preset", "duplicate"]);
    assert_contains(&out, "Default (Copy)");

    let presets: Vec<Value> = parse_json(&run_cli_success(dir.path(), &["preset", "list", "--json"]));
    assert_eq!(presets.len(), 2);
    let copy_id = presets[1]["id"].as_i64().unwrap().to_string();

    let out = run_cli_success(dir.path(), &["preset", "delete", &copy_id]);
    assert_contains(&out, "Active preset: Default");
}

#[test]
fn test_cannot_delete_last_preset() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, _) = run_cli_failure(dir.path(), &["preset", "delete", "1"]);
    assert_contains(&stderr, "last preset");
}

#[test]
fn test_settings_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["settings", "set", "theme_mode", "dark"]);
    let out = run_cli_success(dir.path(), &["settings", "get", "theme_mode"]);
    assert_eq!(out.trim(), "dark");
    run_cli_failure(dir.path(), &["settings", "set", "active_preset", "99"]);
}

#[test]
fn test_config_get_set_list() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["config", "get", "sound.enabled"]);
    assert_eq!(out.trim(), "true");

    run_cli_success(dir.path(), &["config", "set", "timer.tick_ms", "5"]);
    let list: Value = parse_json(&run_cli_success(dir.path(), &["config", "list"]));
    assert_eq!(list["timer"]["tick_ms"], 5);

    run_cli_failure(dir.path(), &["config", "get", "sound.volume"]);
}

#[test]
fn test_run_completes_workout() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["config", "set", "timer.tick_ms", "1"]);
    run_cli_success(
        dir.path(),
        &[
            "preset", "create", "Quick", "--rounds", "2", "--round-length", "3", "--rest", "2",
            "--prep", "2", "--activate",
        ],
    );

    let out = run_cli_success(dir.path(), &["run", "--json", "--quiet"]);
    let events: Vec<Value> = out.lines().map(parse_json::<Value>).collect();
    let count = |ty: &str| events.iter().filter(|e| e["type"] == ty).count();

    assert_eq!(count("TimerStarted"), 1);
    assert_eq!(count("Ticked"), 2 + 3 + 2 + 3);
    assert_eq!(count("TimerFinished"), 1);
    let cues: Vec<&str> = events
        .iter()
        .filter(|e| e["type"] == "CueTriggered")
        .filter_map(|e| e["cue"].as_str())
        .collect();
    assert_eq!(
        cues,
        vec![
            "beep",
            "beep",
            "round_start",
            "round_end",
            "beep",
            "beep",
            "round_start",
            "round_end"
        ]
    );
}

#[test]
fn test_run_unknown_preset_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, _) = run_cli_failure(dir.path(), &["run", "--preset", "42"]);
    assert_contains(&stderr, "preset 42 not found");
}

#[test]
fn test_completions() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_cli_success(dir.path(), &["completions", "bash"]);
    assert_contains(&out, "rounds");
}
