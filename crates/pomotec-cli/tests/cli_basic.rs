//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary against a temporary data directory.

mod common;

use common::*;
use pomotec_core::{Database, TimerEngine};

/// Store a focus session that started `minutes_ago` as the persisted timer.
fn seed_running_focus(dir: &std::path::Path, minutes_ago: u64) {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64;
    let mut engine = TimerEngine::default();
    engine.start_focus_session_at(now - minutes_ago * 60 * 1000);
    let db = Database::open_at(&dir.join("pomotec.db")).unwrap();
    db.kv_set("timer_engine", &serde_json::to_string(&engine).unwrap())
        .unwrap();
}

#[test]
fn test_timer_status_initial() {
    let dir = sandbox();
    let snap = last_json(&run_cli_success(dir.path(), &["timer", "status"]));
    assert_eq!(snap["type"], "state_snapshot");
    assert_eq!(snap["phase"], "focus");
    assert_eq!(snap["state"], "idle");
    assert_eq!(snap["time_left"], "25:00");
    assert_eq!(snap["progress"], 0.0);
}

#[test]
fn test_timer_start_then_pause() {
    let dir = sandbox();
    let started = last_json(&run_cli_success(dir.path(), &["timer", "start"]));
    assert_eq!(started["type"], "phase_started");
    assert_eq!(started["phase"], "focus");
    assert_eq!(started["duration_secs"], 1500);

    let paused = last_json(&run_cli_success(dir.path(), &["timer", "pause"]));
    assert_eq!(paused["type"], "timer_paused");

    let snap = last_json(&run_cli_success(dir.path(), &["timer", "status"]));
    assert_eq!(snap["state"], "paused");

    let resumed = last_json(&run_cli_success(dir.path(), &["timer", "resume"]));
    assert_eq!(resumed["type"], "timer_resumed");
}

#[test]
fn test_timer_reset() {
    let dir = sandbox();
    run_cli_success(dir.path(), &["timer", "start"]);
    let reset = last_json(&run_cli_success(dir.path(), &["timer", "reset"]));
    assert_eq!(reset["type"], "timer_reset");

    let snap = last_json(&run_cli_success(dir.path(), &["timer", "status"]));
    assert_eq!(snap["state"], "idle");
    assert_eq!(snap["phase"], "focus");
    assert_eq!(snap["time_left"], "25:00");
}

#[test]
fn test_skip_break_rejected_during_focus() {
    let dir = sandbox();
    let (_, stderr, _) = run_cli_failure(dir.path(), &["timer", "skip-break"]);
    assert_contains(&stderr, "not on a break");
}

#[test]
fn test_config_get_and_set() {
    let dir = sandbox();
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "schedule.focus_duration"]).trim(),
        "25"
    );
    run_cli_success(dir.path(), &["config", "set", "ui.dark_mode", "true"]);
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "ui.dark_mode"]).trim(),
        "true"
    );
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = sandbox();
    let (_, stderr, code) = run_cli_failure(dir.path(), &["config", "set", "ui.nope", "1"]);
    assert_eq!(code, 1);
    assert_contains(&stderr, "unknown config key");
}

#[test]
fn test_custom_durations_apply_to_idle_timer() {
    let dir = sandbox();
    run_cli_success(dir.path(), &["timer", "status"]);
    run_cli_success(dir.path(), &["config", "set", "schedule.focus_duration", "50"]);
    let snap = last_json(&run_cli_success(dir.path(), &["timer", "status"]));
    assert_eq!(snap["time_left"], "50:00");
}

#[test]
fn test_stats_empty() {
    let dir = sandbox();
    let stats = last_json(&run_cli_success(dir.path(), &["stats", "all"]));
    assert_eq!(stats["total_sessions"], 0);
    assert_eq!(stats["completed_pomodoros"], 0);
}

#[test]
fn test_status_catches_up_stale_timer() {
    let dir = sandbox();
    seed_running_focus(dir.path(), 26);

    let out = parse_json_stream(&run_cli_success(dir.path(), &["timer", "status"]));
    let types: Vec<_> = out.iter().map(|v| v["type"].as_str().unwrap()).collect();
    assert_eq!(types, vec!["phase_completed", "phase_started", "state_snapshot"]);
    assert_eq!(out[0]["phase"], "focus");
    assert_eq!(out[1]["phase"], "break");
    assert_eq!(out[2]["phase"], "break");
    assert_eq!(out[2]["state"], "running");

    let stats = last_json(&run_cli_success(dir.path(), &["stats", "all"]));
    assert_eq!(stats["completed_pomodoros"], 1);
    assert_eq!(stats["total_focus_min"], 25);

    // Already caught up: a second status records nothing new.
    let again = parse_json_stream(&run_cli_success(dir.path(), &["timer", "status"]));
    assert_eq!(again.len(), 1);
    let stats = last_json(&run_cli_success(dir.path(), &["stats", "all"]));
    assert_eq!(stats["total_sessions"], 1);
}

#[test]
fn test_run_requires_terminal() {
    let dir = sandbox();
    let (_, stderr, _) = run_cli_failure(dir.path(), &["run"]);
    assert_contains(&stderr, "interactive terminal");
}

#[test]
fn test_completions() {
    let dir = sandbox();
    let out = run_cli_success(dir.path(), &["completions", "bash"]);
    assert_contains(&out, "pomotec");
}
