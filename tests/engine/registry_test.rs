//! Registry behavior through the full pipeline.

use pretty_assertions::assert_eq;
use quill::commands::register_builtins;
use quill::engine::vars::VAR_STATUS;
use quill::engine::{CommandRegistry, ExecutorState, ParseMode};

use super::common::test_engine;

#[test]
fn test_duplicate_registration_fails_first_stays_active() {
    // Re-registering a taken name fails; the original survives.
    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry).unwrap();
    let count = registry.len();

    let err = register_builtins(&mut registry).unwrap_err();

    assert!(err.to_string().contains("already registered"));
    assert_eq!(registry.len(), count);
    assert!(registry.get("echo").is_some());
}

#[test]
fn test_builtin_parse_modes_drive_the_parser() {
    let mut registry = CommandRegistry::new();
    register_builtins(&mut registry).unwrap();

    assert_eq!(registry.parse_mode("set"), Some(ParseMode::KeyValue));
    assert_eq!(registry.parse_mode("bash"), Some(ParseMode::Raw));
    assert_eq!(registry.parse_mode("nonesuch"), None);
}

#[tokio::test]
async fn test_unknown_command_is_distinguishable() {
    let (mut engine, capture) = test_engine();

    let state = engine.submit_line("\\frobnicate now").await;

    assert_eq!(state, ExecutorState::HaltedOnError);
    assert!(capture.errors()[0].contains("Unknown command: frobnicate"));
}

#[tokio::test]
async fn test_unknown_command_absorbed_by_try() {
    let (mut engine, _capture) = test_engine();

    let state = engine.submit_line("\\try \\frobnicate now").await;

    assert_eq!(state, ExecutorState::Idle);
    assert_eq!(engine.context().vars.value(VAR_STATUS), "1");
    assert!(engine
        .context()
        .vars
        .value("_error")
        .contains("Unknown command"));
}

#[tokio::test]
async fn test_help_renders_grouped_commands() {
    let (mut engine, capture) = test_engine();

    engine.submit_line("\\help").await;

    let text = capture.text();
    assert!(text.contains("General commands"));
    assert!(text.contains("Control flow"));
    assert!(text.contains("\\set[name=value, ...]"));
    assert!(text.contains("\\try <command>"));
}

#[tokio::test]
async fn test_help_for_single_command() {
    let (mut engine, capture) = test_engine();

    engine.submit_line("\\help bash").await;

    assert!(capture.text().contains("Run a shell command"));
}

#[tokio::test]
async fn test_help_for_unknown_command_fails() {
    let (mut engine, _capture) = test_engine();

    let state = engine.submit_line("\\help frobnicate").await;

    assert_eq!(state, ExecutorState::HaltedOnError);
}
