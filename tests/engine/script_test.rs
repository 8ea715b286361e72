//! Script loading tests.

use std::io::Write;

use pretty_assertions::assert_eq;
use quill::engine::vars::{VAR_OUTPUT, VAR_STATUS};
use quill::engine::ExecutorState;

use super::common::test_engine;

fn write_script(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_script_runs_lines_in_order() {
    let (mut engine, capture) = test_engine();
    let script = write_script(
        "# setup\n\
         \\set[who=world]\n\
         \n\
         \\echo hello ${who}\n",
    );

    let state = engine
        .submit_line(&format!("\\script {}", script.path().display()))
        .await;

    assert_eq!(state, ExecutorState::Idle);
    let text = capture.text();
    let hello_at = text.find("hello world").expect("echo output present");
    let done_at = text.find("Script complete").expect("completion notice present");
    assert!(hello_at < done_at);
}

#[tokio::test]
async fn test_script_comments_and_blanks_skipped() {
    let (mut engine, capture) = test_engine();
    let script = write_script("# only comments\n\n   # indented\n\\echo ran\n");

    engine
        .submit_line(&format!("\\script {}", script.path().display()))
        .await;

    let text = capture.text();
    assert!(text.contains("ran"));
    assert!(!text.contains("only comments"));
}

#[tokio::test]
async fn test_completion_notice_leaves_output_variable_alone() {
    // The notice is informational only; ${_output} still holds whatever the
    // script's last producing command wrote.
    let (mut engine, capture) = test_engine();
    let script = write_script("\\echo payload\n");

    let state = engine
        .submit_line(&format!("\\script {}", script.path().display()))
        .await;

    assert_eq!(state, ExecutorState::Idle);
    assert!(capture.text().contains("Script complete"));
    assert_eq!(engine.context().vars.value(VAR_OUTPUT), "payload");
}

#[tokio::test]
async fn test_script_missing_file_halts() {
    let (mut engine, capture) = test_engine();

    let state = engine.submit_line("\\script /nonexistent/quill.qs").await;

    assert_eq!(state, ExecutorState::HaltedOnError);
    assert!(capture.errors()[0].contains("Failed to read script"));
}

#[tokio::test]
async fn test_script_missing_file_absorbed_by_try() {
    let (mut engine, _capture) = test_engine();

    let state = engine.submit_line("\\try \\script /nonexistent/quill.qs").await;

    assert_eq!(state, ExecutorState::Idle);
    assert_eq!(engine.context().vars.value(VAR_STATUS), "1");
}

#[tokio::test]
async fn test_script_failing_line_halts_remaining_lines() {
    let (mut engine, capture) = test_engine();
    let script = write_script("\\echo before\n\\bash exit 1\n\\echo after\n");

    let state = engine
        .submit_line(&format!("\\script {}", script.path().display()))
        .await;

    assert_eq!(state, ExecutorState::HaltedOnError);
    let text = capture.text();
    assert!(text.contains("before"));
    assert!(!text.contains("after"));
}

#[tokio::test]
async fn test_script_failing_line_wrapped_in_try_continues() {
    let (mut engine, capture) = test_engine();
    let script = write_script("\\try \\bash exit 1\n\\echo still here\n");

    let state = engine
        .submit_line(&format!("\\script {}", script.path().display()))
        .await;

    assert_eq!(state, ExecutorState::Idle);
    assert!(capture.text().contains("still here"));
}

#[tokio::test]
async fn test_script_can_load_nested_script() {
    let (mut engine, capture) = test_engine();
    let inner = write_script("\\echo inner ran\n");
    let outer = write_script(&format!(
        "\\echo outer start\n\\script {}\n\\echo outer end\n",
        inner.path().display()
    ));

    let state = engine
        .submit_line(&format!("\\script {}", outer.path().display()))
        .await;

    assert_eq!(state, ExecutorState::Idle);
    let text = capture.text();
    let start = text.find("outer start").unwrap();
    let inner_at = text.find("inner ran").unwrap();
    let end = text.find("outer end").unwrap();
    assert!(start < inner_at && inner_at < end);
}
