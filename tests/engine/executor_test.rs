//! End-to-end executor tests over the full built-in registry.

use pretty_assertions::assert_eq;
use quill::engine::vars::{VAR_CONDITION, VAR_ERROR, VAR_OUTPUT, VAR_STATUS};
use quill::engine::ExecutorState;
use quill::llm::mock::MockLlmClient;

use super::common::{test_engine, test_engine_with_mock};

#[tokio::test]
async fn test_set_then_echo_interpolates() {
    let (mut engine, capture) = test_engine();

    engine.submit_line("\\set[greeting=Hello, name=Alice]").await;
    let state = engine.submit_line("\\echo ${greeting}, ${name}!").await;

    assert_eq!(state, ExecutorState::Idle);
    assert!(capture.text().contains("Hello, Alice!"));
    assert_eq!(engine.context().vars.value(VAR_OUTPUT), "Hello, Alice!");
}

#[tokio::test]
async fn test_try_absorbs_shell_failure() {
    // A failing command inside an error boundary: status recorded, run Idle.
    let (mut engine, _capture) = test_engine();

    let state = engine.submit_line("\\try \\bash exit 7").await;

    assert_eq!(state, ExecutorState::Idle);
    assert_eq!(engine.context().vars.value(VAR_STATUS), "1");
    assert!(engine.context().vars.value(VAR_ERROR).contains("exit status 7"));
}

#[tokio::test]
async fn test_unbounded_shell_failure_halts() {
    // The same failure without a boundary halts the run.
    let (mut engine, _capture) = test_engine();

    let state = engine.submit_line("\\bash exit 7").await;

    assert_eq!(state, ExecutorState::HaltedOnError);
    assert_eq!(engine.context().vars.value(VAR_STATUS), "1");
}

#[tokio::test]
async fn test_halted_run_discards_rest_of_script_work() {
    let (mut engine, capture) = test_engine();
    engine.context_mut().stack.push_command("\\echo never");
    engine.context_mut().stack.push_command("\\bash exit 1");

    let state = engine.run().await;

    assert_eq!(state, ExecutorState::HaltedOnError);
    assert!(!capture.text().contains("never"));
}

#[tokio::test]
async fn test_session_usable_after_halt() {
    let (mut engine, capture) = test_engine();
    engine.submit_line("\\bash exit 1").await;

    let state = engine.submit_line("\\echo recovered").await;

    assert_eq!(state, ExecutorState::Idle);
    assert!(capture.text().contains("recovered"));
    assert_eq!(engine.context().vars.value(VAR_STATUS), "0");
}

#[tokio::test]
async fn test_silent_suppresses_wrapped_output_only() {
    let (mut engine, capture) = test_engine();

    engine.submit_line("\\silent \\echo hidden").await;
    engine.submit_line("\\echo visible").await;

    let text = capture.text();
    assert!(!text.contains("hidden"));
    assert!(text.contains("visible"));
}

#[tokio::test]
async fn test_silent_does_not_suppress_errors() {
    let (mut engine, capture) = test_engine();

    let state = engine.submit_line("\\silent \\try \\bash exit 2").await;

    assert_eq!(state, ExecutorState::Idle);
    assert!(capture
        .errors()
        .iter()
        .any(|e| e.contains("exit status 2")));
}

#[tokio::test]
async fn test_try_prints_what_the_direct_command_prints() {
    // Staged commands run through one interpolation pass, same as direct
    // ones: placeholder-looking text inside a reply is never rescanned.
    let mock = MockLlmClient::new().with_response("token", "use ${HOME} here");
    let (mut engine, capture) = test_engine_with_mock(mock);
    engine.submit_line("give me the token").await;

    engine.submit_line("\\echo ${_output}").await;
    engine.submit_line("\\try \\echo ${_output}").await;

    assert_eq!(
        capture.text(),
        "use ${HOME} here\nuse ${HOME} here\nuse ${HOME} here\n"
    );
}

#[tokio::test]
async fn test_if_staged_command_interpolated_once() {
    let mock = MockLlmClient::new().with_response("token", "keep ${PATH} intact");
    let (mut engine, capture) = test_engine_with_mock(mock);
    engine.submit_line("give me the token").await;

    engine
        .submit_line("\\if[left=1, op=eq, right=1] \\echo ${_output}")
        .await;

    assert!(capture.text().contains("keep ${PATH} intact\nkeep ${PATH} intact"));
}

#[tokio::test]
async fn test_if_true_runs_message_after_stack_drains() {
    let (mut engine, capture) = test_engine();
    engine.submit_line("\\set[x=1]").await;

    let state = engine
        .submit_line("\\if[left=${x}, op=eq, right=1] \\echo matched")
        .await;

    assert_eq!(state, ExecutorState::Idle);
    assert!(capture.text().contains("matched"));
    assert_eq!(engine.context().vars.value(VAR_CONDITION), "1");
}

#[tokio::test]
async fn test_if_false_skips_message() {
    let (mut engine, capture) = test_engine();
    engine.submit_line("\\set[x=1]").await;

    engine
        .submit_line("\\if[left=${x}, op=eq, right=2] \\echo skipped")
        .await;

    assert!(!capture.text().contains("skipped"));
    assert_eq!(engine.context().vars.value(VAR_CONDITION), "0");
}

#[tokio::test]
async fn test_unprefixed_line_goes_to_send() {
    let (mut engine, capture) = test_engine();

    let state = engine.submit_line("tell me about rust").await;

    assert_eq!(state, ExecutorState::Idle);
    assert!(capture.text().contains("You said: tell me about rust"));
    assert_eq!(
        engine.context().vars.value(VAR_OUTPUT),
        "You said: tell me about rust"
    );
}

#[tokio::test]
async fn test_send_updates_positional_variables() {
    let (mut engine, capture) = test_engine();

    engine.submit_line("tell me about rust").await;
    engine.submit_line("\\echo reply was: ${1}").await;

    assert!(capture
        .text()
        .contains("reply was: You said: tell me about rust"));
}

#[tokio::test]
async fn test_send_uses_custom_mock_response() {
    let mock = MockLlmClient::new().with_response("weather", "It is sunny.");
    let (mut engine, capture) = test_engine_with_mock(mock);

    engine.submit_line("what's the weather today?").await;

    assert!(capture.text().contains("It is sunny."));
}

#[tokio::test]
async fn test_clear_resets_positionals() {
    let (mut engine, _capture) = test_engine();
    engine.submit_line("tell me about rust").await;
    assert_ne!(engine.context().vars.value("1"), "");

    engine.submit_line("\\clear").await;

    assert_eq!(engine.context().vars.value("1"), "");
    assert_eq!(engine.context().vars.value("#message_count"), "0");
}

#[tokio::test]
async fn test_bash_output_feeds_interpolation() {
    let (mut engine, capture) = test_engine();

    engine.submit_line("\\bash printf 41").await;
    engine.submit_line("\\echo got ${_output}").await;

    assert!(capture.text().contains("got 41"));
}

#[tokio::test]
async fn test_get_and_unset_flow() {
    let (mut engine, capture) = test_engine();

    engine.submit_line("\\set[city=Oslo]").await;
    engine.submit_line("\\get[city]").await;
    assert!(capture.text().contains("Oslo"));

    engine.submit_line("\\unset[city]").await;
    engine.submit_line("\\get[city]").await;
    assert_eq!(engine.context().vars.value(VAR_OUTPUT), "");
}

#[tokio::test]
async fn test_parse_error_does_not_halt() {
    let (mut engine, capture) = test_engine();

    let state = engine.submit_line("\\set[broken").await;

    assert_eq!(state, ExecutorState::Idle);
    assert_eq!(engine.context().vars.value(VAR_STATUS), "1");
    assert!(capture.errors()[0].contains("Parse error"));
}

#[tokio::test]
async fn test_exit_requests_console_exit() {
    let (mut engine, capture) = test_engine();

    engine.submit_line("\\exit").await;

    assert!(engine.exit_requested());
    assert!(capture.text().contains("Goodbye!"));
}

#[tokio::test]
async fn test_quit_alias() {
    let (mut engine, _capture) = test_engine();
    engine.submit_line("\\quit").await;
    assert!(engine.exit_requested());
}

#[tokio::test]
async fn test_status_tracks_each_dispatch() {
    let (mut engine, _capture) = test_engine();

    engine.submit_line("\\try \\bash exit 1").await;
    assert_eq!(engine.context().vars.value(VAR_STATUS), "1");

    engine.submit_line("\\echo fine").await;
    assert_eq!(engine.context().vars.value(VAR_STATUS), "0");
    assert_eq!(engine.context().vars.value(VAR_ERROR), "");
}

#[tokio::test]
async fn test_last_status_snapshot_inside_try() {
    let (mut engine, _capture) = test_engine();
    engine.submit_line("\\echo warmup").await;

    engine.submit_line("\\try \\bash exit 1").await;

    let vars = &engine.context().vars;
    assert_eq!(vars.value("_last_status"), "0");
    assert_eq!(vars.value("_last_error"), "");
}
