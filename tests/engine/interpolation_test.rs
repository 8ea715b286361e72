//! Interpolation tests over the store and the session projection.

use pretty_assertions::assert_eq;
use quill::engine::{interpolate, VariableStore};
use quill::session::ChatSession;

#[test]
fn test_basic_interpolation() {
    // "${greeting}, ${name}!" with greeting=Hello, name=Alice.
    let mut store = VariableStore::new();
    store.set("greeting", "Hello").unwrap();
    store.set("name", "Alice").unwrap();

    assert_eq!(interpolate(&store, "${greeting}, ${name}!"), "Hello, Alice!");
}

#[test]
fn test_missing_name_resolves_empty() {
    let store = VariableStore::new();
    assert_eq!(interpolate(&store, "[${missing}]"), "[]");
}

#[test]
fn test_interpolation_is_idempotent() {
    let mut store = VariableStore::new();
    store.set("a", "value").unwrap();

    let once = interpolate(&store, "x ${a} ${missing} y");
    let twice = interpolate(&store, &once);
    assert_eq!(once, twice);
}

#[test]
fn test_substituted_values_not_rescanned() {
    let mut store = VariableStore::new();
    store.set("a", "${b}").unwrap();
    store.set("b", "surprise").unwrap();

    assert_eq!(interpolate(&store, "${a}"), "${b}");
}

#[test]
fn test_nested_interpolation_within_depth() {
    let mut store = VariableStore::new();
    store.set("key", "name").unwrap();
    store.set("name", "Alice").unwrap();

    assert_eq!(interpolate(&store, "${${key}}"), "Alice");
}

#[test]
fn test_nesting_beyond_depth_resolves_empty() {
    let mut store = VariableStore::new();
    store.set("a", "b").unwrap();
    store.set("b", "c").unwrap();
    store.set("c", "value").unwrap();

    assert_eq!(interpolate(&store, "${${${a}}}"), "");
}

#[test]
fn test_env_namespace_falls_through() {
    let store = VariableStore::new();
    std::env::set_var("QUILL_INTERP_TEST", "from-env");
    assert_eq!(interpolate(&store, "${@QUILL_INTERP_TEST}"), "from-env");
    std::env::remove_var("QUILL_INTERP_TEST");
}

#[test]
fn test_positional_names_from_session_projection() {
    let mut session = ChatSession::new();
    session.push_user("what is rust?");
    session.push_assistant("a systems language");

    let mut store = VariableStore::new();
    session.project_into(&mut store);

    assert_eq!(
        interpolate(&store, "last reply: ${1}"),
        "last reply: a systems language"
    );
    assert_eq!(
        interpolate(&store, "prompt was: ${2}"),
        "prompt was: what is rust?"
    );
    assert_eq!(interpolate(&store, "${#message_count}"), "2");
}

#[test]
fn test_adjacent_placeholders() {
    let mut store = VariableStore::new();
    store.set("a", "1").unwrap();
    store.set("b", "2").unwrap();
    assert_eq!(interpolate(&store, "${a}${b}"), "12");
}

#[test]
fn test_unterminated_placeholder_left_verbatim() {
    let mut store = VariableStore::new();
    store.set("a", "1").unwrap();
    assert_eq!(interpolate(&store, "${a} and ${open"), "1 and ${open");
}
