//! Parser pipeline tests.

use pretty_assertions::assert_eq;
use quill::engine::parser::{command_name, parse_line};
use quill::engine::ParseMode;

#[test]
fn test_command_name_extraction() {
    assert_eq!(command_name("\\echo hello"), Some("echo"));
    assert_eq!(command_name("\\set[a=1]"), Some("set"));
    assert_eq!(command_name("\\vars"), Some("vars"));
    assert_eq!(command_name("plain text line"), None);
}

#[test]
fn test_key_value_decomposition() {
    // \cmd[a=1, b="x y", c] yields {a:"1", b:"x y", c:""}.
    let desc = parse_line("\\cmd[a=1, b=\"x y\", c]", ParseMode::KeyValue).unwrap();

    assert_eq!(desc.name, "cmd");
    assert_eq!(desc.option("a"), "1");
    assert_eq!(desc.option("b"), "x y");
    assert!(desc.has_option("c"));
    assert_eq!(desc.option("c"), "");
}

#[test]
fn test_duplicate_keys_last_wins() {
    let desc = parse_line("\\cmd[a=1, a=2]", ParseMode::KeyValue).unwrap();
    assert_eq!(desc.option("a"), "2");
}

#[test]
fn test_message_after_bracket_group() {
    let desc = parse_line("\\cmd[a=1] the message", ParseMode::KeyValue).unwrap();
    assert_eq!(desc.message, "the message");
    assert_eq!(desc.bracket_content.as_deref(), Some("a=1"));
}

#[test]
fn test_raw_mode_message_untouched() {
    let desc = parse_line("\\bash grep -r \"a=b\" . | wc -l", ParseMode::Raw).unwrap();
    assert_eq!(desc.name, "bash");
    assert_eq!(desc.message, "grep -r \"a=b\" . | wc -l");
    assert!(desc.options.is_empty());
}

#[test]
fn test_raw_mode_keeps_bracket_group_out_of_message() {
    let desc = parse_line("\\cmd[verbatim, stuff] tail", ParseMode::Raw).unwrap();
    assert_eq!(desc.bracket_content.as_deref(), Some("verbatim, stuff"));
    assert_eq!(desc.message, "tail");
    assert!(desc.options.is_empty());
}

#[test]
fn test_nested_brackets_extracted_verbatim() {
    let desc = parse_line("\\cmd[a=[1][2]] tail", ParseMode::Raw).unwrap();
    assert_eq!(desc.bracket_content.as_deref(), Some("a=[1][2]"));
    assert_eq!(desc.message, "tail");
}

#[test]
fn test_unclosed_quote_is_parse_error() {
    let err = parse_line("\\cmd[a=\"unterminated]", ParseMode::KeyValue).unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("Parse error"));
}

#[test]
fn test_unbalanced_bracket_is_parse_error() {
    let err = parse_line("\\cmd[a=1", ParseMode::KeyValue).unwrap_err();
    assert!(err.is_parse());
}

#[test]
fn test_empty_command_name_is_parse_error() {
    assert!(parse_line("\\", ParseMode::Raw).is_err());
    assert!(parse_line("\\[a=1]", ParseMode::Raw).is_err());
}

#[test]
fn test_quoted_comma_stays_in_value() {
    let desc = parse_line("\\cmd[a=\"one, two\", b=3]", ParseMode::KeyValue).unwrap();
    assert_eq!(desc.option("a"), "one, two");
    assert_eq!(desc.option("b"), "3");
}
