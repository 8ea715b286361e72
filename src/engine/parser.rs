//! Line parser for Quill.
//!
//! Turns one input line into a [`Descriptor`]. The parser is given the target
//! command's declared parse mode; it never dispatches anything itself.

use std::collections::HashMap;

use crate::engine::descriptor::{Descriptor, ParseMode, COMMAND_PREFIX};
use crate::error::{QuillError, Result};

/// Extracts the command name from a prefixed line.
///
/// Returns `None` when the line does not start with the command-escape
/// prefix. The name is the token after the prefix up to `[`, whitespace,
/// or end of line.
pub fn command_name(line: &str) -> Option<&str> {
    let rest = line.strip_prefix(COMMAND_PREFIX)?;
    let end = rest
        .find(|c: char| c == '[' || c.is_whitespace())
        .unwrap_or(rest.len());
    Some(&rest[..end])
}

/// Parses a prefixed line into a descriptor using the given parse mode.
///
/// Malformed bracket or quote syntax yields a parse error; callers report it
/// without crashing the session.
pub fn parse_line(line: &str, mode: ParseMode) -> Result<Descriptor> {
    let rest = line
        .strip_prefix(COMMAND_PREFIX)
        .ok_or_else(|| QuillError::parse(format!("missing command prefix in '{line}'")))?;

    let name_end = rest
        .find(|c: char| c == '[' || c.is_whitespace())
        .unwrap_or(rest.len());
    let name = rest[..name_end].to_string();
    if name.is_empty() {
        return Err(QuillError::parse("empty command name"));
    }

    let tail = &rest[name_end..];
    let (bracket_content, message) = split_bracket_and_message(tail)?;

    let options = match (mode, &bracket_content) {
        (ParseMode::KeyValue, Some(content)) => parse_options(content)?,
        _ => HashMap::new(),
    };

    Ok(Descriptor {
        name,
        parse_mode: mode,
        bracket_content,
        options,
        raw_message: message.clone(),
        message,
    })
}

/// Splits the text after the command name into bracket content and message.
///
/// With a bracket group the content is extracted verbatim (balanced quotes
/// and nested brackets honored) and the remainder after one separating space
/// is the message. Without one, the remainder after one separating space is
/// the message.
fn split_bracket_and_message(tail: &str) -> Result<(Option<String>, String)> {
    let mut chars = tail.char_indices();

    match chars.next() {
        Some((_, '[')) => {}
        Some((_, c)) if c.is_whitespace() => {
            // One separating space; everything after it is the message.
            let message = tail[c.len_utf8()..].to_string();
            return Ok((None, message));
        }
        Some((_, c)) => {
            return Err(QuillError::parse(format!(
                "unexpected character '{c}' after command name"
            )));
        }
        None => return Ok((None, String::new())),
    }

    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut close_at = None;

    for (i, c) in chars {
        if escaped {
            escaped = false;
            continue;
        }
        match quote {
            Some(q) => match c {
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            },
            None => match c {
                '"' | '\'' => quote = Some(c),
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        close_at = Some(i);
                        break;
                    }
                }
                _ => {}
            },
        }
    }

    if quote.is_some() {
        return Err(QuillError::parse("unclosed quote in bracket group"));
    }
    let close_at = close_at.ok_or_else(|| QuillError::parse("unbalanced bracket group"))?;

    let content = tail[1..close_at].to_string();
    let after = &tail[close_at + 1..];
    let message = after.strip_prefix(' ').unwrap_or(after).to_string();
    Ok((Some(content), message))
}

/// Decomposes bracket content into key=value options.
///
/// Splits on commas outside quotes; each token is either `key=value` or a
/// bare flag mapped to the empty string. Values lose one surrounding pair of
/// quotes; whitespace is trimmed; duplicate keys last-wins.
fn parse_options(content: &str) -> Result<HashMap<String, String>> {
    let mut options = HashMap::new();

    for token in split_outside_quotes(content)? {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        match token.split_once('=') {
            Some((key, value)) => {
                options.insert(key.trim().to_string(), strip_quotes(value.trim()));
            }
            None => {
                // Bare token becomes a flag with an empty value.
                options.insert(token.to_string(), String::new());
            }
        }
    }

    Ok(options)
}

/// Splits on commas that are not inside a quoted span.
fn split_outside_quotes(content: &str) -> Result<Vec<&str>> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, c) in content.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match quote {
            Some(q) => match c {
                '\\' => escaped = true,
                _ if c == q => quote = None,
                _ => {}
            },
            None => match c {
                '"' | '\'' => quote = Some(c),
                ',' => {
                    parts.push(&content[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }

    if quote.is_some() {
        return Err(QuillError::parse("unclosed quote in options"));
    }
    parts.push(&content[start..]);
    Ok(parts)
}

/// Removes one matching pair of surrounding quotes, if present.
fn strip_quotes(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if first == last && (first == b'"' || first == b'\'') {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}
