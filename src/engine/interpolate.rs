//! Variable interpolation.
//!
//! Expands every `${...}` placeholder in a string against the variable
//! store. The expansion never fails: unresolved names become the empty
//! string so command execution is never aborted by a missing variable.

use crate::engine::vars::VariableStore;

/// Maximum placeholder nesting depth.
///
/// `${${x}}` resolves the inner placeholder first and uses its value as the
/// name for the outer lookup. Placeholders nested deeper than this bound
/// resolve to the empty string rather than erroring or looping.
const MAX_NESTING_DEPTH: usize = 2;

/// Expands every `${name}` placeholder in the input.
///
/// The scan is left-to-right and non-overlapping; substituted values are not
/// rescanned, so re-interpolating the result is a no-op for resolved text.
pub fn interpolate(store: &VariableStore, input: &str) -> String {
    expand(store, input, 0)
}

fn expand(store: &VariableStore, input: &str, depth: usize) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match find_closing_brace(after_open) {
            Some(end) => {
                let inner = &after_open[..end];
                result.push_str(&resolve(store, inner, depth));
                rest = &after_open[end + 1..];
            }
            None => {
                // No closing brace; the rest is literal text.
                result.push_str(&rest[start..]);
                return result;
            }
        }
    }

    result.push_str(rest);
    result
}

/// Resolves one placeholder body to its value.
fn resolve(store: &VariableStore, inner: &str, depth: usize) -> String {
    if depth >= MAX_NESTING_DEPTH {
        return String::new();
    }
    let name = if inner.contains("${") {
        expand(store, inner, depth + 1)
    } else {
        inner.to_string()
    };
    store.value(&name)
}

/// Finds the brace closing a placeholder, accounting for nested `${`.
fn find_closing_brace(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'$' && i + 1 < bytes.len() && bytes[i + 1] == b'{' {
            depth += 1;
            i += 2;
            continue;
        }
        if bytes[i] == b'}' {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        }
        i += 1;
    }

    None
}
