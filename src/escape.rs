//! Shared escape-sequence processing.
//!
//! Several commands accept text containing backslash escapes (`\n`, `\t`,
//! `\r`, `\\`, `\"`, `\'`). This is the single decoder they all share.

/// Decodes backslash escape sequences in the input.
///
/// Unknown escapes are kept verbatim (backslash included), matching the
/// tolerant policy used everywhere else in the interpreter.
pub fn unescape(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('\'') => result.push('\''),
            Some(other) => {
                // Unknown escape, keep as-is
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }

    result
}
