//! Recognizers for the single-line shapes the passes are built from.
//!
//! Each recognizer looks at one line's content (terminator already split
//! off) and returns the trimmed captured value. Keywords are case-sensitive
//! and whitespace means `char::is_whitespace`.

pub(crate) const REQUEST: &str = "POST";
pub(crate) const HEADER: &str = "header";
pub(crate) const BODY: &str = "body";

/// Target of a request line: `POST` at column 0, whitespace, then the rest.
pub(crate) fn request_target(line: &str) -> Option<&str> {
    value_after_keyword(line.strip_prefix(REQUEST)?)
}

/// Target of a request line that carries no inline `body` clause yet.
/// Only these can start a rewrite, so normalized output is never
/// picked up a second time.
pub(crate) fn bare_request_target(line: &str) -> Option<&str> {
    request_target(line).filter(|target| !has_inline_body(target))
}

/// Value of an indented clause: at least one leading whitespace char,
/// the keyword, whitespace, then the rest of the line.
pub(crate) fn clause_value<'a>(line: &'a str, keyword: &str) -> Option<&'a str> {
    let unindented = line.trim_start();
    if unindented.len() == line.len() {
        return None;
    }
    value_after_keyword(unindented.strip_prefix(keyword)?)
}

/// `rest` must open with whitespace and hold at least one more char after
/// it. A stray carriage return anywhere disqualifies the line.
fn value_after_keyword(rest: &str) -> Option<&str> {
    let mut chars = rest.chars();
    if !chars.next().is_some_and(char::is_whitespace) {
        return None;
    }
    if chars.as_str().is_empty() || rest.contains('\r') {
        return None;
    }
    Some(rest.trim())
}

/// True when a whitespace-delimited `body` word already sits in the target.
fn has_inline_body(target: &str) -> bool {
    target.split_whitespace().any(|word| word == BODY)
}
