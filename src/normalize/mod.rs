//! Two-pass rewrite that moves `body` clauses onto their `POST` line.
//!
//! Pass 1 handles `POST` / `header` / `body` blocks, pass 2 the plain
//! `POST` / `body` pairs left over. Both scan top-to-bottom, replace every
//! non-overlapping match and copy everything else verbatim.

pub(crate) mod clause;

use crate::lines::{self, Line};
use crate::types::{Normalized, Rewrite, RewriteKind};

use clause::{BODY, HEADER, REQUEST};

/// A fixed-height block of lines that one pass knows how to rewrite.
trait Shape {
    const HEIGHT: usize;
    const KIND: RewriteKind;

    /// Append the replacement for `block` to `out` and return true, or
    /// return false without touching `out` if the block does not match.
    fn rewrite(block: &[Line<'_>], out: &mut String) -> bool;
}

/// ```text
/// POST <url>                    POST <url> body <body>
///   header <header>      →          header <header>
///   body <body>
/// ```
struct HeaderThenBody;

impl Shape for HeaderThenBody {
    const HEIGHT: usize = 3;
    const KIND: RewriteKind = RewriteKind::HeaderBody;

    fn rewrite(block: &[Line<'_>], out: &mut String) -> bool {
        let [request, header, body] = block else {
            return false;
        };
        let (Some(url), Some(header_value), Some(body_value)) = (
            clause::bare_request_target(request.text),
            clause::clause_value(header.text, HEADER),
            clause::clause_value(body.text, BODY),
        ) else {
            return false;
        };

        push_inline_body(out, url, body_value);
        out.push_str(request.ending);
        out.push_str("    ");
        out.push_str(HEADER);
        out.push(' ');
        out.push_str(header_value);
        out.push_str(body.ending);
        true
    }
}

/// ```text
/// POST <url>             →   POST <url> body <body>
///   body <body>
/// ```
struct BodyOnly;

impl Shape for BodyOnly {
    const HEIGHT: usize = 2;
    const KIND: RewriteKind = RewriteKind::BodyOnly;

    fn rewrite(block: &[Line<'_>], out: &mut String) -> bool {
        let [request, body] = block else {
            return false;
        };
        let (Some(url), Some(body_value)) = (
            clause::bare_request_target(request.text),
            clause::clause_value(body.text, BODY),
        ) else {
            return false;
        };

        push_inline_body(out, url, body_value);
        out.push_str(body.ending);
        true
    }
}

fn push_inline_body(out: &mut String, url: &str, body: &str) {
    out.push_str(REQUEST);
    out.push(' ');
    out.push_str(url);
    out.push(' ');
    out.push_str(BODY);
    out.push(' ');
    out.push_str(body);
}

/// Result of one pass: new text plus 0-based indices (in the pass's input)
/// of every line where a block was replaced.
struct PassOutput {
    text: String,
    hits: Vec<usize>,
}

fn apply<S: Shape>(text: &str) -> PassOutput {
    let lines = lines::split(text);
    let mut out = String::with_capacity(text.len());
    let mut hits = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if let Some(block) = lines.get(i..i + S::HEIGHT) {
            if S::rewrite(block, &mut out) {
                hits.push(i);
                i += S::HEIGHT;
                continue;
            }
        }
        out.push_str(lines[i].text);
        out.push_str(lines[i].ending);
        i += 1;
    }

    PassOutput { text: out, hits }
}

/// Normalize one document. Total: text with nothing to fix comes back equal.
#[must_use]
pub fn normalize(text: &str) -> String {
    normalize_with_report(text).text
}

/// Like [`normalize`], also listing each rewrite with its line in `text`.
#[must_use]
pub fn normalize_with_report(text: &str) -> Normalized {
    let first = apply::<HeaderThenBody>(text);
    let second = apply::<BodyOnly>(&first.text);

    // Every pass-1 hit turned 3 lines into 2. A pass-2 hit never starts on a
    // pass-1 output line, so shift it back by the hits emitted above it.
    let emitted_at: Vec<usize> = first
        .hits
        .iter()
        .enumerate()
        .map(|(k, &line)| line - k)
        .collect();

    let mut rewrites: Vec<Rewrite> = first
        .hits
        .iter()
        .map(|&line| Rewrite {
            line: line + 1,
            kind: HeaderThenBody::KIND,
        })
        .chain(second.hits.iter().map(|&line| {
            let above = emitted_at.partition_point(|&at| at < line);
            Rewrite {
                line: line + above + 1,
                kind: BodyOnly::KIND,
            }
        }))
        .collect();
    rewrites.sort_by_key(|r| r.line);

    Normalized {
        text: second.text,
        rewrites,
    }
}
