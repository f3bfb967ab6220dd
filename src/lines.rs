use memchr::memchr_iter;

/// One line of a document: content without its terminator, plus the
/// terminator itself so untouched lines round-trip byte-for-byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Line<'a> {
    pub text: &'a str,
    /// `"\n"`, `"\r\n"`, or `""` for a final line with no newline.
    pub ending: &'a str,
}

/// Split `text` into lines. Unlike `str::lines`, keeps terminators and
/// emits no phantom empty line after a trailing newline.
pub(crate) fn split(text: &str) -> Vec<Line<'_>> {
    let buf = text.as_bytes();
    let mut lines = Vec::with_capacity(memchr_iter(b'\n', buf).count() + 1);
    let mut start = 0;

    for nl in memchr_iter(b'\n', buf) {
        // '\n' and '\r' are ASCII, so every slice boundary here is a char boundary.
        let end = if nl > start && buf[nl - 1] == b'\r' {
            nl - 1
        } else {
            nl
        };
        lines.push(Line {
            text: &text[start..end],
            ending: &text[end..=nl],
        });
        start = nl + 1;
    }

    if start < text.len() {
        lines.push(Line {
            text: &text[start..],
            ending: "",
        });
    }

    lines
}
