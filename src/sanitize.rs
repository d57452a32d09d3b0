//! Sanitizer: strips a raw model completion down to an embeddable code body.
//!
//! Models wrap code in markdown fences, add import lines the live preview
//! can't resolve, and append "Please note ..." paragraphs. Everything here
//! only deletes text, so repeated passes shrink the input until nothing
//! matches and the result is a fixed point.

use std::sync::LazyLock;

use regex::Regex;

/// Returned when a completion is empty or nothing survives cleanup.
pub const NO_CODE_PLACEHOLDER: &str = "() => (<div>No code generated</div>)";

/// Fence delimiter with whatever language tag follows it.
static FENCE_WITH_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_+-]*").unwrap());

/// `from pkg import name` lines (backend code is Python).
static FROM_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*from[ \t]+\S+[ \t]+import\b[^\n]*").unwrap());

/// Lines that start with an `import` statement.
static IMPORT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*import\b[^\n]*").unwrap());

/// A stray `import` keyword inside a line. Only the keyword goes.
static IMPORT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bimport[ \t]+").unwrap());

/// `export default ...` through end of line.
static EXPORT_DEFAULT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bexport[ \t]+default\b[^\n]*").unwrap());

/// Leading `export` keywords on named exports; the declaration itself stays.
static EXPORT_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^([ \t]*)(?:export[ \t]+)+").unwrap());

/// Markers that open a trailing commentary block.
static TRAILERS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"(?i)please\s+note").unwrap(),
        Regex::new(r"(?im)^[ \t]*explanation[ \t]*:").unwrap(),
    ]
});

/// Start of the functional payload: a zero-argument arrow function.
static EXPRESSION_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\s*\)\s*=>").unwrap());

/// Clean a raw completion into a bare code fragment.
///
/// The result is never empty, contains no fence delimiter, no import or
/// `export default` declaration and no trailing "Please note" block, and
/// starts at the first `() =>` when one is present. Text without an arrow
/// function (backend code) keeps its beginning.
pub fn sanitize(raw: &str) -> String {
    let mut text = raw.to_string();
    loop {
        let next = clean_pass(&text);
        if next == text {
            break;
        }
        text = next;
    }

    if text.is_empty() {
        NO_CODE_PLACEHOLDER.to_string()
    } else {
        text
    }
}

/// One ordered pass over the text. Every step only removes characters.
fn clean_pass(text: &str) -> String {
    let text = strip_fences(text);
    let text = FROM_IMPORT.replace_all(&text, "");
    let text = IMPORT_LINE.replace_all(&text, "");
    let text = IMPORT_KEYWORD.replace_all(&text, "");
    let text = EXPORT_DEFAULT.replace_all(&text, "");
    let text = EXPORT_KEYWORD.replace_all(&text, "$1");
    let text = strip_trailer(&text);
    let text = strip_preamble(text);
    text.trim().to_string()
}

fn strip_fences(text: &str) -> String {
    FENCE_WITH_TAG.replace_all(text, "").into_owned()
}

/// Cut at the earliest commentary marker.
fn strip_trailer(text: &str) -> &str {
    let cut = TRAILERS
        .iter()
        .filter_map(|re| re.find(text).map(|m| m.start()))
        .min();
    match cut {
        Some(pos) => &text[..pos],
        None => text,
    }
}

/// Drop prose before the first arrow function; leave text without one alone.
fn strip_preamble(text: &str) -> &str {
    match EXPRESSION_START.find(text) {
        Some(m) => &text[m.start()..],
        None => text,
    }
}
