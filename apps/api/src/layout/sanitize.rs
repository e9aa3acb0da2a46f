//! Text Sanitizer: restricts stored text to what the base-14 fonts can draw.
//!
//! Output contains only printable ASCII (0x20..=0x7E) and `\n`. Runs of spaces
//! collapse to one, every line is trimmed, and runs of blank lines collapse to
//! a single blank line.

use serde_json::Value;
use tracing::warn;

/// Sanitizes a string for layout.
pub fn sanitize_text(input: &str) -> String {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<String> = Vec::new();
    for raw_line in normalized.split('\n') {
        let line = collapse_line(raw_line);
        if line.is_empty() && lines.last().map_or(true, |prev| prev.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}

/// Sanitizes an arbitrary JSON value. Only strings carry text; `null` is an
/// absent field and anything else degrades to an empty string.
pub fn sanitize_value(value: &Value) -> String {
    match value {
        Value::String(s) => sanitize_text(s),
        other => {
            warn_non_string(other);
            String::new()
        }
    }
}

/// Logs a text field that is neither a string nor `null`.
pub fn warn_non_string(value: &Value) {
    if !value.is_null() && !value.is_string() {
        warn!(
            kind = value_kind(value),
            "Non-string value in text field, rendering as blank"
        );
    }
}

fn collapse_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pending_space = false;

    for c in line.chars() {
        let c = if c == '\t' { ' ' } else { c };
        if !(' '..='~').contains(&c) {
            continue;
        }
        if c == ' ' {
            pending_space = !out.is_empty();
            continue;
        }
        if pending_space {
            out.push(' ');
            pending_space = false;
        }
        out.push(c);
    }

    out
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
