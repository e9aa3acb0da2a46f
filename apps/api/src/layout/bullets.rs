//! Bullet Formatter: splits a free-text description into bullet lines.
//!
//! Newlines are the only delimiter. A leading `•`, `-` or `*` is stripped from
//! each segment; a hyphen anywhere else is left alone, so "state-of-the-art"
//! stays intact while a line that merely starts with a dash loses it. A `•`
//! inside a line becomes a comma so the words on either side stay apart.

use crate::layout::sanitize::sanitize_text;

const BULLET_GLYPHS: [char; 3] = ['\u{2022}', '-', '*'];

/// Splits `text` into ordered, sanitized bullets. Empty segments are dropped.
pub fn split_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(|segment| sanitize_text(&join_inline_bullets(strip_bullet_glyph(segment.trim()))))
        .filter(|bullet| !bullet.is_empty())
        .collect()
}

fn strip_bullet_glyph(segment: &str) -> &str {
    match segment.strip_prefix(|c: char| BULLET_GLYPHS.contains(&c)) {
        Some(rest) => rest.trim_start(),
        None => segment,
    }
}

fn join_inline_bullets(segment: &str) -> String {
    segment
        .split('\u{2022}')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
