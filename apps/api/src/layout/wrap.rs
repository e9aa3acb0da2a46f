//! Greedy word wrap against the static font-metric tables.

use crate::layout::page::TextStyle;

/// Wraps `text` into lines no wider than `max_width` points.
///
/// Words are separated by whitespace and never reordered. A word wider than
/// `max_width` on its own is broken between characters. Empty input yields no lines.
pub fn wrap_text(text: &str, style: TextStyle, max_width: f32) -> Vec<String> {
    let space_w = style.width_of(" ");
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    for word in text.split_whitespace() {
        let word_w = style.width_of(word);

        if word_w > max_width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let mut pieces = break_word(word, style, max_width);
            // The tail of a broken word can still take following words.
            let tail = pieces.pop().unwrap_or_default();
            lines.extend(pieces);
            current_width = style.width_of(&tail);
            current = tail;
            continue;
        }

        if current.is_empty() {
            current.push_str(word);
            current_width = word_w;
        } else if current_width + space_w + word_w > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
            current_width = word_w;
        } else {
            current.push(' ');
            current.push_str(word);
            current_width += space_w + word_w;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn break_word(word: &str, style: TextStyle, max_width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut width = 0.0_f32;

    for c in word.chars() {
        let mut buf = [0u8; 4];
        let char_w = style.width_of(c.encode_utf8(&mut buf));
        if !piece.is_empty() && width + char_w > max_width {
            pieces.push(std::mem::take(&mut piece));
            width = 0.0;
        }
        piece.push(c);
        width += char_w;
    }
    if !piece.is_empty() {
        pieces.push(piece);
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::BuiltinFont;
    use crate::layout::style::Rgb;

    fn style() -> TextStyle {
        TextStyle {
            font: BuiltinFont::Helvetica,
            size: 10.0,
            color: Rgb::BLACK,
        }
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(wrap_text("", style(), 100.0).is_empty());
        assert!(wrap_text("   ", style(), 100.0).is_empty());
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap_text("Rust and Go", style(), 400.0), vec!["Rust and Go"]);
    }

    #[test]
    fn test_lines_never_exceed_width() {
        let text = "Architected a distributed caching layer using Redis and consistent hashing, \
                    reducing p99 latency by 40% under 50k RPS peak load";
        let lines = wrap_text(text, style(), 150.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(style().width_of(line) <= 150.0, "{line:?} is too wide");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_overlong_word_is_broken() {
        let url = "https://example.com/a/very/long/path/that/cannot/possibly/fit/on/one/narrow/line";
        let lines = wrap_text(url, style(), 80.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), url);
        for line in &lines {
            assert!(style().width_of(line) <= 80.0);
        }
    }
}
