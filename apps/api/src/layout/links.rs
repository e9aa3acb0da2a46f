//! Link Renderer: accent-colored, underlined text with a URI annotation.
//!
//! Links are a single line: text wider than the content area is drawn at a
//! uniformly reduced font size instead of wrapping. The cursor is not moved
//! and no page-break check happens here; callers `advance` first.

use crate::layout::page::{Canvas, TextStyle};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

const UNDERLINE_OFFSET: f32 = 1.5;
const UNDERLINE_THICKNESS: f32 = 0.5;

/// Draws `text` as a link to `uri` on the cursor's baseline. Returns the font size used.
pub fn draw_link(canvas: &mut Canvas, text: &str, uri: &str, align: Align) -> f32 {
    let style = canvas.style();
    let geometry = *canvas.geometry();
    let base = TextStyle {
        font: style.font_family.regular(),
        size: style.text_size,
        color: style.accent_color,
    };
    if text.is_empty() {
        return base.size;
    }

    let available = geometry.content_width();
    let natural = base.width_of(text);
    let text_style = if natural > available {
        TextStyle {
            size: base.size * available / natural,
            ..base
        }
    } else {
        base
    };
    let width = text_style.width_of(text);

    let x = match align {
        Align::Left => geometry.content_left(),
        Align::Center => geometry.content_left() + (available - width) / 2.0,
        Align::Right => geometry.content_right() - width,
    };

    canvas.draw_text(text, x, text_style);
    canvas.draw_rule(x, x + width, UNDERLINE_OFFSET, UNDERLINE_THICKNESS, text_style.color);
    let top = canvas.y() - text_style.size * 0.8;
    canvas.add_link(x, top, width, text_style.size, uri);

    text_style.size
}

/// Turns stored link text into an absolute URI.
pub fn normalize_uri(text: &str) -> String {
    let lower = text.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("mailto:") {
        text.to_string()
    } else if text.contains('@') && !text.contains('/') {
        format!("mailto:{text}")
    } else {
        format!("https://{text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::page::{DrawOp, PageGeometry};
    use crate::layout::style::{style_for, Template};

    fn canvas() -> Canvas {
        Canvas::new(PageGeometry::a4(), style_for(Template::Modern))
    }

    fn link_text_op(ops: &[DrawOp]) -> (f32, f32) {
        ops.iter()
            .find_map(|op| match op {
                DrawOp::Text { x, style, .. } => Some((*x, style.size)),
                _ => None,
            })
            .expect("link text drawn")
    }

    #[test]
    fn test_short_link_keeps_text_size_and_is_underlined() {
        let mut canvas = canvas();
        let y = canvas.y();
        let size = draw_link(&mut canvas, "github.com/ada", "https://github.com/ada", Align::Left);
        assert_eq!(size, style_for(Template::Modern).text_size);
        assert_eq!(canvas.y(), y, "link rendering must not move the cursor");

        let pages = canvas.finish();
        let ops = &pages[0].ops;
        assert_eq!(ops.len(), 3);
        assert!(matches!(ops[1], DrawOp::Rule { .. }));
        assert!(matches!(&ops[2], DrawOp::Link { uri, .. } if uri == "https://github.com/ada"));
        match &ops[0] {
            DrawOp::Text { style, .. } => {
                assert_eq!(style.color, style_for(Template::Modern).accent_color)
            }
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_long_link_is_downscaled_to_fit() {
        let mut canvas = canvas();
        let long = format!("https://example.com/{}", "segment/".repeat(40));
        let size = draw_link(&mut canvas, &long, &long, Align::Center);
        let base = style_for(Template::Modern).text_size;
        assert!(size < base);

        let geometry = PageGeometry::a4();
        let pages = canvas.finish();
        let (x, drawn) = link_text_op(&pages[0].ops);
        assert_eq!(drawn, size);
        assert!((x - geometry.content_left()).abs() < 1e-2, "scaled link spans the full width");
    }

    #[test]
    fn test_right_aligned_link_ends_at_margin() {
        let mut canvas = canvas();
        draw_link(&mut canvas, "ada.dev", "https://ada.dev", Align::Right);
        let pages = canvas.finish();
        let rule_end = pages[0]
            .ops
            .iter()
            .find_map(|op| match op {
                DrawOp::Rule { x2, .. } => Some(*x2),
                _ => None,
            })
            .unwrap();
        assert!((rule_end - PageGeometry::a4().content_right()).abs() < 1e-3);
    }

    #[test]
    fn test_normalize_uri() {
        assert_eq!(normalize_uri("linkedin.com/in/ada"), "https://linkedin.com/in/ada");
        assert_eq!(normalize_uri("HTTPS://ada.dev"), "HTTPS://ada.dev");
        assert_eq!(normalize_uri("ada@example.com"), "mailto:ada@example.com");
    }
}
