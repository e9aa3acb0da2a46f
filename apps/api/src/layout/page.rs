//! Page geometry, laid-out page content, and the drawing canvas that ties the
//! flow cursor to the pages it fills.

use crate::layout::cursor::FlowCursor;
use crate::layout::font_metrics::{get_metrics, BuiltinFont};
use crate::layout::style::{Rgb, StyleBundle};

// ────────────────────────────────────────────────────────────────────────────
// Geometry
// ────────────────────────────────────────────────────────────────────────────

/// Page size and margins in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageGeometry {
    /// A4 portrait with 0.75" margins on every side.
    pub fn a4() -> Self {
        Self {
            width: 595.28,
            height: 841.89,
            margin_top: 54.0,
            margin_bottom: 54.0,
            margin_left: 54.0,
            margin_right: 54.0,
        }
    }

    pub fn content_left(&self) -> f32 {
        self.margin_left
    }

    pub fn content_right(&self) -> f32 {
        self.width - self.margin_right
    }

    pub fn content_width(&self) -> f32 {
        self.content_right() - self.content_left()
    }

    #[cfg(test)]
    pub fn usable_height(&self) -> f32 {
        self.height - self.margin_top - self.margin_bottom
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// Renderer configuration, passed explicitly into every render call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutConfig {
    pub geometry: PageGeometry,
}

// ────────────────────────────────────────────────────────────────────────────
// Page content
// ────────────────────────────────────────────────────────────────────────────

/// Font, size and color for a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font: BuiltinFont,
    pub size: f32,
    pub color: Rgb,
}

impl TextStyle {
    pub fn width_of(&self, text: &str) -> f32 {
        get_metrics(self.font).text_width(text, self.size)
    }
}

/// A single drawing primitive. `y` values are top-down baselines.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        style: TextStyle,
        text: String,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
        color: Rgb,
    },
    /// Clickable area; `y` is the top edge of the box.
    Link {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        uri: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageContent {
    pub ops: Vec<DrawOp>,
}

impl PageContent {
    /// Text runs on this page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = (&str, f32)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, y, .. } => Some((text.as_str(), *y)),
            _ => None,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Canvas
// ────────────────────────────────────────────────────────────────────────────

/// Accumulates pages for one render pass.
///
/// Every write goes to the last page. `advance` is the only operation that
/// starts a new page.
pub struct Canvas {
    geometry: PageGeometry,
    style: StyleBundle,
    cursor: FlowCursor,
    pages: Vec<PageContent>,
}

impl Canvas {
    pub fn new(geometry: PageGeometry, style: StyleBundle) -> Self {
        Self {
            geometry,
            style,
            cursor: FlowCursor::new(geometry.height, geometry.margin_top, geometry.margin_bottom),
            pages: vec![PageContent::default()],
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn style(&self) -> &StyleBundle {
        &self.style
    }

    pub fn y(&self) -> f32 {
        self.cursor.y()
    }

    /// Starts a new page when `height` does not fit below the cursor.
    pub fn advance(&mut self, height: f32) {
        if self.cursor.advance(height) {
            self.pages.push(PageContent::default());
        }
    }

    /// Draws `text` at `(x, y)` and moves down one line.
    pub fn write_line(&mut self, text: &str, x: f32, style: TextStyle) {
        self.draw_text(text, x, style);
        self.line_feed();
    }

    /// Draws `text` at `(x, y)` without moving the cursor.
    pub fn draw_text(&mut self, text: &str, x: f32, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        let y = self.cursor.y();
        self.push(DrawOp::Text {
            x,
            y,
            style,
            text: text.to_string(),
        });
    }

    /// Draws `text` so that it ends at the right content margin.
    /// Text wider than the content area starts at the left margin instead.
    pub fn draw_text_right(&mut self, text: &str, style: TextStyle) {
        let x = (self.geometry.content_right() - style.width_of(text)).max(self.geometry.content_left());
        self.draw_text(text, x, style);
    }

    /// Draws `text` centered between the content margins.
    pub fn draw_text_centered(&mut self, text: &str, style: TextStyle) {
        let x = self.geometry.content_left() + (self.geometry.content_width() - style.width_of(text)) / 2.0;
        self.draw_text(text, x, style);
    }

    /// Horizontal rule `offset` points below the cursor.
    pub fn draw_rule(&mut self, x1: f32, x2: f32, offset: f32, thickness: f32, color: Rgb) {
        let y = self.cursor.y() + offset;
        self.push(DrawOp::Rule {
            x1,
            x2,
            y,
            thickness,
            color,
        });
    }

    pub fn add_link(&mut self, x: f32, y: f32, width: f32, height: f32, uri: &str) {
        self.push(DrawOp::Link {
            x,
            y,
            width,
            height,
            uri: uri.to_string(),
        });
    }

    /// Moves down by the template's line spacing.
    pub fn line_feed(&mut self) {
        self.cursor.move_down(self.style.line_spacing);
    }

    /// Moves down by an arbitrary gap.
    pub fn skip(&mut self, amount: f32) {
        self.cursor.move_down(amount);
    }

    pub fn page_count(&self) -> usize {
        self.cursor.page_count()
    }

    pub fn finish(self) -> Vec<PageContent> {
        self.pages
    }

    fn push(&mut self, op: DrawOp) {
        // `pages` is created non-empty and only ever grows.
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }
}
