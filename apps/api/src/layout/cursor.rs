//! Flow Cursor: vertical write position and page-break decisions.
//!
//! Coordinates are top-down: `y` grows toward the bottom of the page and is
//! flipped to PDF space only at serialization time.

/// Mutable vertical position for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowCursor {
    y: f32,
    page_height: f32,
    top_margin: f32,
    bottom_margin: f32,
    page_count: usize,
}

impl FlowCursor {
    /// A cursor at the top of the first page.
    pub fn new(page_height: f32, top_margin: f32, bottom_margin: f32) -> Self {
        Self {
            y: top_margin,
            page_height,
            top_margin,
            bottom_margin,
            page_count: 1,
        }
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Lowest y a block may reach.
    pub fn limit(&self) -> f32 {
        self.page_height - self.bottom_margin
    }

    /// Ensures `height` fits below the cursor.
    ///
    /// Returns `true` when it does not: the cursor has then moved to the top
    /// of a fresh page and the caller must start that page in its output.
    pub fn advance(&mut self, height: f32) -> bool {
        if self.y + height > self.limit() {
            self.y = self.top_margin;
            self.page_count += 1;
            true
        } else {
            false
        }
    }

    /// Moves the cursor down without a page-break check.
    pub fn move_down(&mut self, amount: f32) {
        self.y += amount;
    }
}
