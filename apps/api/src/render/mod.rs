//! Resume rendering pipeline: style resolution, layout, PDF serialization.
//!
//! Everything here is synchronous and CPU-bound. Handlers call
//! `render_resume` from `tokio::task::spawn_blocking`.

pub mod pdf;

use thiserror::Error;
use tracing::debug;

use crate::layout::{layout_resume, resolve_style, LayoutConfig};
use crate::models::document::ResumeDocument;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A finished PDF and the number of pages it holds.
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Renders a validated document with the named template.
pub fn render_resume(
    document: &ResumeDocument,
    template_id: &str,
    config: &LayoutConfig,
) -> Result<RenderOutput, RenderError> {
    let style = resolve_style(template_id);
    let pages = layout_resume(document, &style, &config.geometry);
    let bytes = pdf::write_pdf(&pages, &config.geometry)?;

    debug!(
        template = style.template.id(),
        pages = pages.len(),
        bytes = bytes.len(),
        "Resume rendered"
    );

    Ok(RenderOutput {
        page_count: pages.len(),
        bytes,
    })
}
