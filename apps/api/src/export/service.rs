//! One export attempt: load, validate, lay out, serialize.

use bytes::Bytes;
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::storage::ExportUploader;
use crate::layout::LayoutConfig;
use crate::models::document::ResumeDocument;
use crate::render::{render_resume, RenderOutput};
use crate::store::ResumeStore;

const FALLBACK_SLUG: &str = "resume";

/// A rendered resume ready to be sent.
#[derive(Debug)]
pub struct ExportedPdf {
    /// Human label the download filename is derived from.
    pub label: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Fetches the resume owned by `user_id` and renders it with its stored template.
pub async fn export_attempt(
    store: &dyn ResumeStore,
    layout: &LayoutConfig,
    resume_id: Uuid,
    user_id: Uuid,
) -> Result<ExportedPdf, AppError> {
    let row = store
        .fetch_owned(resume_id, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    let document = parse_document(row.content)?;
    let label = if row.title.trim().is_empty() {
        document_label(&document)
    } else {
        row.title
    };
    let output = render_blocking(document, row.template.unwrap_or_default(), layout.clone()).await?;

    Ok(ExportedPdf {
        label,
        bytes: output.bytes,
        page_count: output.page_count,
    })
}

/// Deserializes and validates stored or posted resume content.
///
/// Some builders store the document as a JSON-encoded string; that form is
/// unwrapped once before parsing.
pub fn parse_document(content: Value) -> Result<ResumeDocument, AppError> {
    let content = match content {
        Value::String(encoded) => serde_json::from_str(&encoded)
            .map_err(|e| AppError::Validation(format!("Resume content is not valid JSON: {e}")))?,
        other => other,
    };
    let document: ResumeDocument = serde_json::from_value(content)
        .map_err(|e| AppError::Validation(format!("Resume content is malformed: {e}")))?;
    document.validate()?;
    Ok(document)
}

/// Runs layout and serialization off the async executor.
pub async fn render_blocking(
    document: ResumeDocument,
    template: String,
    layout: LayoutConfig,
) -> Result<RenderOutput, AppError> {
    let output = tokio::task::spawn_blocking(move || render_resume(&document, &template, &layout))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in PDF render: {e}")))??;
    Ok(output)
}

/// The person's name, used when a resume has no title.
pub fn document_label(document: &ResumeDocument) -> String {
    document
        .personal_info
        .as_ref()
        .map(|info| info.full_name.text())
        .unwrap_or_default()
}

/// `<slug>-<YYYY-MM-DD>.pdf`, ASCII only so it is always a valid header value.
pub fn build_filename(label: &str, date: NaiveDate) -> String {
    format!("{}-{}.pdf", slugify(label), date.format("%Y-%m-%d"))
}

fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug.to_string()
    }
}

/// Uploads an export and records its URL. Failures are logged, never returned.
pub async fn persist_export(
    storage: &dyn ExportUploader,
    store: &dyn ResumeStore,
    resume_id: Uuid,
    user_id: Uuid,
    date: NaiveDate,
    bytes: Bytes,
) {
    let url = match storage.upload(user_id, resume_id, date, bytes).await {
        Ok(url) => url,
        Err(e) => {
            warn!(%resume_id, "Export upload skipped: {e}");
            return;
        }
    };
    match store.record_file_url(resume_id, user_id, &url).await {
        Ok(()) => info!(%resume_id, "Recorded export URL {url}"),
        Err(e) => warn!(%resume_id, "Failed to record export URL: {e}"),
    }
}
