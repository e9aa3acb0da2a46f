use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::retry::retry_fixed;
use crate::export::service::{
    build_filename, document_label, export_attempt, parse_document, persist_export, render_blocking,
};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// Body of a preview render: an unsaved document plus the template to use.
#[derive(Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default)]
    pub document: Value,
}

/// GET /api/v1/resumes/:id/export
///
/// Renders the stored resume to PDF. Fetch and render run under the
/// configured retry policy; missing or invalid resumes fail immediately.
pub async fn handle_export_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Response, AppError> {
    let user_id = params.user_id;
    let pdf = retry_fixed(state.retry, |attempt| {
        let store = state.store.clone();
        let layout = state.layout.clone();
        async move {
            tracing::debug!(%resume_id, attempt, "Export attempt");
            export_attempt(store.as_ref(), &layout, resume_id, user_id).await
        }
    })
    .await?;

    info!(
        %resume_id,
        pages = pdf.page_count,
        bytes = pdf.bytes.len(),
        "Resume exported"
    );

    let today = Utc::now().date_naive();
    let body = Bytes::from(pdf.bytes);
    if let Some(storage) = &state.storage {
        persist_export(
            storage.as_ref(),
            state.store.as_ref(),
            resume_id,
            user_id,
            today,
            body.clone(),
        )
        .await;
    }

    Ok(pdf_response(body, &build_filename(&pdf.label, today)))
}

/// POST /api/v1/resumes/render
///
/// Renders a document posted by the builder without saving it. Single attempt.
pub async fn handle_render_preview(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let document = parse_document(req.document)?;
    let label = document_label(&document);
    let output = render_blocking(
        document,
        req.template.unwrap_or_default(),
        state.layout.clone(),
    )
    .await?;

    info!(
        pages = output.page_count,
        bytes = output.bytes.len(),
        "Preview rendered"
    );

    let filename = build_filename(&label, Utc::now().date_naive());
    Ok(pdf_response(Bytes::from(output.bytes), &filename))
}

fn pdf_response(bytes: Bytes, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::export::retry::RetryPolicy;
    use crate::export::storage::{ExportUploader, MemoryUploader};
    use crate::layout::LayoutConfig;
    use crate::models::resume::ResumeRow;
    use crate::routes::build_router;
    use crate::store::MemoryResumeStore;

    struct Fixture {
        id: Uuid,
        owner: Uuid,
        store: Arc<MemoryResumeStore>,
        storage: Option<Arc<dyn ExportUploader>>,
    }

    impl Fixture {
        fn new(content: Value) -> Self {
            Self::with_store(content, |store| store)
        }

        fn with_store(content: Value, configure: impl FnOnce(MemoryResumeStore) -> MemoryResumeStore) -> Self {
            let id = Uuid::new_v4();
            let owner = Uuid::new_v4();
            let row = ResumeRow {
                id,
                user_id: owner,
                title: "Staff Engineer".to_string(),
                template: Some("executive".to_string()),
                content,
                file_url: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            let store = Arc::new(configure(MemoryResumeStore::with_rows(vec![row])));
            Self {
                id,
                owner,
                store,
                storage: None,
            }
        }

        fn persisting_to(mut self, uploader: Arc<MemoryUploader>) -> Self {
            self.storage = Some(uploader);
            self
        }

        fn state(&self) -> AppState {
            AppState {
                store: self.store.clone(),
                storage: self.storage.clone(),
                retry: RetryPolicy::new(3, Duration::ZERO),
                layout: LayoutConfig::default(),
            }
        }

        async fn export(&self, user_id: Uuid) -> Response {
            let uri = format!("/api/v1/resumes/{}/export?user_id={user_id}", self.id);
            build_router(self.state())
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap()
        }
    }

    fn valid_content() -> Value {
        json!({
            "personal_info": { "full_name": "Ada Lovelace", "email": "ada@example.com" },
            "summary": "Mathematician.",
            "skills": ["Analysis", "Notes"]
        })
    }

    async fn error_code(response: Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        json["error"]["code"].as_str().unwrap_or_default().to_string()
    }

    #[tokio::test]
    async fn test_export_returns_pdf_attachment() {
        let fixture = Fixture::new(valid_content());
        let response = fixture.export(fixture.owner).await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"staff-engineer-"));
        assert!(disposition.ends_with(".pdf\""));

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"%PDF-"));
        assert_eq!(fixture.store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_export_of_foreign_resume_is_not_found_without_retry() {
        let fixture = Fixture::new(valid_content());
        let response = fixture.export(Uuid::new_v4()).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_code(response).await, "NOT_FOUND");
        assert_eq!(fixture.store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_export_without_personal_info_is_bad_request() {
        let fixture = Fixture::new(json!({ "summary": "No header" }));
        let response = fixture.export(fixture.owner).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_ERROR");
        assert_eq!(fixture.store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_export_recovers_from_transient_failure() {
        let fixture = Fixture::with_store(valid_content(), |store| store.failing(2));
        let response = fixture.export(fixture.owner).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(fixture.store.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_export_gives_up_after_max_attempts() {
        let fixture = Fixture::with_store(valid_content(), |store| store.failing(5));
        let response = fixture.export(fixture.owner).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error_code(response).await, "INTERNAL_ERROR");
        assert_eq!(fixture.store.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_export_records_uploaded_url() {
        let uploader = Arc::new(MemoryUploader::default());
        let fixture = Fixture::new(valid_content()).persisting_to(uploader.clone());
        let response = fixture.export(fixture.owner).await;

        assert_eq!(response.status(), StatusCode::OK);
        let keys = uploader.keys();
        assert_eq!(keys.len(), 1);
        assert!(keys[0].starts_with(&format!("exports/{}/{}/", fixture.owner, fixture.id)));
        assert_eq!(
            fixture.store.file_url(fixture.id),
            Some(format!("http://storage.test/vitae/{}", keys[0]))
        );
    }

    #[tokio::test]
    async fn test_failed_upload_still_returns_pdf() {
        let fixture = Fixture::new(valid_content()).persisting_to(Arc::new(MemoryUploader::failing()));
        let response = fixture.export(fixture.owner).await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"%PDF-"));
        assert_eq!(fixture.store.file_url(fixture.id), None);
    }

    #[tokio::test]
    async fn test_render_preview() {
        let fixture = Fixture::new(Value::Null);
        let body = json!({ "template": "creative", "document": valid_content() }).to_string();
        let response = build_router(fixture.state())
            .oneshot(
                Request::post("/api/v1/resumes/render")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.contains("filename=\"ada-lovelace-"));
        assert_eq!(fixture.store.fetch_count(), 0);
    }

    #[tokio::test]
    async fn test_render_preview_rejects_missing_document() {
        let fixture = Fixture::new(Value::Null);
        let response = build_router(fixture.state())
            .oneshot(
                Request::post("/api/v1/resumes/render")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"template":"modern"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_code(response).await, "VALIDATION_ERROR");
    }
}
