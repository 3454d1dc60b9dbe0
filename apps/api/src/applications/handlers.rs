//! Axum route handlers for the Applications API.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::applications::queries;
use crate::applications::stats::{compute_stats, ShortlistStats};
use crate::applications::submit::{submit_application, SubmitApplicationResponse, UploadForm};
use crate::config::validate_threshold;
use crate::errors::AppError;
use crate::matching::MatchResult;
use crate::models::application::ApplicationRow;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ListApplicationsQuery {
    pub jd_id: Option<String>,
    #[serde(default)]
    pub shortlisted_only: bool,
}

#[derive(Debug, Serialize)]
pub struct ShortlistToggleResponse {
    pub application_id: Uuid,
    pub shortlisted: bool,
}

#[derive(Debug, Deserialize)]
pub struct MatchPreviewRequest {
    pub resume_text: String,
    pub jd_text: String,
    #[serde(default)]
    pub threshold: Option<f64>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/applications
///
/// Multipart upload: `user_id`, `name`, `jd_id`, `resume` (PDF).
/// Scores the resume against the job description and records the application.
pub async fn handle_submit_application(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<SubmitApplicationResponse>), AppError> {
    let upload = UploadForm::read(multipart).await?.validate()?;
    let response = submit_application(&state, upload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/applications?jd_id=&shortlisted_only=
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<ListApplicationsQuery>,
) -> Result<Json<Vec<ApplicationRow>>, AppError> {
    let jd_id = params.jd_id.as_deref().filter(|id| !id.is_empty());
    let rows = queries::list(&state.db, jd_id, params.shortlisted_only).await?;
    Ok(Json(rows))
}

/// GET /api/v1/applications/:id
pub async fn handle_get_application(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationRow>, AppError> {
    Ok(Json(queries::get(&state.db, id).await?))
}

/// GET /api/v1/applications/:id/resume
///
/// Streams the stored PDF back so a recruiter can open it in the browser.
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let application = queries::get(&state.db, id).await?;
    let pdf = state.resume_store.get(&application.resume_key).await?;
    Ok(resume_response(application.id, pdf))
}

fn resume_response(id: Uuid, pdf: Bytes) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, format!("inline; filename=\"{id}.pdf\"")),
        ],
        pdf,
    )
        .into_response()
}

/// PUT /api/v1/applications/:id/shortlist
///
/// Recruiter override: flips the automatic shortlist decision.
pub async fn handle_toggle_shortlist(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShortlistToggleResponse>, AppError> {
    let shortlisted = queries::toggle_shortlist(&state.db, id).await?;
    tracing::info!("Application {id} shortlist set to {shortlisted}");
    Ok(Json(ShortlistToggleResponse {
        application_id: id,
        shortlisted,
    }))
}

/// GET /api/v1/stats
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<ShortlistStats>, AppError> {
    Ok(Json(compute_stats(&state.db).await?))
}

/// POST /api/v1/match
///
/// Stateless preview: scores plain resume text against plain job-description text.
/// Nothing is persisted. Empty text on either side scores zero.
pub async fn handle_match_preview(
    State(state): State<AppState>,
    Json(request): Json<MatchPreviewRequest>,
) -> Result<Json<MatchResult>, AppError> {
    if let Some(threshold) = request.threshold {
        validate_threshold(threshold).map_err(|e| AppError::Validation(e.to_string()))?;
    }

    let matcher = Arc::clone(&state.matcher);
    let result = tokio::task::spawn_blocking(move || {
        matcher.analyze_text(&request.resume_text, &request.jd_text, request.threshold)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in scoring: {e}")))?;

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryResumeStore;
    use crate::storage::{resume_key, ResumeStore};

    #[tokio::test]
    async fn test_stored_resume_served_as_inline_pdf() {
        let store = MemoryResumeStore::default();
        let id = Uuid::new_v4();
        let key = resume_key("JD-7", id);
        store
            .put(&key, Bytes::from_static(b"%PDF-1.4 resume"))
            .await
            .unwrap();

        let response = resume_response(id, store.get(&key).await.unwrap());

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            format!("inline; filename=\"{id}.pdf\"").as_str()
        );
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"%PDF-1.4 resume");
    }

    #[test]
    fn test_list_query_defaults_to_all_applications() {
        let query = ListApplicationsQuery::default();
        assert!(query.jd_id.is_none());
        assert!(!query.shortlisted_only);
    }
}
