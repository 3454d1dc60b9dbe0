//! Axum route handlers for the Job Description API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::config::validate_threshold;
use crate::errors::AppError;
use crate::jobs::queries::{self, JobFields};
use crate::models::job_description::{JobDescriptionRow, JobDescriptionSummary};
use crate::state::AppState;

const MAX_JD_ID_LEN: usize = 50;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub jd_id: String,
    #[serde(flatten)]
    pub fields: UpdateJobRequest,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub headline: String,
    #[serde(default)]
    pub short_description: Option<String>,
    pub description: String,
    #[serde(default)]
    pub shortlist_threshold: Option<f64>,
}

impl UpdateJobRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.headline.trim().is_empty() {
            return Err(AppError::Validation("headline cannot be empty".to_string()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::Validation(
                "description cannot be empty".to_string(),
            ));
        }
        if let Some(threshold) = self.shortlist_threshold {
            validate_threshold(threshold).map_err(|e| AppError::Validation(e.to_string()))?;
        }
        Ok(())
    }

    fn as_fields(&self) -> JobFields<'_> {
        JobFields {
            headline: self.headline.trim(),
            short_description: self
                .short_description
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty()),
            description: &self.description,
            shortlist_threshold: self.shortlist_threshold,
        }
    }
}

/// Job ids appear in storage keys and URLs: ASCII letters, digits, `-` and `_` only.
fn validate_jd_id(jd_id: &str) -> Result<(), AppError> {
    if jd_id.is_empty() || jd_id.len() > MAX_JD_ID_LEN {
        return Err(AppError::Validation(format!(
            "jd_id must be 1-{MAX_JD_ID_LEN} characters"
        )));
    }
    if !jd_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(AppError::Validation(
            "jd_id may only contain letters, digits, '-' and '_'".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/job-descriptions
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobDescriptionSummary>>, AppError> {
    Ok(Json(queries::list_active(&state.db).await?))
}

/// GET /api/v1/job-descriptions/:jd_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(jd_id): Path<String>,
) -> Result<Json<JobDescriptionSummary>, AppError> {
    Ok(Json(queries::get(&state.db, &jd_id).await?))
}

/// POST /api/v1/job-descriptions
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobDescriptionRow>), AppError> {
    let jd_id = request.jd_id.trim();
    validate_jd_id(jd_id)?;
    request.fields.validate()?;

    let row = queries::create(&state.db, jd_id, request.fields.as_fields()).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// PUT /api/v1/job-descriptions/:jd_id
pub async fn handle_update_job(
    State(state): State<AppState>,
    Path(jd_id): Path<String>,
    Json(request): Json<UpdateJobRequest>,
) -> Result<Json<JobDescriptionRow>, AppError> {
    request.validate()?;
    let row = queries::update(&state.db, &jd_id, request.as_fields()).await?;
    Ok(Json(row))
}

/// DELETE /api/v1/job-descriptions/:jd_id
///
/// Soft delete: the job stops accepting applications and drops out of listings.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    Path(jd_id): Path<String>,
) -> Result<StatusCode, AppError> {
    queries::deactivate(&state.db, &jd_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
