//! Application submission pipeline.
//!
//! 1. Read and validate the multipart form (`user_id`, `name`, `jd_id`, `resume`)
//! 2. Load the open job description and refuse duplicate (user, job) submissions
//! 3. Extract + score on the blocking pool (CPU-bound, no suspension points)
//! 4. Store the PDF, then insert the row; a failed insert removes the stored PDF

use std::sync::Arc;

use axum::extract::Multipart;
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::applications::queries::{self, NewApplication};
use crate::errors::AppError;
use crate::jobs;
use crate::matching::{MatchResult, SimilarityScore};
use crate::state::AppState;
use crate::storage::resume_key;

/// Raw multipart fields as received; everything optional until validated.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub user_id: Option<String>,
    pub name: Option<String>,
    pub jd_id: Option<String>,
    pub file_name: Option<String>,
    pub resume: Option<Bytes>,
}

/// A validated submission.
#[derive(Debug)]
pub struct ApplicationUpload {
    pub user_id: Uuid,
    pub name: String,
    pub jd_id: String,
    pub resume: Bytes,
}

#[derive(Debug, Serialize)]
pub struct SubmitApplicationResponse {
    pub application_id: Uuid,
    pub matching_score: SimilarityScore,
    pub shortlisted: bool,
    pub skills: Vec<String>,
    pub matching_keywords: Vec<String>,
}

impl UploadForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
        {
            let Some(field_name) = field.name().map(str::to_string) else {
                continue;
            };
            match field_name.as_str() {
                "resume" => {
                    form.file_name = field.file_name().map(str::to_string);
                    form.resume = Some(field.bytes().await.map_err(|e| {
                        AppError::Validation(format!("Failed to read resume upload: {e}"))
                    })?);
                }
                "user_id" | "name" | "jd_id" => {
                    let value = field.text().await.map_err(|e| {
                        AppError::Validation(format!("Failed to read field '{field_name}': {e}"))
                    })?;
                    match field_name.as_str() {
                        "user_id" => form.user_id = Some(value),
                        "name" => form.name = Some(value),
                        _ => form.jd_id = Some(value),
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    pub fn validate(self) -> Result<ApplicationUpload, AppError> {
        let user_id = required(self.user_id, "user_id")?;
        let user_id = Uuid::parse_str(&user_id)
            .map_err(|_| AppError::Validation("user_id must be a UUID".to_string()))?;
        let name = required(self.name, "name")?;
        let jd_id = required(self.jd_id, "jd_id")?;

        let file_name = required(self.file_name, "resume")?;
        if !file_name.to_ascii_lowercase().ends_with(".pdf") {
            return Err(AppError::Validation(
                "Only PDF files are accepted".to_string(),
            ));
        }
        let resume = self
            .resume
            .filter(|bytes| !bytes.is_empty())
            .ok_or_else(|| AppError::Validation("resume file is empty".to_string()))?;

        Ok(ApplicationUpload {
            user_id,
            name,
            jd_id,
            resume,
        })
    }
}

fn required(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

pub async fn submit_application(
    state: &AppState,
    upload: ApplicationUpload,
) -> Result<SubmitApplicationResponse, AppError> {
    let job = jobs::queries::get_open(&state.db, &upload.jd_id).await?;

    if queries::exists(&state.db, upload.user_id, &upload.jd_id).await? {
        return Err(AppError::Conflict(format!(
            "User {} already applied to {}",
            upload.user_id, upload.jd_id
        )));
    }

    let threshold = job
        .shortlist_threshold
        .unwrap_or(state.config.shortlist_threshold);
    let result = analyze_on_blocking_pool(state, upload.resume.clone(), job.description, threshold)
        .await?;

    let key = resume_key(&upload.jd_id, Uuid::new_v4());
    state.resume_store.put(&key, upload.resume).await?;

    let inserted = queries::insert(
        &state.db,
        NewApplication {
            user_id: upload.user_id,
            name: &upload.name,
            jd_id: &upload.jd_id,
            resume_key: &key,
            result: &result,
        },
    )
    .await;

    let row = match inserted {
        Ok(row) => row,
        Err(e) => {
            if let Err(cleanup) = state.resume_store.delete(&key).await {
                warn!("Failed to remove orphaned resume {key}: {cleanup}");
            }
            return Err(e);
        }
    };

    info!(
        application_id = %row.id,
        jd_id = %row.jd_id,
        score = row.matching_score,
        shortlisted = row.shortlisted,
        "Application submitted"
    );

    Ok(SubmitApplicationResponse {
        application_id: row.id,
        matching_score: result.matching_score,
        shortlisted: result.shortlisted,
        skills: result.skills.into_iter().collect(),
        matching_keywords: result.matching_keywords,
    })
}

async fn analyze_on_blocking_pool(
    state: &AppState,
    pdf: Bytes,
    jd_text: String,
    threshold: f64,
) -> Result<MatchResult, AppError> {
    let matcher = Arc::clone(&state.matcher);
    let policy = state.config.extraction_policy;

    let result = tokio::task::spawn_blocking(move || {
        matcher.analyze_pdf(&pdf, &jd_text, policy, Some(threshold))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in scoring: {e}")))??;

    Ok(result)
}
