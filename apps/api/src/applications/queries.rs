use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::MatchResult;
use crate::models::application::ApplicationRow;

/// Everything needed to persist a scored submission.
pub struct NewApplication<'a> {
    pub user_id: Uuid,
    pub name: &'a str,
    pub jd_id: &'a str,
    pub resume_key: &'a str,
    pub result: &'a MatchResult,
}

pub async fn exists(pool: &PgPool, user_id: Uuid, jd_id: &str) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM applications WHERE user_id = $1 AND jd_id = $2)",
    )
    .bind(user_id)
    .bind(jd_id)
    .fetch_one(pool)
    .await?;
    Ok(exists)
}

pub async fn insert(pool: &PgPool, app: NewApplication<'_>) -> Result<ApplicationRow, AppError> {
    let skills: Vec<String> = app.result.skills.iter().cloned().collect();
    sqlx::query_as::<_, ApplicationRow>(
        r#"
        INSERT INTO applications
            (id, user_id, name, jd_id, resume_key, resume_text,
             matching_score, shortlisted, skills, matching_keywords)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(app.user_id)
    .bind(app.name)
    .bind(app.jd_id)
    .bind(app.resume_key)
    .bind(&app.result.extracted_text)
    .bind(app.result.matching_score.value())
    .bind(app.result.shortlisted)
    .bind(&skills)
    .bind(&app.result.matching_keywords)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        AppError::from_insert(
            e,
            format!("User {} already applied to {}", app.user_id, app.jd_id),
        )
    })
}

/// Newest first, optionally narrowed to one job and/or shortlisted candidates.
pub async fn list(
    pool: &PgPool,
    jd_id: Option<&str>,
    shortlisted_only: bool,
) -> Result<Vec<ApplicationRow>, AppError> {
    let rows = sqlx::query_as::<_, ApplicationRow>(
        r#"
        SELECT * FROM applications
        WHERE ($1::TEXT IS NULL OR jd_id = $1)
          AND (NOT $2 OR shortlisted)
        ORDER BY applied_at DESC
        "#,
    )
    .bind(jd_id)
    .bind(shortlisted_only)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get(pool: &PgPool, id: Uuid) -> Result<ApplicationRow, AppError> {
    sqlx::query_as::<_, ApplicationRow>("SELECT * FROM applications WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

/// Flips the shortlist flag and returns its new value.
pub async fn toggle_shortlist(pool: &PgPool, id: Uuid) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>(
        "UPDATE applications SET shortlisted = NOT shortlisted WHERE id = $1 RETURNING shortlisted",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}
