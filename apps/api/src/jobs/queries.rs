use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::job_description::{JobDescriptionRow, JobDescriptionSummary};

/// Fields written on create and update.
pub struct JobFields<'a> {
    pub headline: &'a str,
    pub short_description: Option<&'a str>,
    pub description: &'a str,
    pub shortlist_threshold: Option<f64>,
}

/// Active job descriptions, newest first, with their application counts.
pub async fn list_active(pool: &PgPool) -> Result<Vec<JobDescriptionSummary>, AppError> {
    let rows = sqlx::query_as::<_, JobDescriptionSummary>(
        r#"
        SELECT jd.*, COUNT(a.id) AS application_count
        FROM job_descriptions jd
        LEFT JOIN applications a ON a.jd_id = jd.jd_id
        WHERE jd.is_active
        GROUP BY jd.jd_id
        ORDER BY jd.created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get(pool: &PgPool, jd_id: &str) -> Result<JobDescriptionSummary, AppError> {
    sqlx::query_as::<_, JobDescriptionSummary>(
        r#"
        SELECT jd.*, COUNT(a.id) AS application_count
        FROM job_descriptions jd
        LEFT JOIN applications a ON a.jd_id = jd.jd_id
        WHERE jd.jd_id = $1
        GROUP BY jd.jd_id
        "#,
    )
    .bind(jd_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(jd_id))
}

/// The job description an application is being submitted against. Inactive ones
/// no longer accept applications.
pub async fn get_open(pool: &PgPool, jd_id: &str) -> Result<JobDescriptionRow, AppError> {
    sqlx::query_as::<_, JobDescriptionRow>(
        "SELECT * FROM job_descriptions WHERE jd_id = $1 AND is_active",
    )
    .bind(jd_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(jd_id))
}

pub async fn create(
    pool: &PgPool,
    jd_id: &str,
    fields: JobFields<'_>,
) -> Result<JobDescriptionRow, AppError> {
    let row = sqlx::query_as::<_, JobDescriptionRow>(
        r#"
        INSERT INTO job_descriptions
            (jd_id, headline, short_description, description, shortlist_threshold)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(jd_id)
    .bind(fields.headline)
    .bind(fields.short_description)
    .bind(fields.description)
    .bind(fields.shortlist_threshold)
    .fetch_one(pool)
    .await
    .map_err(|e| AppError::from_insert(e, format!("Job description {jd_id} already exists")))?;

    info!("Created job description {jd_id}");
    Ok(row)
}

pub async fn update(
    pool: &PgPool,
    jd_id: &str,
    fields: JobFields<'_>,
) -> Result<JobDescriptionRow, AppError> {
    let row = sqlx::query_as::<_, JobDescriptionRow>(
        r#"
        UPDATE job_descriptions
        SET headline = $2, short_description = $3, description = $4,
            shortlist_threshold = $5, updated_at = NOW()
        WHERE jd_id = $1
        RETURNING *
        "#,
    )
    .bind(jd_id)
    .bind(fields.headline)
    .bind(fields.short_description)
    .bind(fields.description)
    .bind(fields.shortlist_threshold)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| not_found(jd_id))?;

    info!("Updated job description {jd_id}");
    Ok(row)
}

pub async fn deactivate(pool: &PgPool, jd_id: &str) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE job_descriptions SET is_active = FALSE, updated_at = NOW() WHERE jd_id = $1",
    )
    .bind(jd_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(jd_id));
    }
    info!("Deactivated job description {jd_id}");
    Ok(())
}

fn not_found(jd_id: &str) -> AppError {
    AppError::NotFound(format!("Job description {jd_id} not found"))
}
