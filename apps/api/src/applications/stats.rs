use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::errors::AppError;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct JobApplicationCount {
    pub jd_id: String,
    pub headline: String,
    pub application_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShortlistStats {
    pub total_applications: i64,
    pub shortlisted_applications: i64,
    pub total_job_descriptions: i64,
    pub total_applicants: i64,
    /// Percent of applications shortlisted, 2 decimals; 0 when there are none.
    pub shortlist_rate: f64,
    pub applications_by_jd: Vec<JobApplicationCount>,
}

pub fn shortlist_rate(shortlisted: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let percent = shortlisted as f64 / total as f64 * 100.0;
    (percent * 100.0).round() / 100.0
}

pub async fn compute_stats(pool: &PgPool) -> Result<ShortlistStats, AppError> {
    let (total_applications, shortlisted_applications, total_applicants): (i64, i64, i64) =
        sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE shortlisted),
                   COUNT(DISTINCT user_id)
            FROM applications
            "#,
        )
        .fetch_one(pool)
        .await?;

    let total_job_descriptions: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM job_descriptions WHERE is_active")
            .fetch_one(pool)
            .await?;

    let applications_by_jd = sqlx::query_as::<_, JobApplicationCount>(
        r#"
        SELECT jd.jd_id, jd.headline, COUNT(a.id) AS application_count
        FROM job_descriptions jd
        LEFT JOIN applications a ON a.jd_id = jd.jd_id
        GROUP BY jd.jd_id, jd.headline
        ORDER BY application_count DESC, jd.jd_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(ShortlistStats {
        total_applications,
        shortlisted_applications,
        total_job_descriptions,
        total_applicants,
        shortlist_rate: shortlist_rate(shortlisted_applications, total_applications),
        applications_by_jd,
    })
}
