use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobDescriptionRow {
    pub jd_id: String,
    pub headline: String,
    pub short_description: Option<String>,
    pub description: String,
    /// Per-job override of the global shortlist threshold.
    pub shortlist_threshold: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A job description with its application count, as listed to recruiters.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobDescriptionSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub job: JobDescriptionRow,
    pub application_count: i64,
}
