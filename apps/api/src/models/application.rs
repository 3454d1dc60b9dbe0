use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One submission per (user_id, jd_id); the table carries a unique constraint on the pair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub jd_id: String,
    pub resume_key: String,
    #[serde(skip_serializing)]
    pub resume_text: String,
    pub matching_score: f64,
    pub shortlisted: bool,
    pub skills: Vec<String>,
    pub matching_keywords: Vec<String>,
    pub applied_at: DateTime<Utc>,
}
