use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::matching::Matcher;
use crate::storage::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Built once at startup; stopwords and skill vocabularies are read-only from here on.
    pub matcher: Arc<Matcher>,
    pub resume_store: Arc<dyn ResumeStore>,
}
