pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::applications::handlers as applications;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_resume_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        // Job descriptions
        .route(
            "/api/v1/job-descriptions",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/v1/job-descriptions/:jd_id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Applications
        .route(
            "/api/v1/applications",
            get(applications::handle_list_applications)
                .post(applications::handle_submit_application)
                .layer(upload_limit),
        )
        .route(
            "/api/v1/applications/:id",
            get(applications::handle_get_application),
        )
        .route(
            "/api/v1/applications/:id/resume",
            get(applications::handle_download_resume),
        )
        .route(
            "/api/v1/applications/:id/shortlist",
            put(applications::handle_toggle_shortlist),
        )
        .route("/api/v1/stats", get(applications::handle_stats))
        // Stateless scoring
        .route("/api/v1/match", post(applications::handle_match_preview))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::matching::{Matcher, SkillVocabulary};
    use crate::storage::memory::MemoryResumeStore;

    /// State backed by a lazy pool: routes that validate before querying never connect.
    fn test_state() -> AppState {
        let config = Config::for_tests();
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let matcher = Matcher::new(config.matcher_config(), SkillVocabulary::builtin().unwrap());
        AppState {
            db,
            config,
            matcher: Arc::new(matcher),
            resume_store: Arc::new(MemoryResumeStore::default()),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_ok() {
        let app = build_router(test_state());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_match_preview_scores_without_persistence() {
        let app = build_router(test_state());
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/match",
                serde_json::json!({
                    "resume_text": "Experienced Python developer with Django and PostgreSQL skills",
                    "jd_text": "We need a Python developer familiar with Django and SQL databases",
                    "threshold": 20.0
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["shortlisted"], true);
        assert!(body["matching_score"].as_f64().unwrap() > 20.0);
        assert_eq!(
            body["matching_keywords"],
            serde_json::json!(["developer", "django", "python"])
        );
        assert!(body["skills"]
            .as_array()
            .unwrap()
            .contains(&Value::from("postgresql")));
    }

    #[tokio::test]
    async fn test_match_preview_empty_text_scores_zero() {
        let app = build_router(test_state());
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/match",
                serde_json::json!({ "resume_text": "", "jd_text": "Python developer" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["matching_score"], 0.0);
        assert_eq!(body["shortlisted"], false);
    }

    #[tokio::test]
    async fn test_match_preview_rejects_out_of_range_threshold() {
        let app = build_router(test_state());
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/match",
                serde_json::json!({ "resume_text": "a", "jd_text": "b", "threshold": 150.0 }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_job_validates_before_query() {
        let app = build_router(test_state());
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/v1/job-descriptions",
                serde_json::json!({ "jd_id": "JD-1", "headline": " ", "description": "Python" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_submit_rejects_non_pdf_upload() {
        let boundary = "shortlist-test-boundary";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"user_id\"\r\n\r\n6f1c1c43-5b3a-4c5e-9a51-0f4f6b0f3d2e\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"name\"\r\n\r\nAda\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"jd_id\"\r\n\r\nJD-1\r\n\
             --{b}\r\nContent-Disposition: form-data; name=\"resume\"; filename=\"resume.txt\"\r\n\
             Content-Type: text/plain\r\n\r\nPython developer\r\n\
             --{b}--\r\n",
            b = boundary
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/applications")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let response = build_router(test_state()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Only PDF"));
    }
}
