use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use shortlist::config::Config;
use shortlist::db::create_pool;
use shortlist::matching::{Matcher, SkillVocabulary};
use shortlist::routes::build_router;
use shortlist::state::AppState;
use shortlist::storage::S3ResumeStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Shortlist API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize S3 / MinIO resume storage
    let s3 = build_s3_client(&config).await;
    let resume_store = Arc::new(S3ResumeStore::new(s3, config.s3_bucket.clone()));
    info!("Resume store initialized (bucket: {})", config.s3_bucket);

    // Build the matcher once: stopwords and skill vocabularies are read-only from here on
    let skills = SkillVocabulary::builtin()?;
    let matcher_config = config.matcher_config();
    info!(
        "Matcher ready: threshold {}, {} skills, max {} features, extraction failures {:?}",
        matcher_config.shortlist_threshold,
        skills.len(),
        config.max_features,
        config.extraction_policy
    );
    let matcher = Arc::new(Matcher::new(matcher_config, skills));

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        matcher,
        resume_store,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the recruiter frontend has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "shortlist-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
