// Resume ↔ job-description matching engine.
// Pure and synchronous: callers on the async runtime wrap `Matcher` calls in
// tokio::task::spawn_blocking (PDF extraction is the only unbounded step).

pub mod error;
pub mod extractor;
pub mod matcher;
pub mod normalizer;
pub mod skills;
pub mod stopwords;
pub mod vectorizer;

// Re-export the public API consumed by handlers and startup.
pub use error::{ExtractionError, ScoringError};
pub use matcher::{ExtractionPolicy, MatchResult, Matcher, MatcherConfig, SimilarityScore};
pub use skills::SkillVocabulary;
