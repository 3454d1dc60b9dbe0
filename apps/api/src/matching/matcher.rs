//! Matcher: scores a resume against a job description and applies the shortlist policy.
//!
//! Stateless between calls: the normalizer and skill vocabularies are built once and
//! only read afterwards, so one `Matcher` is shared across requests behind an `Arc`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::matching::error::{ExtractionError, ScoringError};
use crate::matching::extractor::extract_text;
use crate::matching::normalizer::{Normalizer, DEFAULT_MIN_TOKEN_LEN};
use crate::matching::skills::{matching_keywords, SkillVocabulary};
use crate::matching::vectorizer::{cosine_similarity, TfidfConfig, TfidfModel};

pub const DEFAULT_SHORTLIST_THRESHOLD: f64 = 60.0;
pub const DEFAULT_KEYWORD_LIMIT: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Value types
// ────────────────────────────────────────────────────────────────────────────

/// Cosine similarity as a percentage in `[0, 100]`, rounded to 2 decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityScore(f64);

impl SimilarityScore {
    pub const ZERO: Self = Self(0.0);

    /// Scales a `[0, 1]` similarity to a percentage. Out-of-range input is clamped.
    pub fn from_similarity(similarity: f64) -> Self {
        let percent = similarity.clamp(0.0, 1.0) * 100.0;
        Self((percent * 100.0).round() / 100.0)
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// The shortlist decision: `score >= threshold`.
    pub fn meets(self, threshold: f64) -> bool {
        self.0 >= threshold
    }
}

impl fmt::Display for SimilarityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// What to do when the uploaded PDF cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPolicy {
    /// Treat the resume as empty: zero score, not shortlisted.
    #[default]
    Degrade,
    /// Surface the `ExtractionError` so the submission is refused.
    Reject,
}

impl FromStr for ExtractionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown extraction policy '{other}' (expected 'degrade' or 'reject')"
            )),
        }
    }
}

/// The record handed to the persistence layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResult {
    pub matching_score: SimilarityScore,
    pub shortlisted: bool,
    pub extracted_text: String,
    pub skills: BTreeSet<String>,
    pub matching_keywords: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct MatcherConfig {
    pub shortlist_threshold: f64,
    /// Tokens shorter than this many chars are dropped during normalization.
    pub min_token_len: usize,
    pub tfidf: TfidfConfig,
    pub keyword_limit: usize,
    pub keyword_min_len: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            shortlist_threshold: DEFAULT_SHORTLIST_THRESHOLD,
            min_token_len: DEFAULT_MIN_TOKEN_LEN,
            tfidf: TfidfConfig::default(),
            keyword_limit: DEFAULT_KEYWORD_LIMIT,
            keyword_min_len: DEFAULT_MIN_TOKEN_LEN,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Matcher
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatcherConfig,
    normalizer: Normalizer,
    skills: SkillVocabulary,
}

impl Matcher {
    pub fn new(config: MatcherConfig, skills: SkillVocabulary) -> Self {
        let normalizer = Normalizer::english(config.min_token_len);
        Self {
            config,
            normalizer,
            skills,
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    pub fn normalize(&self, text: &str) -> String {
        self.normalizer.normalize(text)
    }

    /// Similarity between resume and job description, or the reason vectorization failed.
    /// Empty text on either side is not an error: it scores zero.
    pub fn try_score(
        &self,
        resume_text: &str,
        jd_text: &str,
    ) -> Result<SimilarityScore, ScoringError> {
        let resume = self.normalizer.normalize(resume_text);
        let jd = self.normalizer.normalize(jd_text);
        self.score_normalized(&resume, &jd)
    }

    /// Fail-soft scoring: any vectorization failure is logged and scores zero.
    pub fn score(&self, resume_text: &str, jd_text: &str) -> SimilarityScore {
        self.try_score(resume_text, jd_text)
            .unwrap_or_else(soft_fail)
    }

    pub fn is_shortlisted(&self, score: SimilarityScore) -> bool {
        score.meets(self.config.shortlist_threshold)
    }

    pub fn extract_skills(&self, text: &str) -> BTreeSet<String> {
        self.skills.extract(text)
    }

    pub fn matching_keywords(&self, resume_text: &str, jd_text: &str) -> Vec<String> {
        matching_keywords(
            &self.normalizer.tokens(resume_text),
            &self.normalizer.tokens(jd_text),
            self.config.keyword_limit,
            self.config.keyword_min_len,
        )
    }

    /// Full analysis of already-extracted resume text. `threshold` overrides the
    /// configured shortlist threshold for this call.
    pub fn analyze_text(
        &self,
        resume_text: &str,
        jd_text: &str,
        threshold: Option<f64>,
    ) -> MatchResult {
        let resume_tokens = self.normalizer.tokens(resume_text);
        let jd_tokens = self.normalizer.tokens(jd_text);

        let matching_score = self
            .score_normalized(&resume_tokens.join(" "), &jd_tokens.join(" "))
            .unwrap_or_else(soft_fail);
        let threshold = threshold.unwrap_or(self.config.shortlist_threshold);
        let shortlisted = matching_score.meets(threshold);

        debug!(
            score = matching_score.value(),
            threshold, shortlisted, "Scored resume against job description"
        );

        MatchResult {
            matching_score,
            shortlisted,
            extracted_text: resume_text.to_string(),
            skills: self.skills.extract(resume_text),
            matching_keywords: matching_keywords(
                &resume_tokens,
                &jd_tokens,
                self.config.keyword_limit,
                self.config.keyword_min_len,
            ),
        }
    }

    /// Extracts the PDF, then analyzes it. Under `ExtractionPolicy::Degrade` an unreadable
    /// document is analyzed as empty text; under `Reject` the error is returned before any
    /// score is computed.
    pub fn analyze_pdf(
        &self,
        pdf_bytes: &[u8],
        jd_text: &str,
        policy: ExtractionPolicy,
        threshold: Option<f64>,
    ) -> Result<MatchResult, ExtractionError> {
        let resume_text = match extract_text(pdf_bytes) {
            Ok(text) => text,
            Err(e) if policy == ExtractionPolicy::Degrade => {
                warn!("Resume extraction failed, scoring as empty: {e}");
                String::new()
            }
            Err(e) => return Err(e),
        };
        Ok(self.analyze_text(&resume_text, jd_text, threshold))
    }

    /// Job description is always document 0, the resume document 1.
    fn score_normalized(&self, resume: &str, jd: &str) -> Result<SimilarityScore, ScoringError> {
        if resume.is_empty() || jd.is_empty() {
            return Ok(SimilarityScore::ZERO);
        }

        let corpus = [jd, resume];
        let model = TfidfModel::fit(&corpus, &self.config.tfidf)?;
        let jd_vec = model.transform(jd, &self.config.tfidf);
        let resume_vec = model.transform(resume, &self.config.tfidf);
        let similarity = cosine_similarity(&jd_vec, &resume_vec)?;

        debug!(
            features = model.vocabulary_len(),
            similarity, "Computed TF-IDF similarity"
        );
        Ok(SimilarityScore::from_similarity(similarity))
    }
}

fn soft_fail(e: ScoringError) -> SimilarityScore {
    warn!("Scoring failed, defaulting to zero: {e}");
    SimilarityScore::ZERO
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
