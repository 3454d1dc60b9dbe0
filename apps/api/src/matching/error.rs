use thiserror::Error;

/// The uploaded document could not be turned into text.
///
/// Callers decide whether this degrades to an empty resume (zero score) or
/// rejects the submission; see `ExtractionPolicy`.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("document is not a PDF")]
    NotPdf,

    #[error("failed to parse PDF: {0}")]
    Parse(String),

    #[error("PDF parser aborted on malformed input")]
    Panicked,
}

/// Internal vectorization failure. `Matcher::score` maps every variant to a
/// zero score; `Matcher::try_score` surfaces it for callers that care.
#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("vocabulary is empty after preprocessing")]
    EmptyVocabulary,

    #[error("similarity is not a finite number")]
    NonFinite,
}
