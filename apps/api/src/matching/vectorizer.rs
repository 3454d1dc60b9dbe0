//! TF-IDF vector space over a small corpus of normalized documents.
//!
//! Weighting follows the common smoothed scheme:
//! - term frequency is the raw n-gram count in the document
//! - `idf(t) = ln((1 + n) / (1 + df(t))) + 1`
//! - each document vector is L2-normalized
//!
//! The vocabulary is capped to the `max_features` n-grams with the highest total
//! count across the corpus; ties are broken alphabetically so the cap is deterministic.

use std::collections::{BTreeMap, HashMap};

use crate::matching::error::ScoringError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TfidfConfig {
    /// Inclusive `(min_n, max_n)` n-gram range.
    pub ngram_range: (usize, usize),
    /// `None` keeps every n-gram.
    pub max_features: Option<usize>,
}

impl Default for TfidfConfig {
    fn default() -> Self {
        Self {
            ngram_range: (1, 2),
            max_features: Some(1000),
        }
    }
}

/// A fitted vocabulary with one IDF weight per feature.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfModel {
    /// Fits the vocabulary and IDF weights on `documents` (whitespace-tokenized).
    pub fn fit(documents: &[&str], config: &TfidfConfig) -> Result<Self, ScoringError> {
        let counts: Vec<HashMap<String, usize>> = documents
            .iter()
            .map(|doc| count_ngrams(doc, config.ngram_range))
            .collect();

        let mut corpus_tf: HashMap<&str, usize> = HashMap::new();
        let mut df: HashMap<&str, usize> = HashMap::new();
        for doc in &counts {
            for (term, count) in doc {
                *corpus_tf.entry(term.as_str()).or_insert(0) += count;
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if corpus_tf.is_empty() {
            return Err(ScoringError::EmptyVocabulary);
        }

        let mut ranked: Vec<(&str, usize)> = corpus_tf.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        if let Some(limit) = config.max_features {
            ranked.truncate(limit);
        }
        if ranked.is_empty() {
            return Err(ScoringError::EmptyVocabulary);
        }

        let mut terms: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        terms.sort_unstable();

        let n_docs = documents.len() as f64;
        let idf = terms
            .iter()
            .map(|term| {
                let doc_freq = df.get(term).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs) / (1.0 + doc_freq)).ln() + 1.0
            })
            .collect();
        let vocabulary = terms
            .into_iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx))
            .collect();

        Ok(Self { vocabulary, idf })
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// L2-normalized TF-IDF vector for `document`. Out-of-vocabulary n-grams are ignored;
    /// a document with no known n-grams maps to the zero vector.
    pub fn transform(&self, document: &str, config: &TfidfConfig) -> Vec<f64> {
        let mut vector = vec![0.0; self.vocabulary.len()];
        for (term, count) in count_ngrams(document, config.ngram_range) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                vector[idx] = count as f64 * self.idf[idx];
            }
        }

        let norm = vector.iter().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|w| *w /= norm);
        }
        vector
    }
}

/// Cosine similarity, clamped to `[0, 1]`. Zero vectors have similarity 0.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Result<f64, ScoringError> {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let similarity = dot / (norm_a * norm_b);
    if !similarity.is_finite() {
        return Err(ScoringError::NonFinite);
    }
    Ok(similarity.clamp(0.0, 1.0))
}

fn count_ngrams(document: &str, (min_n, max_n): (usize, usize)) -> HashMap<String, usize> {
    let tokens: Vec<&str> = document.split_whitespace().collect();
    let mut counts = HashMap::new();
    for n in min_n.max(1)..=max_n {
        for window in tokens.windows(n) {
            *counts.entry(window.join(" ")).or_insert(0) += 1;
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    impl TfidfModel {
        fn contains(&self, term: &str) -> bool {
            self.vocabulary.contains_key(term)
        }
    }

    fn fit_transform(
        documents: &[&str],
        config: &TfidfConfig,
    ) -> Result<Vec<Vec<f64>>, ScoringError> {
        let model = TfidfModel::fit(documents, config)?;
        Ok(documents
            .iter()
            .map(|doc| model.transform(doc, config))
            .collect())
    }

    fn ngram_set(document: &str, ngram_range: (usize, usize)) -> HashSet<String> {
        count_ngrams(document, ngram_range).into_keys().collect()
    }

    const UNIGRAMS: TfidfConfig = TfidfConfig {
        ngram_range: (1, 1),
        max_features: None,
    };

    #[test]
    fn test_bigrams_join_adjacent_tokens() {
        let grams = ngram_set("machine learning engineer", (1, 2));
        assert!(grams.contains("machine learning"));
        assert!(grams.contains("learning engineer"));
        assert!(grams.contains("engineer"));
        assert_eq!(grams.len(), 5);
    }

    #[test]
    fn test_empty_corpus_is_empty_vocabulary() {
        let err = TfidfModel::fit(&["", "   "], &TfidfConfig::default()).unwrap_err();
        assert_eq!(err, ScoringError::EmptyVocabulary);
    }

    #[test]
    fn test_zero_feature_cap_is_empty_vocabulary() {
        let config = TfidfConfig {
            ngram_range: (1, 1),
            max_features: Some(0),
        };
        let err = TfidfModel::fit(&["python"], &config).unwrap_err();
        assert_eq!(err, ScoringError::EmptyVocabulary);
    }

    #[test]
    fn test_idf_is_smoothed() {
        let model = TfidfModel::fit(&["python rust", "python"], &UNIGRAMS).unwrap();
        let python = model.vocabulary["python"];
        let rust = model.vocabulary["rust"];
        // shared term: ln(3/3) + 1 = 1.0; unique term: ln(3/2) + 1
        assert!((model.idf[python] - 1.0).abs() < 1e-12);
        assert!((model.idf[rust] - (1.5_f64.ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let config = TfidfConfig {
            ngram_range: (1, 1),
            max_features: Some(2),
        };
        let model =
            TfidfModel::fit(&["python python rust", "python rust golang"], &config).unwrap();
        assert_eq!(model.vocabulary_len(), 2);
        assert!(model.contains("python"));
        assert!(model.contains("rust"));
        assert!(!model.contains("golang"));
    }

    #[test]
    fn test_max_features_ties_break_alphabetically() {
        let config = TfidfConfig {
            ngram_range: (1, 1),
            max_features: Some(1),
        };
        let model = TfidfModel::fit(&["zebra", "apple"], &config).unwrap();
        assert!(model.contains("apple"));
        assert!(!model.contains("zebra"));
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let vectors =
            fit_transform(&["python developer django", "python rust"], &TfidfConfig::default())
                .unwrap();
        for v in vectors {
            let norm = v.iter().map(|w| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9, "Norm was {norm}");
        }
    }

    #[test]
    fn test_identical_documents_have_similarity_one() {
        let vectors = fit_transform(&["python django", "python django"], &TfidfConfig::default())
            .unwrap();
        let sim = cosine_similarity(&vectors[0], &vectors[1]).unwrap();
        assert!((sim - 1.0).abs() < 1e-9, "Similarity was {sim}");
    }

    #[test]
    fn test_disjoint_documents_have_similarity_zero() {
        let vectors = fit_transform(&["python django", "photoshop illustrator"], &UNIGRAMS)
            .unwrap();
        assert_eq!(cosine_similarity(&vectors[0], &vectors[1]).unwrap(), 0.0);
    }

    #[test]
    fn test_known_unigram_similarity() {
        // shared "python" weight 1.0, unique terms weight ln(1.5)+1 each:
        // cos = 1 / (1 + idf_u^2)
        let vectors = fit_transform(&["python rust", "python golang"], &UNIGRAMS).unwrap();
        let idf_u = 1.5_f64.ln() + 1.0;
        let expected = 1.0 / (1.0 + idf_u * idf_u);
        let sim = cosine_similarity(&vectors[0], &vectors[1]).unwrap();
        assert!((sim - expected).abs() < 1e-9, "Expected {expected}, got {sim}");
    }

    #[test]
    fn test_zero_vector_similarity_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_non_finite_similarity_is_error() {
        let err = cosine_similarity(&[f64::NAN, 1.0], &[1.0, 1.0]).unwrap_err();
        assert_eq!(err, ScoringError::NonFinite);
    }
}
