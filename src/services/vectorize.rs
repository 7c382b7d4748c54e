//! TF-IDF vectorization of claim texts.
//!
//! Unigrams and bigrams over stop-word-filtered words, bounded by document
//! frequency on both ends and capped to the most frequent terms. Rows are
//! L2-normalized so K-means distances behave like cosine distances.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::ClusteringConfig;
use crate::utils::math::l2_normalize;
use crate::utils::text::content_words;
use crate::SiftError;

/// Vectorized documents over a fixed vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct TfidfMatrix {
    pub vocabulary: Vec<String>,
    pub rows: Vec<Vec<f64>>,
}

impl TfidfMatrix {
    pub fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    /// Number of pairwise-distinct rows.
    pub fn distinct_rows(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().map(|v| v.to_bits()).collect::<Vec<u64>>())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    max_features: usize,
    min_df: usize,
    max_df: f64,
}

/// Unigrams followed by bigrams of adjacent content words.
pub fn extract_terms(text: &str) -> Vec<String> {
    let words = content_words(text);
    let bigrams = words.windows(2).map(|pair| format!("{} {}", pair[0], pair[1]));
    words.iter().cloned().chain(bigrams).collect()
}

impl TfidfVectorizer {
    pub fn new(max_features: usize, min_df: usize, max_df: f64) -> Self {
        Self {
            max_features,
            min_df,
            max_df,
        }
    }

    pub fn from_config(config: &ClusteringConfig) -> Self {
        Self::new(config.max_features, config.min_df, config.max_df)
    }

    /// Build the vocabulary from `documents` and vectorize them.
    ///
    /// Fails with [`SiftError::EmptyVocabulary`] when no term survives the
    /// document-frequency bounds.
    pub fn fit_transform(&self, documents: &[&str]) -> Result<TfidfMatrix, SiftError> {
        let n_docs = documents.len();
        let doc_terms: Vec<Vec<String>> = documents.iter().map(|d| extract_terms(d)).collect();

        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        let mut total_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for terms in &doc_terms {
            let unique: BTreeSet<&str> = terms.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
            for term in terms {
                *total_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let max_df_count = self.max_df * n_docs as f64;
        let mut candidates: Vec<(&str, usize)> = doc_freq
            .iter()
            .filter(|&(_, &df)| df >= self.min_df && df as f64 <= max_df_count)
            .map(|(&term, _)| (term, total_freq.get(term).copied().unwrap_or(0)))
            .collect();
        // Most frequent first; ties broken alphabetically so the cap is deterministic
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        candidates.truncate(self.max_features);

        if candidates.is_empty() {
            return Err(SiftError::EmptyVocabulary { documents: n_docs });
        }

        let mut vocabulary: Vec<String> = candidates.iter().map(|(t, _)| t.to_string()).collect();
        vocabulary.sort();
        let index: BTreeMap<&str, usize> = vocabulary
            .iter()
            .enumerate()
            .map(|(i, t)| (t.as_str(), i))
            .collect();

        let idf: Vec<f64> = vocabulary
            .iter()
            .map(|term| {
                let df = doc_freq.get(term.as_str()).copied().unwrap_or(0) as f64;
                ((1.0 + n_docs as f64) / (1.0 + df)).ln() + 1.0
            })
            .collect();

        let rows = doc_terms
            .iter()
            .map(|terms| {
                let mut row = vec![0.0; vocabulary.len()];
                for term in terms {
                    if let Some(&col) = index.get(term.as_str()) {
                        row[col] += 1.0;
                    }
                }
                for (value, weight) in row.iter_mut().zip(&idf) {
                    *value *= weight;
                }
                l2_normalize(&mut row);
                row
            })
            .collect();

        Ok(TfidfMatrix { vocabulary, rows })
    }
}
