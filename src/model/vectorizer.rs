use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, Result};
use crate::text::tokenizer::terms;

/// Sparse TF-IDF weights as `(term index, weight)` pairs sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.entries
            .binary_search_by_key(&index, |(i, _)| *i)
            .ok()
            .map(|pos| self.entries[pos].1)
    }
}

/// Unigram + bigram TF-IDF vectorizer.
///
/// The vocabulary is every term seen at fit time, sorted lexicographically;
/// the position of a term is its feature index. IDF is smoothed as
/// `ln((1 + n) / (1 + df)) + 1` and document vectors are L2-normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    terms: Vec<String>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn the vocabulary and IDF weights from normalized documents.
    pub fn fit(documents: &[&str]) -> Result<Self> {
        let mut df: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let unique: BTreeSet<String> = terms(doc).into_iter().collect();
            for term in unique {
                *df.entry(term).or_insert(0) += 1;
            }
        }

        if df.is_empty() {
            return Err(DetectorError::Configuration(
                "training documents yield an empty vocabulary".to_string(),
            ));
        }

        let n = documents.len() as f64;
        let (terms, idf) = df
            .into_iter()
            .map(|(term, count)| (term, ((1.0 + n) / (1.0 + count as f64)).ln() + 1.0))
            .unzip();

        Ok(Self { terms, idf })
    }

    /// Weight a normalized document against the fixed vocabulary.
    ///
    /// Terms outside the vocabulary are ignored; a document with no known
    /// term yields an empty vector.
    pub fn transform(&self, normalized: &str) -> FeatureVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for term in terms(normalized) {
            if let Some(index) = self.index_of(&term) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, tf)| (index, tf * self.idf[index]))
            .collect();

        let norm = entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut entries {
                *w /= norm;
            }
        }

        FeatureVector { entries }
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.binary_search_by(|t| t.as_str().cmp(term)).ok()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    /// Structural sanity check for a decoded vectorizer.
    pub(crate) fn is_consistent(&self) -> bool {
        self.terms.len() == self.idf.len()
            && !self.terms.is_empty()
            && self.terms.windows(2).all(|w| w[0] < w[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_builds_sorted_vocabulary() {
        let v = TfidfVectorizer::fit(&["free prize", "team meeting"]).unwrap();
        assert_eq!(v.vocabulary_size(), 6);
        assert_eq!(v.index_of("free"), Some(0));
        assert_eq!(v.index_of("free prize"), Some(1));
        assert!(v.index_of("meeting").is_some());
        assert!(v.index_of("unknown").is_none());
    }

    #[test]
    fn test_rarer_terms_weigh_more() {
        let v = TfidfVectorizer::fit(&["offer prize", "offer meeting", "offer lunch"]).unwrap();
        let fv = v.transform("offer prize");
        let offer = fv.get(v.index_of("offer").unwrap()).unwrap();
        let prize = fv.get(v.index_of("prize").unwrap()).unwrap();
        assert!(prize > offer);
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let v = TfidfVectorizer::fit(&["free prize claim", "project meeting"]).unwrap();
        let fv = v.transform("free free prize claim");
        let norm: f64 = fv.iter().map(|(_, w)| w * w).sum();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unseen_terms_contribute_nothing() {
        let v = TfidfVectorizer::fit(&["free prize"]).unwrap();
        assert!(v.transform("quarterly budget").is_empty());
        assert!(v.transform("").is_empty());
    }

    #[test]
    fn test_empty_vocabulary_is_configuration_error() {
        let err = TfidfVectorizer::fit(&["", "the a of"]).unwrap_err();
        assert!(matches!(err, DetectorError::Configuration(_)));
    }
}
