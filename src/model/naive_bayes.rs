use serde::{Deserialize, Serialize};

use super::vectorizer::FeatureVector;
use super::Classifier;
use crate::error::{DetectorError, Result};
use crate::models::Label;

/// Multinomial naive Bayes over TF-IDF features.
///
/// `feature_log_prob[c][t]` is `ln((F[c][t] + alpha) / (sum_t F[c][t] + alpha * |V|))`
/// where `F[c][t]` sums the weight of term `t` over the class-`c` training documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    classes: Vec<Label>,
    class_log_prior: Vec<f64>,
    feature_log_prob: Vec<Vec<f64>>,
    alpha: f64,
}

impl MultinomialNb {
    /// Fit on parallel slices of feature vectors and labels over `n_features` terms.
    pub fn fit(
        features: &[FeatureVector],
        labels: &[Label],
        n_features: usize,
        alpha: f64,
    ) -> Result<Self> {
        if !(alpha > 0.0 && alpha.is_finite()) {
            return Err(DetectorError::Configuration(format!(
                "smoothing alpha must be positive, got {}",
                alpha
            )));
        }
        if features.len() != labels.len() || features.is_empty() {
            return Err(DetectorError::Configuration(
                "classifier needs one label per non-empty feature set".to_string(),
            ));
        }

        let mut classes: Vec<Label> = labels.to_vec();
        classes.sort();
        classes.dedup();

        let mut class_count = vec![0usize; classes.len()];
        let mut feature_count = vec![vec![0.0f64; n_features]; classes.len()];

        for (fv, label) in features.iter().zip(labels) {
            let c = classes
                .binary_search(label)
                .map_err(|_| DetectorError::Configuration(format!("unexpected label {}", label)))?;
            class_count[c] += 1;
            for (index, weight) in fv.iter() {
                if index >= n_features {
                    return Err(DetectorError::Configuration(format!(
                        "feature index {} outside vocabulary of {}",
                        index, n_features
                    )));
                }
                feature_count[c][index] += weight;
            }
        }

        let total = labels.len() as f64;
        let class_log_prior = class_count
            .iter()
            .map(|&count| (count as f64 / total).ln())
            .collect();

        let feature_log_prob = feature_count
            .iter()
            .map(|row| {
                let denom = (row.iter().sum::<f64>() + alpha * n_features as f64).ln();
                row.iter().map(|count| (count + alpha).ln() - denom).collect()
            })
            .collect();

        Ok(Self {
            classes,
            class_log_prior,
            feature_log_prob,
            alpha,
        })
    }

    pub fn class_log_prior(&self) -> &[f64] {
        &self.class_log_prior
    }

    /// Structural sanity check for a decoded model over `n_features` terms.
    pub(crate) fn is_consistent(&self, n_features: usize) -> bool {
        self.classes.len() >= 2
            && self.class_log_prior.len() == self.classes.len()
            && self.feature_log_prob.len() == self.classes.len()
            && self.feature_log_prob.iter().all(|row| row.len() == n_features)
    }
}

impl Classifier for MultinomialNb {
    fn classes(&self) -> &[Label] {
        &self.classes
    }

    fn joint_log_likelihood(&self, features: &FeatureVector) -> Vec<f64> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, row)| {
                prior
                    + features
                        .iter()
                        .filter_map(|(index, weight)| row.get(index).map(|lp| weight * lp))
                        .sum::<f64>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::vectorizer::TfidfVectorizer;

    fn fitted() -> (TfidfVectorizer, MultinomialNb) {
        let docs = [
            "free prize claim",
            "claim free reward",
            "urgent prize winner",
            "project meeting agenda",
            "meeting notes attached",
        ];
        let labels = [Label::Spam, Label::Spam, Label::Spam, Label::Safe, Label::Safe];
        let vectorizer = TfidfVectorizer::fit(&docs).unwrap();
        let features: Vec<FeatureVector> = docs.iter().map(|d| vectorizer.transform(d)).collect();
        let nb = MultinomialNb::fit(&features, &labels, vectorizer.vocabulary_size(), 1.0).unwrap();
        (vectorizer, nb)
    }

    #[test]
    fn test_priors_follow_class_frequency() {
        let (_, nb) = fitted();
        assert_eq!(nb.classes(), &[Label::Safe, Label::Spam]);
        assert!((nb.class_log_prior()[0] - (2.0f64 / 5.0).ln()).abs() < 1e-12);
        assert!((nb.class_log_prior()[1] - (3.0f64 / 5.0).ln()).abs() < 1e-12);
    }

    #[test]
    fn test_predicts_obvious_examples() {
        let (v, nb) = fitted();
        assert_eq!(nb.predict(&v.transform("free prize")).label, Label::Spam);
        assert_eq!(nb.predict(&v.transform("meeting agenda")).label, Label::Safe);
    }

    #[test]
    fn test_posteriors_sum_to_one() {
        let (v, nb) = fitted();
        for text in ["free prize", "meeting", "", "nothing known here"] {
            let p = nb.predict(&v.transform(text));
            let sum: f64 = p.posteriors.iter().map(|(_, pr)| pr).sum();
            assert!((sum - 1.0).abs() < 1e-9);
            assert!((0.0..=1.0).contains(&p.confidence));
            let argmax = p
                .posteriors
                .iter()
                .cloned()
                .fold((Label::Safe, -1.0), |a, b| if b.1 > a.1 { b } else { a });
            assert_eq!(p.label, argmax.0);
        }
    }

    #[test]
    fn test_empty_vector_falls_back_on_priors() {
        let (_, nb) = fitted();
        let p = nb.predict(&FeatureVector::default());
        assert_eq!(p.label, Label::Spam);
        assert!((p.confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_positive_alpha() {
        let err = MultinomialNb::fit(&[FeatureVector::default()], &[Label::Spam], 1, 0.0).unwrap_err();
        assert!(matches!(err, DetectorError::Configuration(_)));
    }
}
