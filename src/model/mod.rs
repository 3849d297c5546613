//! Feature space and probabilistic classifier.
//!
//! - [`vectorizer`] — TF-IDF weighting over a vocabulary fixed at fit time.
//! - [`naive_bayes`] — multinomial naive Bayes with additive smoothing.
//! - [`split`] — seeded stratified train/held-out partition.
//! - [`evaluation`] — accuracy and per-class precision/recall on held-out data.
//! - [`artifact`] — the persisted vectorizer + classifier bundle.

use crate::models::{Label, Prediction};

pub mod artifact;
pub mod evaluation;
pub mod naive_bayes;
pub mod split;
pub mod vectorizer;

use vectorizer::FeatureVector;

/// A fitted classifier over TF-IDF features.
///
/// Implementors only supply per-class joint log-likelihoods; the posterior,
/// label and confidence are always derived from them.
pub trait Classifier {
    /// Classes in model order.
    fn classes(&self) -> &[Label];

    /// `log P(c) + log P(x | c)` for every class, in [`Classifier::classes`] order.
    fn joint_log_likelihood(&self, features: &FeatureVector) -> Vec<f64>;

    /// Classify a feature vector. Ties go to the earliest class in model order.
    fn predict(&self, features: &FeatureVector) -> Prediction {
        let jll = self.joint_log_likelihood(features);
        let classes = self.classes();

        let mut best = 0;
        for (i, v) in jll.iter().enumerate() {
            if *v > jll[best] {
                best = i;
            }
        }

        // log-sum-exp shifted by the maximum
        let max = jll[best];
        let exp: Vec<f64> = jll.iter().map(|v| (v - max).exp()).collect();
        let total: f64 = exp.iter().sum();
        let posteriors: Vec<(Label, f64)> = classes
            .iter()
            .copied()
            .zip(exp.iter().map(|e| (e / total).clamp(0.0, 1.0)))
            .collect();

        Prediction {
            label: classes[best],
            confidence: posteriors[best].1,
            posteriors,
        }
    }
}
