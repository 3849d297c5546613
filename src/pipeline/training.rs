use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::config::TrainingConfig;
use crate::error::{DetectorError, Result};
use crate::model::artifact::{ModelArtifact, TrainingMetadata};
use crate::model::evaluation::evaluate;
use crate::model::naive_bayes::MultinomialNb;
use crate::model::split::stratified_split;
use crate::model::vectorizer::{FeatureVector, TfidfVectorizer};
use crate::model::Classifier;
use crate::models::{Label, LabeledEmail};
use crate::text::normalizer::normalize;

/// Offline training run: normalize, split, fit, evaluate.
pub struct TrainingPipeline {
    config: TrainingConfig,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Train a model on a labeled corpus of raw emails.
    ///
    /// Fails with [`DetectorError::Configuration`] on an empty corpus, a corpus
    /// with fewer than two labels, a class too small for the held-out ratio, or
    /// invalid hyperparameters.
    pub fn fit(&self, corpus: &[LabeledEmail]) -> Result<ModelArtifact> {
        let TrainingConfig {
            seed,
            test_ratio,
            alpha,
        } = self.config;

        if corpus.is_empty() {
            return Err(DetectorError::Configuration("training corpus is empty".to_string()));
        }

        let labels: Vec<Label> = corpus.iter().map(|e| e.label).collect();
        let distinct: BTreeSet<Label> = labels.iter().copied().collect();
        if distinct.len() < 2 {
            return Err(DetectorError::Configuration(format!(
                "training corpus needs at least two labels, found {}",
                distinct.len()
            )));
        }

        let normalized: Vec<String> = corpus.iter().map(|e| normalize(&e.text)).collect();
        let split = stratified_split(&labels, test_ratio, seed)?;
        debug!(train = split.train.len(), test = split.test.len(), "stratified split");

        let train_docs: Vec<&str> = split.train.iter().map(|&i| normalized[i].as_str()).collect();
        let train_labels: Vec<Label> = split.train.iter().map(|&i| labels[i]).collect();

        let vectorizer = TfidfVectorizer::fit(&train_docs)?;
        debug!(vocabulary = vectorizer.vocabulary_size(), "fitted vectorizer");

        let features: Vec<FeatureVector> =
            train_docs.iter().map(|d| vectorizer.transform(d)).collect();
        let classifier =
            MultinomialNb::fit(&features, &train_labels, vectorizer.vocabulary_size(), alpha)?;

        let actual: Vec<Label> = split.test.iter().map(|&i| labels[i]).collect();
        let predicted: Vec<Label> = split
            .test
            .iter()
            .map(|&i| classifier.predict(&vectorizer.transform(&normalized[i])).label)
            .collect();
        let evaluation = evaluate(&actual, &predicted, classifier.classes());

        info!(
            train = split.train.len(),
            test = split.test.len(),
            vocabulary = vectorizer.vocabulary_size(),
            accuracy = evaluation.accuracy,
            "trained model"
        );

        let metadata = TrainingMetadata {
            seed,
            test_ratio,
            alpha,
            train_size: split.train.len(),
            test_size: split.test.len(),
            evaluation,
        };

        Ok(ModelArtifact::new(vectorizer, classifier, metadata))
    }
}
