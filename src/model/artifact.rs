use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::evaluation::Evaluation;
use super::naive_bayes::MultinomialNb;
use super::vectorizer::TfidfVectorizer;
use crate::error::{DetectorError, Result};

/// Bumped whenever the serialized layout changes.
pub const FORMAT_VERSION: u32 = 1;

/// How a model was trained and how it scored on its held-out partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub seed: u64,
    pub test_ratio: f64,
    pub alpha: f64,
    pub train_size: usize,
    pub test_size: usize,
    pub evaluation: Evaluation,
}

/// Fitted vectorizer and classifier, persisted and loaded as one unit.
///
/// Never mutated after construction; retraining produces a new artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    version: u32,
    pub vectorizer: TfidfVectorizer,
    pub classifier: MultinomialNb,
    pub metadata: TrainingMetadata,
}

impl ModelArtifact {
    pub fn new(
        vectorizer: TfidfVectorizer,
        classifier: MultinomialNb,
        metadata: TrainingMetadata,
    ) -> Self {
        Self {
            version: FORMAT_VERSION,
            vectorizer,
            classifier,
            metadata,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let artifact: ModelArtifact = bincode::deserialize(bytes)?;
        if artifact.version != FORMAT_VERSION {
            return Err(DetectorError::Artifact(format!(
                "unsupported model format version {} (expected {})",
                artifact.version, FORMAT_VERSION
            )));
        }
        if !artifact.vectorizer.is_consistent()
            || !artifact
                .classifier
                .is_consistent(artifact.vectorizer.vocabulary_size())
        {
            return Err(DetectorError::Artifact(
                "model tables are inconsistent with the vocabulary".to_string(),
            ));
        }
        Ok(artifact)
    }

    /// Write the artifact, atomically replacing any existing file at `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let bytes = self.to_bytes()?;
        let tmp = temp_path(path);
        std::fs::write(&tmp, &bytes)?;
        if let Err(err) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(err.into());
        }
        info!(path = %path.display(), bytes = bytes.len(), "saved model artifact");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let artifact = Self::from_bytes(&bytes)?;
        info!(
            path = %path.display(),
            vocabulary = artifact.vectorizer.vocabulary_size(),
            "loaded model artifact"
        );
        debug!(accuracy = artifact.metadata.evaluation.accuracy, "held-out accuracy at training time");
        Ok(artifact)
    }
}

/// Sibling temp file, so the final rename stays on one filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "model".into());
    name.push(".tmp");
    path.with_file_name(name)
}
