use crate::model::artifact::ModelArtifact;
use crate::model::Classifier;
use crate::models::Prediction;
use crate::text::normalizer::normalize;

/// Single-record classification against a loaded model.
///
/// Holds only a shared borrow of the artifact, so any number of pipelines can
/// run concurrently over one loaded model.
#[derive(Debug, Clone, Copy)]
pub struct InferencePipeline<'a> {
    artifact: &'a ModelArtifact,
}

impl<'a> InferencePipeline<'a> {
    pub fn new(artifact: &'a ModelArtifact) -> Self {
        Self { artifact }
    }

    /// Classify raw email text.
    ///
    /// Text with no known term (including empty text) is classified on the
    /// class priors alone.
    pub fn predict(&self, raw: &str) -> Prediction {
        let normalized = normalize(raw);
        let features = self.artifact.vectorizer.transform(&normalized);
        self.artifact.classifier.predict(&features)
    }
}
