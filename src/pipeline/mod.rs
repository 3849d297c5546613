//! End-to-end pipelines composing normalizer, vectorizer and classifier.
//!
//! - [`training`] — corpus → stratified split → fit → held-out evaluation → [`ModelArtifact`](crate::model::artifact::ModelArtifact).
//! - [`inference`] — raw text → [`Prediction`](crate::models::Prediction) against a borrowed artifact.

pub mod inference;
pub mod training;
