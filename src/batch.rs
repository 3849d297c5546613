//! Order-preserving parallel scoring of batch records.

use std::sync::Arc;

use anyhow::Result;
use futures::future::join_all;
use indicatif::ProgressBar;
use tracing::debug;

use crate::dataset::BatchInput;
use crate::model::artifact::ModelArtifact;
use crate::models::ScoredRecord;
use crate::pipeline::inference::InferencePipeline;
use crate::risk::scorer::LexicalRiskScorer;

/// Predict and assess every record of `input`.
///
/// Records are split into chunks of `chunk_size`, each scored on tokio's
/// blocking pool; results come back in input order.
pub async fn score_batch(
    artifact: Arc<ModelArtifact>,
    scorer: Arc<LexicalRiskScorer>,
    input: BatchInput,
    chunk_size: usize,
    progress: Option<ProgressBar>,
) -> Result<Vec<ScoredRecord>> {
    let chunk_size = chunk_size.max(1);
    let text_index = input.text_index;

    let mut chunks: Vec<Vec<Vec<String>>> = Vec::new();
    let mut rows = input.rows.into_iter().peekable();
    while rows.peek().is_some() {
        chunks.push(rows.by_ref().take(chunk_size).collect());
    }
    debug!(chunks = chunks.len(), chunk_size, "scoring batch");

    let tasks: Vec<_> = chunks
        .into_iter()
        .map(|chunk| {
            let artifact = Arc::clone(&artifact);
            let scorer = Arc::clone(&scorer);
            let progress = progress.clone();
            tokio::task::spawn_blocking(move || {
                let pipeline = InferencePipeline::new(&artifact);
                chunk
                    .into_iter()
                    .map(|fields| {
                        let text = fields[text_index].clone();
                        let record = ScoredRecord {
                            prediction: pipeline.predict(&text),
                            risk: scorer.assess(&text),
                            fields,
                            text,
                        };
                        if let Some(pb) = &progress {
                            pb.inc(1);
                        }
                        record
                    })
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut scored = Vec::new();
    for result in join_all(tasks).await {
        scored.extend(result?);
    }

    if let Some(pb) = progress {
        pb.finish_with_message("Done");
    }

    Ok(scored)
}
