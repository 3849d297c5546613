use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::risk::scorer::{
    LexicalRiskScorer, DEFAULT_CLOSE_MARKER, DEFAULT_OPEN_MARKER, DEFAULT_SATURATION,
};
use crate::risk::vocabulary::SuspiciousVocabulary;

/// Root configuration structure, deserialized from `.spam-detector/config.toml`.
///
/// Every section and field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub training: TrainingConfig,
    pub risk: RiskConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Where `train` writes and `predict`/`batch` read the model artifact.
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("spam_model.bin"),
        }
    }
}

/// Hyperparameters of a training run.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Seed of the stratified split shuffle.
    pub seed: u64,
    /// Share of each class held out for evaluation, within `(0, 1)`.
    pub test_ratio: f64,
    /// Additive smoothing of the term probabilities, `> 0`.
    pub alpha: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            test_ratio: 0.2,
            alpha: 1.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    pub saturation: f64,
    pub highlight_open: String,
    pub highlight_close: String,
    /// Replaces the built-in suspicious terms when set.
    pub vocabulary: Option<Vec<String>>,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            saturation: DEFAULT_SATURATION,
            highlight_open: DEFAULT_OPEN_MARKER.to_string(),
            highlight_close: DEFAULT_CLOSE_MARKER.to_string(),
            vocabulary: None,
        }
    }
}

impl RiskConfig {
    /// Build the scorer described by this section.
    pub fn scorer(&self) -> Result<LexicalRiskScorer> {
        let vocabulary = match &self.vocabulary {
            Some(terms) => SuspiciousVocabulary::new(terms)?,
            None => SuspiciousVocabulary::default(),
        };
        Ok(LexicalRiskScorer::new(vocabulary)?
            .with_saturation(self.saturation)?
            .with_markers(self.highlight_open.clone(), self.highlight_close.clone()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Records handed to one blocking worker at a time.
    pub chunk_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self { chunk_size: 64 }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<base>/.spam-detector/config.toml`
/// 3. `~/.config/spam-detector/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        let content = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }

    let local_config = base.join(".spam-detector").join("config.toml");
    if local_config.exists() {
        let content = std::fs::read_to_string(&local_config)?;
        return Ok(toml::from_str(&content)?);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("spam-detector")
            .join("config.toml");
        if home_config.exists() {
            let content = std::fs::read_to_string(&home_config)?;
            return Ok(toml::from_str(&content)?);
        }
    }

    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_gives_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.model.path, PathBuf::from("spam_model.bin"));
        assert_eq!(cfg.training, TrainingConfig::default());
        assert_eq!(cfg.risk.saturation, 10.0);
        assert_eq!(cfg.batch.chunk_size, 64);
    }

    #[test]
    fn test_partial_sections() {
        let cfg: Config = toml::from_str(
            r#"
            [training]
            seed = 7

            [risk]
            highlight_open = "[["
            highlight_close = "]]"
            vocabulary = ["Prize", "bitcoin"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.training.seed, 7);
        assert_eq!(cfg.training.test_ratio, 0.2);

        let scorer = cfg.risk.scorer().unwrap();
        let r = scorer.assess("Bitcoin prize inside");
        assert_eq!(r.match_count, 2);
        assert_eq!(r.highlighted_text, "[[Bitcoin]] [[prize]] inside");
    }

    #[test]
    fn test_invalid_vocabulary_rejected() {
        let cfg: Config = toml::from_str("[risk]\nvocabulary = [\"two words\"]").unwrap();
        assert!(cfg.risk.scorer().is_err());
    }

    #[test]
    fn test_load_prefers_override_then_local() {
        let dir = TempDir::new().unwrap();
        let local = dir.path().join(".spam-detector");
        std::fs::create_dir_all(&local).unwrap();
        std::fs::write(local.join("config.toml"), "[batch]\nchunk_size = 8\n").unwrap();

        let cfg = load_config(dir.path(), None).unwrap();
        assert_eq!(cfg.batch.chunk_size, 8);

        let override_path = dir.path().join("other.toml");
        std::fs::write(&override_path, "[batch]\nchunk_size = 2\n").unwrap();
        let cfg = load_config(dir.path(), Some(&override_path)).unwrap();
        assert_eq!(cfg.batch.chunk_size, 2);
    }
}
