use serde::{Deserialize, Serialize};

use crate::error::{DetectorError, Result};

/// Canonical classifier output. Ordering follows the lexical order of the
/// lower-case names, which is also the class order inside a trained model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Safe,
    Spam,
}

impl Label {
    /// Parse a dataset label case-insensitively.
    ///
    /// `spam` and `phishing` map to [`Label::Spam`]; `safe`, `ham` and
    /// `legitimate` map to [`Label::Safe`].
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "spam" | "phishing" => Ok(Label::Spam),
            "safe" | "ham" | "legitimate" => Ok(Label::Safe),
            other => Err(DetectorError::Data(format!("unknown label '{}'", other))),
        }
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Label::Safe => write!(f, "safe"),
            Label::Spam => write!(f, "spam"),
        }
    }
}

/// One labeled example of a training corpus.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledEmail {
    pub text: String,
    pub label: Label,
}

/// Classifier verdict for a single email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label: Label,
    /// Posterior probability of `label`, in `[0, 1]`.
    pub confidence: f64,
    /// Posterior of every class in model order; sums to 1.
    pub posteriors: Vec<(Label, f64)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Bucket a risk percentage: low below 30, high from 70.
    pub fn from_percent(risk_percent: f64) -> Self {
        if risk_percent < 30.0 {
            Severity::Low
        } else if risk_percent < 70.0 {
            Severity::Medium
        } else {
            Severity::High
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// A highlighted occurrence of a suspicious term, as a byte range of the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermMatch {
    pub term: String,
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub match_count: usize,
    pub risk_percent: f64,
    pub severity: Severity,
    pub highlighted_text: String,
    pub matches: Vec<TermMatch>,
}

/// A batch record after prediction and risk scoring.
///
/// `fields` carries the input columns verbatim, in header order.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredRecord {
    pub fields: Vec<String>,
    pub text: String,
    pub prediction: Prediction,
    pub risk: RiskAssessment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parse_aliases() {
        assert_eq!(Label::parse("SPAM").unwrap(), Label::Spam);
        assert_eq!(Label::parse(" phishing ").unwrap(), Label::Spam);
        assert_eq!(Label::parse("ham").unwrap(), Label::Safe);
        assert_eq!(Label::parse("Safe").unwrap(), Label::Safe);
        assert!(matches!(Label::parse("maybe"), Err(DetectorError::Data(_))));
    }

    #[test]
    fn test_severity_buckets() {
        assert_eq!(Severity::from_percent(0.0), Severity::Low);
        assert_eq!(Severity::from_percent(29.9), Severity::Low);
        assert_eq!(Severity::from_percent(30.0), Severity::Medium);
        assert_eq!(Severity::from_percent(69.9), Severity::Medium);
        assert_eq!(Severity::from_percent(70.0), Severity::High);
        assert_eq!(Severity::from_percent(100.0), Severity::High);
    }

    #[test]
    fn test_label_display_is_lowercase() {
        assert_eq!(Label::Spam.to_string(), "spam");
        assert_eq!(serde_json::to_string(&Label::Safe).unwrap(), "\"safe\"");
    }
}
