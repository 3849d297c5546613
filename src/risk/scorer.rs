use regex::bytes::Regex;

use super::vocabulary::SuspiciousVocabulary;
use crate::error::{DetectorError, Result};
use crate::models::{RiskAssessment, Severity, TermMatch};

/// Matches at which the risk percentage saturates at 100.
pub const DEFAULT_SATURATION: f64 = 10.0;
pub const DEFAULT_OPEN_MARKER: &str = "<mark>";
pub const DEFAULT_CLOSE_MARKER: &str = "</mark>";

/// Scores raw email text against a suspicious vocabulary.
///
/// Matching is whole-word, ASCII case-insensitive, with ASCII word
/// boundaries: `verify` matches `VERIFY!` but not `verification`.
#[derive(Debug, Clone)]
pub struct LexicalRiskScorer {
    vocabulary: SuspiciousVocabulary,
    patterns: Vec<Regex>,
    saturation: f64,
    open: String,
    close: String,
}

impl LexicalRiskScorer {
    pub fn new(vocabulary: SuspiciousVocabulary) -> Result<Self> {
        let patterns = vocabulary
            .terms()
            .iter()
            .map(|term| Regex::new(&format!(r"(?i-u)\b{}\b", regex::escape(term))))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| DetectorError::Configuration(e.to_string()))?;

        Ok(Self {
            vocabulary,
            patterns,
            saturation: DEFAULT_SATURATION,
            open: DEFAULT_OPEN_MARKER.to_string(),
            close: DEFAULT_CLOSE_MARKER.to_string(),
        })
    }

    /// Number of matches that maps to 100% risk; must be positive.
    pub fn with_saturation(mut self, saturation: f64) -> Result<Self> {
        if !(saturation > 0.0 && saturation.is_finite()) {
            return Err(DetectorError::Configuration(format!(
                "risk saturation must be positive, got {}",
                saturation
            )));
        }
        self.saturation = saturation;
        Ok(self)
    }

    pub fn with_markers(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.open = open.into();
        self.close = close.into();
        self
    }

    /// Assess raw (not normalized) email text.
    ///
    /// Every occurrence of every term counts towards `match_count`. For
    /// highlighting, terms claim spans in vocabulary order and a later match
    /// overlapping an already claimed span is skipped.
    pub fn assess(&self, raw: &str) -> RiskAssessment {
        let haystack = raw.as_bytes();
        let mut match_count = 0;
        let mut matches: Vec<TermMatch> = Vec::new();

        for (term, pattern) in self.vocabulary.terms().iter().zip(&self.patterns) {
            for m in pattern.find_iter(haystack) {
                match_count += 1;
                let overlaps = matches
                    .iter()
                    .any(|claimed| m.start() < claimed.end && claimed.start < m.end());
                if !overlaps {
                    matches.push(TermMatch {
                        term: term.clone(),
                        start: m.start(),
                        end: m.end(),
                    });
                }
            }
        }

        matches.sort_by_key(|m| m.start);

        let risk_percent = (match_count as f64 / self.saturation * 100.0).min(100.0);

        RiskAssessment {
            match_count,
            risk_percent,
            severity: Severity::from_percent(risk_percent),
            highlighted_text: self.highlight(raw, &matches),
            matches,
        }
    }

    fn highlight(&self, raw: &str, matches: &[TermMatch]) -> String {
        let extra = matches.len() * (self.open.len() + self.close.len());
        let mut out = String::with_capacity(raw.len() + extra);
        let mut cursor = 0;
        // match bounds sit on ASCII letters, hence on char boundaries
        for m in matches {
            out.push_str(&raw[cursor..m.start]);
            out.push_str(&self.open);
            out.push_str(&raw[m.start..m.end]);
            out.push_str(&self.close);
            cursor = m.end;
        }
        out.push_str(&raw[cursor..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> LexicalRiskScorer {
        LexicalRiskScorer::new(SuspiciousVocabulary::default()).unwrap()
    }

    #[test]
    fn test_prize_announcement() {
        let r = scorer().assess("You won $1,000,000! Click here to claim your prize now!");
        assert_eq!(r.match_count, 4);
        assert!((r.risk_percent - 40.0).abs() < 1e-9);
        assert_eq!(r.severity, Severity::Medium);
        assert_eq!(
            r.highlighted_text,
            "You <mark>won</mark> $1,000,000! <mark>Click</mark> here to <mark>claim</mark> your <mark>prize</mark> now!"
        );
        let terms: Vec<&str> = r.matches.iter().map(|m| m.term.as_str()).collect();
        assert_eq!(terms, vec!["won", "click", "claim", "prize"]);
    }

    #[test]
    fn test_benign_text() {
        let raw = "Meeting at 3 PM tomorrow.";
        let r = scorer().assess(raw);
        assert_eq!(r.match_count, 0);
        assert_eq!(r.risk_percent, 0.0);
        assert_eq!(r.severity, Severity::Low);
        assert_eq!(r.highlighted_text, raw);
        assert!(r.matches.is_empty());
    }

    #[test]
    fn test_empty_text() {
        let r = scorer().assess("");
        assert_eq!(r.match_count, 0);
        assert_eq!(r.risk_percent, 0.0);
        assert_eq!(r.severity, Severity::Low);
        assert_eq!(r.highlighted_text, "");
    }

    #[test]
    fn test_whole_word_only() {
        let r = scorer().assess("Verification needed: VERIFY! unverified accounts; verify_me");
        assert_eq!(r.match_count, 1);
        assert_eq!(r.highlighted_text, "Verification needed: <mark>VERIFY</mark>! unverified accounts; verify_me");
    }

    #[test]
    fn test_repeats_count_individually() {
        let r = scorer().assess("free FREE Free");
        assert_eq!(r.match_count, 3);
        assert!((r.risk_percent - 30.0).abs() < 1e-9);
        assert_eq!(r.severity, Severity::Medium);
    }

    #[test]
    fn test_saturates_at_one_hundred() {
        let raw = "free ".repeat(25);
        let r = scorer().assess(&raw);
        assert_eq!(r.match_count, 25);
        assert_eq!(r.risk_percent, 100.0);
        assert_eq!(r.severity, Severity::High);
    }

    #[test]
    fn test_monotonic_in_occurrences() {
        let s = scorer();
        let mut text = String::from("Dear customer, please");
        let mut last = s.assess(&text);
        for _ in 0..12 {
            text.push_str(" urgent");
            let next = s.assess(&text);
            assert!(next.match_count > last.match_count);
            assert!(next.risk_percent >= last.risk_percent);
            last = next;
        }
    }

    #[test]
    fn test_non_ascii_text_preserved() {
        let raw = "Ünïcödé prize 🎁 café";
        let r = scorer().assess(raw);
        assert_eq!(r.match_count, 1);
        assert_eq!(r.highlighted_text, "Ünïcödé <mark>prize</mark> 🎁 café");
    }

    #[test]
    fn test_marker_terms_are_not_rehighlighted() {
        let vocab = SuspiciousVocabulary::new(["mark", "prize"]).unwrap();
        let s = LexicalRiskScorer::new(vocab).unwrap();
        let r = s.assess("prize mark");
        assert_eq!(r.match_count, 2);
        assert_eq!(r.highlighted_text, "<mark>prize</mark> <mark>mark</mark>");
    }

    #[test]
    fn test_custom_markers_and_saturation() {
        let s = scorer().with_markers("**", "**").with_saturation(2.0).unwrap();
        let r = s.assess("urgent: click");
        assert_eq!(r.highlighted_text, "**urgent**: **click**");
        assert_eq!(r.risk_percent, 100.0);
        assert!(scorer().with_saturation(0.0).is_err());
    }
}
