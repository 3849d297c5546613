use crate::error::{DetectorError, Result};

/// Built-in suspicious terms, in highlighting priority order.
pub const DEFAULT_TERMS: &[&str] = &[
    "win", "prize", "urgent", "click", "account", "bank", "password", "verify", "update", "free",
    "offer", "reward", "limited", "security", "login", "suspend", "confirm", "risk", "payment",
    "invoice", "credit", "won", "claim", "winner", "congratulations",
];

/// Ordered set of lower-case ASCII single-word terms.
///
/// Iteration order decides which term claims a span when highlighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuspiciousVocabulary {
    terms: Vec<String>,
}

impl SuspiciousVocabulary {
    /// Build a vocabulary from user-supplied terms.
    ///
    /// Terms are trimmed and lower-cased; duplicates keep their first
    /// position. Anything that is not a single `[a-z]+` word is rejected.
    pub fn new<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for raw in terms {
            let term = raw.as_ref().trim().to_ascii_lowercase();
            if term.is_empty() || !term.bytes().all(|b| b.is_ascii_lowercase()) {
                return Err(DetectorError::Configuration(format!(
                    "suspicious term '{}' must be a single ASCII word",
                    raw.as_ref()
                )));
            }
            if !out.contains(&term) {
                out.push(term);
            }
        }
        Ok(Self { terms: out })
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

impl Default for SuspiciousVocabulary {
    fn default() -> Self {
        Self {
            terms: DEFAULT_TERMS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order_and_size() {
        let v = SuspiciousVocabulary::default();
        assert_eq!(v.len(), 25);
        assert_eq!(v.terms()[0], "win");
        assert_eq!(v.terms()[24], "congratulations");
    }

    #[test]
    fn test_new_lowercases_and_dedups() {
        let v = SuspiciousVocabulary::new(["Prize", " click ", "prize"]).unwrap();
        assert_eq!(v.terms(), &["prize".to_string(), "click".to_string()]);
    }

    #[test]
    fn test_new_rejects_non_words() {
        for bad in ["", "two words", "café", "pass123"] {
            let err = SuspiciousVocabulary::new([bad]).unwrap_err();
            assert!(matches!(err, DetectorError::Configuration(_)), "{:?}", bad);
        }
    }
}
