use super::stopwords::is_stop_word;

/// Split a normalized email into content tokens.
///
/// Single-letter words and stop words are dropped.
pub fn tokens(normalized: &str) -> Vec<&str> {
    normalized
        .split_whitespace()
        .filter(|t| t.len() >= 2 && !is_stop_word(t))
        .collect()
}

/// Unigram and bigram terms of a normalized email, in document order.
///
/// Bigrams join adjacent content tokens with a single space, so they are
/// formed after stop-word removal.
pub fn terms(normalized: &str) -> Vec<String> {
    let toks = tokens(normalized);
    let mut out: Vec<String> = toks.iter().map(|t| t.to_string()).collect();
    out.extend(toks.windows(2).map(|w| format!("{} {}", w[0], w[1])));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_drop_short_and_stop_words() {
        assert_eq!(tokens("claim your free prize a now"), vec!["claim", "free", "prize"]);
        assert!(tokens("").is_empty());
    }

    #[test]
    fn test_terms_include_bigrams() {
        assert_eq!(
            terms("claim the free prize"),
            vec!["claim", "free", "prize", "claim free", "free prize"]
        );
    }

    #[test]
    fn test_single_token_has_no_bigram() {
        assert_eq!(terms("prize"), vec!["prize"]);
    }
}
