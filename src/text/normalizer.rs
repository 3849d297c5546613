use std::sync::OnceLock;

use regex::Regex;

fn bracket_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[.*?\]").expect("valid bracket pattern"))
}

fn url() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+|www\.\S+").expect("valid url pattern"))
}

fn non_letter() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z\s]").expect("valid letter pattern"))
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Normalize raw email text for feature extraction.
///
/// Steps, in order:
/// 1. lower-case everything
/// 2. newlines become spaces
/// 3. `[...]` tags are dropped (shortest match; an unclosed `[` stays)
/// 4. URLs starting with `http://`, `https://` or `www.` are dropped up to the next whitespace
/// 5. anything that is not `a-z` or whitespace is dropped
/// 6. whitespace runs collapse to one space, ends are trimmed
///
/// The result only contains `a-z` and single inner spaces, so the function is idempotent.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase().replace('\n', " ");
    let untagged = bracket_tag().replace_all(&lowered, "");
    let unlinked = url().replace_all(&untagged, "");
    let letters = non_letter().replace_all(&unlinked, "");
    whitespace_run().replace_all(&letters, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_normalized(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_lowercase() || c == ' ')
            && !s.contains("  ")
            && !s.starts_with(' ')
            && !s.ends_with(' ')
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
    }

    #[test]
    fn test_lowercase_and_punctuation() {
        assert_eq!(
            normalize("You WON $1,000,000! Click here."),
            "you won click here"
        );
    }

    #[test]
    fn test_newlines_become_spaces() {
        assert_eq!(normalize("Dear user,\nplease\r\nreply"), "dear user please reply");
    }

    #[test]
    fn test_bracket_tags_removed() {
        assert_eq!(normalize("[EXTERNAL] Invoice [ref 42] due"), "invoice due");
        // shortest match: only up to the first closing bracket
        assert_eq!(normalize("a [b] c [d] e"), "a c e");
        // unclosed bracket only loses the bracket character itself
        assert_eq!(normalize("open [ended text"), "open ended text");
    }

    #[test]
    fn test_urls_removed() {
        assert_eq!(
            normalize("Visit https://evil.example.com/login?x=1 now or www.spam.biz today"),
            "visit now or today"
        );
        assert_eq!(normalize("see http://a.b/c"), "see");
    }

    #[test]
    fn test_non_ascii_dropped() {
        assert_eq!(normalize("Café 🎉 prize!!"), "caf prize");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "Hello World",
            "URGENT!!! Verify your account at http://x.y now\n\n[ad] ",
            "  multiple   spaces\tand\ttabs ",
            "ÅNGSTRÖM ümlaut 123 [tag",
            "www.only.link",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
            assert!(is_normalized(&once), "bad output {:?} for {:?}", once, s);
        }
    }
}
