//! Text preparation for the classifier.
//!
//! - [`normalizer`] — deterministic cleanup of raw email text.
//! - [`tokenizer`] — token and unigram/bigram term extraction over normalized text.
//! - [`stopwords`] — the fixed English stop-word list dropped before term extraction.

pub mod normalizer;
pub mod stopwords;
pub mod tokenizer;
