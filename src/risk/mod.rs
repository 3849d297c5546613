//! Lexical risk scoring, independent of the classifier.
//!
//! - [`vocabulary`] — the ordered set of suspicious terms.
//! - [`scorer`] — whole-word matching, risk percent, severity and highlighting.

pub mod scorer;
pub mod vocabulary;
