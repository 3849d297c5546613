use serde::{Deserialize, Serialize};

use crate::models::Label;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: Label,
    pub precision: f64,
    pub recall: f64,
    /// Held-out examples whose true label is `label`.
    pub support: usize,
}

/// Held-out scores recorded alongside a trained model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub accuracy: f64,
    pub classes: Vec<ClassMetrics>,
}

/// Score predictions against true labels for each of `classes`.
///
/// Precision or recall with an empty denominator is reported as 0.
pub fn evaluate(actual: &[Label], predicted: &[Label], classes: &[Label]) -> Evaluation {
    let total = actual.len();
    let correct = actual.iter().zip(predicted).filter(|(a, p)| a == p).count();

    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };

    let classes = classes
        .iter()
        .map(|&label| {
            let tp = actual
                .iter()
                .zip(predicted)
                .filter(|(a, p)| **a == label && **p == label)
                .count();
            let predicted_pos = predicted.iter().filter(|p| **p == label).count();
            let support = actual.iter().filter(|a| **a == label).count();
            ClassMetrics {
                label,
                precision: ratio(tp, predicted_pos),
                recall: ratio(tp, support),
                support,
            }
        })
        .collect();

    Evaluation {
        accuracy: ratio(correct, total),
        classes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics() {
        let actual = [Label::Spam, Label::Spam, Label::Safe, Label::Safe];
        let predicted = [Label::Spam, Label::Safe, Label::Safe, Label::Safe];
        let eval = evaluate(&actual, &predicted, &[Label::Safe, Label::Spam]);

        assert!((eval.accuracy - 0.75).abs() < 1e-12);
        let safe = &eval.classes[0];
        assert!((safe.precision - 2.0 / 3.0).abs() < 1e-12);
        assert!((safe.recall - 1.0).abs() < 1e-12);
        let spam = &eval.classes[1];
        assert!((spam.precision - 1.0).abs() < 1e-12);
        assert!((spam.recall - 0.5).abs() < 1e-12);
        assert_eq!(spam.support, 2);
    }

    #[test]
    fn test_empty_input_scores_zero() {
        let eval = evaluate(&[], &[], &[Label::Safe, Label::Spam]);
        assert_eq!(eval.accuracy, 0.0);
        assert_eq!(eval.classes[0].precision, 0.0);
    }
}
