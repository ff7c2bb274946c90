//! Fusion Evaluation
//!
//! Offline check of a fusion policy against labeled branch probabilities:
//! fuse each sample with the given config, then score the verdicts.

use serde::{Deserialize, Serialize};

use super::engine::combine;
use crate::logic::config::DetectionConfig;
use crate::logic::error::CoreResult;
use crate::logic::model::{Branch, ProbabilityScore};

/// Branch probabilities of one scan plus its ground truth
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledScan {
    pub static_probability: Option<f64>,
    pub behavioral_probability: Option<f64>,
    pub malicious: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_positive: u64,
    pub false_positive: u64,
    pub true_negative: u64,
    pub false_negative: u64,
}

impl ConfusionMatrix {
    pub fn total(&self) -> u64 {
        self.true_positive + self.false_positive + self.true_negative + self.false_negative
    }

    fn record(&mut self, predicted: bool, actual: bool) {
        match (predicted, actual) {
            (true, true) => self.true_positive += 1,
            (true, false) => self.false_positive += 1,
            (false, false) => self.true_negative += 1,
            (false, true) => self.false_negative += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub fused_probabilities: Vec<f64>,
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

pub fn evaluate(samples: &[LabeledScan], config: &DetectionConfig) -> CoreResult<EvaluationReport> {
    let mut confusion = ConfusionMatrix::default();
    let mut fused_probabilities = Vec::with_capacity(samples.len());

    for sample in samples {
        let static_score = sample
            .static_probability
            .map(|p| ProbabilityScore::new(Branch::Static, p))
            .transpose()?;
        let behavioral_score = sample
            .behavioral_probability
            .map(|p| ProbabilityScore::new(Branch::Behavioral, p))
            .transpose()?;

        let fused = combine(static_score.as_ref(), behavioral_score.as_ref(), config)?;
        confusion.record(fused.verdict.is_malicious(), sample.malicious);
        fused_probabilities.push(fused.probability);
    }

    let tp = confusion.true_positive;
    let precision = ratio(tp, tp + confusion.false_positive);
    let recall = ratio(tp, tp + confusion.false_negative);
    let f1_score = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    Ok(EvaluationReport {
        accuracy: ratio(tp + confusion.true_negative, confusion.total()),
        precision,
        recall,
        f1_score,
        confusion,
        fused_probabilities,
    })
}
