//! Logistic Estimator
//!
//! `p = sigmoid(intercept + Σ wᵢ·xᵢ)`.
//! Attribution is exact in log-odds space: feature i contributes
//! `wᵢ·(xᵢ − baselineᵢ)` relative to the baseline sample.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
    /// Reference sample for attribution (defaults to all zeros)
    #[serde(default)]
    pub baseline: Option<Vec<f64>>,
}

impl LogisticModel {
    pub fn new(intercept: f64, coefficients: Vec<f64>) -> Self {
        Self {
            intercept,
            coefficients,
            baseline: None,
        }
    }

    pub fn with_baseline(mut self, baseline: Vec<f64>) -> Self {
        self.baseline = Some(baseline);
        self
    }

    pub fn feature_count(&self) -> usize {
        self.coefficients.len()
    }

    fn baseline_at(&self, i: usize) -> f64 {
        self.baseline
            .as_ref()
            .and_then(|b| b.get(i).copied())
            .unwrap_or(0.0)
    }

    /// Log-odds of the malicious class, accumulated in f64
    pub fn logit(&self, values: &[f32]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(values)
                .map(|(w, x)| w * f64::from(*x))
                .sum::<f64>()
    }

    pub fn predict(&self, values: &[f32]) -> f64 {
        sigmoid(self.logit(values))
    }

    pub fn attributions(&self, values: &[f32]) -> Vec<f32> {
        self.coefficients
            .iter()
            .zip(values)
            .enumerate()
            .map(|(i, (w, x))| (w * (f64::from(*x) - self.baseline_at(i))) as f32)
            .collect()
    }
}

pub fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}
