//! Rule Estimator - weighted threshold rules
//!
//! Each rule fires when ANY of its conditions holds and adds its weight
//! to the score. The total is clamped to [0, 1].
//!
//! Condition features are bound to schema positions once, at load time,
//! so an artifact naming a feature its own schema lacks never loads.

use serde::{Deserialize, Serialize};

use crate::logic::error::{CoreResult, DetectionError};
use crate::logic::features::FeatureSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    fn holds(&self, lhs: f32, rhs: f32) -> bool {
        match self {
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub feature: String,
    pub op: Comparison,
    pub value: f32,
    #[serde(skip)]
    index: usize,
}

impl Condition {
    pub fn new(feature: impl Into<String>, op: Comparison, value: f32) -> Self {
        Self {
            feature: feature.into(),
            op,
            value,
            index: 0,
        }
    }

    fn holds(&self, values: &[f32]) -> bool {
        values
            .get(self.index)
            .map(|v| self.op.holds(*v, self.value))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub description: String,
    pub any: Vec<Condition>,
    pub weight: f64,
}

impl Rule {
    pub fn fires(&self, values: &[f32]) -> bool {
        self.any.iter().any(|c| c.holds(values))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleModel {
    pub rules: Vec<Rule>,
}

impl RuleModel {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Resolve condition features against the artifact schema
    pub fn bind(&mut self, schema: &FeatureSchema) -> CoreResult<()> {
        if self.rules.is_empty() {
            return Err(DetectionError::InvalidConfig("rule model has no rules".to_string()));
        }
        for rule in &mut self.rules {
            if rule.any.is_empty() {
                return Err(DetectionError::InvalidConfig(format!(
                    "rule '{}' has no conditions",
                    rule.description
                )));
            }
            if !rule.weight.is_finite() || rule.weight < 0.0 {
                return Err(DetectionError::InvalidConfig(format!(
                    "rule '{}' has invalid weight {}",
                    rule.description, rule.weight
                )));
            }
            for condition in &mut rule.any {
                condition.index = schema.index_of(&condition.feature).ok_or_else(|| {
                    DetectionError::InvalidConfig(format!(
                        "rule '{}' references unknown feature '{}'",
                        rule.description, condition.feature
                    ))
                })?;
            }
        }
        Ok(())
    }

    pub fn predict(&self, values: &[f32]) -> f64 {
        let score: f64 = self
            .rules
            .iter()
            .filter(|r| r.fires(values))
            .map(|r| r.weight)
            .sum();
        score.clamp(0.0, 1.0)
    }

    /// Descriptions of the rules that fired, in declaration order
    pub fn fired(&self, values: &[f32]) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|r| r.fires(values))
            .map(|r| r.description.as_str())
            .collect()
    }

    /// Each fired rule's weight is split across its matching conditions
    pub fn attributions(&self, values: &[f32], feature_count: usize) -> Vec<f32> {
        let mut out = vec![0.0; feature_count];
        for rule in self.rules.iter().filter(|r| r.fires(values)) {
            let matching: Vec<&Condition> =
                rule.any.iter().filter(|c| c.holds(values)).collect();
            let share = (rule.weight / matching.len() as f64) as f32;
            for condition in matching {
                if let Some(slot) = out.get_mut(condition.index) {
                    *slot += share;
                }
            }
        }
        out
    }
}
