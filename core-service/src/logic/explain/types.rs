use serde::{Deserialize, Serialize};

use crate::logic::model::Branch;

/// How a contribution score was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContributionKind {
    /// Signed attribution for this particular scan
    Local,
    /// Model-wide importance (magnitude only, no direction)
    Global,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Raises,
    Lowers,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub feature: String,
    pub branch: Branch,
    pub score: f32,
    pub kind: ContributionKind,
}

impl Contribution {
    pub fn local(feature: impl Into<String>, branch: Branch, score: f32) -> Self {
        Self {
            feature: feature.into(),
            branch,
            score,
            kind: ContributionKind::Local,
        }
    }

    pub fn global(feature: impl Into<String>, branch: Branch, importance: f32) -> Self {
        Self {
            feature: feature.into(),
            branch,
            score: importance.abs(),
            kind: ContributionKind::Global,
        }
    }

    pub fn magnitude(&self) -> f32 {
        self.score.abs()
    }

    pub fn direction(&self) -> Direction {
        match self.kind {
            ContributionKind::Global => Direction::Neutral,
            ContributionKind::Local if self.score > 0.0 => Direction::Raises,
            ContributionKind::Local if self.score < 0.0 => Direction::Lowers,
            ContributionKind::Local => Direction::Neutral,
        }
    }
}
