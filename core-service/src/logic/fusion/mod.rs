//! Fusion Module - Fusion Engine & Risk Bander
//!
//! Pure functions over branch probabilities. No state, no I/O.

pub mod types;
pub mod engine;
pub mod band;
pub mod evaluate;

// Re-export common types
pub use types::{FusedScore, FusionMode, RiskBand, Verdict};
pub use engine::{combine, verdict_for};
pub use band::{band, band_with};
pub use evaluate::{evaluate, ConfusionMatrix, EvaluationReport, LabeledScan};
