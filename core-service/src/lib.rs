//! Hybrid Scan Core - Fusion & Explanation Decision Engine
//!
//! Turns two independently computed maliciousness probabilities (static file
//! metadata, aggregated runtime telemetry) into one verdict, a coarse risk
//! band, and a short list of reasons.
//!
//! ## Flow
//! ```text
//! FeatureVector(s) ─► BranchClassifier::score ─► fusion::combine
//!                                                   │
//!                      explain::explain ◄─ fusion::band
//!                              │
//!                              ▼
//!                 DecisionAssembler::decide ─► FusionResult
//! ```

pub mod constants;
pub mod logic;

pub use logic::config::{DetectionConfig, ExplanationConfig, FusionWeights, RiskCutPoints};
pub use logic::decision::{BranchInputs, DecisionAssembler, FusionResult};
pub use logic::error::{CoreResult, DetectionError};
pub use logic::features::{FeatureSchema, FeatureVector};
pub use logic::fusion::{band, band_with, RiskBand, Verdict};
pub use logic::history::{DetectionLogRecord, HistoryStore, SqliteHistoryStore};
pub use logic::model::{Branch, BranchClassifier, ModelArtifact, ModelRegistry, ProbabilityScore};
pub use logic::report::ScanReport;
