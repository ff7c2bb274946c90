//! Logic Module - Detection Engines
//!
//! ## Architecture
//! - `features/` - Feature schema + named feature vectors
//! - `model/` - Model artifacts, estimators, branch classifiers
//! - `fusion/` - Branch fusion, verdict, risk band, evaluation
//! - `explain/` - Contribution ranking and reason phrasing
//! - `decision/` - Orchestration into one FusionResult
//! - `history/` - Append-only detection log
//! - `report/` - Structured scan report from an explicit result

pub mod config;
pub mod error;

pub mod features;
pub mod model;
pub mod fusion;
pub mod explain;
pub mod decision;
pub mod history;
pub mod report;
