//! Decision Module - Decision Assembler
//!
//! Orchestrates classifiers, fusion, banding and explanation for one scan.

pub mod types;
pub mod assembler;

#[cfg(test)]
pub(crate) mod fixtures;

#[cfg(test)]
mod tests;

pub use types::{BranchDiagnostics, BranchInputs, FusionDebug, FusionResult};
pub use assembler::DecisionAssembler;
