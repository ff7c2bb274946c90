//! Detection Errors
//!
//! Every failure the core can raise. The core never retries and never
//! returns a partial FusionResult: a scan either completes or yields one of
//! these.

use thiserror::Error;

pub type CoreResult<T> = Result<T, DetectionError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DetectionError {
    /// Feature vector does not expose the classifier's schema exactly
    #[error("feature schema mismatch ({schema}): {reason}")]
    SchemaMismatch { schema: String, reason: String },

    /// Feature value is NaN or infinite
    #[error("feature '{feature}' has non-finite value {value}")]
    InvalidFeatureValue { feature: String, value: f32 },

    /// No branch produced a score for this scan
    #[error("no branch available: at least one branch score is required")]
    NoBranchAvailable,

    /// Branch or fused probability outside [0, 1] (upstream model defect)
    #[error("{origin} probability out of range: {value}")]
    OutOfRangeScore { origin: String, value: f64 },

    /// Model artifact could not be loaded at startup
    #[error("failed to load model artifact {path}: {reason}")]
    ArtifactLoadFailure { path: String, reason: String },

    /// Estimator backend failed while scoring
    #[error("model inference failed: {0}")]
    Inference(String),

    /// Detection configuration failed validation
    #[error("invalid detection config: {0}")]
    InvalidConfig(String),

    /// History store failure
    #[error("history store error: {0}")]
    History(String),
}

impl DetectionError {
    pub fn schema_mismatch(schema: impl Into<String>, reason: impl Into<String>) -> Self {
        DetectionError::SchemaMismatch {
            schema: schema.into(),
            reason: reason.into(),
        }
    }

    pub fn out_of_range(origin: impl Into<String>, value: f64) -> Self {
        DetectionError::OutOfRangeScore {
            origin: origin.into(),
            value,
        }
    }

    pub fn artifact(path: impl Into<String>, reason: impl Into<String>) -> Self {
        DetectionError::ArtifactLoadFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Caller-side input problem (as opposed to an internal defect)
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            DetectionError::SchemaMismatch { .. }
                | DetectionError::InvalidFeatureValue { .. }
                | DetectionError::NoBranchAvailable
        )
    }
}

impl From<rusqlite::Error> for DetectionError {
    fn from(err: rusqlite::Error) -> Self {
        DetectionError::History(err.to_string())
    }
}
