//! Risk Bander
//!
//! `[0, caution) → Safe`, `[caution, high) → Caution`, `[high, 1] → HighRisk`.
//! Each band is closed on its lower bound. History reports recompute bands
//! from stored probabilities with this same function.

use super::types::RiskBand;
use crate::logic::config::RiskCutPoints;

/// Band with the default cut points (0.3, 0.7)
pub fn band(probability: f64) -> RiskBand {
    band_with(probability, &RiskCutPoints::default())
}

pub fn band_with(probability: f64, cut_points: &RiskCutPoints) -> RiskBand {
    if probability < cut_points.caution_min {
        RiskBand::Safe
    } else if probability < cut_points.high_risk_min {
        RiskBand::Caution
    } else {
        RiskBand::HighRisk
    }
}
