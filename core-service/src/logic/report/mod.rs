//! Report Module - Scan reports
//!
//! Builds a structured report from an explicitly supplied FusionResult (or a
//! stored history record). There is no "last scan" state anywhere: callers
//! always hand over the result they want reported.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::logic::config::RiskCutPoints;
use crate::logic::decision::FusionResult;
use crate::logic::explain::phrases::framing;
use crate::logic::fusion::{RiskBand, Verdict};
use crate::logic::history::DetectionLogRecord;
use crate::logic::model::Branch;

pub const REPORT_TITLE: &str = "Ransomware Detection Report";

const MALICIOUS_ACTIONS: &[&str] = &[
    "Immediately isolate the host from the network.",
    "Do not execute or open the file again.",
    "Run additional security scans and inspect logs.",
    "Preserve file and system state for investigation.",
];

const CAUTION_ACTIONS: &[&str] = &[
    "Avoid executing this file on critical systems.",
    "Scan the file using additional tools.",
    "Monitor the device for unusual behaviour.",
];

const SAFE_ACTIONS: &[&str] = &[
    "No malicious indicators detected.",
    "Keep backups and maintain system updates.",
    "Re-scan if the file is modified or moved.",
];

/// Recommended follow-up, chosen the same way as the framing sentence
pub fn recommended_actions(verdict: Verdict, band: RiskBand) -> &'static [&'static str] {
    match (verdict, band) {
        (Verdict::Malicious, _) => MALICIOUS_ACTIONS,
        (Verdict::Benign, RiskBand::Caution) => CAUTION_ACTIONS,
        _ => SAFE_ACTIONS,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreLine {
    pub branch: Branch,
    pub probability: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub scan_timestamp: Option<DateTime<Utc>>,
    pub filename: String,
    pub verdict: Verdict,
    pub final_probability: f64,
    pub risk_band: RiskBand,
    pub cut_points: RiskCutPoints,
    pub summary: String,
    pub score_breakdown: Vec<ScoreLine>,
    pub key_factors: Vec<String>,
    pub recommended_actions: Vec<String>,
}

impl ScanReport {
    pub fn from_result(
        filename: impl Into<String>,
        result: &FusionResult,
        scan_timestamp: Option<DateTime<Utc>>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let verdict = result.verdict();
        let band = result.risk_band();

        Self {
            title: REPORT_TITLE.to_string(),
            generated_at,
            scan_timestamp,
            filename: filename.into(),
            verdict,
            final_probability: result.final_probability(),
            risk_band: band,
            cut_points: result.debug().cut_points,
            summary: framing(verdict, band).to_string(),
            score_breakdown: result
                .debug()
                .branches
                .iter()
                .map(|d| ScoreLine {
                    branch: d.branch,
                    probability: d.probability,
                    threshold: d.threshold,
                })
                .collect(),
            // The first reason repeats the summary
            key_factors: result.reasons().iter().skip(1).cloned().collect(),
            recommended_actions: to_owned(recommended_actions(verdict, band)),
        }
    }

    /// Report for a stored scan. The band is recomputed from the stored
    /// probability; branch scores and reasons are not kept in history.
    pub fn from_history(
        record: &DetectionLogRecord,
        cut_points: &RiskCutPoints,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let band = record.risk_band(cut_points);

        Self {
            title: REPORT_TITLE.to_string(),
            generated_at,
            scan_timestamp: Some(record.timestamp),
            filename: record.filename.clone(),
            verdict: record.verdict,
            final_probability: record.probability,
            risk_band: band,
            cut_points: *cut_points,
            summary: framing(record.verdict, band).to_string(),
            score_breakdown: Vec::new(),
            key_factors: Vec::new(),
            recommended_actions: to_owned(recommended_actions(record.verdict, band)),
        }
    }

    /// Plain-text rendering
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "{}", self.title)?;
        writeln!(out)?;
        writeln!(out, "Generated at: {}", self.generated_at.to_rfc3339())?;
        if let Some(ts) = self.scan_timestamp {
            writeln!(out, "Scan timestamp: {}", ts.to_rfc3339())?;
        }
        writeln!(out, "File name: {}", self.filename)?;
        writeln!(out)?;

        writeln!(out, "Scan Summary")?;
        writeln!(out, "  Final verdict: {}", self.verdict)?;
        writeln!(out, "  Final probability (malicious): {:.3}", self.final_probability)?;
        writeln!(out, "  Risk band: {}", self.risk_band)?;
        writeln!(
            out,
            "  Risk bands: Safe < {:.2} <= Caution < {:.2} <= High Risk",
            self.cut_points.caution_min, self.cut_points.high_risk_min
        )?;
        writeln!(out)?;

        if !self.score_breakdown.is_empty() {
            writeln!(out, "Score Breakdown")?;
            for line in &self.score_breakdown {
                writeln!(
                    out,
                    "  {} risk score: {:.3} (threshold: {:.3})",
                    line.branch, line.probability, line.threshold
                )?;
            }
            writeln!(out)?;
        }

        writeln!(out, "Risk Assessment Summary")?;
        writeln!(out, "  {}", self.summary)?;
        writeln!(out)?;

        if !self.key_factors.is_empty() {
            writeln!(out, "Key Contributing Factors")?;
            for factor in &self.key_factors {
                writeln!(out, "  - {}", factor)?;
            }
            writeln!(out)?;
        }

        writeln!(out, "Recommended Actions")?;
        for action in &self.recommended_actions {
            writeln!(out, "  - {}", action)?;
        }
        Ok(())
    }
}

fn to_owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}
