//! Reason phrasing
//!
//! Fixed framing sentences and the short templated phrase for one
//! contribution. Plain language, aimed at non-technical readers.

use super::types::{Contribution, Direction};
use crate::logic::fusion::{RiskBand, Verdict};

pub const MALICIOUS_FRAMING: &str = "The file shows strong indicators of ransomware-like behaviour \
     based on its observed characteristics and risk scores.";

pub const CAUTION_FRAMING: &str = "Some characteristics appear unusual and may require closer \
     inspection before trusting the file fully.";

pub const SAFE_FRAMING: &str = "No significant indicators of ransomware were detected in this scan.";

/// Lead sentence: verdict first, then band
pub fn framing(verdict: Verdict, band: RiskBand) -> &'static str {
    match (verdict, band) {
        (Verdict::Malicious, _) => MALICIOUS_FRAMING,
        (Verdict::Benign, RiskBand::Caution) => CAUTION_FRAMING,
        _ => SAFE_FRAMING,
    }
}

/// Plain-language hint for well-known features, matched on the lowercased name
pub fn describe(feature: &str) -> Option<&'static str> {
    let f = feature.to_ascii_lowercase();

    let description = if f.contains("entropy") {
        "Heavily scrambled content, a common way malware hides itself"
    } else if f.contains("crypt") || f.contains("virtualalloc") || f.contains("import") {
        "Code related to encrypting or changing files"
    } else if f.contains("bitcoin") || f.contains("btc") {
        "Patterns related to cryptocurrency usage"
    } else if f.contains("file_create") {
        "File creation activity, as seen in mass file modification or encryption"
    } else if f.contains("net_conn") {
        "Network connections, a sign of propagation or command-and-control"
    } else if f.contains("proc_create") {
        "Process creation, which may indicate spawning or code injection"
    } else if f.contains("section") {
        "Internal structure unusual for normal programs"
    } else if f.contains("iatvra") || f.contains("export") {
        "Unusual import or export table layout"
    } else if f.contains("debug") {
        "Debug information layout"
    } else if f.contains("resource") {
        "Size of embedded resources"
    } else if f.contains("dllcharacteristics") {
        "Security hardening flags"
    } else if f.contains("linker") || f.contains("osversion") || f.contains("imageversion") {
        "Build toolchain metadata"
    } else if f.contains("write") || f.contains("bulk") {
        "Fast file changes similar to ransomware"
    } else if f == "total_events" {
        "Overall volume of runtime activity"
    } else {
        return None;
    };

    Some(description)
}

/// `"<description> (<feature> raised static risk)"`
pub fn phrase(contribution: &Contribution) -> String {
    let verb = match contribution.direction() {
        Direction::Raises => "raised",
        Direction::Lowers => "lowered",
        Direction::Neutral => "influenced",
    };
    let effect = format!("{} {} {} risk", contribution.feature, verb, contribution.branch);

    match describe(&contribution.feature) {
        Some(description) => format!("{} ({})", description, effect),
        None => effect,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::Branch;

    #[test]
    fn test_framing_precedence() {
        assert_eq!(framing(Verdict::Malicious, RiskBand::Caution), MALICIOUS_FRAMING);
        assert_eq!(framing(Verdict::Malicious, RiskBand::Safe), MALICIOUS_FRAMING);
        assert_eq!(framing(Verdict::Benign, RiskBand::Caution), CAUTION_FRAMING);
        assert_eq!(framing(Verdict::Benign, RiskBand::Safe), SAFE_FRAMING);
        assert_eq!(framing(Verdict::Benign, RiskBand::HighRisk), SAFE_FRAMING);
    }

    #[test]
    fn test_phrase_with_description() {
        let c = Contribution::local("BitcoinAddresses", Branch::Static, 0.8);
        assert_eq!(
            phrase(&c),
            "Patterns related to cryptocurrency usage (BitcoinAddresses raised static risk)"
        );
    }

    #[test]
    fn test_phrase_without_description() {
        let c = Contribution::local("SizeOfStackReserve", Branch::Static, -0.2);
        assert_eq!(phrase(&c), "SizeOfStackReserve lowered static risk");
    }

    #[test]
    fn test_global_phrase_is_neutral() {
        let c = Contribution::global("n_net_conn", Branch::Behavioral, 0.4);
        assert!(phrase(&c).ends_with("(n_net_conn influenced behavioral risk)"));
    }
}
