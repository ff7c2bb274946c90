use std::cmp::Ordering;

use super::phrases::{framing, phrase};
use super::types::Contribution;
use crate::logic::config::ExplanationConfig;
use crate::logic::fusion::{RiskBand, Verdict};

/// Build the reasons sequence for one scan.
///
/// Framing sentence first, then up to `max_reasons` contribution phrases
/// merged across branches. A Benign scan in the Safe band gets the framing
/// sentence alone.
pub fn explain(
    verdict: Verdict,
    band: RiskBand,
    contributions: &[Contribution],
    config: &ExplanationConfig,
) -> Vec<String> {
    let mut reasons = vec![framing(verdict, band).to_string()];

    if verdict == Verdict::Benign && band == RiskBand::Safe {
        return reasons;
    }

    reasons.extend(select_top(contributions, config).iter().map(phrase));
    reasons
}

/// Merge and rank: magnitude desc, then feature name, then branch name
pub fn select_top(contributions: &[Contribution], config: &ExplanationConfig) -> Vec<Contribution> {
    let mut ranked: Vec<Contribution> = contributions
        .iter()
        .filter(|c| c.magnitude().is_finite() && c.magnitude() >= config.min_magnitude)
        .cloned()
        .collect();

    ranked.sort_by(rank);
    ranked.truncate(config.max_reasons);
    ranked
}

fn rank(a: &Contribution, b: &Contribution) -> Ordering {
    b.magnitude()
        .total_cmp(&a.magnitude())
        .then_with(|| a.feature.cmp(&b.feature))
        .then_with(|| a.branch.as_str().cmp(b.branch.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::explain::phrases::{CAUTION_FRAMING, MALICIOUS_FRAMING, SAFE_FRAMING};
    use crate::logic::model::Branch;

    fn config(max_reasons: usize) -> ExplanationConfig {
        ExplanationConfig {
            max_reasons,
            min_magnitude: 0.01,
        }
    }

    #[test]
    fn test_safe_scan_is_framing_only() {
        let contributions = vec![Contribution::local("n_file_create", Branch::Behavioral, 0.05)];
        let reasons = explain(Verdict::Benign, RiskBand::Safe, &contributions, &config(5));
        assert_eq!(reasons, vec![SAFE_FRAMING.to_string()]);
    }

    #[test]
    fn test_empty_contributions_degrade_to_framing() {
        let reasons = explain(Verdict::Malicious, RiskBand::HighRisk, &[], &config(5));
        assert_eq!(reasons, vec![MALICIOUS_FRAMING.to_string()]);
    }

    #[test]
    fn test_caps_at_max_reasons() {
        let contributions: Vec<Contribution> = (0..10)
            .map(|i| Contribution::local(format!("f{}", i), Branch::Static, 0.1 * (i + 1) as f32))
            .collect();
        let reasons = explain(Verdict::Benign, RiskBand::Caution, &contributions, &config(3));

        assert_eq!(reasons.len(), 4);
        assert_eq!(reasons[0], CAUTION_FRAMING);
        assert!(reasons[1].starts_with("f9 "));
    }

    #[test]
    fn test_merge_ranks_across_branches() {
        let contributions = vec![
            Contribution::local("Machine", Branch::Static, 0.2),
            Contribution::local("n_net_conn", Branch::Behavioral, 0.6),
            Contribution::local("DebugSize", Branch::Static, -0.4),
        ];
        let top = select_top(&contributions, &config(5));
        let order: Vec<&str> = top.iter().map(|c| c.feature.as_str()).collect();
        assert_eq!(order, vec!["n_net_conn", "DebugSize", "Machine"]);
    }

    #[test]
    fn test_ties_broken_by_feature_then_branch() {
        let contributions = vec![
            Contribution::local("x", Branch::Static, 0.5),
            Contribution::local("x", Branch::Behavioral, 0.5),
            Contribution::local("a", Branch::Static, 0.5),
        ];
        let top = select_top(&contributions, &config(5));
        let order: Vec<(&str, Branch)> = top.iter().map(|c| (c.feature.as_str(), c.branch)).collect();
        assert_eq!(
            order,
            vec![("a", Branch::Static), ("x", Branch::Behavioral), ("x", Branch::Static)]
        );
    }

    #[test]
    fn test_tiny_contributions_dropped() {
        let contributions = vec![
            Contribution::local("Machine", Branch::Static, 0.001),
            Contribution::local("NaNFeature", Branch::Static, f32::NAN),
        ];
        let reasons = explain(Verdict::Malicious, RiskBand::HighRisk, &contributions, &config(5));
        assert_eq!(reasons.len(), 1);
    }

    #[test]
    fn test_deterministic_output() {
        let contributions = vec![
            Contribution::local("ratio_file_create", Branch::Behavioral, 0.3),
            Contribution::local("NumberOfSections", Branch::Static, 0.3),
            Contribution::global("ResourceSize", Branch::Static, 0.3),
        ];
        let first = explain(Verdict::Malicious, RiskBand::HighRisk, &contributions, &config(5));
        let mut reversed = contributions.clone();
        reversed.reverse();
        let second = explain(Verdict::Malicious, RiskBand::HighRisk, &reversed, &config(5));
        assert_eq!(first, second);
    }
}
