//! Integration Tests for the Decision Assembler
//!
//! End-to-end scans through classifiers, fusion, banding and explanation.

#[cfg(test)]
mod integration_tests {
    use crate::logic::config::DetectionConfig;
    use crate::logic::decision::fixtures::{
        assembler, behavioral_vector, fixed_registry, hybrid_result, static_vector,
    };
    use crate::logic::decision::{BranchInputs, DecisionAssembler};
    use crate::logic::error::DetectionError;
    use crate::logic::explain::phrases::{CAUTION_FRAMING, MALICIOUS_FRAMING, SAFE_FRAMING};
    use crate::logic::features::FeatureVector;
    use crate::logic::fusion::{FusionMode, RiskBand, Verdict};
    use crate::logic::model::Branch;

    /// Static-only executable, strongly malicious
    #[test]
    fn test_scenario_static_only_high_risk() {
        let inputs = BranchInputs::new().with_static(static_vector());
        let result = assembler(0.92, 0.0).decide(&inputs).unwrap();

        assert_eq!(result.final_probability(), 0.92);
        assert_eq!(result.verdict(), Verdict::Malicious);
        assert_eq!(result.risk_band(), RiskBand::HighRisk);
        assert_eq!(result.debug().mode, FusionMode::StaticOnly);
        assert_eq!(result.debug().unavailable, vec![Branch::Behavioral]);
        assert_eq!(
            result.reasons(),
            &[
                MALICIOUS_FRAMING.to_string(),
                "Patterns related to cryptocurrency usage (BitcoinAddresses raised static risk)"
                    .to_string(),
                "Internal structure unusual for normal programs (NumberOfSections raised static risk)"
                    .to_string(),
            ]
        );
    }

    /// Strong static, weak behavioral: fused into Caution but still Malicious
    #[test]
    fn test_scenario_hybrid_caution() {
        let result = hybrid_result(0.8, 0.1);

        assert!((result.final_probability() - 0.52).abs() < 1e-5);
        assert_eq!(result.risk_band(), RiskBand::Caution);
        assert_eq!(result.verdict(), Verdict::Malicious);
        assert_eq!(result.debug().mode, FusionMode::Hybrid);
        assert_eq!(result.reasons()[0], MALICIOUS_FRAMING);
        assert_eq!(result.reasons().len(), 5);
        assert!(result.reasons()[3].contains("n_file_create raised behavioral risk"));

        let behavioral = result.debug().branch(Branch::Behavioral).unwrap();
        assert!(!behavioral.decision);
        assert_eq!(behavioral.threshold, 0.6);
        assert_eq!(behavioral.fired_rules, vec!["fixed behavioral".to_string()]);
        assert!(result.debug().branch(Branch::Static).unwrap().decision);
    }

    /// Caution band with a higher fusion threshold reads as Benign + review
    #[test]
    fn test_scenario_hybrid_caution_benign() {
        let config = DetectionConfig::default().with_decision_threshold(0.6);
        let assembler = DecisionAssembler::new(fixed_registry(0.8, 0.1), config).unwrap();
        let inputs = BranchInputs::new()
            .with_static(static_vector())
            .with_behavioral(behavioral_vector());

        let result = assembler.decide(&inputs).unwrap();
        assert_eq!(result.verdict(), Verdict::Benign);
        assert_eq!(result.reasons()[0], CAUTION_FRAMING);
    }

    /// Weak signals on both branches
    #[test]
    fn test_scenario_hybrid_safe() {
        let result = hybrid_result(0.1, 0.05);

        assert!((result.final_probability() - 0.08).abs() < 1e-5);
        assert_eq!(result.risk_band(), RiskBand::Safe);
        assert_eq!(result.verdict(), Verdict::Benign);
        assert_eq!(result.reasons(), &[SAFE_FRAMING.to_string()]);
    }

    #[test]
    fn test_behavioral_only_is_exact() {
        let inputs = BranchInputs::new().with_behavioral(behavioral_vector());
        let result = assembler(0.0, 0.6).decide(&inputs).unwrap();

        assert_eq!(result.final_probability(), 0.6);
        assert_eq!(result.debug().mode, FusionMode::BehavioralOnly);
        assert_eq!(result.branch_probability(Branch::Static), None);
        assert_eq!(result.branch_probability(Branch::Behavioral), Some(0.6));
    }

    #[test]
    fn test_zero_branches() {
        let err = assembler(0.5, 0.5).decide(&BranchInputs::new()).unwrap_err();
        assert_eq!(err, DetectionError::NoBranchAvailable);
    }

    #[test]
    fn test_identical_inputs_identical_output() {
        let first = hybrid_result(0.7, 0.7);
        let second = hybrid_result(0.7, 0.7);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(first.reasons()).unwrap(),
            serde_json::to_string(second.reasons()).unwrap()
        );
    }

    /// A vector missing one static column fails the whole scan
    #[test]
    fn test_schema_mismatch_propagates() {
        let mut truncated = FeatureVector::new();
        for (name, value) in static_vector().iter().skip(1) {
            truncated.push(name, value);
        }
        let inputs = BranchInputs::new()
            .with_static(truncated)
            .with_behavioral(behavioral_vector());

        assert!(matches!(
            assembler(0.9, 0.9).decide(&inputs),
            Err(DetectionError::SchemaMismatch { .. })
        ));
    }

    /// Vectors are bound to their branch slot, not guessed from content
    #[test]
    fn test_vector_in_wrong_slot() {
        let inputs = BranchInputs::new().with_static(behavioral_vector());
        assert!(matches!(
            assembler(0.9, 0.9).decide(&inputs),
            Err(DetectionError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_result_json_shape() {
        let result = hybrid_result(0.8, 0.1);
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["verdict"], "Malicious");
        assert_eq!(value["risk_band"], "Caution");
        assert!(value["final_prob"].is_number());
        assert_eq!(value["debug"]["mode"], "hybrid");
        assert_eq!(value["debug"]["branches"].as_array().unwrap().len(), 2);

        let back: crate::logic::decision::FusionResult = serde_json::from_value(value).unwrap();
        assert_eq!(back, result);
    }
}
