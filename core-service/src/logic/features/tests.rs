//! Integration Tests for Feature Schemas
//!
//! Vectors produced by the collaborators must line up with the built-in
//! layouts, and anything else must be refused before scoring.

#[cfg(test)]
mod integration_tests {
    use std::collections::HashMap;

    use crate::logic::error::DetectionError;
    use crate::logic::features::{
        behavioral_schema, static_schema, BehaviorEvent, BehaviorSummary, FeatureVector,
        STATIC_FEATURES,
    };

    /// A PE header row keyed by column name lines up with the static layout
    #[test]
    fn test_static_row_from_named_columns() {
        let schema = static_schema();
        let row: HashMap<String, f32> = STATIC_FEATURES
            .iter()
            .map(|name| (name.to_string(), 1.0))
            .collect();

        let vector = FeatureVector::for_schema(&schema, &row).unwrap();
        assert_eq!(vector.len(), 15);
        assert!(schema.validate(&vector).is_ok());
        assert_eq!(vector.names()[0], "Machine");
        assert_eq!(vector.names()[14], "BitcoinAddresses");
    }

    /// Aggregated behavior is valid for the behavioral branch only
    #[test]
    fn test_behavior_vector_rejected_by_static_schema() {
        let events = vec![BehaviorEvent {
            is_file_create: true,
            ..Default::default()
        }];
        let vector = BehaviorSummary::aggregate(&events).to_vector();

        assert!(behavioral_schema().validate(&vector).is_ok());
        assert!(matches!(
            static_schema().validate(&vector),
            Err(DetectionError::SchemaMismatch { .. })
        ));
    }

    /// Dropping one column (the old zero-fill path) is refused
    #[test]
    fn test_static_row_with_dropped_column() {
        let schema = static_schema();
        let vector = FeatureVector::from_pairs(
            STATIC_FEATURES
                .iter()
                .filter(|name| **name != "IatVRA")
                .map(|name| (*name, 0.0)),
        );

        let err = schema.validate(&vector).unwrap_err();
        assert!(err.to_string().contains("IatVRA"));
    }

    /// Swapping two adjacent columns is refused
    #[test]
    fn test_static_row_with_swapped_columns() {
        let schema = static_schema();
        let mut names: Vec<&str> = STATIC_FEATURES.to_vec();
        names.swap(1, 2);
        let vector = FeatureVector::from_pairs(names.into_iter().map(|n| (n, 0.0)));

        assert!(schema.validate(&vector).is_err());
    }
}
