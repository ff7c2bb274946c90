//! Feature Vector - Core data structure for ML input
//!
//! **Named, ordered feature vector**
//!
//! A vector is an ordered list of `(name, value)` pairs. It says nothing
//! about which classifier it belongs to; `FeatureSchema::validate` decides
//! whether it can be scored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::layout::FeatureSchema;
use crate::logic::error::{CoreResult, DetectionError};

// ============================================================================
// FEATURE ENTRY
// ============================================================================

/// One named feature value (wire form)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEntry {
    pub name: String,
    pub value: f32,
}

// ============================================================================
// FEATURE VECTOR
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<FeatureEntry>", into = "Vec<FeatureEntry>")]
pub struct FeatureVector {
    names: Vec<String>,
    values: Vec<f32>,
}

impl FeatureVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from ordered `(name, value)` pairs, keeping the given order
    pub fn from_pairs<N, I>(pairs: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, f32)>,
    {
        let mut vector = Self::new();
        for (name, value) in pairs {
            vector.push(name, value);
        }
        vector
    }

    /// Build a vector in `schema` order from an unordered lookup.
    ///
    /// Every schema name must be present. Missing names are an error, never
    /// zero-filled; names the schema does not know are rejected as well.
    pub fn for_schema(schema: &FeatureSchema, values: &HashMap<String, f32>) -> CoreResult<Self> {
        if let Some(unknown) = values
            .keys()
            .filter(|k| schema.index_of(k).is_none())
            .min()
        {
            return Err(DetectionError::schema_mismatch(
                schema.name(),
                format!("unexpected feature '{}'", unknown),
            ));
        }

        let mut vector = Self::new();
        for name in schema.names() {
            let value = values.get(name).copied().ok_or_else(|| {
                DetectionError::schema_mismatch(schema.name(), format!("missing feature '{}'", name))
            })?;
            vector.push(name.clone(), value);
        }
        Ok(vector)
    }

    /// Append a feature (keeps insertion order)
    pub fn push(&mut self, name: impl Into<String>, value: f32) {
        self.names.push(name.into());
        self.values.push(value);
    }

    /// Builder-style append
    pub fn with(mut self, name: impl Into<String>, value: f32) -> Self {
        self.push(name, value);
        self
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get feature by index
    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    /// Get feature by name (first occurrence)
    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.names.iter().map(String::as_str).zip(self.values.iter().copied())
    }

    /// Reject NaN / infinite values
    pub fn ensure_finite(&self) -> CoreResult<()> {
        match self.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, value)) => Err(DetectionError::InvalidFeatureValue {
                feature: name.to_string(),
                value,
            }),
            None => Ok(()),
        }
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "feature_count": self.len(),
            "named_values": self.iter()
                .map(|(name, value)| serde_json::json!({ "name": name, "value": value }))
                .collect::<Vec<_>>(),
        })
    }
}

impl From<Vec<FeatureEntry>> for FeatureVector {
    fn from(entries: Vec<FeatureEntry>) -> Self {
        Self::from_pairs(entries.into_iter().map(|e| (e.name, e.value)))
    }
}

impl From<FeatureVector> for Vec<FeatureEntry> {
    fn from(vector: FeatureVector) -> Self {
        vector
            .names
            .into_iter()
            .zip(vector.values)
            .map(|(name, value)| FeatureEntry { name, value })
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::behavioral_schema;

    #[test]
    fn test_from_pairs_keeps_order() {
        let vector = FeatureVector::from_pairs([("b", 2.0), ("a", 1.0)]);
        assert_eq!(vector.names(), &["b".to_string(), "a".to_string()]);
        assert_eq!(vector.values(), &[2.0, 1.0]);
    }

    #[test]
    fn test_get_by_name() {
        let vector = FeatureVector::new().with("n_file_create", 42.0);
        assert_eq!(vector.get_by_name("n_file_create"), Some(42.0));
        assert_eq!(vector.get_by_name("nonexistent"), None);
    }

    #[test]
    fn test_for_schema_orders_values() {
        let schema = behavioral_schema();
        let map: HashMap<String, f32> = schema
            .names()
            .iter()
            .rev()
            .enumerate()
            .map(|(i, n)| (n.clone(), i as f32))
            .collect();

        let vector = FeatureVector::for_schema(&schema, &map).unwrap();
        assert!(schema.validate(&vector).is_ok());
        assert_eq!(vector.get_by_name("ratio_net_conn"), Some(0.0));
        assert_eq!(vector.get_by_name("total_events"), Some(6.0));
    }

    #[test]
    fn test_for_schema_missing_is_error() {
        let schema = behavioral_schema();
        let mut map = HashMap::new();
        map.insert("total_events".to_string(), 10.0);

        let err = FeatureVector::for_schema(&schema, &map).unwrap_err();
        assert!(matches!(err, DetectionError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_for_schema_unknown_is_error() {
        let schema = behavioral_schema();
        let mut map: HashMap<String, f32> =
            schema.names().iter().map(|n| (n.clone(), 0.0)).collect();
        map.insert("Protocol".to_string(), 1.0);

        let err = FeatureVector::for_schema(&schema, &map).unwrap_err();
        assert!(err.to_string().contains("Protocol"));
    }

    #[test]
    fn test_ensure_finite() {
        let ok = FeatureVector::from_pairs([("a", 1.0)]);
        assert!(ok.ensure_finite().is_ok());

        let bad = FeatureVector::from_pairs([("a", 1.0), ("b", f32::NAN)]);
        match bad.ensure_finite() {
            Err(DetectionError::InvalidFeatureValue { feature, .. }) => assert_eq!(feature, "b"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_serde_as_entry_list() {
        let vector = FeatureVector::from_pairs([("z", 1.0), ("a", 2.0)]);
        let json = serde_json::to_string(&vector).unwrap();
        assert_eq!(json, r#"[{"name":"z","value":1.0},{"name":"a","value":2.0}]"#);

        let back: FeatureVector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, vector);
    }

    #[test]
    fn test_to_log_entry() {
        let vector = FeatureVector::from_pairs([("a", 1.0)]);
        let log = vector.to_log_entry();
        assert_eq!(log["feature_count"], 1);
        assert_eq!(log["named_values"][0]["name"], "a");
    }
}
