//! Feature Layout - Named Feature Schemas
//!
//! **CRITICAL: a schema is bound to one trained classifier**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment the schema version
//! 2. Change order → increment the schema version
//! 3. Remove feature → increment the schema version
//!
//! Scoring is never attempted against a vector whose names or order differ
//! from the schema. Mismatches are rejected, not repaired.

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use super::vector::FeatureVector;
use crate::logic::error::{CoreResult, DetectionError};

// ============================================================================
// BUILT-IN LAYOUTS
// ============================================================================

/// Current built-in layout version
pub const FEATURE_VERSION: u8 = 1;

/// Static branch: PE header metadata, in model column order
pub const STATIC_FEATURES: &[&str] = &[
    "Machine",
    "DebugSize",
    "DebugRVA",
    "MajorImageVersion",
    "MajorOSVersion",
    "ExportRVA",
    "ExportSize",
    "IatVRA",
    "MajorLinkerVersion",
    "MinorLinkerVersion",
    "NumberOfSections",
    "SizeOfStackReserve",
    "DllCharacteristics",
    "ResourceSize",
    "BitcoinAddresses",
];

/// Behavioral branch: aggregated Sysmon event counts and ratios
pub const BEHAVIORAL_FEATURES: &[&str] = &[
    "total_events",       // 0: Events in the capture window
    "n_proc_create",      // 1: Process creation events
    "n_file_create",      // 2: File creation events
    "n_net_conn",         // 3: Network connection events
    "ratio_proc_create",  // 4: n_proc_create / total_events
    "ratio_file_create",  // 5: n_file_create / total_events
    "ratio_net_conn",     // 6: n_net_conn / total_events
];

/// Built-in static layout
pub fn static_schema() -> FeatureSchema {
    FeatureSchema::from_static("static", FEATURE_VERSION, STATIC_FEATURES)
}

/// Built-in behavioral layout
pub fn behavioral_schema() -> FeatureSchema {
    FeatureSchema::from_static("behavioral", FEATURE_VERSION, BEHAVIORAL_FEATURES)
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version + ordered names, used to detect layout drift
pub fn compute_layout_hash(version: u8, names: &[String]) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[version]);

    for name in names {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

// ============================================================================
// FEATURE SCHEMA
// ============================================================================

/// Ordered, named, versioned feature layout of one classifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SchemaSpec", into = "SchemaSpec")]
pub struct FeatureSchema {
    name: String,
    version: u8,
    names: Vec<String>,
    hash: u32,
}

/// Wire form of a schema (hash is derived, never trusted from input)
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemaSpec {
    name: String,
    #[serde(default = "default_version")]
    version: u8,
    features: Vec<String>,
}

fn default_version() -> u8 {
    FEATURE_VERSION
}

impl TryFrom<SchemaSpec> for FeatureSchema {
    type Error = DetectionError;

    fn try_from(spec: SchemaSpec) -> Result<Self, Self::Error> {
        FeatureSchema::new(spec.name, spec.version, spec.features)
    }
}

impl From<FeatureSchema> for SchemaSpec {
    fn from(schema: FeatureSchema) -> Self {
        SchemaSpec {
            name: schema.name,
            version: schema.version,
            features: schema.names,
        }
    }
}

impl FeatureSchema {
    /// Build a schema. Names must be non-empty and unique.
    pub fn new(name: impl Into<String>, version: u8, names: Vec<String>) -> CoreResult<Self> {
        let name = name.into();

        if names.is_empty() {
            return Err(DetectionError::schema_mismatch(&name, "schema has no features"));
        }
        for (i, feature) in names.iter().enumerate() {
            if feature.trim().is_empty() {
                return Err(DetectionError::schema_mismatch(
                    &name,
                    format!("feature at position {} has an empty name", i),
                ));
            }
            if names[..i].contains(feature) {
                return Err(DetectionError::schema_mismatch(
                    &name,
                    format!("duplicate feature '{}'", feature),
                ));
            }
        }

        let hash = compute_layout_hash(version, &names);
        Ok(Self { name, version, names, hash })
    }

    fn from_static(name: &str, version: u8, names: &[&str]) -> Self {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        let hash = compute_layout_hash(version, &names);
        Self {
            name: name.to_string(),
            version,
            names,
            hash,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn hash(&self) -> u32 {
        self.hash
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Get feature index by name (O(n) but features are few)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn name_at(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Check that `vector` carries exactly these names in exactly this order.
    pub fn validate(&self, vector: &FeatureVector) -> CoreResult<()> {
        let actual = vector.names();

        for (position, expected) in self.names.iter().enumerate() {
            match actual.get(position) {
                Some(found) if found == expected => continue,
                Some(found) => {
                    let reason = if !actual.contains(expected) {
                        format!("missing feature '{}'", expected)
                    } else if self.index_of(found).is_none() {
                        format!("unexpected feature '{}' at position {}", found, position)
                    } else {
                        format!(
                            "feature '{}' at position {}, expected '{}'",
                            found, position, expected
                        )
                    };
                    return Err(DetectionError::schema_mismatch(&self.name, reason));
                }
                None => {
                    return Err(DetectionError::schema_mismatch(
                        &self.name,
                        format!("missing feature '{}'", expected),
                    ));
                }
            }
        }

        if actual.len() > self.names.len() {
            return Err(DetectionError::schema_mismatch(
                &self.name,
                format!(
                    "unexpected feature '{}' at position {}",
                    actual[self.names.len()],
                    self.names.len()
                ),
            ));
        }

        Ok(())
    }

    pub fn info(&self) -> LayoutInfo {
        LayoutInfo {
            name: self.name.clone(),
            version: self.version,
            hash: self.hash,
            feature_count: self.names.len(),
            feature_names: self.names.clone(),
        }
    }
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub name: String,
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

// ============================================================================
// TESTS
// ============================================================================
