//! Behavior Features - Event aggregation
//!
//! Folds per-event flags (already extracted from Sysmon by a collaborator)
//! into the behavioral branch vector: event counts plus per-kind ratios.

use serde::{Deserialize, Serialize};

use super::layout::BEHAVIORAL_FEATURES;
use super::vector::FeatureVector;

/// Flags of one telemetry event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorEvent {
    #[serde(default)]
    pub is_process_create: bool,
    #[serde(default)]
    pub is_file_create: bool,
    #[serde(default)]
    pub is_network_conn: bool,
}

/// Aggregated behavior of one capture window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSummary {
    pub total_events: u64,
    pub n_proc_create: u64,
    pub n_file_create: u64,
    pub n_net_conn: u64,
}

impl BehaviorSummary {
    pub fn aggregate<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a BehaviorEvent>,
    {
        events.into_iter().fold(Self::default(), |mut acc, event| {
            acc.total_events += 1;
            acc.n_proc_create += event.is_process_create as u64;
            acc.n_file_create += event.is_file_create as u64;
            acc.n_net_conn += event.is_network_conn as u64;
            acc
        })
    }

    /// `count / total_events`, 0 for an empty window
    fn ratio(&self, count: u64) -> f32 {
        if self.total_events == 0 {
            0.0
        } else {
            (count as f64 / self.total_events as f64) as f32
        }
    }

    pub fn ratio_proc_create(&self) -> f32 {
        self.ratio(self.n_proc_create)
    }

    pub fn ratio_file_create(&self) -> f32 {
        self.ratio(self.n_file_create)
    }

    pub fn ratio_net_conn(&self) -> f32 {
        self.ratio(self.n_net_conn)
    }

    /// Vector in built-in behavioral layout order
    pub fn to_vector(&self) -> FeatureVector {
        let values = [
            self.total_events as f32,
            self.n_proc_create as f32,
            self.n_file_create as f32,
            self.n_net_conn as f32,
            self.ratio_proc_create(),
            self.ratio_file_create(),
            self.ratio_net_conn(),
        ];

        FeatureVector::from_pairs(BEHAVIORAL_FEATURES.iter().copied().zip(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::behavioral_schema;

    fn event(proc: bool, file: bool, net: bool) -> BehaviorEvent {
        BehaviorEvent {
            is_process_create: proc,
            is_file_create: file,
            is_network_conn: net,
        }
    }

    #[test]
    fn test_aggregate_counts() {
        let events = vec![
            event(true, false, false),
            event(false, true, false),
            event(false, true, false),
            event(false, false, true),
        ];

        let summary = BehaviorSummary::aggregate(&events);
        assert_eq!(summary.total_events, 4);
        assert_eq!(summary.n_proc_create, 1);
        assert_eq!(summary.n_file_create, 2);
        assert_eq!(summary.n_net_conn, 1);
        assert_eq!(summary.ratio_file_create(), 0.5);
    }

    #[test]
    fn test_empty_window_has_zero_ratios() {
        let summary = BehaviorSummary::aggregate(&Vec::<BehaviorEvent>::new());
        assert_eq!(summary.total_events, 0);
        assert_eq!(summary.ratio_proc_create(), 0.0);
        assert_eq!(summary.ratio_net_conn(), 0.0);
    }

    #[test]
    fn test_vector_matches_behavioral_schema() {
        let summary = BehaviorSummary::aggregate(&[event(true, true, true)]);
        let vector = summary.to_vector();

        assert!(behavioral_schema().validate(&vector).is_ok());
        assert_eq!(vector.get_by_name("ratio_net_conn"), Some(1.0));
    }
}
