//! Edge cost policies.
//!
//! A policy turns one street segment into a traversal cost. Returning
//! `f64::INFINITY` removes the segment from consideration entirely, which is how
//! the accessibility constraint reaches the search without any special casing.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::graph::{Edge, Wheelchair};

/// Length assumed for segments whose source data carried none.
pub const DEFAULT_EDGE_LENGTH: f64 = 1.0;

/// Treatment of segments with unknown accessibility unless configured otherwise.
pub const DEFAULT_UNKNOWN_ACCESS: UnknownAccess = UnknownAccess::Exclude;

/// Derives the traversal cost of a single edge.
///
/// Implementations must return a value in `[0, ∞]`. The search treats any
/// other value (negative, NaN) as an unusable edge.
pub trait EdgeCostPolicy: Send + Sync {
    fn cost(&self, edge: &Edge) -> f64;
}

impl<F> EdgeCostPolicy for F
where
    F: Fn(&Edge) -> f64 + Send + Sync,
{
    fn cost(&self, edge: &Edge) -> f64 {
        self(edge)
    }
}

/// How segments tagged neither accessible nor inaccessible are costed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownAccess {
    /// Same as inaccessible: the segment is never used.
    Exclude,
    /// Usable, at `length * factor`. The factor must be at least 1.
    Penalize { factor: f64 },
}

impl Default for UnknownAccess {
    fn default() -> Self {
        DEFAULT_UNKNOWN_ACCESS
    }
}

impl UnknownAccess {
    /// Reject penalty factors below 1. A smaller factor lets penalized
    /// segments undercut the heuristic estimate.
    pub fn validate(&self) -> Result<()> {
        if let Self::Penalize { factor } = *self {
            if !factor.is_finite() || factor < 1.0 {
                return Err(Error::InvalidConfig {
                    message: format!("unknown access penalty factor must be >= 1, got {factor}"),
                });
            }
        }
        Ok(())
    }
}

/// Reject default lengths that are not positive and finite.
pub fn validate_default_length(length: f64) -> Result<()> {
    if !length.is_finite() || length <= 0.0 {
        return Err(Error::InvalidConfig {
            message: format!("default_edge_length must be positive and finite, got {length}"),
        });
    }
    Ok(())
}

/// Wheelchair routing cost: accessible segments cost their length, everything
/// else is excluded (or penalized, for unknown segments, when configured).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelchairCost {
    default_length: f64,
    unknown: UnknownAccess,
}

impl WheelchairCost {
    pub fn new() -> Self {
        Self {
            default_length: DEFAULT_EDGE_LENGTH,
            unknown: DEFAULT_UNKNOWN_ACCESS,
        }
    }

    /// Set the treatment of unknown segments. Fails on a penalty factor below 1.
    pub fn with_unknown_access(mut self, unknown: UnknownAccess) -> Result<Self> {
        unknown.validate()?;
        self.unknown = unknown;
        Ok(self)
    }

    /// Set the length charged for segments without one. Fails unless the
    /// length is positive and finite.
    pub fn with_default_length(mut self, length: f64) -> Result<Self> {
        validate_default_length(length)?;
        self.default_length = length;
        Ok(self)
    }

    pub fn unknown_access(&self) -> UnknownAccess {
        self.unknown
    }
}

impl Default for WheelchairCost {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeCostPolicy for WheelchairCost {
    fn cost(&self, edge: &Edge) -> f64 {
        let length = edge.length_or(self.default_length);
        match (edge.wheelchair, self.unknown) {
            (Wheelchair::Accessible, _) => length,
            (Wheelchair::Unknown, UnknownAccess::Penalize { factor }) => length * factor,
            (Wheelchair::Unknown, UnknownAccess::Exclude) | (Wheelchair::NotAccessible, _) => {
                f64::INFINITY
            }
        }
    }
}

/// Plain shortest-distance cost that ignores accessibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceCost {
    default_length: f64,
}

impl DistanceCost {
    pub fn new() -> Self {
        Self {
            default_length: DEFAULT_EDGE_LENGTH,
        }
    }
}

impl Default for DistanceCost {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeCostPolicy for DistanceCost {
    fn cost(&self, edge: &Edge) -> f64 {
        edge.length_or(self.default_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(length: Option<f64>, wheelchair: Wheelchair) -> Edge {
        Edge::new(1, 2, length, wheelchair)
    }

    #[test]
    fn accessible_edge_costs_its_length() {
        let policy = WheelchairCost::default();
        assert_eq!(policy.cost(&edge(Some(12.5), Wheelchair::Accessible)), 12.5);
    }

    #[test]
    fn missing_length_falls_back_to_default() {
        let policy = WheelchairCost::default();
        assert_eq!(
            policy.cost(&edge(None, Wheelchair::Accessible)),
            DEFAULT_EDGE_LENGTH
        );

        let policy = WheelchairCost::new().with_default_length(7.0).unwrap();
        assert_eq!(policy.cost(&edge(None, Wheelchair::Accessible)), 7.0);
    }

    #[test]
    fn inaccessible_and_unknown_are_excluded_by_default() {
        let policy = WheelchairCost::default();
        assert!(policy
            .cost(&edge(Some(1.0), Wheelchair::NotAccessible))
            .is_infinite());
        assert!(policy.cost(&edge(Some(1.0), Wheelchair::Unknown)).is_infinite());
    }

    #[test]
    fn penalized_unknown_is_scaled() {
        let policy = WheelchairCost::new()
            .with_unknown_access(UnknownAccess::Penalize { factor: 3.0 })
            .unwrap();
        assert_eq!(policy.cost(&edge(Some(2.0), Wheelchair::Unknown)), 6.0);
        assert!(policy
            .cost(&edge(Some(2.0), Wheelchair::NotAccessible))
            .is_infinite());
    }

    #[test]
    fn bad_default_lengths_are_rejected() {
        for length in [-1.0, 0.0, f64::NAN, f64::INFINITY] {
            let error = WheelchairCost::new().with_default_length(length).unwrap_err();
            assert!(matches!(error, Error::InvalidConfig { .. }), "{length}");
        }
    }

    #[test]
    fn penalty_below_one_is_rejected() {
        for factor in [0.1, 0.999, f64::NAN] {
            let error = WheelchairCost::new()
                .with_unknown_access(UnknownAccess::Penalize { factor })
                .unwrap_err();
            assert!(matches!(error, Error::InvalidConfig { .. }), "{factor}");
        }
        assert!(WheelchairCost::new()
            .with_unknown_access(UnknownAccess::Penalize { factor: 1.0 })
            .is_ok());
    }

    #[test]
    fn distance_cost_ignores_accessibility() {
        let policy = DistanceCost::default();
        assert_eq!(policy.cost(&edge(Some(4.0), Wheelchair::NotAccessible)), 4.0);
    }

    #[test]
    fn closures_act_as_policies() {
        let policy = |edge: &Edge| edge.length_or(0.0) * 2.0;
        assert_eq!(policy.cost(&edge(Some(4.0), Wheelchair::Unknown)), 8.0);
    }

    #[test]
    fn unknown_access_serde_shape() {
        let exclude: UnknownAccess = serde_json::from_str("\"exclude\"").unwrap();
        assert_eq!(exclude, UnknownAccess::Exclude);

        let penalize: UnknownAccess =
            serde_json::from_str(r#"{"penalize":{"factor":1.5}}"#).unwrap();
        assert_eq!(penalize, UnknownAccess::Penalize { factor: 1.5 });
    }
}
