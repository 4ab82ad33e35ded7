use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::heuristic::Heuristic;

/// Heuristic weights, one real number per [`Heuristic`].
///
/// Missing entries weigh zero. Serialized as a JSON object keyed by
/// heuristic name, e.g. `{"height": -2.0, "lines": 100.0}`.
///
/// # Example
///
/// ```
/// use gentris_evaluator::{heuristic::Heuristic, weights::Weights};
///
/// let weights = Weights::from_iter([(Heuristic::Holes, -10.0)]);
/// assert_eq!(weights.get(Heuristic::Holes), -10.0);
/// assert_eq!(weights.get(Heuristic::Wells), 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weights(BTreeMap<Heuristic, f32>);

impl Weights {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand-tuned weights used when no trained champion is available.
    #[must_use]
    pub fn manual_default() -> Self {
        Self::from_iter([
            (Heuristic::Lines, 100.0),
            (Heuristic::Height, -2.0),
            (Heuristic::Holes, -10.0),
            (Heuristic::Bumpiness, -1.0),
        ])
    }

    /// Weight of `heuristic`, or `0.0` when unset.
    #[must_use]
    pub fn get(&self, heuristic: Heuristic) -> f32 {
        self.try_get(heuristic).unwrap_or(0.0)
    }

    /// Weight of `heuristic`, or `None` when unset.
    #[must_use]
    pub fn try_get(&self, heuristic: Heuristic) -> Option<f32> {
        self.0.get(&heuristic).copied()
    }

    pub fn set(&mut self, heuristic: Heuristic, weight: f32) {
        self.0.insert(heuristic, weight);
    }

    /// Iterates over the explicitly set weights in [`Heuristic`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Heuristic, f32)> + '_ {
        self.0.iter().map(|(h, w)| (*h, *w))
    }
}

impl FromIterator<(Heuristic, f32)> for Weights {
    fn from_iter<T: IntoIterator<Item = (Heuristic, f32)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_format() {
        let weights = Weights::manual_default();
        let json = serde_json::to_string(&weights).unwrap();
        assert_eq!(
            json,
            r#"{"height":-2.0,"holes":-10.0,"bumpiness":-1.0,"lines":100.0}"#
        );
        let parsed: Weights = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, weights);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        assert!(serde_json::from_str::<Weights>(r#"{"depth": 1.0}"#).is_err());
    }

    #[test]
    fn test_missing_weight_is_zero() {
        let mut weights = Weights::new();
        assert_eq!(weights.get(Heuristic::Lines), 0.0);
        weights.set(Heuristic::Lines, 3.5);
        assert_eq!(weights.get(Heuristic::Lines), 3.5);
        assert_eq!(weights.iter().count(), 1);
    }
}
