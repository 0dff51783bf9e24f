//! Measurement counts and outcome distributions.
//!
//! Outcomes are stored as integers: bit `i` of an outcome is the value of
//! classical bit `i`. Bitstrings are rendered most-significant bit first.

use rand::Rng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Render `value` as a bitstring of `num_bits` characters.
pub fn bitstring(value: u64, num_bits: usize) -> String {
    format!("{:0width$b}", value, width = num_bits)
}

/// Histogram of sampled outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    num_bits: usize,
    counts: FxHashMap<u64, u64>,
}

impl Counts {
    pub fn new(num_bits: usize) -> Self {
        Self {
            num_bits,
            counts: FxHashMap::default(),
        }
    }

    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    pub fn insert(&mut self, outcome: u64, count: u64) {
        *self.counts.entry(outcome).or_insert(0) += count;
    }

    pub fn get(&self, outcome: u64) -> u64 {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.counts.iter().map(|(k, v)| (*k, *v))
    }

    /// Bitstrings ordered by descending count, ties broken by bitstring.
    pub fn sorted(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<(u64, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
            .into_iter()
            .map(|(value, count)| (bitstring(value, self.num_bits), count))
            .collect()
    }
}

/// Probability distribution over measured outcomes.
///
/// Entries are kept sorted by descending probability, then ascending outcome,
/// so iteration order is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    num_bits: usize,
    entries: Vec<(u64, f64)>,
}

impl Distribution {
    /// Build from `(outcome, probability)` pairs. Duplicates are merged and
    /// zero-probability outcomes dropped.
    pub fn from_probabilities(num_bits: usize, probs: impl IntoIterator<Item = (u64, f64)>) -> Self {
        let mut merged: FxHashMap<u64, f64> = FxHashMap::default();
        for (outcome, p) in probs {
            if p > 0.0 {
                *merged.entry(outcome).or_insert(0.0) += p;
            }
        }
        let mut entries: Vec<(u64, f64)> = merged.into_iter().collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        Self { num_bits, entries }
    }

    /// Normalize sampled counts into frequencies.
    pub fn from_counts(counts: &Counts) -> Self {
        let total = counts.total();
        if total == 0 {
            return Self {
                num_bits: counts.num_bits(),
                entries: Vec::new(),
            };
        }
        let total = total as f64;
        Self::from_probabilities(
            counts.num_bits(),
            counts.iter().map(|(k, v)| (k, v as f64 / total)),
        )
    }

    pub fn num_bits(&self) -> usize {
        self.num_bits
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn probability(&self, outcome: u64) -> f64 {
        self.entries
            .iter()
            .find(|(k, _)| *k == outcome)
            .map(|(_, p)| *p)
            .unwrap_or(0.0)
    }

    pub fn total_probability(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    /// The outcome with the highest probability.
    pub fn most_likely(&self) -> Option<(u64, f64)> {
        self.entries.first().copied()
    }

    /// Draw one outcome weighted by probability.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<u64> {
        let total = self.total_probability();
        if total <= 0.0 {
            return None;
        }
        let target = rng.gen_range(0.0..total);
        let mut acc = 0.0;
        for (outcome, p) in &self.entries {
            acc += p;
            if target < acc {
                return Some(*outcome);
            }
        }
        self.entries.last().map(|(outcome, _)| *outcome)
    }

    /// Expected value of `f` over the distribution.
    pub fn expectation(&self, f: impl Fn(u64) -> f64) -> f64 {
        self.entries.iter().map(|(k, p)| p * f(*k)).sum()
    }

    /// Outcomes as bitstrings, in distribution order.
    pub fn bitstrings(&self) -> Vec<(String, f64)> {
        self.entries
            .iter()
            .map(|(k, p)| (bitstring(*k, self.num_bits), *p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_counts_sorted() {
        let mut counts = Counts::new(3);
        counts.insert(0b101, 7);
        counts.insert(0b000, 3);
        counts.insert(0b011, 7);

        assert_eq!(counts.total(), 17);
        assert_eq!(
            counts.sorted(),
            vec![
                ("011".to_string(), 7),
                ("101".to_string(), 7),
                ("000".to_string(), 3)
            ]
        );
    }

    #[test]
    fn test_distribution_from_counts() {
        let mut counts = Counts::new(2);
        counts.insert(1, 3);
        counts.insert(2, 1);

        let dist = Distribution::from_counts(&counts);
        assert_eq!(dist.len(), 2);
        assert_eq!(dist.most_likely(), Some((1, 0.75)));
        assert!((dist.total_probability() - 1.0).abs() < 1e-12);
        assert!((dist.probability(2) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_distribution_merges_and_drops_zero() {
        let dist = Distribution::from_probabilities(2, vec![(1, 0.25), (1, 0.25), (3, 0.0), (0, 0.5)]);
        assert_eq!(dist.len(), 2);
        // Ties are ordered by outcome.
        assert_eq!(dist.iter().collect::<Vec<_>>(), vec![(0, 0.5), (1, 0.5)]);
    }

    #[test]
    fn test_expectation() {
        let dist = Distribution::from_probabilities(1, vec![(0, 0.5), (1, 0.5)]);
        let z = dist.expectation(|b| if b & 1 == 1 { -1.0 } else { 1.0 });
        assert!(z.abs() < 1e-12);
    }

    #[test]
    fn test_sample_is_reproducible() {
        let dist = Distribution::from_probabilities(2, vec![(0, 0.1), (1, 0.2), (2, 0.3), (3, 0.4)]);
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..20).map(|_| dist.sample(&mut rng).unwrap()).collect::<Vec<_>>()
        };
        assert_eq!(draw(10), draw(10));
    }

    #[test]
    fn test_sample_empty() {
        let dist = Distribution::default();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(dist.sample(&mut rng), None);
    }
}
