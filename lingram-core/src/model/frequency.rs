use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Generic frequency counter: key to non-negative integer count.
///
/// Keys are single tokens for unigram counts, or ordered token tuples for
/// higher-order n-grams.
///
/// # Responsibilities
/// - Accumulate counts through `increment` / `decrement`
/// - Enforce the non-negative count invariant on direct assignment
/// - Derive aggregates (total, mean, maximum, minimum) on demand
///
/// # Invariants
/// - Every stored count is a non-negative integer (`u64`)
/// - Aggregates are recomputed per call; the table caches nothing
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FrequencyTable<K: Eq + Hash> {
	counts: HashMap<K, u64>,
}

impl<K: Eq + Hash> Default for FrequencyTable<K> {
	fn default() -> Self {
		Self { counts: HashMap::new() }
	}
}

impl<K: Eq + Hash> FrequencyTable<K> {
	/// Creates an empty frequency table.
	pub fn new() -> Self {
		Self::default()
	}

	/// Records an occurrence of `key`.
	///
	/// - If the key is absent, its count is created at 1.
	/// - Otherwise the count is increased by one.
	pub fn increment(&mut self, key: K) {
		*self.counts.entry(key).or_insert(0) += 1;
	}

	/// Removes an occurrence of `key`.
	///
	/// - If the key is absent, its count is created at 0, not -1. This is
	///   asymmetric with `increment` creating at 1; the behavior is
	///   inherited and kept as is.
	/// - Otherwise the count is decreased by one, saturating at zero.
	pub fn decrement(&mut self, key: K) {
		match self.counts.get_mut(&key) {
			Some(count) => *count = count.saturating_sub(1),
			None => {
				self.counts.insert(key, 0);
			}
		}
	}

	/// Assigns a count directly.
	///
	/// # Errors
	/// Returns `ModelError::InvalidValue` if `value` is negative; only
	/// non-negative integers may be stored.
	pub fn set(&mut self, key: K, value: i64) -> Result<(), ModelError> {
		if value < 0 {
			return Err(ModelError::InvalidValue(value));
		}
		self.counts.insert(key, value as u64);
		Ok(())
	}

	/// Returns the count recorded for `key`, if any.
	pub fn get<Q>(&self, key: &Q) -> Option<u64>
	where
		K: Borrow<Q>,
		Q: Eq + Hash + ?Sized,
	{
		self.counts.get(key).copied()
	}

	/// Number of distinct keys in the table.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	/// Whether the table holds no keys at all.
	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Iterates over `(key, count)` pairs in arbitrary order.
	pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
		self.counts.iter().map(|(key, &count)| (key, count))
	}

	/// Iterates over the distinct keys in arbitrary order.
	pub fn keys(&self) -> impl Iterator<Item = &K> {
		self.counts.keys()
	}

	/// Sum of all stored counts.
	pub fn total(&self) -> u64 {
		self.counts.values().sum()
	}

	/// Mean count per distinct key: `total / len`.
	///
	/// # Errors
	/// Returns `ModelError::EmptyTable` when the table has no keys.
	pub fn mean(&self) -> Result<f64, ModelError> {
		if self.counts.is_empty() {
			return Err(ModelError::EmptyTable);
		}
		Ok(self.total() as f64 / self.counts.len() as f64)
	}

	/// The `(key, count)` pair with the largest count.
	///
	/// When several keys tie, the smallest key wins, so the result does
	/// not depend on hash iteration order.
	pub fn maximum(&self) -> Option<(&K, u64)>
	where
		K: Ord,
	{
		self.counts
			.iter()
			.map(|(key, &count)| (key, count))
			.max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
	}

	/// The `(key, count)` pair with the smallest count.
	///
	/// Ties are broken toward the smallest key, like `maximum`.
	pub fn minimum(&self) -> Option<(&K, u64)>
	where
		K: Ord,
	{
		self.counts
			.iter()
			.map(|(key, &count)| (key, count))
			.min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn increment_creates_at_one_and_accumulates() {
		let mut table = FrequencyTable::new();
		table.increment("a");
		table.increment("a");
		table.increment("b");
		assert_eq!(table.get("a"), Some(2));
		assert_eq!(table.get("b"), Some(1));
		assert_eq!(table.total(), 3);
	}

	#[test]
	fn decrement_creates_absent_keys_at_zero() {
		let mut table = FrequencyTable::new();
		table.decrement("fresh");
		assert_eq!(table.get("fresh"), Some(0));

		table.increment("seen");
		table.decrement("seen");
		assert_eq!(table.get("seen"), Some(0));
	}

	#[test]
	fn set_rejects_negative_values() {
		let mut table = FrequencyTable::new();
		assert_eq!(table.set("a", -3), Err(ModelError::InvalidValue(-3)));
		assert!(table.set("a", 7).is_ok());
		assert_eq!(table.get("a"), Some(7));
	}

	#[test]
	fn mean_fails_on_an_empty_table() {
		let table: FrequencyTable<String> = FrequencyTable::new();
		assert_eq!(table.mean(), Err(ModelError::EmptyTable));
	}

	#[test]
	fn mean_is_total_over_distinct_keys() {
		let mut table = FrequencyTable::new();
		table.increment("a");
		table.increment("a");
		table.increment("a");
		table.increment("b");
		assert_eq!(table.mean(), Ok(2.0));
	}

	#[test]
	fn extrema_break_ties_toward_the_smallest_key() {
		let mut table = FrequencyTable::new();
		table.increment("b");
		table.increment("a");
		table.increment("c");
		table.increment("c");
		assert_eq!(table.maximum(), Some((&"c", 2)));
		assert_eq!(table.minimum(), Some((&"a", 1)));
	}

	#[test]
	fn extrema_are_absent_on_an_empty_table() {
		let table: FrequencyTable<String> = FrequencyTable::new();
		assert_eq!(table.maximum(), None);
		assert_eq!(table.minimum(), None);
	}

	proptest! {
		#[test]
		fn total_counts_every_increment(keys in proptest::collection::vec("[a-d]{1,2}", 0..64)) {
			let mut table = FrequencyTable::new();
			for key in &keys {
				table.increment(key.clone());
			}
			prop_assert_eq!(table.total(), keys.len() as u64);
		}

		#[test]
		fn mean_matches_the_aggregate_law(keys in proptest::collection::vec("[a-f]", 1..64)) {
			let mut table = FrequencyTable::new();
			for key in &keys {
				table.increment(key.clone());
			}
			let mean = table.mean().unwrap();
			let law = table.total() as f64 / table.len() as f64;
			prop_assert!((mean - law).abs() < 1e-12);
		}
	}
}
