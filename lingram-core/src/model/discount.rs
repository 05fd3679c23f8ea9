use std::collections::HashMap;

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

use super::bigram::BigramModel;
use super::counter::{Bigram, Token};
use super::frequency::FrequencyTable;
use super::ProbabilityTable;

/// Good-Turing discounting over a bigram model.
///
/// Re-estimates bigram counts from the frequency-of-frequencies
/// distribution before probabilities are computed:
///
/// `c* = (c + 1) * N(c+1) / N(c)` for seen counts, and
/// `c* = N(1) / total_types` for a zero count,
///
/// where `N(c)` is the number of distinct bigrams observed exactly `c`
/// times. Wraps a [`BigramModel`] and installs the discounted table in
/// its cache, so sampling and sentence assembly behave exactly like the
/// raw model but draw from discounted probabilities.
///
/// # Invariants
/// - `total_types` is the number of distinct observed bigram keys, fixed
///   at construction
/// - `N(c)` values are computed lazily and cached per queried `c`
/// - Keys that cannot be estimated (missing predecessor count, no
///   discount data) are skipped and tallied, never aborting the table
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct GoodTuringDiscounter {
	model: BigramModel,
	total_types: usize,
	ncounts: HashMap<u64, usize>,
}

impl GoodTuringDiscounter {
	/// Creates a discounter over matching unigram and bigram counts.
	pub fn new(unigrams: FrequencyTable<Token>, bigrams: FrequencyTable<Bigram>) -> Self {
		let total_types = bigrams.len();
		Self { model: BigramModel::new(unigrams, bigrams), total_types, ncounts: HashMap::new() }
	}

	/// Number of distinct observed bigram keys.
	pub fn total_types(&self) -> usize {
		self.total_types
	}

	/// Number of distinct bigrams whose raw count equals `n`.
	///
	/// Lazily computed and cached per queried `n`.
	pub fn count_n(&mut self, n: u64) -> usize {
		if let Some(&cached) = self.ncounts.get(&n) {
			return cached;
		}
		let count = self.model.bigrams.iter().filter(|&(_, c)| c == n).count();
		self.ncounts.insert(n, count);
		count
	}

	/// Good-Turing discounted count `c*` for a raw count `c`.
	///
	/// - `c > 0`: `(c + 1) * N(c+1) / N(c)`
	/// - `c == 0`: `N(1) / total_types`
	///
	/// # Errors
	/// Returns `ModelError::EmptyTable` when the denominator is zero, in
	/// which case no discount data exists for `c`.
	pub fn count_star(&mut self, c: u64) -> Result<f64, ModelError> {
		if c == 0 {
			if self.total_types == 0 {
				return Err(ModelError::EmptyTable);
			}
			return Ok(self.count_n(1) as f64 / self.total_types as f64);
		}

		let denominator = self.count_n(c);
		if denominator == 0 {
			return Err(ModelError::EmptyTable);
		}
		let numerator = self.count_n(c + 1);
		Ok((c + 1) as f64 * numerator as f64 / denominator as f64)
	}

	/// Discounted conditional probability of each observed bigram:
	/// `c*(count(w1, w2)) / count(w1)`.
	///
	/// Computed once and installed in the wrapped model's cache. Keys
	/// whose predecessor is missing or whose discount is undefined are
	/// skipped and tallied rather than failing the whole table.
	pub fn probability(&mut self) -> &ProbabilityTable<Bigram> {
		if self.model.ptable.is_none() {
			let entries: Vec<(Bigram, u64)> =
				self.model.bigrams.iter().map(|(bigram, count)| (bigram.clone(), count)).collect();

			let mut table = ProbabilityTable::new();
			let mut skipped = 0;
			for (bigram, count) in entries {
				let unigram_count = match self.model.unigrams.get(&bigram.0) {
					Some(c) if c > 0 => c,
					_ => {
						skipped += 1;
						continue;
					}
				};
				match self.count_star(count) {
					Ok(discounted) => {
						table.insert(bigram, discounted / unigram_count as f64);
					}
					Err(_) => skipped += 1,
				}
			}

			if skipped > 0 {
				debug!("skipped {} bigrams while discounting", skipped);
			}
			self.model.skipped = skipped;
			self.model.ptable = Some(table);
		}
		self.model.ptable.get_or_insert_with(ProbabilityTable::new)
	}

	/// Number of bigram keys skipped while computing the discounted
	/// table. Zero before the first `probability()` call.
	pub fn skipped(&self) -> usize {
		self.model.skipped
	}

	/// Discounted estimate for any bigram, present in the table or not.
	///
	/// Absent bigrams get a zero observed count synthesized on demand:
	/// `c*(0) / count(w1)`. No unigram cross product is ever
	/// materialized. Keys skipped during table construction fall back to
	/// the unseen estimate as well.
	///
	/// # Errors
	/// - `ModelError::KeyNotFound` if the predecessor has no unigram
	///   count
	/// - `ModelError::EmptyTable` if no discount data exists at all
	pub fn probability_of(&mut self, bigram: &Bigram) -> Result<f64, ModelError> {
		self.probability();
		if let Some(table) = &self.model.ptable {
			if let Some(&p) = table.get(bigram) {
				return Ok(p);
			}
		}

		let unigram_count = match self.model.unigrams.get(&bigram.0) {
			Some(c) if c > 0 => c,
			_ => return Err(ModelError::KeyNotFound(bigram.0.clone())),
		};
		let unseen = self.count_star(0)?;
		Ok(unseen / unigram_count as f64)
	}

	/// Draws a chained random bigram from the discounted distribution.
	///
	/// # Errors
	/// Same contract as [`BigramModel::random`].
	pub fn random<R: Rng + ?Sized>(
		&mut self,
		rng: &mut R,
		prev: &Bigram,
	) -> Result<Bigram, ModelError> {
		self.probability();
		self.model.random(rng, prev)
	}

	/// Generates a sentence from the discounted distribution.
	///
	/// # Errors
	/// Same contract as [`BigramModel::sentence`].
	pub fn sentence<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String, ModelError> {
		self.probability();
		self.model.sentence(rng)
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::super::{END_MARKER, START_MARKER};
	use super::*;

	fn unigram_counts(pairs: &[(&str, i64)]) -> FrequencyTable<Token> {
		let mut table = FrequencyTable::new();
		for (token, count) in pairs {
			table.set(token.to_string(), *count).unwrap();
		}
		table
	}

	fn bigram_counts(pairs: &[(&str, &str, i64)]) -> FrequencyTable<Bigram> {
		let mut table = FrequencyTable::new();
		for (first, second, count) in pairs {
			table.set((first.to_string(), second.to_string()), *count).unwrap();
		}
		table
	}

	/// Ten bigram types, five of them singletons.
	fn half_singleton_bigrams() -> FrequencyTable<Bigram> {
		let mut pairs = Vec::new();
		for i in 0..5 {
			pairs.push((format!("s{}", i), "x".to_string()));
		}
		for i in 0..5 {
			pairs.push((format!("d{}", i), "x".to_string()));
		}

		let mut table = FrequencyTable::new();
		for (i, pair) in pairs.into_iter().enumerate() {
			let count = if i < 5 { 1 } else { 2 };
			table.set(pair, count).unwrap();
		}
		table
	}

	#[test]
	fn zero_counts_discount_to_singletons_over_types() {
		// N(1) = 5, ten types in total
		let mut discounter =
			GoodTuringDiscounter::new(FrequencyTable::new(), half_singleton_bigrams());
		assert_eq!(discounter.total_types(), 10);
		assert_eq!(discounter.count_n(1), 5);
		assert_eq!(discounter.count_star(0), Ok(0.5));
	}

	#[test]
	fn seen_counts_discount_by_the_frequency_ratio() {
		// N(1) = 5, N(2) = 3: c*(1) = 2 * 3 / 5
		let mut table = FrequencyTable::new();
		for i in 0..5 {
			table.set((format!("s{}", i), "x".to_string()), 1).unwrap();
		}
		for i in 0..3 {
			table.set((format!("d{}", i), "x".to_string()), 2).unwrap();
		}

		let mut discounter = GoodTuringDiscounter::new(FrequencyTable::new(), table);
		assert_eq!(discounter.count_star(1), Ok(1.2));
	}

	#[test]
	fn undefined_denominators_are_reported() {
		let mut discounter = GoodTuringDiscounter::new(
			FrequencyTable::new(),
			bigram_counts(&[("a", "b", 1)]),
		);
		// no bigram was observed 7 times
		assert_eq!(discounter.count_star(7), Err(ModelError::EmptyTable));
	}

	#[test]
	fn an_empty_table_has_no_unseen_discount() {
		let mut discounter =
			GoodTuringDiscounter::new(FrequencyTable::new(), FrequencyTable::new());
		assert_eq!(discounter.count_star(0), Err(ModelError::EmptyTable));
	}

	#[test]
	fn ncounts_are_cached_per_queried_value() {
		let mut discounter = GoodTuringDiscounter::new(
			FrequencyTable::new(),
			bigram_counts(&[("a", "b", 1), ("b", "c", 1), ("c", "d", 2)]),
		);
		assert_eq!(discounter.count_n(1), 2);
		assert_eq!(discounter.count_n(1), 2);
		assert_eq!(discounter.ncounts.get(&1), Some(&2));
	}

	#[test]
	fn probability_replaces_raw_counts_with_discounted_ones() {
		// N(1) = 1, N(2) = 1: c*(1) = 2 * 1 / 1 = 2
		let mut discounter = GoodTuringDiscounter::new(
			unigram_counts(&[("a", 4), ("b", 2)]),
			bigram_counts(&[("a", "b", 1), ("b", "a", 2)]),
		);
		let ptable = discounter.probability();
		assert_eq!(ptable[&("a".to_string(), "b".to_string())], 2.0 / 4.0);
	}

	#[test]
	fn missing_predecessors_are_skipped_and_tallied() {
		let mut discounter = GoodTuringDiscounter::new(
			unigram_counts(&[("a", 4)]),
			bigram_counts(&[("a", "b", 1), ("ghost", "b", 1)]),
		);
		assert_eq!(discounter.probability().len(), 1);
		assert_eq!(discounter.skipped(), 1);
	}

	#[test]
	fn unseen_bigrams_are_estimated_on_demand() {
		// one type, one singleton: c*(0) = 1 / 1 = 1
		let mut discounter = GoodTuringDiscounter::new(
			unigram_counts(&[("a", 1), ("b", 2)]),
			bigram_counts(&[("a", "b", 1)]),
		);
		let unseen = ("b".to_string(), "a".to_string());
		assert_eq!(discounter.probability_of(&unseen), Ok(0.5));
	}

	#[test]
	fn unknown_predecessors_cannot_be_estimated() {
		let mut discounter = GoodTuringDiscounter::new(
			unigram_counts(&[("a", 1)]),
			bigram_counts(&[("a", "b", 1)]),
		);
		let pair = ("nowhere".to_string(), "a".to_string());
		assert_eq!(
			discounter.probability_of(&pair),
			Err(ModelError::KeyNotFound("nowhere".to_string()))
		);
	}

	#[test]
	fn sentences_draw_from_the_discounted_distribution() {
		let unigrams = unigram_counts(&[
			(START_MARKER, 2),
			("rain", 2),
			("falls", 2),
			(END_MARKER, 2),
		]);
		let bigrams = bigram_counts(&[
			(START_MARKER, "rain", 2),
			("rain", "falls", 2),
			("falls", END_MARKER, 2),
			("rain", END_MARKER, 1),
		]);
		let mut discounter = GoodTuringDiscounter::new(unigrams, bigrams);
		let mut rng = StdRng::seed_from_u64(17);

		for _ in 0..5 {
			let sentence = discounter.sentence(&mut rng).unwrap();
			assert!(sentence.starts_with(START_MARKER));
			assert!(sentence.ends_with(END_MARKER));
		}
	}
}
