use log::debug;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

use super::counter::{Bigram, Token};
use super::frequency::FrequencyTable;
use super::{BAND_WIDTH, END_MARKER, MAX_DRAWS, ProbabilityTable, START_MARKER};

/// Conditional probability model over token pairs with a
/// chain-constrained band-sampling generator.
///
/// # Responsibilities
/// - Derive `p(w2 | w1) = count(w1, w2) / count(w1)` for every observed
///   bigram
/// - Sample bigrams whose first token chains onto the previous draw
/// - Assemble marker-delimited sentences from chained bigrams
///
/// # Invariants
/// - The model owns its counts and exposes no mutation, so the cached
///   probability table can never go stale
/// - Bigrams whose predecessor has no unigram count are skipped during
///   table computation, never aborting it; the skip total stays
///   observable through `skipped()`
/// - Sampling retries keep the chaining constraint and are bounded
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct BigramModel {
	pub(crate) unigrams: FrequencyTable<Token>,
	pub(crate) bigrams: FrequencyTable<Bigram>,
	pub(crate) ptable: Option<ProbabilityTable<Bigram>>,
	pub(crate) skipped: usize,
}

impl BigramModel {
	/// Creates a model over matching unigram and bigram counts drawn from
	/// the same corpus.
	pub fn new(unigrams: FrequencyTable<Token>, bigrams: FrequencyTable<Bigram>) -> Self {
		Self { unigrams, bigrams, ptable: None, skipped: 0 }
	}

	/// Conditional probability of each bigram: `count(w1, w2) / count(w1)`.
	///
	/// Computed once and cached for the lifetime of the model. Keys whose
	/// predecessor has no positive unigram count are skipped and tallied
	/// rather than failing the whole table.
	pub fn probability(&mut self) -> &ProbabilityTable<Bigram> {
		if self.ptable.is_none() {
			let mut table = ProbabilityTable::new();
			let mut skipped = 0;

			for (bigram, count) in self.bigrams.iter() {
				match self.unigrams.get(&bigram.0) {
					Some(unigram_count) if unigram_count > 0 => {
						table.insert(bigram.clone(), count as f64 / unigram_count as f64);
					}
					_ => skipped += 1,
				}
			}

			if skipped > 0 {
				debug!("skipped {} bigrams with no predecessor count", skipped);
			}
			self.skipped = skipped;
			self.ptable = Some(table);
		}
		self.ptable.get_or_insert_with(ProbabilityTable::new)
	}

	/// Number of bigram keys skipped while computing the probability
	/// table. Zero before the first `probability()` call.
	pub fn skipped(&self) -> usize {
		self.skipped
	}

	/// Draws a random bigram chaining onto `prev` by band sampling.
	///
	/// Candidates are restricted to bigrams whose first token equals
	/// `prev`'s second token; within that set the same multiplicative
	/// band as the unigram model applies. Every retry keeps the chaining
	/// constraint.
	///
	/// # Errors
	/// Returns `ModelError::RetryExhausted` once the draw budget is
	/// spent without a candidate.
	pub fn random<R: Rng + ?Sized>(
		&mut self,
		rng: &mut R,
		prev: &Bigram,
	) -> Result<Bigram, ModelError> {
		let ptable = self.probability();

		for _ in 0..MAX_DRAWS {
			let draw: f64 = rng.random();
			let candidates: Vec<&Bigram> = ptable
				.iter()
				.filter(|&(bigram, &p)| {
					bigram.0 == prev.1 && draw < p * BAND_WIDTH && draw > p / BAND_WIDTH
				})
				.map(|(bigram, _)| bigram)
				.collect();
			if let Some(&bigram) = candidates.choose(rng) {
				return Ok(bigram.clone());
			}
		}

		Err(ModelError::RetryExhausted(MAX_DRAWS))
	}

	/// Generates a sentence as a chain of bigrams.
	///
	/// The chain is seeded uniformly at random among bigrams starting
	/// with the start marker and extended by chained sampling until a
	/// bigram ending in the end marker appears. Intermediate bigrams
	/// starting with the start marker are skipped when appending, so the
	/// rendered sentence holds exactly one marker at each end.
	///
	/// # Errors
	/// - `ModelError::KeyNotFound` if no bigram starts with the start
	///   marker
	/// - `ModelError::RetryExhausted` if sampling runs out of budget, or
	///   if skipped bigrams stall the chain indefinitely
	pub fn sentence<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String, ModelError> {
		self.probability();

		let starts: Vec<&Bigram> =
			self.bigrams.keys().filter(|bigram| bigram.0 == START_MARKER).collect();
		let seed = match starts.choose(rng) {
			Some(&bigram) => bigram.clone(),
			None => return Err(ModelError::KeyNotFound(START_MARKER.to_owned())),
		};

		let mut chain: Vec<Bigram> = vec![seed];
		let mut stalls = 0;
		loop {
			let prev = chain[chain.len() - 1].clone();
			if prev.1 == END_MARKER {
				break;
			}

			let bigram = self.random(rng, &prev)?;
			if bigram.0 == START_MARKER {
				stalls += 1;
				if stalls > MAX_DRAWS {
					return Err(ModelError::RetryExhausted(MAX_DRAWS));
				}
				continue;
			}
			chain.push(bigram);
		}

		let words: Vec<&str> = chain.iter().map(|bigram| bigram.1.as_str()).collect();
		Ok(format!("{}{}", START_MARKER, words.join(" ")))
	}
}
