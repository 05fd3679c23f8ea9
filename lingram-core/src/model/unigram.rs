use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

use super::counter::Token;
use super::frequency::FrequencyTable;
use super::{BAND_WIDTH, END_MARKER, MAX_DRAWS, ProbabilityTable, START_MARKER};

/// Probability model over single tokens with a band-sampling generator.
///
/// # Responsibilities
/// - Derive `p(w) = count(w) / total` over every observed unigram,
///   boundary markers included
/// - Draw random tokens by band sampling over the probability table
/// - Assemble marker-delimited sentences from sampled tokens
///
/// # Invariants
/// - The model owns its counts and exposes no mutation, so the cached
///   probability table can never go stale
/// - Sampling retries are bounded; a degenerate distribution fails with
///   `RetryExhausted` instead of looping forever
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct UnigramModel {
	counts: FrequencyTable<Token>,
	total: Option<u64>,
	ptable: Option<ProbabilityTable<Token>>,
}

impl UnigramModel {
	/// Creates a model over unigram counts, markers included.
	pub fn new(counts: FrequencyTable<Token>) -> Self {
		Self { counts, total: None, ptable: None }
	}

	/// Total token count over the whole corpus. Cached on first access.
	pub fn total(&mut self) -> u64 {
		if let Some(total) = self.total {
			return total;
		}
		let total = self.counts.total();
		self.total = Some(total);
		total
	}

	/// Probability of each unigram: `count(w) / total`.
	///
	/// Computed once and cached for the lifetime of the model.
	pub fn probability(&mut self) -> &ProbabilityTable<Token> {
		if self.ptable.is_none() {
			let total = self.total() as f64;
			let table = self
				.counts
				.iter()
				.map(|(token, count)| (token.clone(), count as f64 / total))
				.collect();
			self.ptable = Some(table);
		}
		self.ptable.get_or_insert_with(ProbabilityTable::new)
	}

	/// Draws a random unigram by band sampling.
	///
	/// A uniform draw `r` in `[0, 1)` selects the candidate set of tokens
	/// whose probability `p` satisfies `p / 1000 < r < p * 1000`; one
	/// candidate is then chosen uniformly at random. An empty candidate
	/// set triggers a fresh draw.
	///
	/// # Errors
	/// Returns `ModelError::RetryExhausted` once the draw budget is
	/// spent without a candidate.
	pub fn random<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Token, ModelError> {
		self.random_excluding(rng, None)
	}

	/// Band sampling with one key optionally barred from candidacy.
	///
	/// Sentence assembly uses this to keep the start marker out of
	/// sentence interiors without mutating the counts.
	fn random_excluding<R: Rng + ?Sized>(
		&mut self,
		rng: &mut R,
		exclude: Option<&str>,
	) -> Result<Token, ModelError> {
		let ptable = self.probability();

		for _ in 0..MAX_DRAWS {
			let draw: f64 = rng.random();
			let candidates: Vec<&Token> = ptable
				.iter()
				.filter(|&(token, &p)| {
					Some(token.as_str()) != exclude
						&& draw < p * BAND_WIDTH
						&& draw > p / BAND_WIDTH
				})
				.map(|(token, _)| token)
				.collect();
			if let Some(&token) = candidates.choose(rng) {
				return Ok(token.clone());
			}
		}

		Err(ModelError::RetryExhausted(MAX_DRAWS))
	}

	/// Generates a sentence by sampling words until the end marker is
	/// drawn after at least one interior word.
	///
	/// The start marker is excluded from candidacy for the whole
	/// sentence; the terminating end marker is dropped from the interior
	/// before rendering, so the result carries exactly one marker at each
	/// end: `<s>interior words</s>`.
	///
	/// # Errors
	/// - `ModelError::KeyNotFound` if the counts hold no end marker with
	///   a positive count, in which case no sentence could ever terminate
	/// - `ModelError::RetryExhausted` if a draw runs out of budget, or if
	///   end markers drawn before any interior word stall the sentence
	///   indefinitely (a marker-only corpus)
	pub fn sentence<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String, ModelError> {
		match self.counts.get(END_MARKER) {
			Some(count) if count > 0 => (),
			_ => return Err(ModelError::KeyNotFound(END_MARKER.to_owned())),
		}

		let mut interior: Vec<Token> = Vec::new();
		let mut stalls = 0;
		loop {
			let word = self.random_excluding(rng, Some(START_MARKER))?;
			if word == END_MARKER {
				if interior.is_empty() {
					stalls += 1;
					if stalls > MAX_DRAWS {
						return Err(ModelError::RetryExhausted(MAX_DRAWS));
					}
					continue;
				}
				break;
			}
			interior.push(word);
		}

		Ok(format!("{}{}{}", START_MARKER, interior.join(" "), END_MARKER))
	}
}
