//! Top-level module for the n-gram model pipeline.
//!
//! Data flows leaf to root: a sentence-delimited token stream is drained
//! by an [`counter::NGramCounter`] into a [`frequency::FrequencyTable`],
//! a model derives a cached probability table from the counts, and the
//! sentence generators sample from that table.

use std::collections::HashMap;

/// Generic frequency counter with validated counts and derived aggregates.
pub mod frequency;

/// Sliding-window n-gram extraction and counting.
pub mod counter;

/// Probability table over single tokens with band-sampling generation.
pub mod unigram;

/// Conditional probability table over token pairs with chain-constrained
/// band-sampling generation.
pub mod bigram;

/// Good-Turing discounting over a bigram model.
pub mod discount;

/// Literal token opening every corpus and generated sentence.
pub const START_MARKER: &str = "<s>";

/// Literal token closing every corpus and generated sentence.
pub const END_MARKER: &str = "</s>";

/// Probability table derived once from a frequency table and cached for
/// the lifetime of the owning model.
pub type ProbabilityTable<K> = HashMap<K, f64>;

/// Multiplicative tolerance band used by stochastic selection: a key with
/// probability `p` is a candidate for a draw `r` when
/// `p / BAND_WIDTH < r < p * BAND_WIDTH`.
pub(crate) const BAND_WIDTH: f64 = 1000.0;

/// Maximum number of fresh draws band sampling may attempt before it
/// fails with `ModelError::RetryExhausted`.
pub(crate) const MAX_DRAWS: usize = 1000;
