use std::hash::Hash;

use super::frequency::FrequencyTable;

/// A single lowercase word token, as produced by a corpus collaborator.
pub type Token = String;

/// An ordered pair of consecutive tokens, `(predecessor, successor)`.
pub type Bigram = (Token, Token);

/// An ordered triple of consecutive tokens.
pub type Trigram = (Token, Token, Token);

/// A fixed-order n-gram key built from a window of consecutive tokens.
///
/// Order 1 is the bare token rather than a one-element tuple; the
/// distinction the original key space makes is carried by the type.
pub trait Gram: Eq + Hash + Clone {
	/// The window size of this n-gram.
	const ORDER: usize;

	/// Builds the key from a window of exactly `ORDER` consecutive tokens.
	fn from_window(window: &[Token]) -> Self;
}

impl Gram for Token {
	const ORDER: usize = 1;

	fn from_window(window: &[Token]) -> Self {
		window[0].clone()
	}
}

impl Gram for Bigram {
	const ORDER: usize = 2;

	fn from_window(window: &[Token]) -> Self {
		(window[0].clone(), window[1].clone())
	}
}

impl Gram for Trigram {
	const ORDER: usize = 3;

	fn from_window(window: &[Token]) -> Self {
		(window[0].clone(), window[1].clone(), window[2].clone())
	}
}

/// Drains a token stream into overlapping n-grams and accumulates them
/// into a frequency table.
///
/// # Responsibilities
/// - Slide a window of `G::ORDER` tokens over the stream, advancing one
///   token per emission (overlapping windows, not disjoint chunks)
/// - Count each emitted n-gram exactly once
/// - Memoize the resulting table so repeated calls never rescan the
///   source
///
/// # Invariants
/// - The token source is finite, lazy and non-restartable; it is consumed
///   at most once
/// - After the first `count()`, the table is served from the cache, so
///   double counting cannot occur
pub struct NGramCounter<G: Gram, I> {
	tokens: Option<I>,
	frequency: FrequencyTable<G>,
}

impl<G: Gram, I: Iterator<Item = Token>> NGramCounter<G, I> {
	/// Creates a counter over a sentence-delimited token stream.
	pub fn new(tokens: I) -> Self {
		Self { tokens: Some(tokens), frequency: FrequencyTable::new() }
	}

	/// Drains the token stream into the frequency table and returns it.
	///
	/// The source is taken on the first call; afterwards the cached table
	/// is returned without touching the corpus again.
	pub fn count(&mut self) -> &FrequencyTable<G> {
		if let Some(tokens) = self.tokens.take() {
			let mut window: Vec<Token> = Vec::with_capacity(G::ORDER);
			for token in tokens {
				window.push(token);
				if window.len() == G::ORDER {
					self.frequency.increment(G::from_window(&window));
					window.remove(0);
				}
			}
		}
		&self.frequency
	}

	/// Consumes the counter and yields the frequency table, counting
	/// first if it has not happened yet.
	pub fn into_frequency(mut self) -> FrequencyTable<G> {
		self.count();
		self.frequency
	}
}
