//! Statistical n-gram language models built from a text corpus.
//!
//! This crate provides the counting/probability/sampling pipeline:
//! - Generic frequency tables with validated counts
//! - N-gram counting over sentence-delimited token streams
//! - Unigram and bigram probability models with stochastic sentence generators
//! - Good-Turing discounting for rare and unseen bigrams
//!
//! Corpus collaborators (directory navigation, tokenizing readers,
//! stopword lists) live in [`corpus`] and only produce the token stream
//! the model layer consumes; the models themselves never touch the
//! file system.

/// Core counting, probability and sampling types.
pub mod model;

/// Corpus collaborators: navigation, tokenizing readers, stopwords.
pub mod corpus;

/// Error taxonomy shared by the model layer.
pub mod error;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed outside the crate.
pub(crate) mod io;
