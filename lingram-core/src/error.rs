use std::error::Error;
use std::fmt;

/// Errors produced by the model layer.
///
/// Structural failures (invalid counts, divisions over empty tables,
/// exhausted sampling budgets) are surfaced to the caller. Per-key lookup
/// gaps hit during batch probability computation are absorbed locally and
/// reported in aggregate through the owning model's `skipped()` counter;
/// only single-key queries surface them as `KeyNotFound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
	/// A negative value was assigned into a frequency table.
	InvalidValue(i64),
	/// A mean or a discount ratio was requested with a zero denominator.
	EmptyTable,
	/// Band sampling exceeded its draw budget without finding a candidate.
	RetryExhausted(usize),
	/// A single-key query referenced a token with no recorded count.
	KeyNotFound(String),
}

impl fmt::Display for ModelError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ModelError::InvalidValue(value) => {
				write!(f, "frequencies must be non-negative, got {}", value)
			}
			ModelError::EmptyTable => write!(f, "division over an empty frequency table"),
			ModelError::RetryExhausted(draws) => {
				write!(f, "no sampling candidate found after {} draws", draws)
			}
			ModelError::KeyNotFound(key) => write!(f, "no frequency recorded for '{}'", key),
		}
	}
}

impl Error for ModelError {}
