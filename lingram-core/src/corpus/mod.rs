//! Corpus collaborators: directory navigation, tokenizing readers and
//! stopword lists.
//!
//! Everything here exists to produce the sentence-delimited token stream
//! the model layer consumes: per corpus sentence a `<s>` marker, the
//! lowercased word tokens, then a `</s>` marker. All file-system access
//! lives on this side of the boundary; files are opened inside the
//! reading functions and released on every exit path.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use regex::Regex;

use crate::io::{expand_path, list_files, read_file};
use crate::model::counter::Token;
use crate::model::{END_MARKER, START_MARKER};

/// A validated corpus directory.
///
/// Construction expands a leading `~` and any environment variables in
/// the path, then requires the result to name an existing directory;
/// anything else is rejected before a `CorpusDir` can exist.
#[derive(Clone, Debug)]
pub struct CorpusDir {
	root: PathBuf,
}

impl CorpusDir {
	/// Validates and expands a directory path.
	///
	/// # Errors
	/// Returns `InvalidInput` if the expanded path is not an existing
	/// directory.
	pub fn new(path: &str) -> io::Result<Self> {
		let root = expand_path(path);
		if !root.is_dir() {
			return Err(io::Error::new(
				io::ErrorKind::InvalidInput,
				format!("{} is not an existing directory", root.display()),
			));
		}
		Ok(Self { root })
	}

	/// The validated, expanded directory path.
	pub fn path(&self) -> &Path {
		&self.root
	}
}

/// How the documents of a corpus are split into sentences and words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextFormat {
	/// One sentence per non-blank line, tokens carrying `word/TAG`
	/// part-of-speech suffixes that are stripped to the bare word.
	TaggedLines,
	/// Free-flowing prose: sentences end at terminal punctuation, words
	/// are `\w+` runs. Good enough for this application.
	Plain,
}

/// Navigator over the documents of a corpus directory.
///
/// # Responsibilities
/// - Enumerate the files directly contained in the directory, restricted
///   by a file-name mask, hidden files ignored
/// - Tokenize every document according to its `TextFormat`
/// - Emit the sentence-delimited token stream the counters consume
pub struct Corpus {
	dir: CorpusDir,
	mask: Regex,
	format: TextFormat,
	segmenter: Regex,
	tokenizer: Regex,
}

impl Corpus {
	/// Creates a navigator over `dir` for files matching `mask`.
	///
	/// # Errors
	/// Returns an error if `mask` is not a valid file-name pattern.
	pub fn new(dir: CorpusDir, mask: &str, format: TextFormat) -> Result<Self, regex::Error> {
		Ok(Self {
			dir,
			mask: Regex::new(mask)?,
			format,
			segmenter: Regex::new(r"[^.!?]+[.!?]?")?,
			tokenizer: Regex::new(r"\b\w+\b")?,
		})
	}

	/// Lists the corpus documents, sorted by name.
	pub fn list(&self) -> io::Result<Vec<PathBuf>> {
		list_files(self.dir.path(), &self.mask)
	}

	/// Reads every document and returns the full token stream.
	///
	/// Each corpus sentence contributes `<s>`, its lowercased word
	/// tokens, then `</s>`, in order.
	pub fn tokens(&self) -> io::Result<Vec<Token>> {
		let files = self.list()?;
		debug!("reading {} documents from {}", files.len(), self.dir.path().display());

		let mut tokens = Vec::new();
		for path in &files {
			self.tokenize_into(path, &mut tokens)?;
		}
		Ok(tokens)
	}

	fn tokenize_into(&self, path: &Path, tokens: &mut Vec<Token>) -> io::Result<()> {
		let text = read_file(path)?;
		match self.format {
			TextFormat::TaggedLines => {
				for line in text.lines() {
					let line = line.trim();
					if line.is_empty() {
						continue;
					}
					tokens.push(START_MARKER.to_owned());
					for tagged in line.split_whitespace() {
						if let Some(word) = tagged.split('/').next() {
							if !word.is_empty() {
								tokens.push(word.to_lowercase());
							}
						}
					}
					tokens.push(END_MARKER.to_owned());
				}
			}
			TextFormat::Plain => {
				let flat = text.replace(['\r', '\n'], " ");
				for sentence in self.segmenter.find_iter(&flat) {
					let mut words = self.tokenizer.find_iter(sentence.as_str()).peekable();
					if words.peek().is_none() {
						continue;
					}
					tokens.push(START_MARKER.to_owned());
					for word in words {
						tokens.push(word.as_str().to_lowercase());
					}
					tokens.push(END_MARKER.to_owned());
				}
			}
		}
		Ok(())
	}
}

/// Newline-delimited stopword list.
///
/// Unused by the model layer itself; collaborators apply it when
/// tokenization-time filtering is wanted.
#[derive(Clone, Debug, Default)]
pub struct Stopwords {
	words: HashSet<String>,
}

impl Stopwords {
	/// Loads the list from a plain text file, one word per line.
	pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
		let text = read_file(path)?;
		let words = text
			.lines()
			.map(str::trim)
			.filter(|line| !line.is_empty())
			.map(str::to_lowercase)
			.collect();
		Ok(Self { words })
	}

	/// Whether `word` is on the list.
	pub fn contains(&self, word: &str) -> bool {
		self.words.contains(word)
	}

	/// Number of loaded stopwords.
	pub fn len(&self) -> usize {
		self.words.len()
	}

	/// Whether the list is empty.
	pub fn is_empty(&self) -> bool {
		self.words.is_empty()
	}

	/// Removes stopwords from a token stream, preserving the sentence
	/// markers.
	pub fn filter<I: IntoIterator<Item = Token>>(&self, tokens: I) -> impl Iterator<Item = Token> {
		tokens.into_iter().filter(|token| {
			token.as_str() == START_MARKER
				|| token.as_str() == END_MARKER
				|| !self.words.contains(token.as_str())
		})
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;

	/// Creates a scratch directory under the system temp dir, keyed by
	/// test name so tests stay independent.
	fn scratch_dir(name: &str) -> PathBuf {
		let dir = std::env::temp_dir().join(format!("lingram-{}-{}", name, std::process::id()));
		fs::create_dir_all(&dir).unwrap();
		dir
	}

	#[test]
	fn construction_rejects_missing_directories() {
		assert!(CorpusDir::new("/definitely/not/a/real/corpus").is_err());
	}

	#[test]
	fn construction_accepts_existing_directories() {
		let dir = scratch_dir("exists");
		assert!(CorpusDir::new(dir.to_str().unwrap()).is_ok());
		let _ = fs::remove_dir_all(&dir);
	}

	#[test]
	fn tagged_lines_strip_part_of_speech_tags() {
		let dir = scratch_dir("tagged");
		fs::write(dir.join("ca01"), "The/at Fulton/np County/nn\n\nsaid/vbd it/pps\n").unwrap();

		let corpus =
			Corpus::new(CorpusDir::new(dir.to_str().unwrap()).unwrap(), ".*", TextFormat::TaggedLines)
				.unwrap();
		let tokens = corpus.tokens().unwrap();
		assert_eq!(
			tokens,
			vec![
				"<s>", "the", "fulton", "county", "</s>",
				"<s>", "said", "it", "</s>",
			]
		);
		let _ = fs::remove_dir_all(&dir);
	}

	#[test]
	fn plain_text_splits_on_terminal_punctuation() {
		let dir = scratch_dir("plain");
		fs::write(dir.join("book.txt"), "It rained. Did it?\nYes!").unwrap();

		let corpus =
			Corpus::new(CorpusDir::new(dir.to_str().unwrap()).unwrap(), ".*", TextFormat::Plain)
				.unwrap();
		let tokens = corpus.tokens().unwrap();
		assert_eq!(
			tokens,
			vec![
				"<s>", "it", "rained", "</s>",
				"<s>", "did", "it", "</s>",
				"<s>", "yes", "</s>",
			]
		);
		let _ = fs::remove_dir_all(&dir);
	}

	#[test]
	fn hidden_and_unmasked_files_are_ignored() {
		let dir = scratch_dir("masked");
		fs::write(dir.join("ca01"), "one/nn\n").unwrap();
		fs::write(dir.join(".hidden"), "two/nn\n").unwrap();
		fs::write(dir.join("README"), "three/nn\n").unwrap();

		let corpus = Corpus::new(
			CorpusDir::new(dir.to_str().unwrap()).unwrap(),
			r"^c[a-z]\d+$",
			TextFormat::TaggedLines,
		)
		.unwrap();
		assert_eq!(corpus.list().unwrap().len(), 1);
		assert_eq!(corpus.tokens().unwrap(), vec!["<s>", "one", "</s>"]);
		let _ = fs::remove_dir_all(&dir);
	}

	#[test]
	fn stopword_filtering_preserves_markers() {
		let dir = scratch_dir("stopwords");
		fs::write(dir.join("stopwords.txt"), "the\na\n\nan\n").unwrap();

		let stopwords = Stopwords::load(dir.join("stopwords.txt")).unwrap();
		assert_eq!(stopwords.len(), 3);
		assert!(stopwords.contains("the"));

		let stream = ["<s>", "the", "rain", "</s>"].map(str::to_string);
		let filtered: Vec<Token> = stopwords.filter(stream).collect();
		assert_eq!(filtered, vec!["<s>", "rain", "</s>"]);
		let _ = fs::remove_dir_all(&dir);
	}
}
