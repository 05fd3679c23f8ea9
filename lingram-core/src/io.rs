use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use regex::Regex;

/// Reads a text file and returns its full contents as a `String`.
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<String> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents)
}

/// Expands a path string into a `PathBuf`.
///
/// - A leading `~` is replaced with `$HOME`
/// - `$VAR` and `${VAR}` segments are replaced with their environment
///   values; unknown variables are left as written
pub(crate) fn expand_path(input: &str) -> PathBuf {
	let mut expanded = String::with_capacity(input.len());
	let mut chars = input.chars().peekable();

	while let Some(c) = chars.next() {
		if c != '$' {
			expanded.push(c);
			continue;
		}

		let braced = chars.peek() == Some(&'{');
		if braced {
			chars.next();
		}

		let mut name = String::new();
		while let Some(&next) = chars.peek() {
			if next.is_ascii_alphanumeric() || next == '_' {
				name.push(next);
				chars.next();
			} else {
				break;
			}
		}
		if braced && chars.peek() == Some(&'}') {
			chars.next();
		}

		match env::var(&name) {
			Ok(value) => expanded.push_str(&value),
			Err(_) => {
				expanded.push('$');
				expanded.push_str(&name);
			}
		}
	}

	if expanded == "~" || expanded.starts_with("~/") {
		if let Ok(home) = env::var("HOME") {
			expanded = expanded.replacen('~', &home, 1);
		}
	}

	PathBuf::from(expanded)
}

/// Lists the files directly contained in a directory whose names match
/// the given mask.
///
/// Hidden files (leading `.` or `~`) and subdirectories are skipped.
/// Results are sorted by name so iteration order is deterministic.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, mask: &Regex) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();
		if !path.is_file() {
			continue;
		}

		let name = entry.file_name().to_string_lossy().to_string();
		if name.starts_with('.') || name.starts_with('~') {
			continue;
		}
		if mask.is_match(&name) {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}
