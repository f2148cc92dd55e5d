use crate::error::{ConfigDictError, Result};
use std::io::{BufRead, Lines};
use tracing::warn;

/// One parse unit: comments removed, continuations joined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
	/// Physical line number (1-based) where this logical line started.
	pub number: usize,

	/// Trimmed text of the logical line.
	pub text: String,
}

/// Turns a readable text source into a lazy sequence of logical lines.
///
/// For each physical line:
/// 1. Leading and trailing whitespace is stripped
/// 2. Lines starting with `#` are dropped entirely, even in the middle of a continuation
/// 3. A trailing `\` removes the backslash and holds the line for joining
/// 4. Otherwise the held lines plus this one are emitted, joined by single spaces
///
/// A continuation still open at end of input is emitted as a last logical line
/// rather than discarded.
///
/// The reader is single-pass; once it returns `None` (or an error) it stays exhausted.
pub struct LineReader<R> {
	lines: Lines<R>,
	pending: Vec<String>,
	pending_start: usize,
	line_number: usize,
	finished: bool,
}

impl<R: BufRead> LineReader<R> {
	pub fn new(source: R) -> Self {
		LineReader {
			lines: source.lines(),
			pending: Vec::new(),
			pending_start: 0,
			line_number: 0,
			finished: false,
		}
	}

	fn flush(&mut self) -> LogicalLine {
		// a continuation followed by a blank line would leave a trailing space
		let text = self.pending.join(" ").trim_end().to_string();
		self.pending.clear();
		LogicalLine {
			number: self.pending_start,
			text,
		}
	}
}

impl<R: BufRead> Iterator for LineReader<R> {
	type Item = Result<LogicalLine>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.finished {
			return None;
		}

		loop {
			let raw = match self.lines.next() {
				Some(Ok(raw)) => raw,
				Some(Err(source)) => {
					self.finished = true;
					return Some(Err(ConfigDictError::SourceRead { source }));
				}
				None => {
					self.finished = true;
					if self.pending.is_empty() {
						return None;
					}
					warn!(
						line = self.pending_start,
						"continuation not terminated before end of input, keeping it as a final line instead of dropping it"
					);
					return Some(Ok(self.flush()));
				}
			};

			self.line_number += 1;
			let line = raw.trim();

			if is_comment(line) {
				continue;
			}

			if self.pending.is_empty() {
				self.pending_start = self.line_number;
			}

			if let Some(body) = line.strip_suffix('\\') {
				self.pending.push(body.trim().to_string());
			} else {
				self.pending.push(line.to_string());
				return Some(Ok(self.flush()));
			}
		}
	}
}

/// Check if an already-trimmed line is a comment.
fn is_comment(line: &str) -> bool {
	line.starts_with('#')
}
