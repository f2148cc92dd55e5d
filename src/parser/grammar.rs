use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

/// `key = value`: the key may contain inner spaces but no `=`, and must not
/// start or end with whitespace. The value is the rest of the line.
static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^\s*([^\s=](?:[^=]*[^\s=])?)\s*=\s*(.*)$").expect("assignment pattern is valid")
});

/// Classification of a single logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
	/// An empty logical line.
	Blank,

	/// `[name]` opens or reopens a section.
	Header(&'a str),

	/// `key = value` assigns into the current section.
	Assignment { key: &'a str, value: &'a str },
}

impl<'a> Line<'a> {
	/// Classify a logical line, returning `None` if it is neither a header nor an assignment.
	///
	/// A header name is everything between the leading `[` and the last character of the
	/// line. The last character is not checked to actually be `]`.
	pub fn classify(text: &'a str) -> Option<Self> {
		if text.is_empty() {
			return Some(Line::Blank);
		}

		if let Some(rest) = text.strip_prefix('[') {
			if !rest.ends_with(']') {
				warn!(line = text, "section header does not end with ']'");
			}
			let name = match rest.char_indices().last() {
				Some((idx, _)) => &rest[..idx],
				None => "",
			};
			return Some(Line::Header(name));
		}

		let captures = ASSIGNMENT.captures(text)?;
		let key = captures.get(1)?.as_str();
		let value = captures.get(2).map_or("", |m| m.as_str());
		Some(Line::Assignment { key, value })
	}
}
