use crate::document::Document;
use crate::document::types::{GLOBAL_SECTION, Section};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

impl Section {
	/// Render as an INI block: `[name]` (omitted for `__GLOBAL__`) and one
	/// `key = value` line per stored entry. Values are written raw, not interpolated.
	///
	/// Returns an empty string for a section without entries.
	pub fn to_ini_string(&self) -> String {
		if self.is_empty() {
			return String::new();
		}

		let mut lines = Vec::with_capacity(self.len() + 1);
		if self.name() != GLOBAL_SECTION {
			lines.push(format!("[{}]", self.name()));
		}
		for (key, value) in self.entries() {
			lines.push(format!("{} = {}", key, value));
		}
		lines.join("\n")
	}
}

impl Document {
	/// Render the whole document as INI text, one block per non-empty section
	/// separated by blank lines.
	///
	/// Blocks follow section creation order, except that `__GLOBAL__` always comes
	/// first since it has no header to reopen it. The two orders only differ when
	/// `__GLOBAL__` was removed and then recreated after other sections.
	pub fn to_ini_string(&self) -> String {
		let global = self.raw_section(GLOBAL_SECTION).into_iter();
		let named = self.sections().filter(|s| s.name() != GLOBAL_SECTION);

		let mut text = String::new();
		for block in global
			.chain(named)
			.map(Section::to_ini_string)
			.filter(|block| !block.is_empty())
		{
			text.push_str(&block);
			text.push_str("\n\n");
		}
		// one newline after the last block
		text.pop();
		text
	}
}

impl fmt::Display for Document {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_ini_string())
	}
}

impl Serialize for Section {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.stored().serialize(serializer)
	}
}

/// Serializes as an ordered map of section name to stored entries.
impl Serialize for Document {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.len()))?;
		for section in self.sections() {
			map.serialize_entry(section.name(), section)?;
		}
		map.end()
	}
}
