//! The configuration document: sections, fallback configuration and resolution.
//!
//! This module handles:
//! - Parsing logical lines into sections
//! - Explicit get vs. get-or-create access to sections
//! - Lazy value resolution through parents, `DEFAULT` and caller defaults
//! - Serialization back to INI text

pub mod interpolate;
pub mod resolve;
pub mod serialize;
pub mod types;

pub use resolve::Resolver;
pub use types::{
	DEFAULT_SECTION, GLOBAL_SECTION, KeyTransform, MissingKeyPolicy, Options, PARENT_KEY, Section,
	SectionConstructor, SectionFactory, ValueTransform,
};

use crate::error::{ConfigDictError, Result};
use crate::parser::{Line, LineReader};
use indexmap::IndexMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace};

/// A parsed INI document.
///
/// Sections are kept in creation order. Section names are stored verbatim; keys
/// always pass through the key transform before storage or lookup.
#[derive(Debug, Clone, Default)]
pub struct Document {
	sections: IndexMap<String, Section>,
	options: Options,
}

impl Document {
	/// An empty document with default options.
	pub fn new() -> Self {
		Self::default()
	}

	/// An empty document with the given options.
	pub fn with_options(options: Options) -> Self {
		Document {
			sections: IndexMap::new(),
			options,
		}
	}

	/// Load and parse a file with default options.
	pub fn from_file(path: &Path) -> Result<Self> {
		Options::default().parse_file(path)
	}

	pub fn options(&self) -> &Options {
		&self.options
	}

	/// Clear all sections and parse `source` into a fresh set.
	///
	/// Parsing is not transactional: on a syntax error, sections built from the
	/// preceding lines are kept.
	pub fn parse<R: BufRead>(&mut self, source: R) -> Result<()> {
		self.sections.clear();
		let (mut current, _) = self
			.sections
			.insert_full(GLOBAL_SECTION.to_string(), Section::new(GLOBAL_SECTION));

		for line in LineReader::new(source) {
			let line = line?;
			match Line::classify(&line.text) {
				Some(Line::Blank) => {}
				Some(Line::Header(name)) => {
					trace!(line = line.number, section = name, "section header");
					current = match self.sections.get_index_of(name) {
						Some(index) => index,
						None => {
							self.sections
								.insert_full(name.to_string(), Section::new(name))
								.0
						}
					};
				}
				Some(Line::Assignment { key, value }) => {
					let key = self.normalize_key(key);
					self.sections[current].insert(key, value.to_string());
				}
				None => {
					return Err(ConfigDictError::Syntax {
						line_number: line.number,
						line: line.text.clone(),
					});
				}
			}
		}

		debug!(sections = self.sections.len(), "parsed config");
		Ok(())
	}

	/// Re-parse from a string.
	pub fn parse_str(&mut self, text: &str) -> Result<()> {
		self.parse(text.as_bytes())
	}

	/// Re-parse from a file. The file is closed before this returns, on success or error.
	pub fn parse_file(&mut self, path: &Path) -> Result<()> {
		debug!(path = %path.display(), "reading config file");
		let file = File::open(path).map_err(|source| ConfigDictError::ReadError {
			path: path.to_path_buf(),
			source,
		})?;

		self.parse(BufReader::new(file)).map_err(|err| match err {
			ConfigDictError::SourceRead { source } => ConfigDictError::ReadError {
				path: path.to_path_buf(),
				source,
			},
			other => other,
		})
	}

	/// Look up a section without creating it.
	pub fn section(&self, name: &str) -> Option<SectionView<'_>> {
		self.sections
			.get(name)
			.map(|section| SectionView { doc: self, section })
	}

	/// Look up a section, creating it through the section factory if absent.
	pub fn section_or_create(&mut self, name: &str) -> SectionView<'_> {
		let index = self.ensure_section(name);
		let doc: &Document = self;
		SectionView {
			doc,
			section: &doc.sections[index],
		}
	}

	/// Stored data of a section, without resolution.
	pub fn raw_section(&self, name: &str) -> Option<&Section> {
		self.sections.get(name)
	}

	pub fn contains_section(&self, name: &str) -> bool {
		self.sections.contains_key(name)
	}

	/// Sections in creation order.
	pub fn sections(&self) -> impl Iterator<Item = &Section> {
		self.sections.values()
	}

	pub fn section_names(&self) -> impl Iterator<Item = &str> {
		self.sections.keys().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.sections.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sections.is_empty()
	}

	/// Resolve `key` in `section`. `Ok(None)` is the "no value" sentinel.
	///
	/// An absent section resolves like an empty one and is not created.
	pub fn get(&self, section: &str, key: &str) -> Result<Option<String>> {
		Resolver::new(self).resolve(section, key)
	}

	/// Store a raw value, creating the section through the factory if needed.
	pub fn set(&mut self, section: &str, key: &str, value: impl Into<String>) {
		let key = self.normalize_key(key);
		let index = self.ensure_section(section);
		self.sections[index].insert(key, value.into());
	}

	/// Remove a stored value, returning it.
	pub fn remove(&mut self, section: &str, key: &str) -> Option<String> {
		let key = self.normalize_key(key);
		self.sections.get_mut(section)?.remove(&key)
	}

	/// Remove a whole section. The remaining sections keep their order.
	pub fn remove_section(&mut self, name: &str) -> Option<Section> {
		self.sections.shift_remove(name)
	}

	pub(crate) fn normalize_key(&self, key: &str) -> String {
		(self.options.key_transform)(key)
	}

	/// Document-level fallback: the `DEFAULT` section, then caller defaults.
	pub(crate) fn fallback(&self, key: &str) -> Option<&str> {
		if let Some(value) = self
			.sections
			.get(DEFAULT_SECTION)
			.and_then(|section| section.raw(key))
		{
			return Some(value);
		}
		self.options.defaults.get(key).map(String::as_str)
	}

	pub(crate) fn transform_value(&self, key: &str, value: Option<String>) -> Option<String> {
		match self.options.value_transforms.get(key) {
			Some(transform) => transform(value),
			None => value,
		}
	}

	fn ensure_section(&mut self, name: &str) -> usize {
		if let Some(index) = self.sections.get_index_of(name) {
			return index;
		}
		trace!(section = name, "creating section on demand");
		let entries = self.options.section_factory.materialize(name);
		self.sections
			.insert_full(name.to_string(), Section::with_entries(name, entries))
			.0
	}
}

impl FromStr for Document {
	type Err = ConfigDictError;

	fn from_str(text: &str) -> Result<Self> {
		Options::default().parse_str(text)
	}
}

impl Options {
	/// Build a document from these options and parse `source` into it.
	pub fn parse_reader<R: BufRead>(self, source: R) -> Result<Document> {
		let mut doc = Document::with_options(self);
		doc.parse(source)?;
		Ok(doc)
	}

	pub fn parse_str(self, text: &str) -> Result<Document> {
		self.parse_reader(text.as_bytes())
	}

	pub fn parse_file(self, path: &Path) -> Result<Document> {
		let mut doc = Document::with_options(self);
		doc.parse_file(path)?;
		Ok(doc)
	}
}

/// A section paired with the document it belongs to, for resolution.
#[derive(Debug, Clone, Copy)]
pub struct SectionView<'a> {
	doc: &'a Document,
	section: &'a Section,
}

impl<'a> SectionView<'a> {
	pub fn name(&self) -> &'a str {
		self.section.name()
	}

	/// The stored (unresolved) data.
	pub fn section(&self) -> &'a Section {
		self.section
	}

	/// Resolve a key. `Ok(None)` is the "no value" sentinel.
	pub fn get(&self, key: &str) -> Result<Option<String>> {
		Resolver::new(self.doc).resolve(self.section.name(), key)
	}

	/// Resolve a key and parse it with [`FromStr`]. The sentinel stays `None`.
	pub fn get_as<T>(&self, key: &str) -> Result<Option<T>>
	where
		T: FromStr,
		T::Err: std::fmt::Display,
	{
		let Some(value) = self.get(key)? else {
			return Ok(None);
		};
		value
			.parse()
			.map(Some)
			.map_err(|err: T::Err| ConfigDictError::InvalidValue {
				section: self.section.name().to_string(),
				key: self.doc.normalize_key(key),
				value,
				reason: err.to_string(),
			})
	}

	/// Whether the key is found anywhere in the fallback chain.
	pub fn contains_key(&self, key: &str) -> Result<bool> {
		let key = self.doc.normalize_key(key);
		Ok(Resolver::new(self.doc)
			.lookup(self.section.name(), &key)?
			.is_some())
	}

	/// Resolve every stored key. Keys that resolve to the sentinel are left out.
	pub fn resolved(&self) -> Result<IndexMap<String, String>> {
		let mut resolver = Resolver::new(self.doc);
		let mut resolved = IndexMap::new();
		for (key, _) in self.section.entries() {
			// stored keys are already normalized
			if let Some(value) = resolver.resolve_normalized(self.section.name(), key.to_string())? {
				resolved.insert(key.to_string(), value);
			}
		}
		Ok(resolved)
	}
}
