use indexmap::IndexMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Name of the section that collects assignments appearing before any header.
pub const GLOBAL_SECTION: &str = "__GLOBAL__";

/// Name of the section consulted as document-level fallback.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Reserved key naming a section to consult before the document defaults.
pub const PARENT_KEY: &str = "__parent__";

/// Normalizes key names before storage and lookup.
pub type KeyTransform = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Converts a resolved value. `None` is the "no value" sentinel for a missing key.
pub type ValueTransform = Arc<dyn Fn(Option<String>) -> Option<String> + Send + Sync>;

/// Builds the initial entries of a section created on demand.
pub type SectionConstructor = Arc<dyn Fn(&str) -> IndexMap<String, String> + Send + Sync>;

/// What happens when a key is not found anywhere in the fallback chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingKeyPolicy {
	/// Resolve to the "no value" sentinel (`Ok(None)`).
	#[default]
	Sentinel,

	/// Fail with `ConfigDictError::MissingKey`.
	Error,
}

/// How the entries of a section materialized by get-or-create are produced.
#[derive(Clone)]
pub enum SectionFactory {
	/// Every new section starts with a copy of these entries.
	Constant(IndexMap<String, String>),

	/// Entries are computed from the new section's name.
	Computed(SectionConstructor),
}

impl SectionFactory {
	/// Produce the initial entries for a section called `name`.
	pub fn materialize(&self, name: &str) -> IndexMap<String, String> {
		match self {
			SectionFactory::Constant(entries) => entries.clone(),
			SectionFactory::Computed(constructor) => constructor(name),
		}
	}
}

impl Default for SectionFactory {
	fn default() -> Self {
		SectionFactory::Constant(IndexMap::new())
	}
}

impl fmt::Debug for SectionFactory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SectionFactory::Constant(entries) => f.debug_tuple("Constant").field(entries).finish(),
			SectionFactory::Computed(_) => f.write_str("Computed(..)"),
		}
	}
}

/// A named group of stored key/value pairs.
///
/// Keys are already normalized and values are raw (not interpolated). A section never
/// refers back to its document; resolution takes the document explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
	name: String,
	entries: IndexMap<String, String>,
}

impl Section {
	pub(crate) fn new(name: impl Into<String>) -> Self {
		Section {
			name: name.into(),
			entries: IndexMap::new(),
		}
	}

	pub(crate) fn with_entries(name: impl Into<String>, entries: IndexMap<String, String>) -> Self {
		Section {
			name: name.into(),
			entries,
		}
	}

	/// The section name, exactly as written in its header.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Raw stored value for an already-normalized key.
	pub fn raw(&self, key: &str) -> Option<&str> {
		self.entries.get(key).map(String::as_str)
	}

	/// Stored entries in insertion order.
	pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
		self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub(crate) fn stored(&self) -> &IndexMap<String, String> {
		&self.entries
	}

	pub(crate) fn insert(&mut self, key: String, value: String) {
		self.entries.insert(key, value);
	}

	pub(crate) fn remove(&mut self, key: &str) -> Option<String> {
		self.entries.shift_remove(key)
	}
}

/// Construction parameters for a [`Document`](crate::document::Document).
#[derive(Clone)]
pub struct Options {
	/// Caller-supplied fallback values, consulted after the `DEFAULT` section.
	pub defaults: HashMap<String, String>,

	/// Key normalization; lowercases by default.
	pub key_transform: KeyTransform,

	/// Per-key value conversion, looked up by normalized key.
	pub value_transforms: HashMap<String, ValueTransform>,

	/// Missing-key policy.
	pub missing_key: MissingKeyPolicy,

	/// Factory for sections created through get-or-create.
	pub section_factory: SectionFactory,
}

impl Default for Options {
	fn default() -> Self {
		Options {
			defaults: HashMap::new(),
			key_transform: Arc::new(|key: &str| key.to_lowercase()),
			value_transforms: HashMap::new(),
			missing_key: MissingKeyPolicy::default(),
			section_factory: SectionFactory::default(),
		}
	}
}

impl fmt::Debug for Options {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut transformed: Vec<_> = self.value_transforms.keys().collect();
		transformed.sort();
		f.debug_struct("Options")
			.field("defaults", &self.defaults)
			.field("value_transforms", &transformed)
			.field("missing_key", &self.missing_key)
			.field("section_factory", &self.section_factory)
			.finish_non_exhaustive()
	}
}

impl Options {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replace all caller defaults.
	pub fn defaults<I, K, V>(mut self, defaults: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		self.defaults = defaults
			.into_iter()
			.map(|(k, v)| (k.into(), v.into()))
			.collect();
		self
	}

	/// Add a single caller default.
	pub fn default_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.defaults.insert(key.into(), value.into());
		self
	}

	pub fn key_transform<F>(mut self, transform: F) -> Self
	where
		F: Fn(&str) -> String + Send + Sync + 'static,
	{
		self.key_transform = Arc::new(transform);
		self
	}

	/// Convert present values of `key`. The sentinel passes through untouched.
	pub fn value_transform<F>(self, key: impl Into<String>, transform: F) -> Self
	where
		F: Fn(&str) -> String + Send + Sync + 'static,
	{
		self.value_transform_with(key, move |value: Option<String>| {
			value.map(|v| transform(&v))
		})
	}

	/// Convert values of `key`, including the "no value" sentinel.
	pub fn value_transform_with<F>(mut self, key: impl Into<String>, transform: F) -> Self
	where
		F: Fn(Option<String>) -> Option<String> + Send + Sync + 'static,
	{
		self.value_transforms.insert(key.into(), Arc::new(transform));
		self
	}

	/// `true` raises `MissingKey` for missing keys; `false` yields the sentinel.
	pub fn keyerror(mut self, enabled: bool) -> Self {
		self.missing_key = if enabled {
			MissingKeyPolicy::Error
		} else {
			MissingKeyPolicy::Sentinel
		};
		self
	}

	pub fn section_factory(mut self, factory: SectionFactory) -> Self {
		self.section_factory = factory;
		self
	}
}
