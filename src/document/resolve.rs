use crate::document::Document;
use crate::document::interpolate::{Segment, parse_template};
use crate::document::types::{MissingKeyPolicy, PARENT_KEY};
use crate::error::{ConfigDictError, Result};
use tracing::trace;

/// Read-time value resolution for one document.
///
/// Resolution of `key` in `section` is:
/// 1. Normalize the key with the document's key transform
/// 2. Find the raw value: the section's own entries, then its `__parent__` chain,
///    then the `DEFAULT` section, then the caller defaults
/// 3. Apply the missing-key policy if nothing was found
/// 4. Interpolate `%(name)s` references against the requested section
/// 5. Apply the value transform registered for the normalized key
///
/// The resolver never mutates the document. It tracks the keys currently being
/// interpolated so that self-referential values fail instead of recursing forever.
pub struct Resolver<'a> {
	doc: &'a Document,
	active: Vec<(String, String)>,
}

impl<'a> Resolver<'a> {
	pub fn new(doc: &'a Document) -> Self {
		Resolver {
			doc,
			active: Vec::new(),
		}
	}

	/// Resolve `requested` in `section`. `Ok(None)` is the "no value" sentinel.
	///
	/// `section` does not have to exist; an absent section resolves like an empty one.
	pub fn resolve(&mut self, section: &str, requested: &str) -> Result<Option<String>> {
		let key = self.doc.normalize_key(requested);
		self.resolve_normalized(section, key)
	}

	/// Resolve a key that has already been through the key transform, such as a
	/// key taken from a section's stored entries.
	pub fn resolve_normalized(&mut self, section: &str, key: String) -> Result<Option<String>> {
		if self
			.active
			.iter()
			.any(|(s, k)| s.as_str() == section && *k == key)
		{
			let mut chain: Vec<String> = self
				.active
				.iter()
				.map(|(s, k)| format!("[{}] {}", s, k))
				.collect();
			chain.push(format!("[{}] {}", section, key));
			return Err(ConfigDictError::CyclicReference {
				key,
				chain: chain.join(" -> "),
			});
		}

		let value = match self.lookup(section, &key)? {
			Some(raw) => {
				self.active.push((section.to_string(), key.clone()));
				let interpolated = self.interpolate(section, &key, raw);
				self.active.pop();
				interpolated?
			}
			None => match self.doc.options().missing_key {
				MissingKeyPolicy::Error => {
					return Err(ConfigDictError::MissingKey {
						section: section.to_string(),
						key,
					});
				}
				MissingKeyPolicy::Sentinel => {
					trace!(section, key = %key, "key not found, using sentinel");
					None
				}
			},
		};

		Ok(self.doc.transform_value(&key, value))
	}

	/// Find the raw (uninterpolated) value of an already-normalized key.
	pub fn lookup(&self, section: &str, key: &str) -> Result<Option<&'a str>> {
		let parent_key = self.doc.normalize_key(PARENT_KEY);
		let mut visited: Vec<String> = Vec::new();
		let mut current = section.to_string();

		loop {
			let stored = self.doc.raw_section(&current);

			if let Some(raw) = stored.and_then(|s| s.raw(key)) {
				return Ok(Some(raw));
			}

			let Some(parent) = stored.and_then(|s| s.raw(&parent_key)) else {
				break;
			};

			visited.push(current);
			if visited.iter().any(|name| name == parent) {
				visited.push(parent.to_string());
				return Err(ConfigDictError::CyclicReference {
					key: key.to_string(),
					chain: visited
						.iter()
						.map(|name| format!("[{}]", name))
						.collect::<Vec<_>>()
						.join(" -> "),
				});
			}

			trace!(section, parent, key, "deferring to parent section");
			current = parent.to_string();
		}

		Ok(self.doc.fallback(key))
	}

	/// Substitute `%(name)s` references. A reference that resolves to the sentinel
	/// turns the whole value into the sentinel.
	fn interpolate(&mut self, section: &str, key: &str, raw: &str) -> Result<Option<String>> {
		let segments =
			parse_template(raw).map_err(|reason| ConfigDictError::InvalidInterpolation {
				section: section.to_string(),
				key: key.to_string(),
				reason,
			})?;

		let mut out = String::with_capacity(raw.len());
		for segment in segments {
			match segment {
				Segment::Literal(text) => out.push_str(text),
				Segment::Reference(name) => match self.resolve(section, name)? {
					Some(value) => out.push_str(&value),
					None => {
						trace!(section, key, reference = name, "reference has no value");
						return Ok(None);
					}
				},
			}
		}

		Ok(Some(out))
	}
}
