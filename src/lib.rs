//! configdict - parse INI-style configuration files into nested dictionaries.
//!
//! This library provides:
//! - A line reader handling `#` comments and backslash continuations
//! - Section and `key = value` parsing into a [`Document`]
//! - Lazy value resolution with `__parent__` sections, a `DEFAULT` section,
//!   caller defaults and `%(name)s` interpolation
//! - Serialization back to INI text
//!
//! # Example
//!
//! ```
//! use configdict::Document;
//!
//! let doc: Document = "[DEFAULT]\nin stock = yes\n\n[widgets]\nsize = large\ndescription = %(size)s widgets\n"
//!     .parse()
//!     .unwrap();
//!
//! let widgets = doc.section("widgets").unwrap();
//! assert_eq!(widgets.get("description").unwrap().as_deref(), Some("large widgets"));
//! assert_eq!(widgets.get("In Stock").unwrap().as_deref(), Some("yes"));
//! assert_eq!(widgets.get("color").unwrap(), None);
//! ```

pub mod document;
pub mod error;
pub mod parser;

pub use document::{Document, MissingKeyPolicy, Options, Section, SectionFactory, SectionView};
pub use error::{ConfigDictError, Result};
