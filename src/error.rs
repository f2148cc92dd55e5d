use std::path::PathBuf;

/// Library-level structured errors for configdict.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum ConfigDictError {
	#[error("cannot parse line {line_number}: {line}")]
	Syntax { line_number: usize, line: String },

	#[error("missing key '{key}' in section [{section}]")]
	MissingKey { section: String, key: String },

	#[error("cyclic reference while resolving '{key}': {chain}")]
	CyclicReference { key: String, chain: String },

	#[error("invalid interpolation in [{section}] '{key}': {reason}")]
	InvalidInterpolation {
		section: String,
		key: String,
		reason: String,
	},

	#[error("invalid value for [{section}] '{key}': {value:?} ({reason})")]
	InvalidValue {
		section: String,
		key: String,
		value: String,
		reason: String,
	},

	#[error("Failed to read config file: {path}")]
	ReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read config source")]
	SourceRead {
		#[source]
		source: std::io::Error,
	},
}

/// Result type alias using ConfigDictError.
pub type Result<T> = std::result::Result<T, ConfigDictError>;
