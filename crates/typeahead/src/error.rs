//! Error types for search, conversion, and option loading.
//!
//! None of these escape the controller's public operations: search and
//! conversion failures are contained and logged, and only option loading
//! reports errors to the caller.

use thiserror::Error;

/// Failure reported by a search source.
#[derive(Debug, Error)]
pub enum SearchError {
	/// The search observed its cancellation token and gave up.
	#[error("search cancelled")]
	Cancelled,

	/// The search backend failed.
	#[error("search failed: {0}")]
	Failed(#[from] anyhow::Error),

	/// The search task panicked.
	#[error("search task panicked: {0}")]
	Panicked(String),
}

impl SearchError {
	/// Builds a [`SearchError::Failed`] from a plain message.
	pub fn failed(message: impl std::fmt::Display) -> Self {
		Self::Failed(anyhow::anyhow!("{message}"))
	}

	/// Returns true for the expected, silent cancellation case.
	pub fn is_cancelled(&self) -> bool {
		matches!(self, Self::Cancelled)
	}
}

/// Failure converting displayed text back into a bound value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
	/// The text could not be parsed.
	#[error("cannot convert {text:?}: {reason}")]
	Parse {
		/// The rejected text.
		text: String,
		/// Parser message.
		reason: String,
	},

	/// The converter has no text-to-value direction.
	#[error("converter does not support parsing text")]
	Unsupported,
}

/// Failure loading [`crate::AutocompleteOptions`].
#[derive(Debug, Error)]
pub enum ConfigError {
	/// TOML syntax or schema error.
	#[error("invalid autocomplete options: {0}")]
	Toml(#[from] toml::de::Error),
}

/// Result type for option loading.
pub type Result<T> = std::result::Result<T, ConfigError>;
