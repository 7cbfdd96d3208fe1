//! Behavior options for an [`crate::Autocomplete`] control.
//!
//! Options deserialize from TOML with kebab-case keys. Every key is optional
//! and falls back to the documented default:
//!
//! ```toml
//! debounce-ms = 250
//! min-characters = 2
//! max-items = 0      # unlimited
//! strict = false
//! ```

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;

/// Default quiescence period before a typed query is searched.
pub const DEFAULT_DEBOUNCE_MS: i64 = 100;

/// Default cap on displayed candidates.
pub const DEFAULT_MAX_ITEMS: usize = 10;

/// Behavior options for one control instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AutocompleteOptions {
	/// Debounce interval in milliseconds. Zero or negative searches on every
	/// keystroke.
	pub debounce_ms: i64,
	/// Minimum text length before any search is dispatched.
	pub min_characters: usize,
	/// Maximum number of displayed candidates; `None` is unlimited.
	#[serde(deserialize_with = "zero_is_unlimited")]
	pub max_items: Option<usize>,
	/// When false, text equal to the bound value re-lists all candidates.
	pub strict: bool,
	/// Rewrite text to the bound value's canonical form on commit and close.
	pub coerce_text: bool,
	/// Parse unmatched text into a value. Only effective with `coerce_text`
	/// disabled.
	pub coerce_value: bool,
	/// Reset the bound value when the text is cleared.
	pub reset_value_on_empty_text: bool,
	/// Tab commits the highlighted candidate instead of just closing.
	pub select_on_tab: bool,
	/// Ask the host to select the input text when the menu is opened.
	pub select_on_click: bool,
	/// Open the menu as soon as a search is dispatched, so a progress
	/// indicator can be shown inside it.
	pub open_while_loading: bool,
	/// The control is disabled; it cannot be opened.
	pub disabled: bool,
	/// The control is read-only; it cannot be opened.
	pub read_only: bool,
}

impl Default for AutocompleteOptions {
	fn default() -> Self {
		Self {
			debounce_ms: DEFAULT_DEBOUNCE_MS,
			min_characters: 0,
			max_items: Some(DEFAULT_MAX_ITEMS),
			strict: true,
			coerce_text: true,
			coerce_value: false,
			reset_value_on_empty_text: false,
			select_on_tab: false,
			select_on_click: true,
			open_while_loading: false,
			disabled: false,
			read_only: false,
		}
	}
}

impl AutocompleteOptions {
	/// Parses options from a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self> {
		Ok(toml::from_str(input)?)
	}

	/// Debounce delay, or `None` when debouncing is disabled.
	pub fn debounce(&self) -> Option<Duration> {
		u64::try_from(self.debounce_ms)
			.ok()
			.filter(|ms| *ms > 0)
			.map(Duration::from_millis)
	}

	/// True when `text` is too short to be searched.
	pub fn blocks_search(&self, text: &str) -> bool {
		self.min_characters > 0 && (text.trim().is_empty() || text.chars().count() < self.min_characters)
	}

	/// True when the value-from-text coercion is in effect.
	pub fn coerces_value(&self) -> bool {
		self.coerce_value && !self.coerce_text
	}

	/// True when opening the menu is refused.
	pub fn is_locked(&self) -> bool {
		self.disabled || self.read_only
	}
}

fn zero_is_unlimited<'de, D>(deserializer: D) -> std::result::Result<Option<usize>, D::Error>
where
	D: Deserializer<'de>,
{
	let raw = Option::<usize>::deserialize(deserializer)?;
	Ok(raw.filter(|n| *n > 0))
}
