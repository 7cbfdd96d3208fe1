//! Reconciliation between the displayed text and the bound value.
//!
//! The binding never fails outward: an absent value displays as the empty
//! string and text that cannot be parsed leaves the previous value in place.

use std::fmt::Display;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::config::AutocompleteOptions;
use crate::error::ConvertError;

/// Two-way conversion between values and their display text.
pub trait Converter<T>: Send + Sync {
	/// Canonical display text of `value`.
	fn to_text(&self, value: &T) -> String;

	/// Parses text back into a value.
	fn from_text(&self, text: &str) -> Result<T, ConvertError>;
}

/// Converter backed by [`Display`] and [`FromStr`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DisplayConverter;

impl<T> Converter<T> for DisplayConverter
where
	T: Display + FromStr,
	T::Err: Display,
{
	fn to_text(&self, value: &T) -> String {
		value.to_string()
	}

	fn from_text(&self, text: &str) -> Result<T, ConvertError> {
		text.parse().map_err(|err: T::Err| ConvertError::Parse {
			text: text.to_string(),
			reason: err.to_string(),
		})
	}
}

type ToTextFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
type FromTextFn<T> = Arc<dyn Fn(&str) -> Option<T> + Send + Sync>;

/// Converter built from closures. Without a parser, text never converts.
pub struct FnConverter<T> {
	to_text: ToTextFn<T>,
	from_text: Option<FromTextFn<T>>,
}

impl<T> FnConverter<T> {
	pub fn new(to_text: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
		Self {
			to_text: Arc::new(to_text),
			from_text: None,
		}
	}

	/// Adds the text-to-value direction. `None` from the parser is a parse
	/// failure.
	pub fn with_parser(mut self, from_text: impl Fn(&str) -> Option<T> + Send + Sync + 'static) -> Self {
		self.from_text = Some(Arc::new(from_text));
		self
	}
}

impl<T> Converter<T> for FnConverter<T> {
	fn to_text(&self, value: &T) -> String {
		(self.to_text)(value)
	}

	fn from_text(&self, text: &str) -> Result<T, ConvertError> {
		let parse = self.from_text.as_ref().ok_or(ConvertError::Unsupported)?;
		parse(text).ok_or_else(|| ConvertError::Parse {
			text: text.to_string(),
			reason: "no matching value".to_string(),
		})
	}
}

/// Which reconciliations run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercionPolicy {
	/// Rewrite text to the value's canonical form on commit and close.
	pub coerce_text: bool,
	/// Parse text into a value when a search finds nothing.
	pub coerce_value: bool,
	/// Reset the value when the text is cleared.
	pub reset_value_on_empty_text: bool,
}

impl Default for CoercionPolicy {
	fn default() -> Self {
		Self::from(&AutocompleteOptions::default())
	}
}

impl From<&AutocompleteOptions> for CoercionPolicy {
	fn from(options: &AutocompleteOptions) -> Self {
		Self {
			coerce_text: options.coerce_text,
			coerce_value: options.coerces_value(),
			reset_value_on_empty_text: options.reset_value_on_empty_text,
		}
	}
}

/// What a binding mutation changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BindingChange {
	pub value: bool,
	pub text: bool,
}

impl BindingChange {
	pub const NONE: Self = Self { value: false, text: false };

	pub fn any(self) -> bool {
		self.value || self.text
	}
}

/// The bound value and the displayed text of one control.
pub struct ValueTextBinding<T> {
	value: Option<T>,
	text: String,
	policy: CoercionPolicy,
	converter: Arc<dyn Converter<T>>,
}

impl<T> std::fmt::Debug for ValueTextBinding<T>
where
	T: std::fmt::Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ValueTextBinding")
			.field("value", &self.value)
			.field("text", &self.text)
			.field("policy", &self.policy)
			.finish()
	}
}

impl<T: PartialEq> ValueTextBinding<T> {
	/// Creates a binding whose text is seeded from `value`.
	pub fn new(value: Option<T>, policy: CoercionPolicy, converter: Arc<dyn Converter<T>>) -> Self {
		let mut binding = Self {
			value: None,
			text: String::new(),
			policy,
			converter,
		};
		binding.text = binding.text_of(value.as_ref());
		binding.value = value;
		binding
	}

	pub fn value(&self) -> Option<&T> {
		self.value.as_ref()
	}

	pub fn text(&self) -> &str {
		&self.text
	}

	pub fn policy(&self) -> CoercionPolicy {
		self.policy
	}

	pub fn set_policy(&mut self, policy: CoercionPolicy) {
		self.policy = policy;
	}

	pub fn converter(&self) -> Arc<dyn Converter<T>> {
		Arc::clone(&self.converter)
	}

	/// Canonical text of a value; absent values display as "".
	pub fn text_of(&self, value: Option<&T>) -> String {
		value.map(|v| self.converter.to_text(v)).unwrap_or_default()
	}

	/// Canonical text of the bound value.
	pub fn value_text(&self) -> String {
		self.text_of(self.value.as_ref())
	}

	/// True when the displayed text is the bound value's canonical text.
	pub fn text_matches_value(&self) -> bool {
		self.value.is_some() && self.value_text() == self.text
	}

	/// Writes the value. Returns whether it changed.
	pub fn set_value(&mut self, value: Option<T>) -> bool {
		if self.value == value {
			return false;
		}
		self.value = value;
		true
	}

	/// Writes the text. Returns whether it changed.
	pub fn set_text(&mut self, text: impl Into<String>) -> bool {
		let text = text.into();
		if self.text == text {
			return false;
		}
		self.text = text;
		true
	}

	/// Applies a user text edit, resetting the value when the policy asks
	/// for it and the text is blank.
	pub fn edit_text(&mut self, text: impl Into<String>) -> BindingChange {
		let text_changed = self.set_text(text);
		let value_changed = self.policy.reset_value_on_empty_text && self.text.trim().is_empty() && self.set_value(None);
		BindingChange {
			value: value_changed,
			text: text_changed,
		}
	}

	/// Rewrites the text to the bound value's canonical form. Skipped when
	/// text coercion is off or the text already matches.
	pub fn coerce_text_to_value(&mut self) -> bool {
		if !self.policy.coerce_text {
			return false;
		}
		let text = self.value_text();
		self.set_text(text)
	}

	/// Parses the text into the bound value. Skipped when value coercion is
	/// off; a parse failure keeps the previous value.
	pub fn coerce_value_to_text(&mut self) -> bool {
		if !self.policy.coerce_value {
			return false;
		}
		match self.converter.from_text(&self.text) {
			Ok(value) => self.set_value(Some(value)),
			Err(err) => {
				debug!(text = %self.text, error = %err, "autocomplete.coerce_value.rejected");
				false
			}
		}
	}

	/// Resets both value and text to their defaults.
	pub fn clear(&mut self) -> BindingChange {
		BindingChange {
			text: self.set_text(String::new()),
			value: self.set_value(None),
		}
	}
}
