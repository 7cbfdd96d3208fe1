//! Events emitted by a control to its host.

use tokio::sync::mpsc::UnboundedSender;

/// Observable change reported by [`crate::Autocomplete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutocompleteEvent<T> {
	/// The bound value changed.
	ValueChanged(Option<T>),
	/// The displayed text changed.
	TextChanged(String),
	/// The menu opened (`true`) or closed (`false`). Only sent on a flip.
	OpenChanged(bool),
	/// A search settled with this many results before truncation.
	ReturnedItemsCountChanged(usize),
	/// A search started (`true`) or stopped (`false`) being in flight.
	LoadingChanged(bool),
	/// The host should scroll the given candidate row into view.
	ScrollToItem {
		/// Row identifier, see [`crate::Autocomplete::item_id`].
		item_id: String,
	},
	/// The host should select the input's text.
	SelectInputText,
	/// A value was committed and should be validated.
	ValidationRequested,
}

/// Receiver of [`AutocompleteEvent`]s, passed in at construction.
pub trait EventSink<T>: Send + Sync {
	fn emit(&self, event: AutocompleteEvent<T>);
}

impl<T: Send> EventSink<T> for UnboundedSender<AutocompleteEvent<T>> {
	fn emit(&self, event: AutocompleteEvent<T>) {
		// A dropped receiver only means the host stopped listening.
		let _ = self.send(event);
	}
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl<T> EventSink<T> for Discard {
	fn emit(&self, _event: AutocompleteEvent<T>) {}
}
