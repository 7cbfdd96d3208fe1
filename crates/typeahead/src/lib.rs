//! Headless, asynchronous type-ahead control.
//!
//! [`Autocomplete`] binds a typed value to an editable text field and offers
//! candidates from a caller-supplied [`SearchSource`]. Text edits are
//! debounced into searches; only the latest search may change what is shown,
//! and failed or panicking searches degrade to an empty menu. Keyboard and
//! pointer input drive a two-state menu with wrapping navigation over enabled
//! candidates.
//!
//! Rendering is left to the host, which receives [`AutocompleteEvent`]s
//! through an [`EventSink`] and forwards key presses, clicks, and render
//! completion back to the control.
//!
//! ```no_run
//! # async fn demo() {
//! use typeahead::{Autocomplete, AutocompleteOptions, DisplayConverter, Discard, search_fn};
//!
//! let source = search_fn(|query: String, _cancel| async move {
//! 	Ok(["red", "green", "blue"]
//! 		.into_iter()
//! 		.filter(|c| c.contains(query.as_str()))
//! 		.map(String::from)
//! 		.collect())
//! });
//! let mut colors = Autocomplete::new(AutocompleteOptions::default(), source, DisplayConverter, Discard);
//! colors.set_text("re");
//! colors.settle().await;
//! assert_eq!(colors.items(), ["red".to_string(), "green".to_string()]);
//! # }
//! ```

pub mod candidates;
pub mod coerce;
pub mod config;
mod controller;
pub mod debounce;
pub mod error;
pub mod events;
pub mod key;
pub mod menu;
pub mod search;

pub use candidates::{CandidateIndex, CandidateList};
pub use coerce::{CoercionPolicy, Converter, DisplayConverter, FnConverter, ValueTextBinding};
pub use config::AutocompleteOptions;
pub use controller::{Autocomplete, Candidate};
pub use debounce::SearchDebouncer;
pub use error::{ConfigError, ConvertError, SearchError};
pub use events::{AutocompleteEvent, Discard, EventSink};
pub use key::{KeyCode, KeyInput, Modifiers};
pub use menu::{MenuCommand, MenuState, MenuStateMachine};
pub use search::{SearchExecutor, SearchSource, search_fn};
