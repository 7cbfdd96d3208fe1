//! The autocomplete control: menu state machine and orchestration.
//!
//! All state lives in [`Autocomplete`] and is only mutated through `&mut self`.
//! Debounce timers and searches run as worker tasks and report back over an
//! internal channel; the host applies those reports with
//! [`Autocomplete::drain_events`], [`Autocomplete::next_event`] or
//! [`Autocomplete::settle`]. Reports from superseded timers or searches are
//! dropped there without touching candidates, highlight, or menu state.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{Span, debug, debug_span};
use uuid::Uuid;

use crate::candidates::CandidateIndex;
use crate::coerce::{BindingChange, CoercionPolicy, Converter, ValueTextBinding};
use crate::config::AutocompleteOptions;
use crate::debounce::{Scheduled, SearchDebouncer};
use crate::error::SearchError;
use crate::events::{AutocompleteEvent, EventSink};
use crate::key::KeyInput;
use crate::menu::{MenuCommand, MenuState, MenuStateMachine, route_key};
use crate::search::{SearchExecutor, SearchRequest, SearchSource, settle_outcome};

/// Bounds required of candidate values.
pub trait Candidate: Clone + PartialEq + Send + Sync + 'static {}

impl<T> Candidate for T where T: Clone + PartialEq + Send + Sync + 'static {}

type DisabledFn<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Completion report from a worker task.
#[derive(Debug)]
pub(crate) enum ControlMsg<T> {
	DebounceElapsed { generation: u64 },
	SearchSettled { generation: u64, outcome: Result<Vec<T>, SearchError> },
}

/// Headless type-ahead control over candidates of type `T`.
pub struct Autocomplete<T> {
	id: Uuid,
	options: AutocompleteOptions,
	binding: ValueTextBinding<T>,
	candidates: CandidateIndex<T>,
	menu: MenuStateMachine,
	debouncer: SearchDebouncer,
	executor: SearchExecutor<T>,
	is_disabled: Option<DisabledFn<T>>,
	events: Arc<dyn EventSink<T>>,
	span: Span,
	returned_items_count: usize,
	loading: bool,
	msg_tx: UnboundedSender<ControlMsg<T>>,
	msg_rx: UnboundedReceiver<ControlMsg<T>>,
}

impl<T> std::fmt::Debug for Autocomplete<T>
where
	T: std::fmt::Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Autocomplete")
			.field("id", &self.id)
			.field("binding", &self.binding)
			.field("menu", &self.menu.state())
			.field("highlighted", &self.candidates.highlighted())
			.field("loading", &self.loading)
			.finish_non_exhaustive()
	}
}

impl<T: Candidate> Autocomplete<T> {
	/// Creates a closed control with empty text and no value.
	pub fn new(
		options: AutocompleteOptions,
		source: impl SearchSource<T>,
		converter: impl Converter<T> + 'static,
		events: impl EventSink<T> + 'static,
	) -> Self {
		let id = Uuid::new_v4();
		let (msg_tx, msg_rx) = mpsc::unbounded_channel();
		let policy = CoercionPolicy::from(&options);
		Self {
			id,
			binding: ValueTextBinding::new(None, policy, Arc::new(converter)),
			options,
			candidates: CandidateIndex::default(),
			menu: MenuStateMachine::new(),
			debouncer: SearchDebouncer::new(),
			executor: SearchExecutor::new(Arc::new(source)),
			is_disabled: None,
			events: Arc::new(events),
			span: debug_span!("autocomplete", id = %id),
			returned_items_count: 0,
			loading: false,
			msg_tx,
			msg_rx,
		}
	}

	/// Seeds the bound value and its text. No events are emitted.
	pub fn with_value(mut self, value: Option<T>) -> Self {
		self.binding = ValueTextBinding::new(value, self.binding.policy(), self.converter_handle());
		self
	}

	/// Marks candidates for which `is_disabled` holds as unselectable.
	pub fn with_disabled(mut self, is_disabled: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
		self.is_disabled = Some(Arc::new(is_disabled));
		self
	}

	/// Logs inside `span` instead of the default `autocomplete{id}` span.
	pub fn with_span(mut self, span: Span) -> Self {
		self.span = span;
		self
	}

	fn converter_handle(&self) -> Arc<dyn Converter<T>> {
		self.binding.converter()
	}

	pub fn id(&self) -> Uuid {
		self.id
	}

	/// Stable row identifier used in [`AutocompleteEvent::ScrollToItem`].
	pub fn item_id(&self, index: usize) -> String {
		format!("{}_item{index}", self.id)
	}

	pub fn options(&self) -> &AutocompleteOptions {
		&self.options
	}

	/// Replaces the options. Candidates already shown are left as they are.
	pub fn set_options(&mut self, options: AutocompleteOptions) {
		self.binding.set_policy(CoercionPolicy::from(&options));
		self.options = options;
	}

	pub fn text(&self) -> &str {
		self.binding.text()
	}

	pub fn value(&self) -> Option<&T> {
		self.binding.value()
	}

	pub fn menu_state(&self) -> MenuState {
		self.menu.state()
	}

	pub fn is_open(&self) -> bool {
		self.menu.is_open()
	}

	/// True while a search is in flight.
	pub fn is_loading(&self) -> bool {
		self.loading
	}

	/// True while a debounce timer is armed.
	pub fn is_debounce_pending(&self) -> bool {
		self.debouncer.is_pending()
	}

	pub fn candidates(&self) -> &CandidateIndex<T> {
		&self.candidates
	}

	/// Displayed candidates.
	pub fn items(&self) -> &[T] {
		self.candidates.items()
	}

	pub fn highlighted(&self) -> Option<usize> {
		self.candidates.highlighted()
	}

	pub fn highlighted_item(&self) -> Option<&T> {
		self.candidates.highlighted_item()
	}

	/// Result count of the last settled search, before truncation.
	pub fn returned_items_count(&self) -> usize {
		self.returned_items_count
	}

	/// Applies a text edit made by the user and schedules a search.
	pub fn set_text(&mut self, text: impl Into<String>) {
		let _span = self.span.clone().entered();
		self.debouncer.cancel();
		let change = self.binding.edit_text(text);
		if !change.text {
			return;
		}
		self.emit_binding(change);
		self.schedule_search();
	}

	/// Writes the bound value programmatically and rewrites the text to
	/// match, without searching.
	pub fn set_value(&mut self, value: Option<T>) {
		let _span = self.span.clone().entered();
		if !self.binding.set_value(value) {
			return;
		}
		self.emit_value();
		self.debouncer.cancel();
		self.write_value_text();
	}

	/// Opens the menu (searching first) or closes it. Opening is refused
	/// while the control is disabled or read-only.
	pub fn toggle_menu(&mut self) {
		let _span = self.span.clone().entered();
		if self.options.is_locked() && !self.is_open() {
			return;
		}
		self.change_menu(!self.is_open());
	}

	/// Opens the menu unless it is open already.
	pub fn open_menu(&mut self) {
		if !self.is_open() {
			self.toggle_menu();
		}
	}

	/// Closes the menu without committing.
	pub fn close_menu(&mut self) {
		let _span = self.span.clone().entered();
		self.change_menu(false);
	}

	/// Pointer press on the input.
	pub fn click_input(&mut self) {
		self.toggle_menu();
	}

	/// Pointer press on a candidate row. Disabled rows are ignored.
	pub fn click_item(&mut self, index: usize) -> bool {
		if !self.candidates.is_enabled(index) {
			return false;
		}
		let Some(item) = self.candidates.items().get(index).cloned() else {
			return false;
		};
		self.select_option(item);
		true
	}

	/// The input lost focus.
	pub fn blur(&mut self) {
		if self.is_open() {
			self.close_menu();
		}
	}

	/// Handles a key press. Returns false when the key means nothing here.
	pub fn handle_key(&mut self, key: KeyInput) -> bool {
		let _span = self.span.clone().entered();
		match route_key(self.menu.state(), key, self.options.select_on_tab) {
			MenuCommand::Open => self.toggle_menu(),
			MenuCommand::Commit => self.commit_highlighted(),
			MenuCommand::HighlightNext => {
				if self.candidates.next().is_some() {
					self.scroll_to_highlighted();
				}
			}
			MenuCommand::HighlightPrevious => {
				if self.candidates.previous().is_some() {
					self.scroll_to_highlighted();
				}
			}
			MenuCommand::Close => self.change_menu(false),
			MenuCommand::Clear => self.clear(),
			MenuCommand::Ignore => return false,
		}
		true
	}

	/// Commits `item`: binds it, writes its text, closes the menu and asks
	/// for validation.
	pub fn select_option(&mut self, item: T) {
		let _span = self.span.clone().entered();
		if self.binding.set_value(Some(item.clone())) {
			self.emit_value();
		}
		self.candidates.highlight_item(&item);
		self.write_value_text();
		self.debouncer.cancel();
		self.cancel_search();
		self.set_menu(MenuState::Closed);
		self.emit(AutocompleteEvent::ValidationRequested);
	}

	/// Resets text and value, closes the menu and drops pending work.
	/// Repeated calls change nothing further.
	///
	/// The exclusive borrow keeps any commit or value write out until the
	/// reset is complete, so a commit after a clear always rewrites the text.
	pub fn clear(&mut self) {
		let _span = self.span.clone().entered();
		self.set_menu(MenuState::Closed);
		let change = self.binding.clear();
		self.emit_binding(change);
		self.debouncer.cancel();
		self.cancel_search();
	}

	/// Cancels timers and searches. Safe to call repeatedly.
	pub fn dispose(&mut self) {
		self.debouncer.cancel();
		self.cancel_search();
	}

	/// Applies every report already delivered, without waiting. Returns how
	/// many were processed.
	pub fn drain_events(&mut self) -> usize {
		let mut processed = 0;
		while let Ok(msg) = self.msg_rx.try_recv() {
			self.handle_msg(msg);
			processed += 1;
		}
		processed
	}

	/// Waits for the next timer or search report and applies it.
	///
	/// Never resolves if no timer is armed and no search is in flight.
	pub async fn next_event(&mut self) -> bool {
		match self.msg_rx.recv().await {
			Some(msg) => {
				self.handle_msg(msg);
				true
			}
			None => false,
		}
	}

	/// Applies reports until no timer is armed and no search is in flight.
	pub async fn settle(&mut self) {
		while self.debouncer.is_pending() || self.executor.is_in_flight() {
			if !self.next_event().await {
				break;
			}
		}
	}

	pub(crate) fn handle_msg(&mut self, msg: ControlMsg<T>) {
		let _span = self.span.clone().entered();
		match msg {
			ControlMsg::DebounceElapsed { generation } => {
				if self.debouncer.complete(generation) {
					self.search();
				} else {
					debug!(generation, "autocomplete.debounce.stale");
				}
			}
			ControlMsg::SearchSettled { generation, outcome } => self.apply_search(generation, outcome),
		}
	}

	fn schedule_search(&mut self) {
		let tx = self.msg_tx.clone();
		let scheduled = self.debouncer.schedule(self.options.debounce_ms, move |generation| {
			let _ = tx.send(ControlMsg::DebounceElapsed { generation });
		});
		// A zero delay fires in this turn; the report it queued is dropped
		// later as already consumed.
		if let Scheduled::Fired(generation) = scheduled
			&& self.debouncer.complete(generation)
		{
			self.search();
		}
	}

	fn search(&mut self) {
		if self.options.blocks_search(self.binding.text()) {
			self.cancel_search();
			self.set_menu(MenuState::Closed);
			return;
		}

		let searching_while_selected = !self.options.strict && self.binding.text_matches_value();
		let query = if searching_while_selected {
			String::new()
		} else {
			self.binding.text().to_string()
		};

		if self.options.open_while_loading {
			self.set_menu(MenuState::Open);
		}

		let tx = self.msg_tx.clone();
		let generation = self.executor.dispatch(
			SearchRequest {
				query,
				searching_while_selected,
			},
			move |generation, outcome| {
				let _ = tx.send(ControlMsg::SearchSettled { generation, outcome });
			},
		);
		debug!(generation, searching_while_selected, "autocomplete.search.dispatch");
		self.set_loading(true);
	}

	fn apply_search(&mut self, generation: u64, outcome: Result<Vec<T>, SearchError>) {
		let Some(accepted) = self.executor.accept(generation) else {
			debug!(generation, "autocomplete.search.stale");
			return;
		};
		self.set_loading(false);

		let list = settle_outcome(outcome, self.options.max_items);
		self.returned_items_count = list.total();
		self.emit(AutocompleteEvent::ReturnedItemsCountChanged(list.total()));

		self.candidates.build(list, self.is_disabled.as_deref());
		if accepted.searching_while_selected
			&& let Some(value) = self.binding.value()
		{
			self.candidates.highlight_item(value);
		}

		self.set_menu(MenuState::Open);

		// Policy gates this to value coercion with text coercion off, which
		// covers both the empty-result fallback and unmatched typed text.
		self.coerce_value_to_text();
	}

	fn change_menu(&mut self, open: bool) {
		if open {
			if self.options.select_on_click {
				self.emit(AutocompleteEvent::SelectInputText);
			}
			self.search();
		} else {
			self.debouncer.cancel();
			self.cancel_search();
			self.restore_scroll_position();
			self.coerce_text_to_value();
			self.set_menu(MenuState::Closed);
		}
	}

	fn commit_highlighted(&mut self) {
		if !self.is_open() {
			return;
		}
		if let Some(item) = self.candidates.highlighted_item().cloned() {
			self.select_option(item);
		}
		self.set_menu(MenuState::Closed);
	}

	fn coerce_text_to_value(&mut self) {
		if !self.binding.policy().coerce_text {
			return;
		}
		self.debouncer.cancel();
		if self.binding.coerce_text_to_value() {
			self.emit_text();
		}
	}

	fn coerce_value_to_text(&mut self) {
		if !self.binding.policy().coerce_value {
			return;
		}
		self.debouncer.cancel();
		if self.binding.coerce_value_to_text() {
			self.emit_value();
		}
	}

	fn cancel_search(&mut self) {
		self.executor.cancel();
		self.set_loading(false);
	}

	/// Rewrites the text to the bound value's canonical form.
	fn write_value_text(&mut self) {
		let text = self.binding.value_text();
		if self.binding.set_text(text) {
			self.emit_text();
		}
	}

	fn restore_scroll_position(&self) {
		if self.candidates.highlighted() == Some(0) {
			self.emit(AutocompleteEvent::ScrollToItem { item_id: self.item_id(0) });
		}
	}

	fn scroll_to_highlighted(&self) {
		if let Some(index) = self.candidates.highlighted() {
			self.emit(AutocompleteEvent::ScrollToItem {
				item_id: self.item_id(index),
			});
		}
	}

	fn set_menu(&mut self, state: MenuState) {
		if let Some(state) = self.menu.transition(state) {
			self.emit(AutocompleteEvent::OpenChanged(state.is_open()));
		}
	}

	fn set_loading(&mut self, loading: bool) {
		if self.loading != loading {
			self.loading = loading;
			self.emit(AutocompleteEvent::LoadingChanged(loading));
		}
	}

	fn emit_binding(&self, change: BindingChange) {
		if change.text {
			self.emit_text();
		}
		if change.value {
			self.emit_value();
		}
	}

	fn emit_text(&self) {
		self.emit(AutocompleteEvent::TextChanged(self.binding.text().to_string()));
	}

	fn emit_value(&self) {
		self.emit(AutocompleteEvent::ValueChanged(self.binding.value().cloned()));
	}

	fn emit(&self, event: AutocompleteEvent<T>) {
		self.events.emit(event);
	}
}
