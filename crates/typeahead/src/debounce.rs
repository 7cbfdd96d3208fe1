//! Debounce timer coalescing bursts of text edits into one search.
//!
//! At most one timer is armed per debouncer. Arming a new one cancels the
//! previous, and every armed timer carries a generation so that an elapsed
//! notification which raced with a cancel can be recognized and ignored by
//! [`SearchDebouncer::complete`].

use std::time::Duration;

use tokio::time::sleep;
use typeahead_worker::{GenerationClock, GenerationToken, TaskClass};

/// Outcome of [`SearchDebouncer::schedule`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheduled {
	/// The delay was not positive and the callback already ran.
	Fired(u64),
	/// A timer was armed for this generation.
	Armed(u64),
}

/// One-shot, cancellable debounce timer.
#[derive(Debug, Default)]
pub struct SearchDebouncer {
	clock: GenerationClock,
	pending: Option<GenerationToken>,
}

impl SearchDebouncer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Cancels any pending timer and arms a new one.
	///
	/// `callback` receives the timer generation. With `delay_ms <= 0` it runs
	/// synchronously before this returns. Either way the generation stays
	/// pending until [`Self::complete`] consumes it.
	pub fn schedule<F>(&mut self, delay_ms: i64, callback: F) -> Scheduled
	where
		F: FnOnce(u64) + Send + 'static,
	{
		self.cancel();

		let token = self.clock.issue();
		let generation = token.generation();
		self.pending = Some(token.clone());

		let Some(delay) = u64::try_from(delay_ms).ok().filter(|ms| *ms > 0).map(Duration::from_millis) else {
			callback(generation);
			return Scheduled::Fired(generation);
		};

		typeahead_worker::spawn_guarded(TaskClass::Timer, token, async move { sleep(delay).await }, move |_elapsed| {
			callback(generation)
		});
		Scheduled::Armed(generation)
	}

	/// Disarms the pending timer. Safe to call when nothing is armed or the
	/// timer already fired. Returns whether a timer was disarmed.
	pub fn cancel(&mut self) -> bool {
		match self.pending.take() {
			Some(token) => {
				token.cancel();
				true
			}
			None => false,
		}
	}

	/// Consumes an elapsed notification. Returns true only when `generation`
	/// is the currently armed timer.
	pub fn complete(&mut self, generation: u64) -> bool {
		if self.pending.as_ref().is_some_and(|token| token.is_live(generation)) {
			self.pending = None;
			true
		} else {
			false
		}
	}

	/// True while a timer is armed and not yet completed.
	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}
}

impl Drop for SearchDebouncer {
	fn drop(&mut self) {
		self.cancel();
	}
}
