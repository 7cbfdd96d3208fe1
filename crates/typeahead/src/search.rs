//! Search invocation with supersession and failure containment.
//!
//! Every dispatch issues a fresh [`GenerationToken`] and cancels the previous
//! one, so at most one search is authoritative at a time. The search runs on
//! its own task; a panic there is caught at the join and reported as
//! [`SearchError::Panicked`] instead of tearing anything down. Results are
//! delivered through a callback carrying the generation, and the owner must
//! confirm with [`SearchExecutor::accept`] before applying them.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::warn;
use typeahead_worker::{GenerationClock, GenerationToken, Settled, TaskClass};

use crate::candidates::CandidateList;
use crate::error::SearchError;

/// Supplier of candidates for a query.
///
/// Implementations should return promptly with [`SearchError::Cancelled`]
/// once `cancel` fires; the executor stops waiting at that point anyway.
#[async_trait]
pub trait SearchSource<T>: Send + Sync + 'static {
	async fn search(&self, query: String, cancel: CancellationToken) -> Result<Vec<T>, SearchError>;
}

/// [`SearchSource`] adapter for async closures, see [`search_fn`].
pub struct FnSearch<F, T> {
	func: F,
	_marker: PhantomData<fn() -> T>,
}

/// Wraps `func(query, cancel)` as a [`SearchSource`].
pub fn search_fn<F, Fut, T>(func: F) -> FnSearch<F, T>
where
	F: Fn(String, CancellationToken) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Vec<T>, SearchError>> + Send + 'static,
	T: Send + 'static,
{
	FnSearch {
		func,
		_marker: PhantomData,
	}
}

#[async_trait]
impl<F, Fut, T> SearchSource<T> for FnSearch<F, T>
where
	F: Fn(String, CancellationToken) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Vec<T>, SearchError>> + Send + 'static,
	T: Send + 'static,
{
	async fn search(&self, query: String, cancel: CancellationToken) -> Result<Vec<T>, SearchError> {
		(self.func)(query, cancel).await
	}
}

/// A search about to be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
	/// Text sent to the source.
	pub query: String,
	/// The query was blanked because the text equals the bound value.
	pub searching_while_selected: bool,
}

/// Bookkeeping for the authoritative search.
#[derive(Debug)]
struct InFlightSearch {
	token: GenerationToken,
	searching_while_selected: bool,
}

/// Metadata of an accepted search, returned by [`SearchExecutor::accept`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedSearch {
	pub generation: u64,
	pub searching_while_selected: bool,
}

/// Dispatches searches so that only the latest may commit.
pub struct SearchExecutor<T> {
	source: Arc<dyn SearchSource<T>>,
	clock: GenerationClock,
	in_flight: Option<InFlightSearch>,
}

impl<T> std::fmt::Debug for SearchExecutor<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SearchExecutor")
			.field("generation", &self.clock.current())
			.field("in_flight", &self.in_flight)
			.finish()
	}
}

impl<T: Send + 'static> SearchExecutor<T> {
	pub fn new(source: Arc<dyn SearchSource<T>>) -> Self {
		Self {
			source,
			clock: GenerationClock::new(),
			in_flight: None,
		}
	}

	/// Generation of the most recent dispatch.
	pub fn generation(&self) -> u64 {
		self.clock.current()
	}

	pub fn is_in_flight(&self) -> bool {
		self.in_flight.is_some()
	}

	/// Cancels the previous search and starts `request`.
	///
	/// `on_settle` runs on the worker task with the generation and outcome,
	/// unless the search was superseded or cancelled first.
	pub fn dispatch<F>(&mut self, request: SearchRequest, on_settle: F) -> u64
	where
		F: FnOnce(u64, Result<Vec<T>, SearchError>) + Send + 'static,
	{
		self.cancel();

		let token = self.clock.issue();
		let generation = token.generation();
		self.in_flight = Some(InFlightSearch {
			token: token.clone(),
			searching_while_selected: request.searching_while_selected,
		});

		let source = Arc::clone(&self.source);
		let cancel = token.cancellation_token();
		let query = request.query;
		typeahead_worker::spawn_guarded(
			TaskClass::Search,
			token,
			async move { source.search(query, cancel).await },
			move |settled| {
				let outcome = match settled {
					Settled::Completed(outcome) => outcome,
					Settled::Panicked(message) => Err(SearchError::Panicked(message)),
				};
				on_settle(generation, outcome);
			},
		);

		generation
	}

	/// Cancels the authoritative search, if any. Idempotent.
	pub fn cancel(&mut self) -> bool {
		match self.in_flight.take() {
			Some(in_flight) => {
				in_flight.token.cancel();
				true
			}
			None => false,
		}
	}

	/// Claims a settled search. Returns `None` for anything but the live,
	/// latest generation; such results must be dropped unseen.
	pub fn accept(&mut self, generation: u64) -> Option<AcceptedSearch> {
		let live = self.in_flight.as_ref().is_some_and(|in_flight| in_flight.token.is_live(generation));
		if !live {
			return None;
		}
		let in_flight = self.in_flight.take()?;
		Some(AcceptedSearch {
			generation,
			searching_while_selected: in_flight.searching_while_selected,
		})
	}
}

impl<T> Drop for SearchExecutor<T> {
	fn drop(&mut self) {
		if let Some(in_flight) = self.in_flight.take() {
			in_flight.token.cancel();
		}
	}
}

/// Turns an accepted outcome into the displayed list.
///
/// Cancellation degrades silently to no results; any other failure is logged
/// as a warning first.
pub fn settle_outcome<T>(outcome: Result<Vec<T>, SearchError>, max_items: Option<usize>) -> CandidateList<T> {
	let items = match outcome {
		Ok(items) => items,
		Err(SearchError::Cancelled) => Vec::new(),
		Err(err) => {
			warn!(error = %err, "the search function failed to return results");
			Vec::new()
		}
	};
	CandidateList::truncated(items, max_items)
}
