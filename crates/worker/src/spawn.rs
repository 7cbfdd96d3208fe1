use std::future::Future;
use std::sync::OnceLock;

use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::{JoinError, JoinHandle};

use crate::{GenerationToken, TaskClass};

/// How guarded work ended, as seen by its settle callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled<T> {
	Completed(T),
	/// The work panicked; carries the panic message.
	Panicked(String),
}

/// Handle of the runtime guarded work is spawned on.
///
/// Inside a tokio context this is the ambient runtime. Callers outside one
/// share a lazily built single-worker runtime.
pub fn runtime_handle() -> Handle {
	static FALLBACK: OnceLock<Runtime> = OnceLock::new();
	Handle::try_current().unwrap_or_else(|_| {
		FALLBACK
			.get_or_init(|| {
				Builder::new_multi_thread()
					.worker_threads(1)
					.thread_name("typeahead-worker")
					.enable_all()
					.build()
					.expect("typeahead-worker fallback runtime")
			})
			.handle()
			.clone()
	})
}

/// Runs `work` on its own task for the generation owned by `token` and
/// hands the result to `on_settle`.
///
/// Cancelling `token` aborts `work` and suppresses `on_settle`; a panic
/// inside `work` is delivered as [`Settled::Panicked`] instead of
/// propagating. The returned handle resolves once the result was delivered
/// or dropped.
pub fn spawn_guarded<F, S>(class: TaskClass, token: GenerationToken, work: F, on_settle: S) -> JoinHandle<()>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
	S: FnOnce(Settled<F::Output>) + Send + 'static,
{
	let handle = runtime_handle();
	tracing::trace!(worker_class = class.as_str(), generation = token.generation(), "worker.spawn");

	let mut work = handle.spawn(work);
	handle.spawn(async move {
		let joined = tokio::select! {
			biased;
			_ = token.cancelled() => {
				work.abort();
				return;
			}
			joined = &mut work => joined,
		};
		if token.is_cancelled() {
			return;
		}
		let settled = match joined {
			Ok(output) => Settled::Completed(output),
			Err(err) => match panic_message(err) {
				Some(message) => Settled::Panicked(message),
				None => return,
			},
		};
		tracing::trace!(worker_class = class.as_str(), generation = token.generation(), "worker.settle");
		on_settle(settled);
	})
}

/// Message of a panicked join; `None` for an aborted task.
fn panic_message(err: JoinError) -> Option<String> {
	let payload = err.try_into_panic().ok()?;
	let message = match payload.downcast::<String>() {
		Ok(message) => *message,
		Err(payload) => match payload.downcast_ref::<&'static str>() {
			Some(message) => (*message).to_owned(),
			None => String::from("panic with a non-string payload"),
		},
	};
	Some(message)
}

#[cfg(test)]
mod tests;
