use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;

use super::*;
use crate::GenerationClock;

fn collect<T: Send + 'static>(tx: &mpsc::UnboundedSender<Settled<T>>) -> impl FnOnce(Settled<T>) + Send + 'static {
	let tx = tx.clone();
	move |settled| {
		let _ = tx.send(settled);
	}
}

/// Sets its flag when dropped, to observe an aborted task.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
	fn drop(&mut self) {
		self.0.store(true, Ordering::SeqCst);
	}
}

#[tokio::test]
async fn completed_work_is_delivered() {
	let mut clock = GenerationClock::new();
	let (tx, mut rx) = mpsc::unbounded_channel();

	spawn_guarded(TaskClass::Search, clock.issue(), async { vec!["alpha", "beta"] }, collect(&tx))
		.await
		.unwrap();

	assert_eq!(rx.recv().await, Some(Settled::Completed(vec!["alpha", "beta"])));
}

#[tokio::test]
async fn panicking_search_is_reported_with_its_message() {
	let mut clock = GenerationClock::new();
	let (tx, mut rx) = mpsc::unbounded_channel::<Settled<Vec<String>>>();

	let query = String::from("zebra");
	let search = async move {
		if query.starts_with('z') {
			panic!("index shard for {query:?} is missing");
		}
		Vec::new()
	};
	spawn_guarded(TaskClass::Search, clock.issue(), search, collect(&tx)).await.unwrap();

	match rx.recv().await {
		Some(Settled::Panicked(message)) => assert_eq!(message, "index shard for \"zebra\" is missing"),
		other => panic!("expected a panic report, got {other:?}"),
	}
}

#[tokio::test]
async fn static_panic_message_survives() {
	let mut clock = GenerationClock::new();
	let (tx, mut rx) = mpsc::unbounded_channel::<Settled<()>>();

	let jammed = async {
		let wheel_ok = false;
		if !wheel_ok {
			panic!("timer wheel jammed");
		}
	};
	spawn_guarded(TaskClass::Timer, clock.issue(), jammed, collect(&tx)).await.unwrap();

	assert_eq!(rx.recv().await, Some(Settled::Panicked("timer wheel jammed".to_string())));
}

#[tokio::test(start_paused = true)]
async fn cancelled_generation_aborts_work_and_stays_silent() {
	let mut clock = GenerationClock::new();
	let token = clock.issue();
	let (tx, mut rx) = mpsc::unbounded_channel::<Settled<u32>>();
	let dropped = Arc::new(AtomicBool::new(false));

	let flag = DropFlag(Arc::clone(&dropped));
	let supervisor = spawn_guarded(
		TaskClass::Search,
		token.clone(),
		async move {
			let _flag = flag;
			tokio::time::sleep(Duration::from_secs(60)).await;
			7
		},
		collect(&tx),
	);
	tokio::task::yield_now().await;

	token.cancel();
	supervisor.await.unwrap();
	tokio::time::sleep(Duration::from_millis(10)).await;

	assert!(dropped.load(Ordering::SeqCst));
	assert!(rx.try_recv().is_err());
}

#[test]
fn outside_a_runtime_the_fallback_drives_work() {
	let mut clock = GenerationClock::new();
	let (tx, rx) = std::sync::mpsc::channel();

	let supervisor = spawn_guarded(TaskClass::Timer, clock.issue(), async { "fired" }, move |settled| {
		let _ = tx.send(settled);
	});
	runtime_handle().block_on(supervisor).unwrap();

	assert_eq!(rx.recv().unwrap(), Settled::Completed("fired"));
}
