//! End-to-end behavior of the control through its public surface.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use typeahead::{
	Autocomplete, AutocompleteEvent, AutocompleteOptions, DisplayConverter, KeyCode, SearchError, SearchSource, search_fn,
};

fn init_tracing() {
	let _ = tracing_subscriber::fmt::try_init();
}

/// Cities, each search taking `latency` and honoring cancellation.
fn cities(latency: Duration, log: Arc<Mutex<Vec<String>>>) -> impl SearchSource<String> {
	const CITIES: &[&str] = &["Berlin", "Bern", "Bordeaux", "Boston", "Lisbon", "London", "Lyon"];
	search_fn(move |query: String, cancel: CancellationToken| {
		let log = Arc::clone(&log);
		async move {
			tokio::select! {
				_ = cancel.cancelled() => Err(SearchError::Cancelled),
				_ = tokio::time::sleep(latency) => {
					log.lock().push(query.clone());
					let needle = query.to_lowercase();
					Ok(CITIES
						.iter()
						.filter(|city| city.to_lowercase().starts_with(&needle))
						.map(|city| city.to_string())
						.collect())
				}
			}
		}
	})
}

#[tokio::test(start_paused = true)]
async fn typing_burst_settles_on_last_query() {
	init_tracing();
	let log = Arc::new(Mutex::new(Vec::new()));
	let (tx, mut events) = mpsc::unbounded_channel();
	let mut ac = Autocomplete::new(
		AutocompleteOptions::default(),
		cities(Duration::from_millis(50), Arc::clone(&log)),
		DisplayConverter,
		tx,
	);

	for text in ["b", "bo", "bos"] {
		ac.set_text(text);
		tokio::time::advance(Duration::from_millis(30)).await;
		assert_eq!(ac.drain_events(), 0);
	}
	ac.settle().await;

	assert_eq!(*log.lock(), vec!["bos".to_string()]);
	assert_eq!(ac.items(), ["Boston".to_string()]);

	let mut opened = 0;
	while let Ok(event) = events.try_recv() {
		if event == AutocompleteEvent::OpenChanged(true) {
			opened += 1;
		}
	}
	assert_eq!(opened, 1);
}

#[tokio::test(start_paused = true)]
async fn slow_search_is_superseded_by_newer_text() {
	init_tracing();
	let log = Arc::new(Mutex::new(Vec::new()));
	let (tx, _events) = mpsc::unbounded_channel();
	let options = AutocompleteOptions {
		debounce_ms: 0,
		..AutocompleteOptions::default()
	};
	let mut ac = Autocomplete::new(options, cities(Duration::from_millis(200), Arc::clone(&log)), DisplayConverter, tx);

	ac.set_text("l");
	tokio::time::advance(Duration::from_millis(100)).await;
	ac.set_text("ly");
	ac.settle().await;

	assert_eq!(*log.lock(), vec!["ly".to_string()]);
	assert_eq!(ac.items(), ["Lyon".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn type_navigate_commit_round() {
	init_tracing();
	let (tx, mut events) = mpsc::unbounded_channel();
	let options = AutocompleteOptions::from_toml_str(
		r#"
		debounce-ms = 0
		max-items = 2
		"#,
	)
	.unwrap();
	let mut ac = Autocomplete::new(options, cities(Duration::from_millis(10), Arc::default()), DisplayConverter, tx);

	ac.set_text("b");
	ac.settle().await;
	assert_eq!(ac.returned_items_count(), 4);
	assert_eq!(ac.items(), ["Berlin".to_string(), "Bern".to_string()]);

	ac.handle_key(KeyCode::ArrowDown.into());
	ac.handle_key(KeyCode::ArrowDown.into());
	assert_eq!(ac.highlighted(), Some(0));
	ac.handle_key(KeyCode::ArrowDown.into());
	ac.handle_key(KeyCode::Enter.into());

	assert_eq!(ac.value(), Some(&"Bern".to_string()));
	assert_eq!(ac.text(), "Bern");
	assert!(!ac.is_open());

	let mut seen = Vec::new();
	while let Ok(event) = events.try_recv() {
		seen.push(event);
	}
	assert!(seen.contains(&AutocompleteEvent::ReturnedItemsCountChanged(4)));
	assert_eq!(seen.last(), Some(&AutocompleteEvent::ValidationRequested));
}

#[tokio::test(start_paused = true)]
async fn blur_discards_unmatched_text() {
	init_tracing();
	let (tx, _events) = mpsc::unbounded_channel();
	let options = AutocompleteOptions {
		debounce_ms: 0,
		..AutocompleteOptions::default()
	};
	let mut ac = Autocomplete::new(options, cities(Duration::from_millis(10), Arc::default()), DisplayConverter, tx)
		.with_value(Some("Lisbon".to_string()));

	ac.set_text("Lis");
	ac.settle().await;
	assert!(ac.is_open());

	ac.blur();

	assert!(!ac.is_open());
	assert_eq!(ac.text(), "Lisbon");
	assert_eq!(ac.value(), Some(&"Lisbon".to_string()));
}

#[tokio::test(start_paused = true)]
async fn clear_during_search_leaves_menu_closed() {
	init_tracing();
	let (tx, _events) = mpsc::unbounded_channel();
	let options = AutocompleteOptions {
		debounce_ms: 0,
		..AutocompleteOptions::default()
	};
	let mut ac = Autocomplete::new(options, cities(Duration::from_millis(100), Arc::default()), DisplayConverter, tx);

	ac.set_text("lo");
	ac.clear();
	tokio::time::sleep(Duration::from_millis(500)).await;
	ac.drain_events();

	assert!(!ac.is_open());
	assert!(ac.items().is_empty());
	assert_eq!(ac.text(), "");
	assert!(!ac.is_loading());
}
