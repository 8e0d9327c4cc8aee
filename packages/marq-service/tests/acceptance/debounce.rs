use std::{sync::Arc, time::Duration};

use crate::acceptance;

#[tokio::test(start_paused = true)]
async fn only_the_last_rapid_input_executes() {
	let h = acceptance::harness("app").await;
	let saved = h
		.service
		.save_link(acceptance::save("Abc Songbook", "https://example.com/abc"))
		.await
		.expect("Failed to save link.");

	h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	let service = Arc::new(h.service);

	// Three keystrokes 50 ms apart, all inside the 300 ms quiet window: the
	// first two are superseded before their window closes and must discard
	// their results; only the final input runs a query.
	let first = tokio::spawn({
		let service = service.clone();

		async move { service.search_debounced(acceptance::search("a")).await }
	});

	tokio::time::sleep(Duration::from_millis(50)).await;

	let second = tokio::spawn({
		let service = service.clone();

		async move { service.search_debounced(acceptance::search("ab")).await }
	});

	tokio::time::sleep(Duration::from_millis(50)).await;

	let third = tokio::spawn({
		let service = service.clone();

		async move { service.search_debounced(acceptance::search("abc")).await }
	});
	let first = first.await.expect("Task panicked.").expect("Search failed.");
	let second = second.await.expect("Task panicked.").expect("Search failed.");
	let third = third.await.expect("Task panicked.").expect("Search failed.");

	assert!(first.is_none());
	assert!(second.is_none());

	let response = third.expect("Expected the final input to execute.");

	assert_eq!(response.ids, vec![saved.link_id]);
}

#[tokio::test(start_paused = true)]
async fn a_lone_input_executes_after_the_quiet_window() {
	let h = acceptance::harness("app").await;
	let saved = h
		.service
		.save_link(acceptance::save("Quiet Entry", "https://example.com/quiet"))
		.await
		.expect("Failed to save link.");

	h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	let response = h
		.service
		.search_debounced(acceptance::search("quiet"))
		.await
		.expect("Search failed.")
		.expect("Expected the lone input to execute.");

	assert_eq!(response.ids, vec![saved.link_id]);
}
