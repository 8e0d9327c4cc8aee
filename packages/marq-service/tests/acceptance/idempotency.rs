use crate::acceptance;
use marq_service::SyncPhase;

#[tokio::test]
async fn replaying_history_converges_to_the_same_state() {
	let h = acceptance::harness("app").await;
	let first = h
		.service
		.save_link(acceptance::save("Rust Blog", "https://blog.rust-lang.org/"))
		.await
		.expect("Failed to save link.");
	let _ = h
		.service
		.save_link(acceptance::save("Tokio Docs", "https://tokio.rs/"))
		.await
		.expect("Failed to save link.");
	let report = h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	assert_eq!(report.applied, 2);

	let cursor_after = report.cursor.expect("Expected an advanced cursor.");
	let all_once = acceptance::sorted(
		h.service.search(acceptance::search("")).await.expect("Search failed.").ids,
	);
	let count_once = h.service.index.doc_count();

	// Simulate a crash between apply and cursor persist: the cursor is gone,
	// so the whole log replays.
	acceptance::cursor_of(&h.service).clear().await.expect("Failed to clear cursor.");

	let report = h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	assert_eq!(report.applied, 2);
	assert_eq!(report.cursor, Some(cursor_after));
	assert_eq!(h.service.index.doc_count(), count_once);

	let all_twice = acceptance::sorted(
		h.service.search(acceptance::search("")).await.expect("Search failed.").ids,
	);

	assert_eq!(all_twice, all_once);
	assert_eq!(h.reconciler.live().len(), 2);

	let hits = h.service.search(acceptance::search("rust blog")).await.expect("Search failed.");

	assert_eq!(hits.ids, vec![first.link_id]);

	// Failure or success, a finished cycle always parks back at idle.
	assert_eq!(*h.reconciler.phase().borrow(), SyncPhase::Idle);
}

#[tokio::test]
async fn the_cursor_never_moves_backwards() {
	let h = acceptance::harness("app").await;

	h.service
		.save_link(acceptance::save("One", "https://example.com/1"))
		.await
		.expect("Failed to save link.");

	let first = h
		.reconciler
		.run_cycle()
		.await
		.expect("Reconciliation failed.")
		.cursor
		.expect("Expected a cursor.");

	// An empty cycle keeps the cursor where it is.
	let idle = h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	assert_eq!(idle.cursor, Some(first));
	assert_eq!(idle.applied, 0);

	h.service
		.save_link(acceptance::save("Two", "https://example.com/2"))
		.await
		.expect("Failed to save link.");

	let second = h
		.reconciler
		.run_cycle()
		.await
		.expect("Reconciliation failed.")
		.cursor
		.expect("Expected a cursor.");

	assert!(second > first);
}
