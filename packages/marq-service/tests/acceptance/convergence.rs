use crate::acceptance;

#[tokio::test]
async fn the_index_matches_the_store_after_one_cycle() {
	let h = acceptance::harness("app").await;
	let rust = h
		.service
		.save_link(acceptance::save("Rust Blog", "https://blog.rust-lang.org/"))
		.await
		.expect("Failed to save link.");
	let cafe = h
		.service
		.save_link(acceptance::save("Café Crème Guide", "https://example.com/cafe"))
		.await
		.expect("Failed to save link.");
	let tokio_link = h
		.service
		.save_link(acceptance::save("Tokio Tutorial", "https://tokio.rs/"))
		.await
		.expect("Failed to save link.");

	h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	let all = h.service.search(acceptance::search("")).await.expect("Search failed.");

	assert_eq!(
		acceptance::sorted(all.ids),
		acceptance::sorted(vec![rust.link_id, cafe.link_id, tokio_link.link_id])
	);

	// Title substrings hit their link and nothing else, case- and
	// diacritic-insensitively.
	let hits = h.service.search(acceptance::search("cafe creme")).await.expect("Search failed.");

	assert_eq!(hits.ids, vec![cafe.link_id]);

	let hits = h.service.search(acceptance::search("tokio tut")).await.expect("Search failed.");

	assert_eq!(hits.ids, vec![tokio_link.link_id]);

	let hits = h.service.search(acceptance::search("smalltalk")).await.expect("Search failed.");

	assert!(hits.ids.is_empty());
}

#[tokio::test]
async fn a_second_client_converges_through_its_own_cursor() {
	let h = acceptance::harness("app").await;
	let saved = h
		.service
		.save_link(acceptance::save("Shared Entry", "https://example.com/"))
		.await
		.expect("Failed to save link.");

	h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	// The worker-side client has its own cursor and replica; one cycle
	// brings it to the same visible state without any coordination.
	let (worker_service, worker_reconciler, _) = acceptance::attach(&h.store, "worker").await;

	assert_eq!(worker_service.index.doc_count(), 0);

	worker_reconciler.run_cycle().await.expect("Reconciliation failed.");

	let hits =
		worker_service.search(acceptance::search("shared")).await.expect("Search failed.");

	assert_eq!(hits.ids, vec![saved.link_id]);
	assert_eq!(worker_reconciler.live().len(), 1);
}
