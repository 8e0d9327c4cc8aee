use crate::acceptance;
use marq_storage::{index::INDEX_GENERATION, models::IndexStateRow};

#[tokio::test]
async fn rebuild_restores_a_drifted_replica() {
	let h = acceptance::harness("app").await;
	let first = h
		.service
		.save_link(acceptance::save("First Entry", "https://example.com/1"))
		.await
		.expect("Failed to save link.");
	let second = h
		.service
		.save_link(acceptance::save("Second Entry", "https://example.com/2"))
		.await
		.expect("Failed to save link.");

	h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	// Knock one entry out from under the store to create drift.
	h.service.index.remove(first.link_id).expect("Failed to remove entry.");

	assert_eq!(h.service.index.doc_count(), 1);

	let report = h.service.rebuild_index().await.expect("Rebuild failed.");

	assert_eq!(report.indexed_count, 2);
	assert_eq!(report.error_count, 0);
	assert_eq!(h.service.index.doc_count(), 2);

	let all = h.service.search(acceptance::search("")).await.expect("Search failed.");

	assert_eq!(
		acceptance::sorted(all.ids),
		acceptance::sorted(vec![first.link_id, second.link_id])
	);
}

#[tokio::test]
async fn startup_transitions_complete_and_stick() {
	let h = acceptance::harness("app").await;

	// harness() already ran ensure_ready on a fresh store; both one-time
	// transitions must be recorded as complete.
	let state = sqlx::query_as::<_, IndexStateRow>(
		"SELECT generation, first_build_done, old_index_purged FROM index_state WHERE id = 1",
	)
	.fetch_one(&h.service.db.pool)
	.await
	.expect("Failed to read index state.");

	assert_eq!(state.generation, INDEX_GENERATION);
	assert!(state.first_build_done);
	assert!(state.old_index_purged);

	h.service
		.save_link(acceptance::save("Entry", "https://example.com/"))
		.await
		.expect("Failed to save link.");
	h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	// Re-running the transitions is a no-op once the flags are set.
	h.indexer.ensure_ready(&h.service.db).await.expect("Failed to re-run transitions.");

	assert_eq!(h.service.index.doc_count(), 1);
}

#[tokio::test]
async fn a_stopped_indexer_skips_mutations_until_rebuilt() {
	let h = acceptance::harness("app").await;

	h.indexer.stop();
	h.service
		.save_link(acceptance::save("Paused Entry", "https://example.com/paused"))
		.await
		.expect("Failed to save link.");
	h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	assert_eq!(h.service.index.doc_count(), 0);

	h.indexer.start();

	let report = h.service.rebuild_index().await.expect("Rebuild failed.");

	assert_eq!(report.indexed_count, 1);
	assert_eq!(h.service.index.doc_count(), 1);
}
