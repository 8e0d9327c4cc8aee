use time::{Duration, OffsetDateTime};

use crate::acceptance;
use marq_storage::models::ChangeToken;

async fn age_history(pool: &sqlx::SqlitePool, days: i64) {
	let old = OffsetDateTime::now_utc() - Duration::days(days);

	sqlx::query("UPDATE change_log SET ts = ?")
		.bind(old)
		.execute(pool)
		.await
		.expect("Failed to age history.");
}

#[tokio::test]
async fn a_stale_cursor_falls_back_to_a_full_resync() {
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

	// Both entries fall out of the retention window and get purged, then a
	// newer write lands on top.
	age_history(&h.service.db.pool, 10).await;

	let purged = h.service.purge_history().await.expect("Failed to purge history.");

	assert_eq!(purged.purged_count, 2);

	let third = h
		.service
		.save_link(acceptance::save("Third Entry", "https://example.com/3"))
		.await
		.expect("Failed to save link.");

	// Rewind the cursor below the purge floor, as if this client had been
	// offline since before the purge.
	acceptance::cursor_of(&h.service)
		.write(ChangeToken(1))
		.await
		.expect("Failed to rewind cursor.");

	let report = h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	assert!(report.resynced);
	assert_eq!(report.cursor, Some(ChangeToken(3)));

	let all = h.service.search(acceptance::search("")).await.expect("Search failed.");

	assert_eq!(
		acceptance::sorted(all.ids),
		acceptance::sorted(vec![first.link_id, second.link_id, third.link_id])
	);

	let hits = h.service.search(acceptance::search("third")).await.expect("Search failed.");

	assert_eq!(hits.ids, vec![third.link_id]);
	assert_eq!(acceptance::cursor_of(&h.service).read().await, Some(ChangeToken(3)));
	assert_eq!(h.reconciler.live().len(), 3);
}

#[tokio::test]
async fn a_fresh_client_on_a_purged_store_resyncs_from_a_scan() {
	let h = acceptance::harness("app").await;

	h.service
		.save_link(acceptance::save("Old Entry", "https://example.com/old"))
		.await
		.expect("Failed to save link.");
	h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	age_history(&h.service.db.pool, 10).await;

	let purged = h.service.purge_history().await.expect("Failed to purge history.");

	assert_eq!(purged.purged_count, 1);

	// A client with no cursor at all cannot replay purged history either;
	// it must land on a scan, not an error.
	let (widget_service, widget_reconciler, _) = acceptance::attach(&h.store, "widget").await;
	let report = widget_reconciler.run_cycle().await.expect("Reconciliation failed.");

	assert!(report.resynced);

	let hits = widget_service.search(acceptance::search("old")).await.expect("Search failed.");

	assert_eq!(hits.ids.len(), 1);
}
