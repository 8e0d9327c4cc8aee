use time::OffsetDateTime;
use uuid::Uuid;

use crate::acceptance;
use marq_storage::models::ChangeToken;

async fn log_entry(pool: &sqlx::SqlitePool, token: i64, entity_id: Uuid, op: &str) {
	sqlx::query(
		"INSERT INTO change_log (token, entity_id, entity, op, author, ts) \
		 VALUES (?, ?, 'link', ?, 'test', ?)",
	)
	.bind(token)
	.bind(entity_id)
	.bind(op)
	.bind(OffsetDateTime::now_utc())
	.execute(pool)
	.await
	.expect("Failed to insert history entry.");
}

#[tokio::test]
async fn entries_apply_in_token_order_regardless_of_arrival_order() {
	let h = acceptance::harness("app").await;
	let saved = h
		.service
		.save_link(acceptance::save("Ordered Entry", "https://example.com/"))
		.await
		.expect("Failed to save link.");

	h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	// Tokens 2..4 land in the log in scrambled arrival order. Applied by
	// token, the sequence is insert, delete, insert, so the entry must end
	// up present; applied by arrival it would end deleted.
	let pool = &h.service.db.pool;

	log_entry(pool, 4, saved.link_id, "INSERT").await;
	log_entry(pool, 2, saved.link_id, "INSERT").await;
	log_entry(pool, 3, saved.link_id, "DELETE").await;

	let report = h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	assert_eq!(report.cursor, Some(ChangeToken(4)));
	assert_eq!(h.service.index.doc_count(), 1);

	let hits = h.service.search(acceptance::search("ordered")).await.expect("Search failed.");

	assert_eq!(hits.ids, vec![saved.link_id]);
}
