use crate::acceptance;
use marq_service::DeleteLinkRequest;

#[tokio::test]
async fn deleting_a_link_removes_its_index_entry_by_the_next_cycle() {
	let h = acceptance::harness("app").await;
	let saved = h
		.service
		.save_link(acceptance::save("Doomed Entry", "https://example.com/doomed"))
		.await
		.expect("Failed to save link.");
	let kept = h
		.service
		.save_link(acceptance::save("Kept Entry", "https://example.com/kept"))
		.await
		.expect("Failed to save link.");

	h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	let hits = h.service.search(acceptance::search("doomed")).await.expect("Search failed.");

	assert_eq!(hits.ids, vec![saved.link_id]);

	h.service
		.delete_link(DeleteLinkRequest { link_id: saved.link_id, author: "test".to_string() })
		.await
		.expect("Failed to delete link.");

	let report = h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	assert_eq!(report.removed, 1);

	let hits = h.service.search(acceptance::search("doomed")).await.expect("Search failed.");

	assert!(hits.ids.is_empty());

	let all = h.service.search(acceptance::search("")).await.expect("Search failed.");

	assert_eq!(all.ids, vec![kept.link_id]);
	assert_eq!(h.service.index.doc_count(), 1);
	assert!(h.reconciler.live().get(saved.link_id).is_none());
}

#[tokio::test]
async fn deleting_twice_is_harmless() {
	let h = acceptance::harness("app").await;
	let saved = h
		.service
		.save_link(acceptance::save("Once", "https://example.com/once"))
		.await
		.expect("Failed to save link.");

	h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	let request = DeleteLinkRequest { link_id: saved.link_id, author: "test".to_string() };
	let first = h.service.delete_link(request.clone()).await.expect("Failed to delete link.");
	let second = h.service.delete_link(request).await.expect("Failed to delete link.");

	assert_eq!(first.op, marq_service::RecordOp::Delete);
	assert_eq!(second.op, marq_service::RecordOp::None);

	h.reconciler.run_cycle().await.expect("Reconciliation failed.");

	assert_eq!(h.service.index.doc_count(), 0);
}
