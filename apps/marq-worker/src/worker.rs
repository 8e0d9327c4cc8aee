use std::{sync::Arc, time::Duration};

use tokio::time as tokio_time;

use crate::Result;
use marq_service::{Indexer, MarqService, Reconciler};
use marq_storage::{cursor::CursorFile, db::Db, index::SearchIndex};

const PURGE_INTERVAL_SECONDS: u64 = 900;

/// Long-running reconciliation client: keeps its index replica and cursor
/// current against the shared store and enforces the history retention
/// window. Runs until the process is stopped.
pub async fn run(cfg: marq_config::Config) -> Result<()> {
	let db = Db::open(&cfg.storage).await?;

	db.ensure_schema().await?;

	let index = Arc::new(SearchIndex::open(&cfg.index_dir())?);
	let indexer = Arc::new(Indexer::new(index.clone()));

	indexer.ensure_ready(&db).await?;

	let cursor = CursorFile::new(&cfg.storage.container_dir, &cfg.client.id);
	let poll_interval = Duration::from_millis(cfg.sync.poll_interval_ms);
	let reconciler = Arc::new(Reconciler::new(db.clone(), indexer, cursor));
	let service = MarqService::new(cfg, db, index);
	let trigger = service.change_signal();
	let live = reconciler.live();

	tokio::spawn(reconciler.run(trigger, poll_interval));
	tracing::info!("Worker started.");

	let mut ticker = tokio_time::interval(Duration::from_secs(PURGE_INTERVAL_SECONDS));

	loop {
		ticker.tick().await;

		match service.purge_history().await {
			Ok(report) =>
				if report.purged_count > 0 {
					tracing::info!(count = report.purged_count, "History purge completed.");
				},
			Err(err) => {
				tracing::error!(error = %err, "History purge failed.");
			},
		}

		tracing::debug!(links = live.len(), "Worker heartbeat.");
	}
}
