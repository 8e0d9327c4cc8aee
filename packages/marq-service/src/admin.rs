use time::OffsetDateTime;

use crate::{Indexer, MarqService, RebuildReport, Result};
use marq_domain::retention;
use marq_storage::history;

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct PurgeReport {
	pub purged_count: u64,
}

impl MarqService {
	/// Wipes and rebuilds this client's index replica from the store. Safe
	/// to run at any time; the index is a derived cache.
	pub async fn rebuild_index(&self) -> Result<RebuildReport> {
		let indexer = Indexer::new(self.index.clone());

		indexer.reset_and_rebuild(&self.db).await
	}

	/// Drops change-log entries past the retention window and advances the
	/// purge floor, which is what later marks abandoned cursors as stale.
	pub async fn purge_history(&self) -> Result<PurgeReport> {
		let horizon = retention::horizon(
			OffsetDateTime::now_utc(),
			self.cfg.sync.history_retention_days,
		);
		let purged_count = history::purge_before(&self.db, horizon).await?;

		if purged_count > 0 {
			tracing::info!(count = purged_count, "Purged expired change history.");
		}

		Ok(PurgeReport { purged_count })
	}
}
