use std::sync::{
	Arc,
	atomic::{AtomicBool, Ordering},
};

use uuid::Uuid;

use crate::Result;
use marq_storage::{
	db::Db,
	index::{INDEX_GENERATION, IndexEntry, SearchIndex},
	models::LinkRow,
	queries,
};

#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct RebuildReport {
	pub indexed_count: u64,
	pub error_count: u64,
}

/// Applies index mutations for one client's replica. The gate exists so a
/// reset can pause mutation application while the whole index is being
/// deleted; skipped mutations are recovered by the rebuild that follows
/// every reset.
pub struct Indexer {
	index: Arc<SearchIndex>,
	active: AtomicBool,
}
impl Indexer {
	pub fn new(index: Arc<SearchIndex>) -> Self {
		Self { index, active: AtomicBool::new(true) }
	}

	pub fn start(&self) {
		self.active.store(true, Ordering::SeqCst);
	}

	pub fn stop(&self) {
		self.active.store(false, Ordering::SeqCst);
	}

	pub fn is_active(&self) -> bool {
		self.active.load(Ordering::SeqCst)
	}

	/// Upserts one link's projection; idempotent per link id.
	pub fn apply_upsert(&self, link: &LinkRow) -> Result<()> {
		if !self.is_active() {
			return Ok(());
		}

		self.index.upsert(&projection(link))?;

		Ok(())
	}

	/// Drops the projection for a link that no longer exists; a missing
	/// entry is a no-op.
	pub fn apply_remove(&self, link_id: Uuid) -> Result<()> {
		if !self.is_active() {
			return Ok(());
		}

		self.index.remove(link_id)?;

		Ok(())
	}

	/// Deletes every entry and re-indexes every current link. Used for the
	/// one-time generation migration and as the stale-cursor fallback.
	pub async fn reset_and_rebuild(&self, db: &Db) -> Result<RebuildReport> {
		self.stop();

		let wiped = self.index.wipe();

		self.start();

		wiped?;

		self.rebuild(db).await
	}

	/// One-time startup transitions, driven by the persisted index state:
	/// wipe a stale generation, then run the first full build. Each flag is
	/// written only after its action completes, so an interrupted transition
	/// simply reruns.
	pub async fn ensure_ready(&self, db: &Db) -> Result<()> {
		let state = queries::index_state(db).await?;

		if state.generation < INDEX_GENERATION || !state.old_index_purged {
			tracing::info!(
				from = state.generation,
				to = INDEX_GENERATION,
				"Purging previous search index generation."
			);

			let report = self.reset_and_rebuild(db).await?;

			queries::mark_old_index_purged(db, INDEX_GENERATION).await?;

			if report.error_count > 0 {
				tracing::warn!(
					errors = report.error_count,
					"Generation rebuild left gaps. The build will rerun at next startup."
				);

				return Ok(());
			}

			queries::mark_first_build_done(db).await?;
			tracing::info!(
				indexed = report.indexed_count,
				"Rebuilt the search index for the current generation."
			);

			return Ok(());
		}
		if !state.first_build_done {
			let report = self.rebuild(db).await?;

			if report.error_count > 0 {
				tracing::warn!(
					errors = report.error_count,
					"Initial index build left gaps. It will rerun at next startup."
				);

				return Ok(());
			}

			queries::mark_first_build_done(db).await?;
			tracing::info!(indexed = report.indexed_count, "Completed initial index build.");
		}

		Ok(())
	}

	async fn rebuild(&self, db: &Db) -> Result<RebuildReport> {
		let links = queries::all_links(db).await?;
		let mut indexed_count = 0_u64;
		let mut error_count = 0_u64;

		for link in &links {
			match self.index.upsert(&projection(link)) {
				Ok(()) => indexed_count += 1,
				Err(err) => {
					tracing::error!(error = %err, link_id = %link.link_id, "Failed to index link.");

					error_count += 1;
				},
			}
		}

		Ok(RebuildReport { indexed_count, error_count })
	}
}

fn projection(link: &LinkRow) -> IndexEntry {
	IndexEntry {
		link_id: link.link_id,
		title: link.title.clone(),
		url: link.url.clone(),
		note: link.note.clone(),
		locality: link.locality.clone(),
	}
}
