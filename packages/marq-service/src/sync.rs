use std::{
	collections::HashMap,
	sync::{Arc, RwLock},
	time::Duration,
};

use time::OffsetDateTime;
use tokio::sync::{Mutex, Notify, watch};
use uuid::Uuid;

use crate::{Indexer, Result};
use marq_storage::{
	cursor::CursorFile,
	db::Db,
	history,
	models::{ChangeOp, ChangeToken, EntityKind, HistoryRow, LinkRow},
	queries,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncPhase {
	Idle,
	Fetching,
	Applying,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CycleReport {
	pub applied: u64,
	pub removed: u64,
	pub resynced: bool,
	pub cursor: Option<ChangeToken>,
}

#[derive(Clone, Debug)]
pub struct LinkSummary {
	pub title: String,
	pub url: String,
	pub updated_at: OffsetDateTime,
}

/// Process-local in-memory projection of live links, refreshed entry by
/// entry as history is applied. Readers get point-in-time copies; the store
/// remains the source of truth.
#[derive(Default)]
pub struct LiveView {
	links: RwLock<HashMap<Uuid, LinkSummary>>,
}
impl LiveView {
	pub fn get(&self, link_id: Uuid) -> Option<LinkSummary> {
		self.read().get(&link_id).cloned()
	}

	pub fn ids(&self) -> Vec<Uuid> {
		self.read().keys().copied().collect()
	}

	pub fn len(&self) -> usize {
		self.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.read().is_empty()
	}

	fn refresh(&self, link: &LinkRow) {
		self.write().insert(
			link.link_id,
			LinkSummary {
				title: link.title.clone(),
				url: link.url.clone(),
				updated_at: link.updated_at,
			},
		);
	}

	fn evict(&self, link_id: Uuid) {
		self.write().remove(&link_id);
	}

	fn replace_all(&self, links: &[LinkRow]) {
		let mut map = HashMap::with_capacity(links.len());

		for link in links {
			map.insert(
				link.link_id,
				LinkSummary {
					title: link.title.clone(),
					url: link.url.clone(),
					updated_at: link.updated_at,
				},
			);
		}

		*self.write() = map;
	}

	fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Uuid, LinkSummary>> {
		self.links.read().unwrap_or_else(|err| err.into_inner())
	}

	fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Uuid, LinkSummary>> {
		self.links.write().unwrap_or_else(|err| err.into_inner())
	}
}

/// Consumes the store's change log and keeps this client's live view and
/// index replica current. One cycle fetches everything after the persisted
/// cursor, applies it oldest-first, then advances the cursor to the last
/// applied token. Cycles are idempotent, so replaying after a crash between
/// apply and cursor write converges to the same state.
pub struct Reconciler {
	db: Db,
	indexer: Arc<Indexer>,
	cursor: CursorFile,
	live: Arc<LiveView>,
	phase: watch::Sender<SyncPhase>,
	running: Mutex<()>,
}
impl Reconciler {
	pub fn new(db: Db, indexer: Arc<Indexer>, cursor: CursorFile) -> Self {
		let (phase, _) = watch::channel(SyncPhase::Idle);

		Self { db, indexer, cursor, live: Arc::new(LiveView::default()), phase, running: Mutex::new(()) }
	}

	pub fn live(&self) -> Arc<LiveView> {
		self.live.clone()
	}

	pub fn phase(&self) -> watch::Receiver<SyncPhase> {
		self.phase.subscribe()
	}

	/// Runs one reconciliation cycle; this is also the manual trigger.
	/// Cycles serialize per process, and any failure leaves the cursor
	/// untouched so no entry is silently skipped.
	pub async fn run_cycle(&self) -> Result<CycleReport> {
		let _guard = self.running.lock().await;
		let result = self.cycle_inner().await;
		let _ = self.phase.send_replace(SyncPhase::Idle);

		result
	}

	/// Trigger-driven loop: wakes on the in-process change signal, and polls
	/// the store head so commits from other processes are picked up too. A
	/// signal that fires mid-cycle leaves its permit behind, so the loop
	/// runs again immediately instead of dropping the trigger.
	pub async fn run(self: Arc<Self>, trigger: Arc<Notify>, poll_interval: Duration) {
		let mut ticker = tokio::time::interval(poll_interval);

		ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

		loop {
			tokio::select! {
				_ = trigger.notified() => {},
				_ = ticker.tick() => {
					if !self.behind().await {
						continue;
					}
				},
			}

			if let Err(err) = self.run_cycle().await {
				tracing::error!(
					error = %err,
					"Reconciliation cycle failed. It will be retried on the next trigger."
				);
			}
		}
	}

	async fn cycle_inner(&self) -> Result<CycleReport> {
		let _ = self.phase.send_replace(SyncPhase::Fetching);

		let cursor = self.cursor.read().await;
		let mut entries = match history::fetch_after(&self.db, cursor).await {
			Ok(entries) => entries,
			Err(marq_storage::Error::StaleToken { cursor, floor }) => {
				tracing::warn!(
					%cursor,
					%floor,
					"Change cursor predates retained history. Falling back to a full resync."
				);

				return self.full_resync().await;
			},
			Err(err) => return Err(err.into()),
		};

		if entries.is_empty() {
			return Ok(CycleReport { cursor, ..Default::default() });
		}

		let _ = self.phase.send_replace(SyncPhase::Applying);

		// The store already orders by token; sort again so causal ordering
		// never depends on how the rows were fetched.
		entries.sort_by_key(|entry| entry.token);

		let mut report = CycleReport::default();

		for entry in &entries {
			self.apply(entry, &mut report).await?;
		}

		let last = entries[entries.len() - 1].change_token();

		if let Err(err) = self.cursor.write(last).await {
			tracing::warn!(
				error = %err,
				"Failed to persist the change cursor. The next cycle will re-apply recent entries."
			);
		}

		report.cursor = Some(last);

		Ok(report)
	}

	async fn apply(&self, entry: &HistoryRow, report: &mut CycleReport) -> Result<()> {
		match entry.entity_kind() {
			Some(EntityKind::Link) => {
				if entry.change_op() == Some(ChangeOp::Delete) {
					self.remove_link(entry.entity_id, report);

					return Ok(());
				}

				// Store reads abort the cycle (and cursor advance) on error;
				// a record that has vanished since the entry was logged is
				// treated as deleted.
				match queries::fetch_link(&self.db, entry.entity_id).await? {
					Some(link) => {
						self.live.refresh(&link);

						match self.indexer.apply_upsert(&link) {
							Ok(()) => report.applied += 1,
							Err(err) => {
								tracing::error!(
									error = %err,
									link_id = %link.link_id,
									"Failed to update the index entry. The next cycle for this link will retry."
								);
							},
						}
					},
					None => self.remove_link(entry.entity_id, report),
				}
			},
			Some(EntityKind::Tag) => {
				// Tags are not projected into the index; nothing to refresh.
				tracing::debug!(tag_id = %entry.entity_id, op = %entry.op, "Skipping tag entry.");
			},
			None => {
				tracing::warn!(entity = %entry.entity, "Skipping unknown history entity.");
			},
		}

		Ok(())
	}

	fn remove_link(&self, link_id: Uuid, report: &mut CycleReport) {
		self.live.evict(link_id);

		match self.indexer.apply_remove(link_id) {
			Ok(()) => report.removed += 1,
			Err(err) => {
				tracing::error!(
					error = %err,
					%link_id,
					"Failed to remove the index entry. The rebuild path will reconcile it."
				);
			},
		}
	}

	/// Recovers from a cursor that can no longer be resolved against the
	/// log: forget the cursor, rebuild the whole projection from a scan, and
	/// restart from the head observed before the scan. Anything committed
	/// mid-scan is replayed by the following cycle, which is harmless.
	async fn full_resync(&self) -> Result<CycleReport> {
		let _ = self.phase.send_replace(SyncPhase::Applying);

		if let Err(err) = self.cursor.clear().await {
			tracing::warn!(error = %err, "Failed to clear the stale change cursor.");
		}

		let head = history::head_token(&self.db).await?;
		let links = queries::all_links(&self.db).await?;

		self.live.replace_all(&links);

		let rebuild = self.indexer.reset_and_rebuild(&self.db).await?;

		if let Some(head) = head {
			if let Err(err) = self.cursor.write(head).await {
				tracing::warn!(
					error = %err,
					"Failed to persist the change cursor after resync. The next cycle will resync again."
				);
			}
		}

		Ok(CycleReport {
			applied: rebuild.indexed_count,
			removed: 0,
			resynced: true,
			cursor: head,
		})
	}

	async fn behind(&self) -> bool {
		let head = match history::head_token(&self.db).await {
			Ok(head) => head,
			Err(err) => {
				tracing::error!(error = %err, "Failed to read the store head token.");

				return false;
			},
		};
		let cursor = self.cursor.read().await;

		match (head, cursor) {
			(Some(head), Some(cursor)) => head > cursor,
			(Some(_), None) => true,
			(None, _) => false,
		}
	}
}
