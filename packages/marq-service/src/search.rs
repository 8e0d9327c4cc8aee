use std::{sync::atomic::Ordering, time::Duration};

use uuid::Uuid;

use crate::{MarqService, Result};
use marq_domain::query;
use marq_storage::queries;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
	pub text: String,
	pub limit: Option<usize>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SearchResponse {
	pub ids: Vec<Uuid>,
}

impl MarqService {
	/// Resolves a search immediately. Blank input means "no filter" and is
	/// answered from the store alone, so listing everything keeps working
	/// even when the index replica is stale or mid-rebuild. Non-blank input
	/// is matched against indexed titles, case- and diacritic-insensitively.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let limit = req.limit.unwrap_or(self.cfg.search.limit);

		if query::is_blank(&req.text) {
			let ids = queries::all_link_ids(&self.db).await?;

			return Ok(SearchResponse { ids });
		}

		let trimmed = req.text.trim();

		tracing::debug!(
			expression = %format!("title:\"{}\"", query::escape(trimmed)),
			"Executing title search."
		);

		let ids = self.index.query_title(trimmed, limit)?;

		Ok(SearchResponse { ids })
	}

	/// Per-keystroke entry point. Rapid consecutive calls coalesce: only the
	/// newest call still pending after the quiet window runs its query, and
	/// a superseded call returns `None` with its results discarded even when
	/// the query had already started.
	pub async fn search_debounced(&self, req: SearchRequest) -> Result<Option<SearchResponse>> {
		let seq = self.search_seq.fetch_add(1, Ordering::SeqCst) + 1;

		tokio::time::sleep(Duration::from_millis(self.cfg.search.debounce_ms)).await;

		if self.search_seq.load(Ordering::SeqCst) != seq {
			return Ok(None);
		}

		let response = self.search(req).await?;

		if self.search_seq.load(Ordering::SeqCst) != seq {
			return Ok(None);
		}

		Ok(Some(response))
	}
}
