use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, MarqService, RecordOp, Result};
use marq_storage::{
	history,
	models::{ChangeOp, EntityKind},
	queries,
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DeleteLinkRequest {
	pub link_id: Uuid,
	pub author: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DeleteLinkResponse {
	pub link_id: Uuid,
	pub op: RecordOp,
}

impl MarqService {
	pub async fn delete_link(&self, req: DeleteLinkRequest) -> Result<DeleteLinkResponse> {
		let now = OffsetDateTime::now_utc();
		let author = req.author.trim();

		if author.is_empty() {
			return Err(Error::InvalidRequest { message: "author is required.".to_string() });
		}

		let mut tx = self.db.pool.begin().await?;

		if queries::fetch_link_tx(&mut tx, req.link_id).await?.is_none() {
			tx.commit().await?;

			return Ok(DeleteLinkResponse { link_id: req.link_id, op: RecordOp::None });
		}

		queries::delete_link_tx(&mut tx, req.link_id).await?;
		history::record_change_tx(
			&mut tx,
			req.link_id,
			EntityKind::Link,
			ChangeOp::Delete,
			author,
			now,
		)
		.await?;

		tx.commit().await?;

		self.notify_change();

		Ok(DeleteLinkResponse { link_id: req.link_id, op: RecordOp::Delete })
	}
}
