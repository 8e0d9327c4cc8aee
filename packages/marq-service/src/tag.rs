use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, MarqService, RecordOp, Result, invalid};
use marq_domain::validate;
use marq_storage::{
	history,
	models::{ChangeOp, EntityKind, TagRow},
	queries,
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CreateTagRequest {
	pub name: String,
	pub author: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RenameTagRequest {
	pub tag_id: Uuid,
	pub name: String,
	pub author: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DeleteTagRequest {
	pub tag_id: Uuid,
	pub author: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TagResponse {
	pub tag_id: Uuid,
	pub op: RecordOp,
}

impl MarqService {
	/// Creates a tag, or returns the existing one for an already-used name.
	pub async fn create_tag(&self, req: CreateTagRequest) -> Result<TagResponse> {
		let now = OffsetDateTime::now_utc();
		let name = req.name.trim();
		let author = require_author(&req.author)?;

		validate::tag_name(name).map_err(invalid)?;

		let mut tx = self.db.pool.begin().await?;

		if let Some(existing) = queries::tag_by_name_tx(&mut tx, name).await? {
			tx.commit().await?;

			return Ok(TagResponse { tag_id: existing.tag_id, op: RecordOp::None });
		}

		let tag = TagRow { tag_id: Uuid::new_v4(), name: name.to_string(), created_at: now };

		queries::insert_tag_tx(&mut tx, &tag).await?;
		history::record_change_tx(&mut tx, tag.tag_id, EntityKind::Tag, ChangeOp::Insert, author, now)
			.await?;

		tx.commit().await?;

		self.notify_change();

		Ok(TagResponse { tag_id: tag.tag_id, op: RecordOp::Insert })
	}

	pub async fn rename_tag(&self, req: RenameTagRequest) -> Result<TagResponse> {
		let now = OffsetDateTime::now_utc();
		let name = req.name.trim();
		let author = require_author(&req.author)?;

		validate::tag_name(name).map_err(invalid)?;

		let mut tx = self.db.pool.begin().await?;
		let Some(tag) = queries::fetch_tag_tx(&mut tx, req.tag_id).await? else {
			return Err(Error::NotFound { message: format!("Tag {} does not exist.", req.tag_id) });
		};

		if tag.name == name {
			tx.commit().await?;

			return Ok(TagResponse { tag_id: tag.tag_id, op: RecordOp::None });
		}
		if queries::tag_by_name_tx(&mut tx, name).await?.is_some() {
			return Err(Error::InvalidRequest {
				message: format!("A tag named {name:?} already exists."),
			});
		}

		queries::rename_tag_tx(&mut tx, tag.tag_id, name).await?;
		history::record_change_tx(&mut tx, tag.tag_id, EntityKind::Tag, ChangeOp::Update, author, now)
			.await?;

		tx.commit().await?;

		self.notify_change();

		Ok(TagResponse { tag_id: tag.tag_id, op: RecordOp::Update })
	}

	pub async fn delete_tag(&self, req: DeleteTagRequest) -> Result<TagResponse> {
		let now = OffsetDateTime::now_utc();
		let author = require_author(&req.author)?;
		let mut tx = self.db.pool.begin().await?;

		if queries::fetch_tag_tx(&mut tx, req.tag_id).await?.is_none() {
			tx.commit().await?;

			return Ok(TagResponse { tag_id: req.tag_id, op: RecordOp::None });
		}

		queries::delete_tag_tx(&mut tx, req.tag_id).await?;
		history::record_change_tx(
			&mut tx,
			req.tag_id,
			EntityKind::Tag,
			ChangeOp::Delete,
			author,
			now,
		)
		.await?;

		tx.commit().await?;

		self.notify_change();

		Ok(TagResponse { tag_id: req.tag_id, op: RecordOp::Delete })
	}
}

fn require_author(author: &str) -> Result<&str> {
	let author = author.trim();

	if author.is_empty() {
		return Err(Error::InvalidRequest { message: "author is required.".to_string() });
	}

	Ok(author)
}
