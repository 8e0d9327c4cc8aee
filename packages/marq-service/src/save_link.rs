use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, MarqService, RecordOp, Result, invalid};
use marq_domain::validate;
use marq_storage::{
	history,
	models::{ChangeOp, EntityKind, LinkRow, TagRow},
	queries,
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SaveLinkRequest {
	/// Absent for a new link; present to update an existing one.
	pub link_id: Option<Uuid>,
	pub title: String,
	pub url: String,
	#[serde(default)]
	pub note: String,
	#[serde(default)]
	pub favicon: Option<Vec<u8>>,
	#[serde(default)]
	pub latitude: Option<f64>,
	#[serde(default)]
	pub longitude: Option<f64>,
	#[serde(default)]
	pub locality: Option<String>,
	#[serde(default)]
	pub tags: Vec<String>,
	pub author: String,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SaveLinkResponse {
	pub link_id: Uuid,
	pub op: RecordOp,
}

impl MarqService {
	/// Creates or updates a link, resolves its tag names (creating missing
	/// tags), and records history entries for every touched record in the
	/// same transaction. Errors here surface to the caller; this is the one
	/// path where the user sees storage failures.
	pub async fn save_link(&self, req: SaveLinkRequest) -> Result<SaveLinkResponse> {
		let now = OffsetDateTime::now_utc();
		let title = req.title.trim();
		let author = req.author.trim();

		validate::link_title(title).map_err(invalid)?;
		validate::link_note(&req.note).map_err(invalid)?;

		let url = validate::link_url(&req.url).map_err(invalid)?;

		if author.is_empty() {
			return Err(Error::InvalidRequest { message: "author is required.".to_string() });
		}

		let mut tag_names = Vec::new();

		for name in &req.tags {
			let name = name.trim();

			validate::tag_name(name).map_err(invalid)?;

			if !tag_names.iter().any(|existing: &String| existing == name) {
				tag_names.push(name.to_string());
			}
		}

		let mut tx = self.db.pool.begin().await?;
		let (link_id, op) = match req.link_id {
			Some(link_id) => {
				let Some(mut link) = queries::fetch_link_tx(&mut tx, link_id).await? else {
					return Err(Error::NotFound {
						message: format!("Link {link_id} does not exist."),
					});
				};

				link.title = title.to_string();
				link.url = url.to_string();
				link.note = req.note.clone();
				link.favicon = req.favicon.clone();
				link.latitude = req.latitude;
				link.longitude = req.longitude;
				link.locality = req.locality.clone();
				link.updated_at = now;

				queries::update_link_tx(&mut tx, &link).await?;
				history::record_change_tx(
					&mut tx,
					link_id,
					EntityKind::Link,
					ChangeOp::Update,
					author,
					now,
				)
				.await?;

				(link_id, RecordOp::Update)
			},
			None => {
				let link = LinkRow {
					link_id: Uuid::new_v4(),
					title: title.to_string(),
					url: url.to_string(),
					note: req.note.clone(),
					favicon: req.favicon.clone(),
					latitude: req.latitude,
					longitude: req.longitude,
					locality: req.locality.clone(),
					created_at: now,
					updated_at: now,
				};

				queries::insert_link_tx(&mut tx, &link).await?;
				history::record_change_tx(
					&mut tx,
					link.link_id,
					EntityKind::Link,
					ChangeOp::Insert,
					author,
					now,
				)
				.await?;

				(link.link_id, RecordOp::Insert)
			},
		};
		let mut tag_ids = Vec::with_capacity(tag_names.len());

		for name in &tag_names {
			let tag = match queries::tag_by_name_tx(&mut tx, name).await? {
				Some(tag) => tag,
				None => {
					let tag =
						TagRow { tag_id: Uuid::new_v4(), name: name.clone(), created_at: now };

					queries::insert_tag_tx(&mut tx, &tag).await?;
					history::record_change_tx(
						&mut tx,
						tag.tag_id,
						EntityKind::Tag,
						ChangeOp::Insert,
						author,
						now,
					)
					.await?;

					tag
				},
			};

			tag_ids.push(tag.tag_id);
		}

		queries::replace_link_tags_tx(&mut tx, link_id, &tag_ids).await?;

		tx.commit().await?;

		self.notify_change();

		Ok(SaveLinkResponse { link_id, op })
	}
}
