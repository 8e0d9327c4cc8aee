use uuid::Uuid;

use crate::{Error, MarqService, Result};
use marq_storage::queries;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FetchLinkRequest {
	pub link_id: Uuid,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LinkDetail {
	pub link_id: Uuid,
	pub title: String,
	pub url: String,
	pub note: String,
	pub favicon: Option<Vec<u8>>,
	pub latitude: Option<f64>,
	pub longitude: Option<f64>,
	pub locality: Option<String>,
	pub tags: Vec<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: time::OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: time::OffsetDateTime,
}

impl MarqService {
	pub async fn fetch_link(&self, req: FetchLinkRequest) -> Result<LinkDetail> {
		let Some(link) = queries::fetch_link(&self.db, req.link_id).await? else {
			return Err(Error::NotFound {
				message: format!("Link {} does not exist.", req.link_id),
			});
		};
		let tags = queries::link_tag_names(&self.db, link.link_id).await?;

		Ok(LinkDetail {
			link_id: link.link_id,
			title: link.title,
			url: link.url,
			note: link.note,
			favicon: link.favicon,
			latitude: link.latitude,
			longitude: link.longitude,
			locality: link.locality,
			tags,
			created_at: link.created_at,
			updated_at: link.updated_at,
		})
	}
}
