use crate::{MarqService, Result};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListRequest {
	/// Restrict to links carrying this tag name.
	pub tag: Option<String>,
	pub limit: Option<u32>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct ListItem {
	pub link_id: uuid::Uuid,
	pub title: String,
	pub url: String,
	pub note: String,
	pub locality: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: time::OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: time::OffsetDateTime,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListResponse {
	pub items: Vec<ListItem>,
}

impl MarqService {
	pub async fn list(&self, req: ListRequest) -> Result<ListResponse> {
		let mut builder = sqlx::QueryBuilder::new(
			"SELECT l.link_id, l.title, l.url, l.note, l.locality, l.created_at, l.updated_at \
			 FROM links l",
		);

		if let Some(tag) = &req.tag {
			builder.push(
				" JOIN link_tags lt ON lt.link_id = l.link_id \
				 JOIN tags t ON t.tag_id = lt.tag_id AND t.name = ",
			);
			builder.push_bind(tag.trim());
		}

		builder.push(" ORDER BY l.updated_at DESC");

		if let Some(limit) = req.limit {
			builder.push(" LIMIT ");
			builder.push_bind(limit);
		}

		let items: Vec<ListItem> = builder.build_query_as().fetch_all(&self.db.pool).await?;

		Ok(ListResponse { items })
	}
}
