use time::OffsetDateTime;
use uuid::Uuid;

/// Position in the store's change log. Tokens are assigned by the log's
/// autoincrement rowid, so they are strictly increasing per store and stable
/// across restarts.
#[derive(
	Clone,
	Copy,
	Debug,
	PartialEq,
	Eq,
	PartialOrd,
	Ord,
	Hash,
	serde::Serialize,
	serde::Deserialize,
)]
#[serde(transparent)]
pub struct ChangeToken(pub i64);
impl ChangeToken {
	pub const fn value(self) -> i64 {
		self.0
	}
}
impl std::fmt::Display for ChangeToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
	Link,
	Tag,
}
impl EntityKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Link => "link",
			Self::Tag => "tag",
		}
	}

	pub fn parse(text: &str) -> Option<Self> {
		match text {
			"link" => Some(Self::Link),
			"tag" => Some(Self::Tag),
			_ => None,
		}
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChangeOp {
	Insert,
	Update,
	Delete,
}
impl ChangeOp {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Insert => "INSERT",
			Self::Update => "UPDATE",
			Self::Delete => "DELETE",
		}
	}

	pub fn parse(text: &str) -> Option<Self> {
		match text {
			"INSERT" => Some(Self::Insert),
			"UPDATE" => Some(Self::Update),
			"DELETE" => Some(Self::Delete),
			_ => None,
		}
	}
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct LinkRow {
	pub link_id: Uuid,
	pub title: String,
	pub url: String,
	pub note: String,
	pub favicon: Option<Vec<u8>>,
	pub latitude: Option<f64>,
	pub longitude: Option<f64>,
	pub locality: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct TagRow {
	pub tag_id: Uuid,
	pub name: String,
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct HistoryRow {
	pub token: i64,
	pub entity_id: Uuid,
	pub entity: String,
	pub op: String,
	pub author: String,
	pub ts: OffsetDateTime,
}
impl HistoryRow {
	pub fn change_token(&self) -> ChangeToken {
		ChangeToken(self.token)
	}

	pub fn entity_kind(&self) -> Option<EntityKind> {
		EntityKind::parse(&self.entity)
	}

	pub fn change_op(&self) -> Option<ChangeOp> {
		ChangeOp::parse(&self.op)
	}
}

#[derive(Clone, Copy, Debug, sqlx::FromRow)]
pub struct IndexStateRow {
	pub generation: i64,
	pub first_build_done: bool,
	pub old_index_purged: bool,
}
