pub mod admin;
pub mod delete;
pub mod fetch;
pub mod indexer;
pub mod list;
pub mod save_link;
pub mod search;
pub mod sync;
pub mod tag;
pub mod time_serde;

use std::sync::{
	Arc,
	atomic::AtomicU64,
};

use tokio::sync::Notify;

pub use admin::PurgeReport;
pub use delete::{DeleteLinkRequest, DeleteLinkResponse};
pub use fetch::{FetchLinkRequest, LinkDetail};
pub use indexer::{Indexer, RebuildReport};
pub use list::{ListItem, ListRequest, ListResponse};
pub use save_link::{SaveLinkRequest, SaveLinkResponse};
pub use search::{SearchRequest, SearchResponse};
pub use sync::{CycleReport, LiveView, Reconciler, SyncPhase};
pub use tag::{CreateTagRequest, DeleteTagRequest, RenameTagRequest, TagResponse};

use marq_storage::{db::Db, index::SearchIndex};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordOp {
	Insert,
	Update,
	Delete,
	None,
}

#[derive(Debug)]
pub enum Error {
	InvalidRequest { message: String },
	NotFound { message: String },
	Storage { message: String },
	Index { message: String },
}

/// Facade every caller-facing surface goes through: record operations write
/// to the shared store and fire the in-process change notification; searches
/// read the client's index replica or the store directly.
pub struct MarqService {
	pub cfg: marq_config::Config,
	pub db: Db,
	pub index: Arc<SearchIndex>,
	changes: Arc<Notify>,
	search_seq: AtomicU64,
}
impl MarqService {
	pub fn new(cfg: marq_config::Config, db: Db, index: Arc<SearchIndex>) -> Self {
		Self { cfg, db, index, changes: Arc::new(Notify::new()), search_seq: AtomicU64::new(0) }
	}

	/// Signal fired after every committed mutation; the reconciler loop uses
	/// it as its trigger. `Notify` keeps a single permit, so triggers that
	/// arrive mid-cycle coalesce instead of piling up.
	pub fn change_signal(&self) -> Arc<Notify> {
		self.changes.clone()
	}

	pub(crate) fn notify_change(&self) {
		self.changes.notify_one();
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::InvalidRequest { message } => write!(f, "Invalid request: {message}"),
			Self::NotFound { message } => write!(f, "Not found: {message}"),
			Self::Storage { message } => write!(f, "Storage error: {message}"),
			Self::Index { message } => write!(f, "Index error: {message}"),
		}
	}
}

impl std::error::Error for Error {}

impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<marq_storage::Error> for Error {
	fn from(err: marq_storage::Error) -> Self {
		match err {
			marq_storage::Error::Index(err) => Self::Index { message: err.to_string() },
			marq_storage::Error::NotFound(message) => Self::NotFound { message },
			err => Self::Storage { message: err.to_string() },
		}
	}
}

pub(crate) fn reject_message(code: marq_domain::validate::RejectCode) -> &'static str {
	use marq_domain::validate::RejectCode;
	match code {
		RejectCode::RejectEmptyTitle => "Link title must be non-empty.",
		RejectCode::RejectTitleTooLong => "Link title is too long.",
		RejectCode::RejectNoteTooLong => "Link note is too long.",
		RejectCode::RejectInvalidUrl => "Link URL is not a valid absolute URL.",
		RejectCode::RejectEmptyTag => "Tag name must be non-empty.",
		RejectCode::RejectTagTooLong => "Tag name is too long.",
	}
}

pub(crate) fn invalid(code: marq_domain::validate::RejectCode) -> Error {
	Error::InvalidRequest { message: reject_message(code).to_string() }
}
