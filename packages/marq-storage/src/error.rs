use crate::models::ChangeToken;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error(transparent)]
	Index(#[from] Box<tantivy::TantivyError>),
	#[error("File operation failed at {path:?}.")]
	Io { path: std::path::PathBuf, source: std::io::Error },
	#[error("Change cursor {cursor} predates retained history (purged through {floor}).")]
	StaleToken { cursor: ChangeToken, floor: ChangeToken },
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Not found: {0}")]
	NotFound(String),
}
impl From<tantivy::TantivyError> for Error {
	fn from(err: tantivy::TantivyError) -> Self {
		Self::Index(Box::new(err))
	}
}
