pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0}")]
	Message(String),
	#[error(transparent)]
	Config(#[from] marq_config::Error),
	#[error(transparent)]
	Storage(#[from] marq_storage::Error),
	#[error(transparent)]
	Service(#[from] marq_service::Error),
}
