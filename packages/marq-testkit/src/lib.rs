mod error;

pub use error::{Error, Result};

use std::path::Path;

use tempfile::TempDir;

/// Disposable container directory for tests: the store file, cursor files,
/// and index replicas all live under one temp dir that is removed on drop.
pub struct TestStore {
	dir: TempDir,
}
impl TestStore {
	pub fn new() -> Result<Self> {
		let dir = TempDir::new()
			.map_err(|err| Error::Message(format!("Failed to create test container: {err}.")))?;

		Ok(Self { dir })
	}

	pub fn container_dir(&self) -> &Path {
		self.dir.path()
	}

	/// A ready-to-use config rooted at this container. The debounce window
	/// stays at the production default so timing tests exercise real values;
	/// the poll interval is shortened to keep cross-process tests quick.
	pub fn config(&self, client_id: &str) -> marq_config::Config {
		marq_config::Config {
			client: marq_config::Client { id: client_id.to_string() },
			storage: marq_config::Storage {
				container_dir: self.dir.path().to_path_buf(),
				pool_max_conns: 2,
			},
			search: marq_config::Search { debounce_ms: 300, limit: 64 },
			sync: marq_config::Sync { poll_interval_ms: 50, history_retention_days: 7 },
			service: marq_config::Service { log_level: "info".to_string() },
		}
	}
}
