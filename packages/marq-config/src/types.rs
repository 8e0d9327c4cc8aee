use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub client: Client,
	pub storage: Storage,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub sync: Sync,
	pub service: Service,
}
impl Config {
	/// The shared store file every process opens.
	pub fn db_path(&self) -> PathBuf {
		self.storage.container_dir.join("marq.db")
	}

	/// This client's search-index replica directory.
	pub fn index_dir(&self) -> PathBuf {
		self.storage.container_dir.join("index").join(&self.client.id)
	}
}

#[derive(Debug, Deserialize)]
pub struct Client {
	/// Logical client name ("app", "worker", ...). Each client keeps its own
	/// change cursor and index replica under the container directory.
	pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub container_dir: PathBuf,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Search {
	#[serde(default = "default_debounce_ms")]
	pub debounce_ms: u64,
	#[serde(default = "default_search_limit")]
	pub limit: usize,
}
impl Default for Search {
	fn default() -> Self {
		Self { debounce_ms: default_debounce_ms(), limit: default_search_limit() }
	}
}

#[derive(Debug, Deserialize)]
pub struct Sync {
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	#[serde(default = "default_history_retention_days")]
	pub history_retention_days: i64,
}
impl Default for Sync {
	fn default() -> Self {
		Self {
			poll_interval_ms: default_poll_interval_ms(),
			history_retention_days: default_history_retention_days(),
		}
	}
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub log_level: String,
}

fn default_debounce_ms() -> u64 {
	300
}

fn default_search_limit() -> usize {
	64
}

fn default_poll_interval_ms() -> u64 {
	500
}

fn default_history_retention_days() -> i64 {
	7
}
