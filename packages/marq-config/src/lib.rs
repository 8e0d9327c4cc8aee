mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Client, Config, Search, Service, Storage, Sync};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.client.id.is_empty() {
		return Err(Error::Validation { message: "client.id must be non-empty.".to_string() });
	}
	if cfg.client.id.contains(['/', '\\']) {
		return Err(Error::Validation {
			message: "client.id must not contain path separators.".to_string(),
		});
	}
	if cfg.storage.container_dir.as_os_str().is_empty() {
		return Err(Error::Validation {
			message: "storage.container_dir must be non-empty.".to_string(),
		});
	}
	if cfg.storage.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.search.debounce_ms == 0 {
		return Err(Error::Validation {
			message: "search.debounce_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.search.limit == 0 {
		return Err(Error::Validation {
			message: "search.limit must be greater than zero.".to_string(),
		});
	}
	if cfg.sync.poll_interval_ms == 0 {
		return Err(Error::Validation {
			message: "sync.poll_interval_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.sync.history_retention_days <= 0 {
		return Err(Error::Validation {
			message: "sync.history_retention_days must be greater than zero.".to_string(),
		});
	}
	if cfg.service.log_level.trim().is_empty() {
		return Err(Error::Validation { message: "service.log_level must be non-empty.".to_string() });
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.client.id = cfg.client.id.trim().to_string();
	cfg.service.log_level = cfg.service.log_level.trim().to_string();
}
