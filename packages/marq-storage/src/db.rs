use std::{path::Path, time::Duration};

use sqlx::{
	SqlitePool,
	sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};

use crate::{Error, Result, schema};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct Db {
	pub pool: SqlitePool,
}
impl Db {
	pub async fn open(cfg: &marq_config::Storage) -> Result<Self> {
		let path = cfg.container_dir.join("marq.db");

		Self::open_at(&path, cfg.pool_max_conns).await
	}

	pub async fn open_at(path: &Path, pool_max_conns: u32) -> Result<Self> {
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)
				.map_err(|err| Error::Io { path: parent.to_path_buf(), source: err })?;
		}

		// WAL so the worker and any extension process can read while another
		// process writes; the busy timeout covers short cross-process write
		// contention.
		let options = SqliteConnectOptions::new()
			.filename(path)
			.create_if_missing(true)
			.journal_mode(SqliteJournalMode::Wal)
			.busy_timeout(BUSY_TIMEOUT)
			.foreign_keys(true);
		let pool =
			SqlitePoolOptions::new().max_connections(pool_max_conns).connect_with(options).await?;

		Ok(Self { pool })
	}

	pub async fn ensure_schema(&self) -> Result<()> {
		let sql = schema::render_schema();

		for statement in sql.split(';') {
			let trimmed = statement.trim();

			if trimmed.is_empty() {
				continue;
			}

			sqlx::query(trimmed).execute(&self.pool).await?;
		}

		Ok(())
	}
}
