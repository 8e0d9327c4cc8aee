use std::path::{Path, PathBuf};

use crate::{Error, Result, models::ChangeToken};

/// Durable record of the last change-log position a client has reconciled.
/// One file per logical client under `<container>/cursor/`, atomically
/// replaced on every write so a concurrent reader never observes a partial
/// token.
pub struct CursorFile {
	path: PathBuf,
}
impl CursorFile {
	pub fn new(container_dir: &Path, client_id: &str) -> Self {
		let path = container_dir.join("cursor").join(format!("{client_id}.token"));

		Self { path }
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// The last durably written token, or `None` when the file is absent,
	/// truncated, or otherwise unreadable. Corruption is treated as "no
	/// cursor"; reconciliation recovers by replaying from the beginning.
	pub async fn read(&self) -> Option<ChangeToken> {
		let bytes = tokio::fs::read(&self.path).await.ok()?;
		let bytes: [u8; 8] = bytes.try_into().ok()?;
		let value = i64::from_le_bytes(bytes);

		(value > 0).then_some(ChangeToken(value))
	}

	pub async fn write(&self, token: ChangeToken) -> Result<()> {
		if let Some(parent) = self.path.parent() {
			tokio::fs::create_dir_all(parent)
				.await
				.map_err(|err| Error::Io { path: parent.to_path_buf(), source: err })?;
		}

		let staging = self.path.with_extension("tmp");

		tokio::fs::write(&staging, token.value().to_le_bytes())
			.await
			.map_err(|err| Error::Io { path: staging.clone(), source: err })?;
		tokio::fs::rename(&staging, &self.path)
			.await
			.map_err(|err| Error::Io { path: self.path.clone(), source: err })?;

		Ok(())
	}

	pub async fn clear(&self) -> Result<()> {
		match tokio::fs::remove_file(&self.path).await {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(err) => Err(Error::Io { path: self.path.clone(), source: err }),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn roundtrips_and_overwrites() {
		let dir = tempfile::tempdir().expect("Failed to create temp dir.");
		let cursor = CursorFile::new(dir.path(), "app");

		assert_eq!(cursor.read().await, None);

		cursor.write(ChangeToken(7)).await.expect("Failed to write cursor.");

		assert_eq!(cursor.read().await, Some(ChangeToken(7)));

		cursor.write(ChangeToken(42)).await.expect("Failed to overwrite cursor.");

		assert_eq!(cursor.read().await, Some(ChangeToken(42)));
	}

	#[tokio::test]
	async fn corrupt_files_read_as_no_cursor() {
		let dir = tempfile::tempdir().expect("Failed to create temp dir.");
		let cursor = CursorFile::new(dir.path(), "app");

		tokio::fs::create_dir_all(cursor.path().parent().unwrap())
			.await
			.expect("Failed to create cursor dir.");
		tokio::fs::write(cursor.path(), b"junk").await.expect("Failed to write junk.");

		assert_eq!(cursor.read().await, None);
	}

	#[tokio::test]
	async fn clear_is_idempotent() {
		let dir = tempfile::tempdir().expect("Failed to create temp dir.");
		let cursor = CursorFile::new(dir.path(), "app");

		cursor.write(ChangeToken(3)).await.expect("Failed to write cursor.");
		cursor.clear().await.expect("Failed to clear cursor.");
		cursor.clear().await.expect("Expected clearing a missing cursor to succeed.");

		assert_eq!(cursor.read().await, None);
	}
}
