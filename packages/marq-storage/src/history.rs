use sqlx::{Sqlite, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Error, Result,
	db::Db,
	models::{ChangeOp, ChangeToken, EntityKind, HistoryRow},
};

/// Appends one change-log entry inside the transaction that performs the
/// mutation, so the log can never disagree with the record state.
pub async fn record_change_tx(
	tx: &mut Transaction<'_, Sqlite>,
	entity_id: Uuid,
	entity: EntityKind,
	op: ChangeOp,
	author: &str,
	ts: OffsetDateTime,
) -> Result<()> {
	sqlx::query("INSERT INTO change_log (entity_id, entity, op, author, ts) VALUES (?, ?, ?, ?, ?)")
		.bind(entity_id)
		.bind(entity.as_str())
		.bind(op.as_str())
		.bind(author)
		.bind(ts)
		.execute(&mut **tx)
		.await?;

	Ok(())
}

/// All entries after `cursor` in increasing token order. A missing cursor
/// means "from the beginning". Fails with `StaleToken` when the cursor lies
/// below the purge floor, since entries the caller never saw are gone; a
/// missing cursor on a store that has already purged is stale for the same
/// reason.
pub async fn fetch_after(db: &Db, cursor: Option<ChangeToken>) -> Result<Vec<HistoryRow>> {
	let floor = purge_floor(db).await?;
	let after = cursor.map(ChangeToken::value).unwrap_or(0);

	if after < floor {
		return Err(Error::StaleToken {
			cursor: ChangeToken(after),
			floor: ChangeToken(floor),
		});
	}

	let rows = sqlx::query_as::<_, HistoryRow>(
		"\
SELECT token, entity_id, entity, op, author, ts
FROM change_log
WHERE token > ?
ORDER BY token ASC",
	)
	.bind(after)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// The highest token this store has ever assigned, or `None` for a store
/// with no history at all. Survives purging through the purge floor.
pub async fn head_token(db: &Db) -> Result<Option<ChangeToken>> {
	let max: Option<i64> =
		sqlx::query_scalar("SELECT MAX(token) FROM change_log").fetch_one(&db.pool).await?;
	let floor = purge_floor(db).await?;
	let head = max.unwrap_or(0).max(floor);

	Ok((head > 0).then_some(ChangeToken(head)))
}

/// Deletes entries older than `horizon` and advances the purge floor to the
/// highest deleted token. Returns the number of purged entries.
pub async fn purge_before(db: &Db, horizon: OffsetDateTime) -> Result<u64> {
	let mut tx = db.pool.begin().await?;
	let max: Option<i64> = sqlx::query_scalar("SELECT MAX(token) FROM change_log WHERE ts < ?")
		.bind(horizon)
		.fetch_one(&mut *tx)
		.await?;
	let Some(max) = max else {
		tx.commit().await?;

		return Ok(0);
	};
	let result =
		sqlx::query("DELETE FROM change_log WHERE token <= ?").bind(max).execute(&mut *tx).await?;

	sqlx::query("UPDATE history_meta SET purged_through = MAX(purged_through, ?) WHERE id = 1")
		.bind(max)
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;

	Ok(result.rows_affected())
}

async fn purge_floor(db: &Db) -> Result<i64> {
	let floor: i64 = sqlx::query_scalar("SELECT purged_through FROM history_meta WHERE id = 1")
		.fetch_one(&db.pool)
		.await?;

	Ok(floor)
}
