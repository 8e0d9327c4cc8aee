use sqlx::{Executor, Sqlite, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Result,
	db::Db,
	models::{IndexStateRow, LinkRow, TagRow},
};

pub async fn insert_link(db: &Db, link: &LinkRow) -> Result<()> {
	insert_link_exec(&db.pool, link).await
}

pub async fn insert_link_tx(tx: &mut Transaction<'_, Sqlite>, link: &LinkRow) -> Result<()> {
	insert_link_exec(&mut **tx, link).await
}

pub async fn update_link_tx(tx: &mut Transaction<'_, Sqlite>, link: &LinkRow) -> Result<()> {
	sqlx::query(
		"\
UPDATE links
SET title = ?, url = ?, note = ?, favicon = ?, latitude = ?, longitude = ?, locality = ?,
	updated_at = ?
WHERE link_id = ?",
	)
	.bind(link.title.as_str())
	.bind(link.url.as_str())
	.bind(link.note.as_str())
	.bind(link.favicon.as_deref())
	.bind(link.latitude)
	.bind(link.longitude)
	.bind(link.locality.as_deref())
	.bind(link.updated_at)
	.bind(link.link_id)
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn delete_link_tx(tx: &mut Transaction<'_, Sqlite>, link_id: Uuid) -> Result<()> {
	sqlx::query("DELETE FROM link_tags WHERE link_id = ?")
		.bind(link_id)
		.execute(&mut **tx)
		.await?;
	sqlx::query("DELETE FROM links WHERE link_id = ?").bind(link_id).execute(&mut **tx).await?;

	Ok(())
}

pub async fn fetch_link(db: &Db, link_id: Uuid) -> Result<Option<LinkRow>> {
	let link = sqlx::query_as::<_, LinkRow>("SELECT * FROM links WHERE link_id = ?")
		.bind(link_id)
		.fetch_optional(&db.pool)
		.await?;

	Ok(link)
}

pub async fn fetch_link_tx(
	tx: &mut Transaction<'_, Sqlite>,
	link_id: Uuid,
) -> Result<Option<LinkRow>> {
	let link = sqlx::query_as::<_, LinkRow>("SELECT * FROM links WHERE link_id = ?")
		.bind(link_id)
		.fetch_optional(&mut **tx)
		.await?;

	Ok(link)
}

pub async fn all_links(db: &Db) -> Result<Vec<LinkRow>> {
	let links = sqlx::query_as::<_, LinkRow>("SELECT * FROM links ORDER BY created_at ASC")
		.fetch_all(&db.pool)
		.await?;

	Ok(links)
}

pub async fn all_link_ids(db: &Db) -> Result<Vec<Uuid>> {
	let ids = sqlx::query_scalar::<_, Uuid>("SELECT link_id FROM links ORDER BY updated_at DESC")
		.fetch_all(&db.pool)
		.await?;

	Ok(ids)
}

pub async fn fetch_tag_tx(
	tx: &mut Transaction<'_, Sqlite>,
	tag_id: Uuid,
) -> Result<Option<TagRow>> {
	let tag = sqlx::query_as::<_, TagRow>("SELECT * FROM tags WHERE tag_id = ?")
		.bind(tag_id)
		.fetch_optional(&mut **tx)
		.await?;

	Ok(tag)
}

pub async fn tag_by_name_tx(
	tx: &mut Transaction<'_, Sqlite>,
	name: &str,
) -> Result<Option<TagRow>> {
	let tag = sqlx::query_as::<_, TagRow>("SELECT * FROM tags WHERE name = ?")
		.bind(name)
		.fetch_optional(&mut **tx)
		.await?;

	Ok(tag)
}

pub async fn insert_tag_tx(tx: &mut Transaction<'_, Sqlite>, tag: &TagRow) -> Result<()> {
	sqlx::query("INSERT INTO tags (tag_id, name, created_at) VALUES (?, ?, ?)")
		.bind(tag.tag_id)
		.bind(tag.name.as_str())
		.bind(tag.created_at)
		.execute(&mut **tx)
		.await?;

	Ok(())
}

pub async fn rename_tag_tx(
	tx: &mut Transaction<'_, Sqlite>,
	tag_id: Uuid,
	name: &str,
) -> Result<()> {
	sqlx::query("UPDATE tags SET name = ? WHERE tag_id = ?")
		.bind(name)
		.bind(tag_id)
		.execute(&mut **tx)
		.await?;

	Ok(())
}

pub async fn delete_tag_tx(tx: &mut Transaction<'_, Sqlite>, tag_id: Uuid) -> Result<()> {
	sqlx::query("DELETE FROM link_tags WHERE tag_id = ?").bind(tag_id).execute(&mut **tx).await?;
	sqlx::query("DELETE FROM tags WHERE tag_id = ?").bind(tag_id).execute(&mut **tx).await?;

	Ok(())
}

pub async fn replace_link_tags_tx(
	tx: &mut Transaction<'_, Sqlite>,
	link_id: Uuid,
	tag_ids: &[Uuid],
) -> Result<()> {
	sqlx::query("DELETE FROM link_tags WHERE link_id = ?")
		.bind(link_id)
		.execute(&mut **tx)
		.await?;

	for tag_id in tag_ids {
		sqlx::query("INSERT OR IGNORE INTO link_tags (link_id, tag_id) VALUES (?, ?)")
			.bind(link_id)
			.bind(tag_id)
			.execute(&mut **tx)
			.await?;
	}

	Ok(())
}

pub async fn link_tag_names(db: &Db, link_id: Uuid) -> Result<Vec<String>> {
	let names = sqlx::query_scalar::<_, String>(
		"\
SELECT t.name
FROM tags t
JOIN link_tags lt ON lt.tag_id = t.tag_id
WHERE lt.link_id = ?
ORDER BY t.name ASC",
	)
	.bind(link_id)
	.fetch_all(&db.pool)
	.await?;

	Ok(names)
}

pub async fn index_state(db: &Db) -> Result<IndexStateRow> {
	let state = sqlx::query_as::<_, IndexStateRow>(
		"SELECT generation, first_build_done, old_index_purged FROM index_state WHERE id = 1",
	)
	.fetch_one(&db.pool)
	.await?;

	Ok(state)
}

pub async fn mark_old_index_purged(db: &Db, generation: i64) -> Result<()> {
	sqlx::query("UPDATE index_state SET generation = ?, old_index_purged = 1 WHERE id = 1")
		.bind(generation)
		.execute(&db.pool)
		.await?;

	Ok(())
}

pub async fn mark_first_build_done(db: &Db) -> Result<()> {
	sqlx::query("UPDATE index_state SET first_build_done = 1 WHERE id = 1")
		.execute(&db.pool)
		.await?;

	Ok(())
}

pub fn new_link(title: &str, url: &str, now: OffsetDateTime) -> LinkRow {
	LinkRow {
		link_id: Uuid::new_v4(),
		title: title.to_string(),
		url: url.to_string(),
		note: String::new(),
		favicon: None,
		latitude: None,
		longitude: None,
		locality: None,
		created_at: now,
		updated_at: now,
	}
}

async fn insert_link_exec<'e, E>(executor: E, link: &LinkRow) -> Result<()>
where
	E: Executor<'e, Database = Sqlite>,
{
	sqlx::query(
		"\
INSERT INTO links (
	link_id,
	title,
	url,
	note,
	favicon,
	latitude,
	longitude,
	locality,
	created_at,
	updated_at
)
VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
	)
	.bind(link.link_id)
	.bind(link.title.as_str())
	.bind(link.url.as_str())
	.bind(link.note.as_str())
	.bind(link.favicon.as_deref())
	.bind(link.latitude)
	.bind(link.longitude)
	.bind(link.locality.as_deref())
	.bind(link.created_at)
	.bind(link.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}
