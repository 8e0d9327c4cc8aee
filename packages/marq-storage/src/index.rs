use std::{
	collections::HashSet,
	path::Path,
	sync::Mutex,
};

use tantivy::{
	Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument, Term,
	collector::TopDocs,
	query::{AllQuery, BooleanQuery, Query, TermQuery},
	schema::{
		Document, Field, IndexRecordOption, STORED, STRING, Schema, TextFieldIndexing,
		TextOptions, Value,
	},
	tokenizer::{NgramTokenizer, TokenStream},
};
use uuid::Uuid;

use crate::{Error, Result};
use marq_domain::fold;

/// Bump when the index schema or folding rules change; a stored generation
/// below this forces the one-time wipe-and-rebuild transition at startup.
pub const INDEX_GENERATION: i64 = 1;

const FOLD_TOKENIZER: &str = "fold_ngram";
const NGRAM_LEN: usize = 3;
const WRITER_HEAP_BYTES: usize = 50_000_000;
const MAX_SCAN_DOCS: usize = 10_000;

/// Searchable projection of a link. At most one entry exists per link id;
/// absence means "not yet indexed", never "does not exist".
#[derive(Clone, Debug)]
pub struct IndexEntry {
	pub link_id: Uuid,
	pub title: String,
	pub url: String,
	pub note: String,
	pub locality: Option<String>,
}

#[derive(Clone, Copy)]
struct Fields {
	link_id: Field,
	title_fold: Field,
	url: Field,
	note: Field,
	locality: Field,
}

/// Derived full-text index over link titles, one replica per client under
/// the shared container directory. Rebuildable at any time from the record
/// store; never a source of truth.
pub struct SearchIndex {
	index: Index,
	reader: IndexReader,
	writer: Mutex<IndexWriter>,
	fields: Fields,
}
impl SearchIndex {
	pub fn open(dir: &Path) -> Result<Self> {
		std::fs::create_dir_all(dir)
			.map_err(|err| Error::Io { path: dir.to_path_buf(), source: err })?;

		let mut builder = Schema::builder();
		let fold_options = TextOptions::default().set_stored().set_indexing_options(
			TextFieldIndexing::default()
				.set_tokenizer(FOLD_TOKENIZER)
				.set_index_option(IndexRecordOption::WithFreqs),
		);
		let text_options = TextOptions::default().set_indexing_options(
			TextFieldIndexing::default()
				.set_tokenizer("default")
				.set_index_option(IndexRecordOption::WithFreqs),
		);
		builder.add_text_field("link_id", STRING | STORED);
		builder.add_text_field("title_fold", fold_options);
		builder.add_text_field("url", text_options.clone());
		builder.add_text_field("note", text_options.clone());
		builder.add_text_field("locality", text_options);

		let schema = builder.build();
		let index = if dir.join("meta.json").exists() {
			Index::open_in_dir(dir)?
		} else {
			Index::create_in_dir(dir, schema)?
		};

		index
			.tokenizers()
			.register(FOLD_TOKENIZER, NgramTokenizer::new(NGRAM_LEN, NGRAM_LEN, false)?);

		// Resolve handles from the opened index so they stay valid when an
		// older on-disk schema is loaded instead of the one built above.
		let schema = index.schema();
		let fields = Fields {
			link_id: schema.get_field("link_id")?,
			title_fold: schema.get_field("title_fold")?,
			url: schema.get_field("url")?,
			note: schema.get_field("note")?,
			locality: schema.get_field("locality")?,
		};
		let writer = index.writer(WRITER_HEAP_BYTES)?;
		let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into()?;

		Ok(Self { index, reader, writer: Mutex::new(writer), fields })
	}

	/// Idempotent upsert keyed by link id; a re-index replaces the prior
	/// projection.
	pub fn upsert(&self, entry: &IndexEntry) -> Result<()> {
		let id = entry.link_id.to_string();
		let folded_title = fold::fold(&entry.title);
		let mut doc = TantivyDocument::default();

		doc.add_text(self.fields.link_id, &id);
		doc.add_text(self.fields.title_fold, &folded_title);
		doc.add_text(self.fields.url, &entry.url);
		doc.add_text(self.fields.note, &entry.note);

		if let Some(locality) = entry.locality.as_deref() {
			doc.add_text(self.fields.locality, locality);
		}

		let mut writer = self.lock_writer();

		writer.delete_term(Term::from_field_text(self.fields.link_id, &id));
		writer.add_document(doc)?;
		writer.commit()?;

		self.reader.reload()?;

		Ok(())
	}

	/// Removes the entry for `link_id`. Removing an absent entry is a no-op.
	pub fn remove(&self, link_id: Uuid) -> Result<()> {
		let mut writer = self.lock_writer();

		writer.delete_term(Term::from_field_text(self.fields.link_id, &link_id.to_string()));
		writer.commit()?;

		self.reader.reload()?;

		Ok(())
	}

	/// Deletes every entry. Callers pause mutation application first and
	/// follow up with a full rebuild.
	pub fn wipe(&self) -> Result<()> {
		let mut writer = self.lock_writer();

		writer.delete_all_documents()?;
		writer.commit()?;

		self.reader.reload()?;

		Ok(())
	}

	/// Link ids whose folded title contains the folded `text`, newest
	/// candidates first, capped at `limit`. N-gram terms narrow the candidate
	/// set; the stored folded title confirms the actual substring so the
	/// match is exact regardless of tokenizer granularity.
	pub fn query_title(&self, text: &str, limit: usize) -> Result<Vec<Uuid>> {
		let needle = fold::fold(text);

		if needle.trim().is_empty() {
			return Ok(Vec::new());
		}

		let searcher = self.reader.searcher();
		let terms = self.fold_terms(&needle)?;
		let candidates = if terms.is_empty() {
			// Shorter than one n-gram; scan instead of term lookup.
			searcher.search(&AllQuery, &TopDocs::with_limit(MAX_SCAN_DOCS))?
		} else {
			let clauses: Vec<Box<dyn Query>> = terms
				.into_iter()
				.map(|term| {
					Box::new(TermQuery::new(term, IndexRecordOption::Basic)) as Box<dyn Query>
				})
				.collect();
			let query = BooleanQuery::intersection(clauses);

			searcher.search(&query, &TopDocs::with_limit((limit * 8).max(256)))?
		};

		let mut ids = Vec::new();

		for (_score, address) in candidates {
			let doc: TantivyDocument = searcher.doc(address)?;
			let Some(folded_title) =
				doc.get_first(self.fields.title_fold).and_then(|value| value.as_str())
			else {
				continue;
			};

			if !folded_title.contains(&needle) {
				continue;
			}

			let Some(id) = doc.get_first(self.fields.link_id).and_then(|value| value.as_str())
			else {
				continue;
			};

			if let Ok(id) = Uuid::parse_str(id) {
				ids.push(id);
			}
			if ids.len() >= limit {
				break;
			}
		}

		Ok(ids)
	}

	pub fn doc_count(&self) -> u64 {
		self.reader.searcher().num_docs()
	}

	fn fold_terms(&self, needle: &str) -> Result<Vec<Term>> {
		let mut analyzer = self.index.tokenizer_for_field(self.fields.title_fold)?;
		let mut stream = analyzer.token_stream(needle);
		let mut seen = HashSet::new();
		let mut terms = Vec::new();

		while stream.advance() {
			let text = stream.token().text.clone();

			if seen.insert(text.clone()) {
				terms.push(Term::from_field_text(self.fields.title_fold, &text));
			}
		}

		Ok(terms)
	}

	fn lock_writer(&self) -> std::sync::MutexGuard<'_, IndexWriter> {
		self.writer.lock().unwrap_or_else(|err| err.into_inner())
	}
}
