use std::sync::Arc;

use clap::{
	Parser, Subcommand,
	builder::{
		Styles,
		styling::{AnsiColor, Effects},
	},
};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use marq_service::{
	CreateTagRequest, DeleteLinkRequest, DeleteTagRequest, FetchLinkRequest, Indexer, ListRequest,
	MarqService, Reconciler, RenameTagRequest, SaveLinkRequest, SearchRequest,
};
use marq_storage::{cursor::CursorFile, db::Db, index::SearchIndex};

fn styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Red.on_default() | Effects::BOLD)
		.usage(AnsiColor::Red.on_default() | Effects::BOLD)
		.literal(AnsiColor::Blue.on_default() | Effects::BOLD)
		.placeholder(AnsiColor::Green.on_default())
}

#[derive(Debug, Parser)]
#[command(name = "marq", version, about = "Personal link collector.", styles = styles())]
struct Cli {
	#[arg(long, short = 'c', value_name = "FILE")]
	config: std::path::PathBuf,
	/// Print results as JSON instead of plain text.
	#[arg(long, global = true)]
	json: bool,
	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Save a new link.
	Add {
		url: String,
		#[arg(long)]
		title: Option<String>,
		#[arg(long, default_value = "")]
		note: String,
		#[arg(long = "tag")]
		tags: Vec<String>,
	},
	/// List saved links, optionally filtered by tag.
	List {
		#[arg(long)]
		tag: Option<String>,
		#[arg(long)]
		limit: Option<u32>,
	},
	/// Search link titles.
	Search { text: String },
	/// Show one link with its tags.
	Show { link_id: Uuid },
	/// Delete a link.
	Rm { link_id: Uuid },
	/// Manage tags.
	Tag {
		#[command(subcommand)]
		command: TagCommand,
	},
	/// Run one reconciliation cycle against this client's replica.
	Sync,
	/// Wipe and rebuild this client's search index replica.
	Rebuild,
	/// Purge change history past the retention window.
	Purge,
}

#[derive(Debug, Subcommand)]
enum TagCommand {
	Add { name: String },
	Rename { tag_id: Uuid, name: String },
	Rm { tag_id: Uuid },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let cli = Cli::parse();
	let cfg = marq_config::load(&cli.config)?;

	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new(cfg.service.log_level.clone())),
		)
		.init();

	let db = Db::open(&cfg.storage).await?;

	db.ensure_schema().await?;

	let index = Arc::new(SearchIndex::open(&cfg.index_dir())?);
	let indexer = Arc::new(Indexer::new(index.clone()));

	indexer.ensure_ready(&db).await?;

	let cursor = CursorFile::new(&cfg.storage.container_dir, &cfg.client.id);
	let reconciler = Reconciler::new(db.clone(), indexer, cursor);
	let author = cfg.client.id.clone();
	let service = MarqService::new(cfg, db, index);

	match cli.command {
		Command::Add { url, title, note, tags } => {
			let title = title.unwrap_or_else(|| url.clone());
			let saved = service
				.save_link(SaveLinkRequest {
					link_id: None,
					title,
					url,
					note,
					favicon: None,
					latitude: None,
					longitude: None,
					locality: None,
					tags,
					author,
				})
				.await?;

			reconciler.run_cycle().await?;

			if cli.json {
				println!("{}", serde_json::to_string_pretty(&saved)?);
			} else {
				println!("Saved {}.", saved.link_id);
			}
		},
		Command::List { tag, limit } => {
			let response = service.list(ListRequest { tag, limit }).await?;

			if cli.json {
				println!("{}", serde_json::to_string_pretty(&response.items)?);
			} else {
				for item in &response.items {
					println!("{}  {}  {}", item.link_id, item.title, item.url);
				}
			}
		},
		Command::Search { text } => {
			reconciler.run_cycle().await?;

			let response = service.search(SearchRequest { text, limit: None }).await?;

			if cli.json {
				println!("{}", serde_json::to_string_pretty(&response.ids)?);
			} else {
				for link_id in &response.ids {
					match service.fetch_link(FetchLinkRequest { link_id: *link_id }).await {
						Ok(detail) => println!("{}  {}  {}", detail.link_id, detail.title, detail.url),
						Err(_) => println!("{link_id}"),
					}
				}
			}
		},
		Command::Show { link_id } => {
			let detail = service.fetch_link(FetchLinkRequest { link_id }).await?;

			if cli.json {
				println!("{}", serde_json::to_string_pretty(&detail)?);
			} else {
				println!("{}  {}", detail.title, detail.url);

				if !detail.note.is_empty() {
					println!("note: {}", detail.note);
				}
				if !detail.tags.is_empty() {
					println!("tags: {}", detail.tags.join(", "));
				}
			}
		},
		Command::Rm { link_id } => {
			let response = service.delete_link(DeleteLinkRequest { link_id, author }).await?;

			reconciler.run_cycle().await?;
			println!("{:?} {}.", response.op, response.link_id);
		},
		Command::Tag { command } => match command {
			TagCommand::Add { name } => {
				let response = service.create_tag(CreateTagRequest { name, author }).await?;

				println!("{:?} {}.", response.op, response.tag_id);
			},
			TagCommand::Rename { tag_id, name } => {
				let response =
					service.rename_tag(RenameTagRequest { tag_id, name, author }).await?;

				println!("{:?} {}.", response.op, response.tag_id);
			},
			TagCommand::Rm { tag_id } => {
				let response = service.delete_tag(DeleteTagRequest { tag_id, author }).await?;

				println!("{:?} {}.", response.op, response.tag_id);
			},
		},
		Command::Sync => {
			let report = reconciler.run_cycle().await?;

			println!(
				"Applied {} and removed {} entries{}.",
				report.applied,
				report.removed,
				if report.resynced { " after a full resync" } else { "" }
			);
		},
		Command::Rebuild => {
			let report = service.rebuild_index().await?;

			println!("Indexed {} links ({} errors).", report.indexed_count, report.error_count);
		},
		Command::Purge => {
			let report = service.purge_history().await?;

			println!("Purged {} history entries.", report.purged_count);
		},
	}

	Ok(())
}
