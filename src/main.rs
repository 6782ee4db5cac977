//! BookBits
//!
//! Exports Apple Books highlights and notes in reading order, as Markdown or
//! CSV, with a heading for each chapter.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookbits::annotations::{sort_locations, AnnotationGroup, RawAnnotationRecord};
use bookbits::config::Config;
use bookbits::db::{self, AnnotationRepository, Book, LibraryRepository};
use bookbits::export::{self, ExportFormat};

#[derive(Parser)]
#[command(name = "bookbits", version, about = "Apple Books highlight exporter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List books that have highlights.
    Books,

    /// Export the annotations of one book in reading order.
    Export {
        /// Asset id of the book (see `bookbits books`).
        asset_id: String,

        /// Output format: md or csv. Defaults to BOOKBITS_FORMAT, then md.
        #[arg(long, short)]
        format: Option<String>,

        /// Write to this file (or highlights.<ext> in this directory) instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Read annotation records from a JSON file instead of the Apple Books store.
        #[arg(long)]
        records: Option<PathBuf>,
    },

    /// Read CFI locations from stdin, one per line, and print them in reading order.
    Sort,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "bookbits=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    let cli = Cli::parse();
    match cli.command {
        Commands::Books => list_books(&config).await,
        Commands::Export {
            asset_id,
            format,
            output,
            records,
        } => {
            let format = match format {
                Some(f) => f.parse::<ExportFormat>()?,
                None => config.export.format,
            };
            match records {
                Some(path) => export_from_file(&asset_id, &path, format, output),
                None => export_from_store(&config, &asset_id, format, output).await,
            }
        }
        Commands::Sort => sort_stdin(),
    }
}

async fn list_books(config: &Config) -> Result<()> {
    let library_pool = db::open_pool(&config.stores.library_db()?)
        .await
        .context("Failed to open the Apple Books library database")?;
    let books = LibraryRepository::new(&library_pool).list().await?;

    let annotation_pool = db::open_pool(&config.stores.annotation_db()?)
        .await
        .context("Failed to open the Apple Books annotation database")?;
    let ids: Vec<String> = books.iter().map(|b| b.asset_id.clone()).collect();
    let with_highlights = AnnotationRepository::new(&annotation_pool)
        .books_with_highlights(&ids)
        .await?;

    for book in books.iter().filter(|b| with_highlights.contains(&b.asset_id)) {
        println!("{}  {} by {}", book.asset_id, book.title, book.author);
    }
    tracing::debug!("{} of {} books have highlights", with_highlights.len(), books.len());

    Ok(())
}

async fn export_from_store(
    config: &Config,
    asset_id: &str,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let library_pool = db::open_pool(&config.stores.library_db()?)
        .await
        .context("Failed to open the Apple Books library database")?;
    let book = LibraryRepository::new(&library_pool).get(asset_id).await?;
    if book.is_none() {
        tracing::warn!("Book {} is not in the library, exporting without a title", asset_id);
    }

    let annotation_pool = db::open_pool(&config.stores.annotation_db()?)
        .await
        .context("Failed to open the Apple Books annotation database")?;
    let records = AnnotationRepository::new(&annotation_pool)
        .list_for_book(asset_id)
        .await?;

    write_export(asset_id, book.as_ref(), &records, format, output)
}

fn export_from_file(
    asset_id: &str,
    path: &Path,
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records: Vec<RawAnnotationRecord> = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse records in {}", path.display()))?;

    write_export(asset_id, None, &records, format, output)
}

fn write_export(
    asset_id: &str,
    book: Option<&Book>,
    records: &[RawAnnotationRecord],
    format: ExportFormat,
    output: Option<PathBuf>,
) -> Result<()> {
    let group = AnnotationGroup::from_records(records);
    let Some(annotations) = group.get(asset_id) else {
        bail!("No highlights or notes found for {}", asset_id);
    };

    for skipped in annotations.skipped() {
        tracing::warn!(
            "Left out annotation at {}: {}",
            skipped.annotation.location(),
            skipped.reason
        );
    }

    let rendered = export::render(format, book, annotations);
    match output {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(format.default_filename())
            } else {
                path
            };
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(
                "Exported {} annotations to {}",
                annotations.len(),
                path.display()
            );
        }
        None => print!("{}", rendered),
    }

    Ok(())
}

fn sort_stdin() -> Result<()> {
    let lines: Vec<String> = io::stdin()
        .lock()
        .lines()
        .collect::<io::Result<_>>()?;
    let locations: Vec<&str> = lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect();

    let (sorted, rejected) = sort_locations(&locations);
    for (location, reason) in rejected {
        tracing::warn!("Skipping {}: {}", location, reason);
    }
    for location in sorted {
        println!("{}", location);
    }

    Ok(())
}
