use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod output;

use output::ColorMode;

/// bibdex - academic author and publication catalogue tools
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a bibliographic export file and the author h-index CSV
    Import {
        /// Path to the bibliographic export file
        file_path: PathBuf,

        /// Path to the author h-index CSV
        #[arg(long)]
        authors_csv: Option<PathBuf>,

        /// Path to the catalogue SQLite database
        #[arg(long)]
        db: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print row counts for the catalogue database
    Stats {
        /// Path to the catalogue SQLite database
        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Import {
            file_path,
            authors_csv,
            db,
            no_color,
        } => import(file_path, authors_csv, db, no_color),
        Command::Stats { db } => stats(db),
    }
}

fn import(
    file_path: PathBuf,
    authors_csv: Option<PathBuf>,
    db: Option<PathBuf>,
    no_color: bool,
) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > defaults
    let db_path = resolve_db_path(db);
    let authors_csv = authors_csv
        .or_else(|| std::env::var("BIBDEX_AUTHORS_CSV").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data/author_h_index.csv"));

    // A missing export file aborts before any state is touched.
    if !file_path.exists() {
        anyhow::bail!("File not found: {}", file_path.display());
    }

    let color = ColorMode(!no_color);
    let store = bibdex_core::Store::open(&db_path)?;
    let mut out = std::io::stdout();

    let report = bibdex_core::import::run_import(&store, &file_path, &authors_csv, &mut out)?;
    output::print_import_summary(&mut out, &report, color)?;

    Ok(())
}

fn stats(db: Option<PathBuf>) -> anyhow::Result<()> {
    let db_path = resolve_db_path(db);
    if !db_path.exists() {
        anyhow::bail!("Database not found: {}", db_path.display());
    }

    let store = bibdex_core::Store::open(&db_path)?;
    let (authors, publications, links) = store.counts()?;
    println!("Database: {}", db_path.display());
    println!("  Authors:      {}", authors);
    println!("  Publications: {}", publications);
    println!("  Author links: {}", links);

    Ok(())
}

fn resolve_db_path(db: Option<PathBuf>) -> PathBuf {
    db.or_else(|| std::env::var("BIBDEX_DB").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("bibdex.db"))
}
