//! Batch import of the author h-index CSV and tagged publication exports.
//!
//! Progress and warnings are written as human-readable lines to a caller
//! supplied sink; structured details go to `tracing`. Per-row and
//! per-record failures are local: the affected entry is reported and the
//! loop moves on.

use std::io::Write;
use std::path::Path;

use crate::CoreError;
use crate::store::{PublicationFields, Store};
use crate::wos::{WosReader, WosRecord};

/// Counters for the author import phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AuthorImportStats {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Counters for the publication import phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublicationImportStats {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Outcome of a full import run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImportReport {
    /// `None` when the authors CSV was missing and the phase was skipped.
    pub authors: Option<AuthorImportStats>,
    pub publications: PublicationImportStats,
}

/// Run both import phases: authors from `csv_path`, then publications
/// from `wos_path`.
///
/// A missing authors CSV aborts only the author phase; the export file
/// itself must exist (callers check before any state is touched).
pub fn run_import(
    store: &Store,
    wos_path: &Path,
    csv_path: &Path,
    out: &mut dyn Write,
) -> Result<ImportReport, CoreError> {
    let authors = if csv_path.exists() {
        Some(import_authors(store, csv_path, out)?)
    } else {
        writeln!(out, "Error: File not found: {}", csv_path.display())?;
        tracing::warn!(path = %csv_path.display(), "authors CSV missing, skipping author phase");
        None
    };

    let publications = import_publications(store, wos_path, out)?;

    Ok(ImportReport {
        authors,
        publications,
    })
}

/// Import author rows from a CSV with `name` and `h_index` columns.
///
/// Rows missing either value are skipped with a warning. New authors get
/// the parsed h-index (non-numeric values default to 0); existing authors
/// are refreshed only when the CSV value is numeric.
pub fn import_authors(
    store: &Store,
    csv_path: &Path,
    out: &mut dyn Write,
) -> Result<AuthorImportStats, CoreError> {
    let mut stats = AuthorImportStats::default();
    let mut reader = csv::Reader::from_path(csv_path)?;

    let headers = reader.headers()?.clone();
    let name_col = headers.iter().position(|h| h == "name");
    let h_index_col = headers.iter().position(|h| h == "h_index");

    for row in reader.records() {
        let row = row?;
        let name = name_col.and_then(|i| row.get(i)).unwrap_or("").trim();
        let h_index_raw = h_index_col.and_then(|i| row.get(i)).unwrap_or("").trim();

        if name.is_empty() || h_index_raw.is_empty() {
            writeln!(out, "Skipping row with missing data: {:?}", row)?;
            tracing::warn!(?row, "skipping author row with missing data");
            stats.skipped += 1;
            continue;
        }

        // Only unsigned integer strings count as numeric, anything else
        // defaults to 0 on creation and leaves an existing value alone.
        let h_index: Option<i64> = if h_index_raw.chars().all(|c| c.is_ascii_digit()) {
            h_index_raw.parse().ok()
        } else {
            None
        };

        let (author, created) = store.find_or_create_author(name, Some(h_index.unwrap_or(0)))?;
        if created {
            writeln!(out, "Created new author: {}", author.name)?;
            stats.created += 1;
        } else {
            if let Some(h_index) = h_index {
                store.set_author_h_index(author.id, h_index)?;
                stats.updated += 1;
            }
            writeln!(out, "Author already exists: {}", author.name)?;
        }
    }

    writeln!(out, "Successfully imported authors")?;
    tracing::info!(
        created = stats.created,
        updated = stats.updated,
        skipped = stats.skipped,
        "author import complete"
    );
    Ok(stats)
}

/// Import publication records from a tagged export file, upserting by DOI
/// and replacing each publication's author set wholesale.
pub fn import_publications(
    store: &Store,
    wos_path: &Path,
    out: &mut dyn Write,
) -> Result<PublicationImportStats, CoreError> {
    let mut stats = PublicationImportStats::default();

    for record in WosReader::from_path(wos_path)? {
        let record = record?;

        let Some(title) = record.title.clone() else {
            writeln!(out, "Skipping publication without a title.")?;
            stats.skipped += 1;
            continue;
        };

        match import_one_publication(store, &record, &title) {
            Ok(created) => {
                if created {
                    writeln!(out, "Created new publication: {title}")?;
                    stats.created += 1;
                } else {
                    writeln!(out, "Updated existing publication: {title}")?;
                    stats.updated += 1;
                }
            }
            Err(e) => {
                // Authors already created for this record stay; reruns
                // converge on the same keys.
                writeln!(out, "Error processing publication: {e}")?;
                tracing::error!(error = %e, title, "publication import failed");
                stats.failed += 1;
            }
        }
    }

    writeln!(out, "Successfully imported publications")?;
    tracing::info!(
        created = stats.created,
        updated = stats.updated,
        skipped = stats.skipped,
        failed = stats.failed,
        "publication import complete"
    );
    Ok(stats)
}

fn import_one_publication(
    store: &Store,
    record: &WosRecord,
    title: &str,
) -> Result<bool, CoreError> {
    let fields = PublicationFields {
        title: title.to_string(),
        source: record.source.clone(),
        publication_date: record.publication_date.clone(),
        volume: record.volume.clone(),
        issue: record.issue.clone(),
        pages: record.pages.clone(),
        doi: record.doi.clone(),
    };
    let (publication_id, created) = store.upsert_publication(&fields)?;

    // A record with no AU lines leaves existing links untouched.
    if !record.authors.is_empty() {
        let mut author_ids = Vec::with_capacity(record.authors.len());
        for name in &record.authors {
            let (author, _) = store.find_or_create_author(name, None)?;
            author_ids.push(author.id);
        }
        store.set_publication_authors(publication_id, &author_ids)?;
    }

    Ok(created)
}
