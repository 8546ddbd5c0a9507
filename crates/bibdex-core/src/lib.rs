//! Core library for the bibdex publication catalogue.
//!
//! Provides a streaming parser for the tagged-line bibliographic export
//! format, an SQLite-backed store with slug-unique authors and DOI-keyed
//! publication upserts, and the batch import engine that ties the two
//! together.

use thiserror::Error;

pub mod import;
pub mod slug;
pub mod store;
pub mod wos;

// Re-export for convenience
pub use import::{AuthorImportStats, ImportReport, PublicationImportStats};
pub use store::{Author, Publication, PublicationFields, Store};
pub use wos::{WosReader, WosRecord};

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
