//! SQLite-backed store for authors and publications.
//!
//! Sets WAL mode on disk databases. Every operation is its own implicit
//! unit of work; the importer is a rerunnable batch tool and relies on
//! key convergence rather than transactions for crash recovery.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};

use crate::CoreError;
use crate::slug::slugify;

/// A persisted author row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub h_index: Option<i64>,
}

/// A persisted publication row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub id: i64,
    pub title: String,
    pub source: Option<String>,
    pub language: Option<String>,
    pub document_type: Option<String>,
    pub publication_date: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub doi: Option<String>,
    pub wos_id: Option<String>,
    pub category: Option<String>,
    pub citations: i64,
}

/// Field set written by a publication upsert.
///
/// Columns outside this set (`language`, `document_type`, `wos_id`,
/// `category`, `citations`) exist in the schema but are not populated by
/// the current export field mapping, so an upsert leaves them untouched.
#[derive(Debug, Clone, Default)]
pub struct PublicationFields {
    pub title: String,
    pub source: Option<String>,
    pub publication_date: Option<String>,
    pub volume: Option<String>,
    pub issue: Option<String>,
    pub pages: Option<String>,
    pub doi: Option<String>,
}

/// Handle to an open catalogue database.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (creating if needed) a catalogue database on disk.
    pub fn open(path: &Path) -> Result<Self, CoreError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Self::init(conn)
    }

    /// Open an in-memory catalogue database.
    pub fn open_in_memory() -> Result<Self, CoreError> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, CoreError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS authors (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                slug TEXT NOT NULL UNIQUE,
                h_index INTEGER
            );

            CREATE TABLE IF NOT EXISTS publications (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                source TEXT,
                language TEXT,
                document_type TEXT,
                publication_date TEXT,
                volume TEXT,
                issue TEXT,
                pages TEXT,
                doi TEXT UNIQUE,
                wos_id TEXT UNIQUE,
                category TEXT,
                citations INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS publication_authors (
                publication_id INTEGER NOT NULL REFERENCES publications(id) ON DELETE CASCADE,
                author_id INTEGER NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
                PRIMARY KEY (publication_id, author_id)
            );

            CREATE INDEX IF NOT EXISTS idx_pub_authors_pub ON publication_authors(publication_id);
            CREATE INDEX IF NOT EXISTS idx_pub_authors_author ON publication_authors(author_id);
            "#,
        )?;
        Ok(Self { conn })
    }

    // ── Authors ─────────────────────────────────────────────────────────

    pub fn find_author_by_name(&self, name: &str) -> Result<Option<Author>, CoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name, slug, h_index FROM authors WHERE name = ?1")?;
        Ok(stmt.query_row(params![name], row_to_author).optional()?)
    }

    pub fn find_author_by_slug(&self, slug: &str) -> Result<Option<Author>, CoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name, slug, h_index FROM authors WHERE slug = ?1")?;
        Ok(stmt.query_row(params![slug], row_to_author).optional()?)
    }

    /// All authors, ordered by name.
    pub fn list_authors(&self) -> Result<Vec<Author>, CoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT id, name, slug, h_index FROM authors ORDER BY name")?;
        let authors = stmt
            .query_map([], row_to_author)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(authors)
    }

    pub fn slug_exists(&self, slug: &str) -> Result<bool, CoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT COUNT(*) > 0 FROM authors WHERE slug = ?1")?;
        Ok(stmt.query_row(params![slug], |row| row.get(0))?)
    }

    /// Look up an author by exact name, creating it with a fresh unique
    /// slug if absent. Both import paths route through here so slug
    /// disambiguation has a single owner.
    ///
    /// `h_index` is only applied on creation; refreshing an existing
    /// author's value goes through [`Store::set_author_h_index`].
    pub fn find_or_create_author(
        &self,
        name: &str,
        h_index: Option<i64>,
    ) -> Result<(Author, bool), CoreError> {
        let name = name.trim();
        if let Some(author) = self.find_author_by_name(name)? {
            return Ok((author, false));
        }

        let slug = self.unique_slug(&slugify(name))?;
        let mut stmt = self
            .conn
            .prepare_cached("INSERT INTO authors (name, slug, h_index) VALUES (?1, ?2, ?3)")?;
        stmt.execute(params![name, slug, h_index])?;

        let author = Author {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            slug,
            h_index,
        };
        Ok((author, true))
    }

    /// Probe `base`, `base-1`, `base-2`, ... until a free slug is found.
    fn unique_slug(&self, base: &str) -> Result<String, CoreError> {
        let mut slug = base.to_string();
        let mut counter = 1;
        while self.slug_exists(&slug)? {
            slug = format!("{base}-{counter}");
            counter += 1;
        }
        Ok(slug)
    }

    pub fn set_author_h_index(&self, id: i64, h_index: i64) -> Result<(), CoreError> {
        self.conn.execute(
            "UPDATE authors SET h_index = ?1 WHERE id = ?2",
            params![h_index, id],
        )?;
        Ok(())
    }

    // ── Publications ────────────────────────────────────────────────────

    pub fn find_publication_by_doi(&self, doi: &str) -> Result<Option<Publication>, CoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, title, source, language, document_type, publication_date, \
             volume, issue, pages, doi, wos_id, category, citations \
             FROM publications WHERE doi = ?1",
        )?;
        Ok(stmt.query_row(params![doi], row_to_publication).optional()?)
    }

    /// Update-or-create keyed on DOI.
    ///
    /// Records without a DOI have no natural key and always insert a new
    /// row. Returns the publication id and whether a row was created.
    pub fn upsert_publication(&self, fields: &PublicationFields) -> Result<(i64, bool), CoreError> {
        if let Some(doi) = fields.doi.as_deref()
            && let Some(existing) = self.find_publication_by_doi(doi)?
        {
            let mut stmt = self.conn.prepare_cached(
                "UPDATE publications SET title = ?1, source = ?2, publication_date = ?3, \
                 volume = ?4, issue = ?5, pages = ?6, doi = ?7 WHERE id = ?8",
            )?;
            stmt.execute(params![
                fields.title,
                fields.source,
                fields.publication_date,
                fields.volume,
                fields.issue,
                fields.pages,
                fields.doi,
                existing.id,
            ])?;
            return Ok((existing.id, false));
        }

        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO publications (title, source, publication_date, volume, issue, pages, doi) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;
        stmt.execute(params![
            fields.title,
            fields.source,
            fields.publication_date,
            fields.volume,
            fields.issue,
            fields.pages,
            fields.doi,
        ])?;
        Ok((self.conn.last_insert_rowid(), true))
    }

    /// Replace a publication's author set wholesale. Links not present in
    /// `author_ids` are dropped.
    pub fn set_publication_authors(
        &self,
        publication_id: i64,
        author_ids: &[i64],
    ) -> Result<(), CoreError> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM publication_authors WHERE publication_id = ?1",
            params![publication_id],
        )?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO publication_authors (publication_id, author_id) \
                 VALUES (?1, ?2)",
            )?;
            for author_id in author_ids {
                stmt.execute(params![publication_id, author_id])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Publications linked to an author, ordered by title, for the detail
    /// page.
    pub fn publications_for_author(&self, author_id: i64) -> Result<Vec<Publication>, CoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT p.id, p.title, p.source, p.language, p.document_type, p.publication_date, \
             p.volume, p.issue, p.pages, p.doi, p.wos_id, p.category, p.citations \
             FROM publications p \
             JOIN publication_authors pa ON p.id = pa.publication_id \
             WHERE pa.author_id = ?1 ORDER BY p.title",
        )?;
        let publications = stmt
            .query_map(params![author_id], row_to_publication)?
            .filter_map(|r| r.ok())
            .collect();
        Ok(publications)
    }

    /// Author names linked to a publication, in name order.
    pub fn authors_for_publication(&self, publication_id: i64) -> Result<Vec<String>, CoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT a.name FROM authors a \
             JOIN publication_authors pa ON a.id = pa.author_id \
             WHERE pa.publication_id = ?1 ORDER BY a.name",
        )?;
        let authors = stmt
            .query_map(params![publication_id], |row| row.get::<_, String>(0))?
            .filter_map(|r| r.ok())
            .collect();
        Ok(authors)
    }

    /// Counts of authors, publications, and author links.
    pub fn counts(&self) -> Result<(i64, i64, i64), CoreError> {
        let authors: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM authors", [], |row| row.get(0))?;
        let publications: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM publications", [], |row| row.get(0))?;
        let links: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM publication_authors", [], |row| {
                row.get(0)
            })?;
        Ok((authors, publications, links))
    }
}

fn row_to_author(row: &rusqlite::Row) -> rusqlite::Result<Author> {
    Ok(Author {
        id: row.get(0)?,
        name: row.get(1)?,
        slug: row.get(2)?,
        h_index: row.get(3)?,
    })
}

fn row_to_publication(row: &rusqlite::Row) -> rusqlite::Result<Publication> {
    Ok(Publication {
        id: row.get(0)?,
        title: row.get(1)?,
        source: row.get(2)?,
        language: row.get(3)?,
        document_type: row.get(4)?,
        publication_date: row.get(5)?,
        volume: row.get(6)?,
        issue: row.get(7)?,
        pages: row.get(8)?,
        doi: row.get(9)?,
        wos_id: row.get(10)?,
        category: row.get(11)?,
        citations: row.get(12)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_store() -> Store {
        Store::open_in_memory().unwrap()
    }

    fn fields(title: &str, doi: Option<&str>) -> PublicationFields {
        PublicationFields {
            title: title.to_string(),
            doi: doi.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn find_or_create_is_keyed_on_name() {
        let store = setup_store();
        let (first, created) = store.find_or_create_author("Ada Lovelace", Some(10)).unwrap();
        assert!(created);
        assert_eq!(first.slug, "ada-lovelace");

        let (second, created) = store.find_or_create_author("Ada Lovelace", None).unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        // Creation-time h_index survives the second lookup
        assert_eq!(second.h_index, Some(10));
    }

    #[test]
    fn name_is_trimmed_before_lookup() {
        let store = setup_store();
        let (first, _) = store.find_or_create_author("Ada Lovelace", None).unwrap();
        let (second, created) = store.find_or_create_author("  Ada Lovelace  ", None).unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
    }

    #[test]
    fn colliding_slugs_get_increasing_suffixes() {
        let store = setup_store();
        let (a, _) = store.find_or_create_author("J. Smith", None).unwrap();
        let (b, _) = store.find_or_create_author("J Smith", None).unwrap();
        let (c, _) = store.find_or_create_author("J... Smith", None).unwrap();
        assert_eq!(a.slug, "j-smith");
        assert_eq!(b.slug, "j-smith-1");
        assert_eq!(c.slug, "j-smith-2");
    }

    #[test]
    fn set_h_index_updates_in_place() {
        let store = setup_store();
        let (author, _) = store.find_or_create_author("Ada Lovelace", Some(3)).unwrap();
        store.set_author_h_index(author.id, 7).unwrap();
        let reloaded = store.find_author_by_name("Ada Lovelace").unwrap().unwrap();
        assert_eq!(reloaded.h_index, Some(7));
    }

    #[test]
    fn upsert_by_doi_updates_existing_row() {
        let store = setup_store();
        let (id, created) = store
            .upsert_publication(&fields("Old Title", Some("10.1/x")))
            .unwrap();
        assert!(created);

        let (id2, created) = store
            .upsert_publication(&fields("New Title", Some("10.1/x")))
            .unwrap();
        assert!(!created);
        assert_eq!(id2, id);

        let publication = store.find_publication_by_doi("10.1/x").unwrap().unwrap();
        assert_eq!(publication.title, "New Title");
        let (_, publications, _) = store.counts().unwrap();
        assert_eq!(publications, 1);
    }

    #[test]
    fn missing_doi_always_inserts() {
        let store = setup_store();
        store.upsert_publication(&fields("Untracked", None)).unwrap();
        store.upsert_publication(&fields("Untracked", None)).unwrap();
        let (_, publications, _) = store.counts().unwrap();
        assert_eq!(publications, 2);
    }

    #[test]
    fn author_set_is_replaced_wholesale() {
        let store = setup_store();
        let (alice, _) = store.find_or_create_author("Alice", None).unwrap();
        let (bob, _) = store.find_or_create_author("Bob", None).unwrap();
        let (carol, _) = store.find_or_create_author("Carol", None).unwrap();
        let (pub_id, _) = store.upsert_publication(&fields("Paper", Some("10.1/p"))).unwrap();

        store.set_publication_authors(pub_id, &[alice.id, bob.id]).unwrap();
        assert_eq!(store.authors_for_publication(pub_id).unwrap(), vec!["Alice", "Bob"]);

        store.set_publication_authors(pub_id, &[carol.id]).unwrap();
        assert_eq!(store.authors_for_publication(pub_id).unwrap(), vec!["Carol"]);
    }

    #[test]
    fn publications_for_author_follows_links() {
        let store = setup_store();
        let (alice, _) = store.find_or_create_author("Alice", None).unwrap();
        let (a, _) = store.upsert_publication(&fields("Alpha", Some("10.1/a"))).unwrap();
        let (b, _) = store.upsert_publication(&fields("Beta", Some("10.1/b"))).unwrap();
        store.set_publication_authors(a, &[alice.id]).unwrap();
        store.set_publication_authors(b, &[alice.id]).unwrap();

        let titles: Vec<String> = store
            .publications_for_author(alice.id)
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["Alpha", "Beta"]);
    }

    #[test]
    fn lookup_by_slug() {
        let store = setup_store();
        store.find_or_create_author("Ada Lovelace", None).unwrap();
        let found = store.find_author_by_slug("ada-lovelace").unwrap();
        assert_eq!(found.unwrap().name, "Ada Lovelace");
        assert!(store.find_author_by_slug("no-such-slug").unwrap().is_none());
    }
}
