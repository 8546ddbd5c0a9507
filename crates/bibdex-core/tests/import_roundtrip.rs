//! End-to-end import over an on-disk store: both phases, rerun convergence.

use std::fs;

use bibdex_core::Store;
use bibdex_core::import::run_import;

const AUTHORS_CSV: &str = "\
name,h_index
\"Lovelace, Ada\",12
\"Turing, Alan\",30
,5
\"Hopper, Grace\",
";

const EXPORT: &str = "\
TI On Computable Numbers
AU Turing, Alan
SO Proc. London Math. Soc.
PY 1936
VL 2
IS 42
BP 230
EP 265
DI 10.1112/plms/s2-42.1.230
ER

TI Notes on the Analytical Engine
AU Lovelace, Ada
AU Menabrea, Luigi
DI 10.0000/notes
ER

AU Ghost, Writer
ER

TI Unterminated trailer
AU Nobody
";

#[test]
fn full_import_and_rerun_converge() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("author_h_index.csv");
    let export_path = dir.path().join("savedrecs.txt");
    let db_path = dir.path().join("catalogue.db");
    fs::write(&csv_path, AUTHORS_CSV).unwrap();
    fs::write(&export_path, EXPORT).unwrap();

    let store = Store::open(&db_path).unwrap();
    let mut out = Vec::new();

    let report = run_import(&store, &export_path, &csv_path, &mut out).unwrap();

    let authors = report.authors.unwrap();
    assert_eq!(authors.created, 2);
    assert_eq!(authors.skipped, 2);

    // Two titled records imported; the titleless record is reported and
    // the unterminated trailer never surfaces.
    assert_eq!(report.publications.created, 2);
    assert_eq!(report.publications.skipped, 1);

    // Authors referenced only by records were created without an h-index.
    let menabrea = store.find_author_by_name("Menabrea, Luigi").unwrap().unwrap();
    assert_eq!(menabrea.h_index, None);
    assert!(store.find_author_by_name("Nobody").unwrap().is_none());

    let turing = store.find_author_by_name("Turing, Alan").unwrap().unwrap();
    assert_eq!(turing.h_index, Some(30));
    let pubs = store.publications_for_author(turing.id).unwrap();
    assert_eq!(pubs.len(), 1);
    assert_eq!(pubs[0].pages.as_deref(), Some("230-265"));
    assert_eq!(pubs[0].publication_date.as_deref(), Some("1936"));

    // Rerun: every DOI-keyed record converges, nothing duplicates.
    let report = run_import(&store, &export_path, &csv_path, &mut out).unwrap();
    assert_eq!(report.publications.created, 0);
    assert_eq!(report.publications.updated, 2);

    let (author_count, publication_count, _) = store.counts().unwrap();
    assert_eq!(author_count, 3);
    assert_eq!(publication_count, 2);

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Created new author: Lovelace, Ada"));
    assert!(printed.contains("Updated existing publication: On Computable Numbers"));
}
