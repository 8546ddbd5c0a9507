//! Embedded HTML templates rendered by placeholder substitution.

use bibdex_core::{Author, Publication};

const INDEX_HTML: &str = include_str!("../../../templates/index.html");
const AUTHOR_HTML: &str = include_str!("../../../templates/author.html");
const NOT_FOUND_HTML: &str = include_str!("../../../templates/not_found.html");

/// Minimal HTML escaping for interpolated values.
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render the author listing page.
pub fn render_index(authors: &[Author]) -> String {
    let rows: String = authors
        .iter()
        .map(|author| {
            let h_index = author
                .h_index
                .map(|h| format!(" <span class=\"h-index\">h-index: {h}</span>"))
                .unwrap_or_default();
            format!(
                "      <li><a href=\"/author/{}\">{}</a>{}</li>\n",
                escape(&author.slug),
                escape(&author.name),
                h_index
            )
        })
        .collect();

    INDEX_HTML
        .replace("{{ author_count }}", &authors.len().to_string())
        .replace("{{ author_rows }}", &rows)
}

/// Render one author's detail page with their publications.
pub fn render_author(author: &Author, publications: &[Publication]) -> String {
    let h_index = author
        .h_index
        .map(|h| h.to_string())
        .unwrap_or_else(|| "n/a".to_string());

    let rows: String = publications.iter().map(publication_row).collect();
    let rows = if rows.is_empty() {
        "      <li class=\"empty\">No publications on record.</li>\n".to_string()
    } else {
        rows
    };

    AUTHOR_HTML
        .replace("{{ name }}", &escape(&author.name))
        .replace("{{ h_index }}", &escape(&h_index))
        .replace("{{ publication_rows }}", &rows)
}

/// Render the not-found page for an unknown slug.
pub fn render_not_found(slug: &str) -> String {
    NOT_FOUND_HTML.replace("{{ slug }}", &escape(slug))
}

fn publication_row(publication: &Publication) -> String {
    let mut details = Vec::new();
    if let Some(source) = &publication.source {
        details.push(escape(source));
    }
    if let Some(date) = &publication.publication_date {
        details.push(escape(date));
    }
    if let Some(volume) = &publication.volume {
        details.push(format!("vol. {}", escape(volume)));
    }
    if let Some(issue) = &publication.issue {
        details.push(format!("no. {}", escape(issue)));
    }
    if let Some(pages) = &publication.pages {
        details.push(format!("pp. {}", escape(pages)));
    }

    let doi = publication
        .doi
        .as_deref()
        .map(|doi| format!(" <span class=\"doi\">doi:{}</span>", escape(doi)))
        .unwrap_or_default();

    format!(
        "      <li><strong>{}</strong> <span class=\"details\">{}</span>{}</li>\n",
        escape(&publication.title),
        details.join(", "),
        doi
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> Author {
        Author {
            id: 1,
            name: "Ada <Lovelace>".to_string(),
            slug: "ada-lovelace".to_string(),
            h_index: Some(12),
        }
    }

    #[test]
    fn index_escapes_names() {
        let html = render_index(&[author()]);
        assert!(html.contains("Ada &lt;Lovelace&gt;"));
        assert!(html.contains("/author/ada-lovelace"));
        assert!(!html.contains("{{ "));
    }

    #[test]
    fn author_page_shows_placeholder_for_missing_h_index() {
        let mut a = author();
        a.h_index = None;
        let html = render_author(&a, &[]);
        assert!(html.contains("n/a"));
        assert!(html.contains("No publications on record."));
    }

    #[test]
    fn not_found_includes_slug() {
        let html = render_not_found("missing-person");
        assert!(html.contains("missing-person"));
    }
}
