use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::state::AppState;
use crate::template;

pub async fn author_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Response {
    let Ok(store) = state.store.lock() else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "store unavailable").into_response();
    };

    let author = match store.find_author_by_slug(&slug) {
        Ok(Some(author)) => author,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, Html(template::render_not_found(&slug)))
                .into_response();
        }
        Err(e) => {
            tracing::error!(error = %e, slug, "author lookup failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "database error").into_response();
        }
    };

    match store.publications_for_author(author.id) {
        Ok(publications) => Html(template::render_author(&author, &publications)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, slug, "publication listing failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "database error").into_response()
        }
    }
}
