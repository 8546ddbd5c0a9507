use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};

use crate::state::AppState;
use crate::template;

pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    let Ok(store) = state.store.lock() else {
        return (StatusCode::INTERNAL_SERVER_ERROR, "store unavailable").into_response();
    };

    match store.list_authors() {
        Ok(authors) => Html(template::render_index(&authors)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "author listing failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "database error").into_response()
        }
    }
}
