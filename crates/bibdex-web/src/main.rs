use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

mod handlers;
mod state;
mod template;

use bibdex_core::Store;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let db_path = std::env::var("BIBDEX_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("bibdex.db"));
    let store = Store::open(&db_path)?;
    println!("Catalogue database: {}", db_path.display());

    let state = Arc::new(AppState {
        store: Mutex::new(store),
    });

    let app = axum::Router::new()
        .route("/", axum::routing::get(handlers::index::index))
        .route(
            "/author/{slug}",
            axum::routing::get(handlers::author::author_detail),
        )
        .with_state(state);

    let addr: SocketAddr = std::env::var("BIBDEX_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:5001".to_string())
        .parse()?;
    println!("Listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
