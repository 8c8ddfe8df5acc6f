pub mod articles;
pub mod health;

use std::path::Path;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Builds the API router. `/articles/*` serves stored PDFs and MP3s; every
/// other unmatched path falls through to the static front-end in `public_dir`.
pub fn build_router(state: AppState, public_dir: &Path) -> Router {
    let articles_dir = state.store.dir().to_path_buf();

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/articles", get(articles::handle_list_articles))
        .route("/api/articles/:date", get(articles::handle_articles_by_date))
        .route("/api/latest-article", get(articles::handle_latest_article))
        .route(
            "/api/article-by-prefix/:prefix",
            get(articles::handle_article_by_prefix),
        )
        .route(
            "/api/generate-today",
            post(articles::handle_generate_today),
        )
        .nest_service("/articles", ServeDir::new(articles_dir))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state)
}
