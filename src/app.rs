use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};
use std::path::Path;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub fn router(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/load-more-products", get(handlers::load_more_products))
        .route("/products/:id", get(handlers::product_page))
        .route("/products/:id/like", post(handlers::like_product))
        .route("/dashboard/:seller", get(handlers::dashboard))
        .nest_service("/public", ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
