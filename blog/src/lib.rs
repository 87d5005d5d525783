//! Blog service: public article pages plus the admin console.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod admin;
pub mod config;
pub mod models;
pub mod pages;
pub mod routes;
pub mod state;

use state::AppState;

pub async fn start_server() {
    platform::http::init_tracing();

    info!("Initializing state...");
    let state = AppState::new();
    let port = state.config.port;

    info!("Starting server...");
    platform::http::serve(router(state), port).await;
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::front_page))
        .route("/Article", get(routes::article))
        .route("/admin", get(admin::admin_home))
        .route("/admin/AddArticle", get(admin::add_article))
        .route(
            "/admin/EditArticle",
            get(admin::edit_article_form).post(admin::edit_article),
        )
        .route("/admin/Article", get(admin::admin_article))
        .route("/admin/DeleteArticle", get(admin::delete_article))
        .route("/admin/PageDeleted", get(admin::page_deleted))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
