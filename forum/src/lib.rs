//! Question/answer forum service.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod config;
pub mod content;
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
        .route("/", get(routes::home))
        .route("/Question_Home", get(routes::question_home))
        .route("/ask", post(routes::ask))
        .route("/Question", get(routes::question_page))
        .route(
            "/EditQuestion",
            get(routes::edit_question_form).post(routes::edit_question),
        )
        .route("/Answer", post(routes::answer))
        .route("/upVote", get(routes::up_vote))
        .route("/downVote", get(routes::down_vote))
        .route(
            "/EditAnswer",
            get(routes::edit_answer_form).post(routes::edit_answer),
        )
        .route("/Album", get(routes::album))
        .route("/Upload", post(routes::upload))
        .route("/DeletePhoto", get(routes::delete_photo))
        .route("/blob/:key", get(routes::serve_blob))
        .route("/About", get(routes::about))
        .route("/DeleteSuccess", get(routes::delete_success))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
