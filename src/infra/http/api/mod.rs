pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::ApiState;

use axum::{
    Router,
    routing::{get, post},
};

pub fn build_api_router(state: ApiState) -> Router {
    Router::new()
        .route(
            "/api/blogs",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/api/blogs/{id}",
            get(handlers::get_post)
                .put(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/api/ai-suggestions", post(handlers::suggest))
        .route("/api/health", get(handlers::health))
        .route("/api/debug-groq", get(handlers::groq_key_diagnostics))
        .with_state(state)
}
