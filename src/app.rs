use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/category/:tag", get(handlers::category))
        .route("/post/:id", get(handlers::show_post).post(handlers::add_comment))
        .route("/like_post", get(handlers::like_post))
        .route("/undo_like_post", get(handlers::undo_like_post))
        .route("/delete/:id", get(handlers::delete_post))
        .route("/delete_comment/:id", get(handlers::delete_comment))
        .route("/api/posts", get(handlers::list_posts).post(handlers::create_post))
        .route("/api/posts/:id", get(handlers::get_post).put(handlers::update_post))
        .with_state(state)
}
