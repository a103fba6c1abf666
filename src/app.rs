use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/users/:user_id/settings",
            get(handlers::get_settings).put(handlers::put_settings),
        )
        .route(
            "/api/users/:user_id/entries",
            get(handlers::list_entries).post(handlers::add_entry),
        )
        .route(
            "/api/users/:user_id/entries/:entry_id",
            get(handlers::get_entry)
                .put(handlers::edit_entry)
                .delete(handlers::delete_entry),
        )
        .route("/api/users/:user_id/chart", get(handlers::chart))
        .route("/api/users/:user_id/dashboard", get(handlers::dashboard))
        .with_state(state)
}
