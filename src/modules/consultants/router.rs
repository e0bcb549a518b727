use axum::Router;
use axum::routing::{get, post};

use crate::modules::consultants::controller;
use crate::state::AppState;

pub fn consultants_router() -> Router<AppState> {
    Router::new()
        .route("/", get(controller::list_consultants))
        .route(
            "/me",
            get(controller::my_profile).put(controller::update_my_profile),
        )
        .route("/{id}/approve", post(controller::approve_consultant))
}
