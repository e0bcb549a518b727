use axum::Router;
use axum::routing::get;

use crate::modules::students::controller;
use crate::state::AppState;

pub fn students_router() -> Router<AppState> {
    Router::new()
        .route("/", get(controller::list_students))
        .route(
            "/me",
            get(controller::my_profile).put(controller::update_my_profile),
        )
}
