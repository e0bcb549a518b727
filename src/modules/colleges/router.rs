use axum::Router;
use axum::routing::get;

use crate::modules::colleges::controller;
use crate::state::AppState;

pub fn colleges_router() -> Router<AppState> {
    Router::new()
        .route("/", get(controller::search_colleges))
        .route(
            "/me",
            get(controller::my_profile).put(controller::update_my_profile),
        )
        .route("/{college_code}", get(controller::college_detail))
}
