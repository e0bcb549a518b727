use axum::Router;
use axum::routing::get;

use crate::modules::users::controller;
use crate::state::AppState;

pub fn users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(controller::list_users))
        .route("/me", get(controller::me))
        .route("/me/profile-status", get(controller::profile_status))
}
