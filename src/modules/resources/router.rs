use axum::Router;
use axum::routing::{get, put};

use crate::modules::resources::controller;
use crate::state::AppState;

pub fn courses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(controller::list_courses).post(controller::create_course))
        .route(
            "/{id}",
            put(controller::update_course).delete(controller::delete_course),
        )
}

pub fn events_router() -> Router<AppState> {
    Router::new()
        .route("/", get(controller::list_events).post(controller::create_event))
        .route(
            "/{id}",
            put(controller::update_event).delete(controller::delete_event),
        )
}

pub fn gallery_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(controller::list_gallery).post(controller::create_gallery_item),
        )
        .route(
            "/{id}",
            put(controller::update_gallery_item).delete(controller::delete_gallery_item),
        )
}

pub fn faculty_router() -> Router<AppState> {
    Router::new()
        .route("/", get(controller::list_faculty).post(controller::create_faculty))
        .route(
            "/{id}",
            put(controller::update_faculty).delete(controller::delete_faculty),
        )
}

pub fn hostels_router() -> Router<AppState> {
    Router::new()
        .route("/", get(controller::list_hostels).post(controller::create_hostel))
        .route(
            "/{id}",
            put(controller::update_hostel).delete(controller::delete_hostel),
        )
}
