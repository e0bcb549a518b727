use axum::http::{HeaderValue, Method, header};
use axum::{Json, Router, middleware, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::modules::auth::router::auth_router;
use crate::modules::colleges::router::colleges_router;
use crate::modules::consultants::router::consultants_router;
use crate::modules::resources::router::{
    courses_router, events_router, faculty_router, gallery_router, hostels_router,
};
use crate::modules::students::router::students_router;
use crate::modules::users::router::users_router;
use crate::state::AppState;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse::<HeaderValue>().ok())
                .collect::<Vec<_>>(),
        )
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", auth_router())
        .nest("/api/users", users_router())
        .nest("/api/students", students_router())
        .nest("/api/consultants", consultants_router())
        .nest("/api/colleges", colleges_router())
        .nest("/api/courses", courses_router())
        .nest("/api/events", events_router())
        .nest("/api/gallery", gallery_router())
        .nest("/api/faculty", faculty_router())
        .nest("/api/hostels", hostels_router())
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
