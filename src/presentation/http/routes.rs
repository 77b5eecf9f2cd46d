use super::{
    handlers::{health, materials, social},
    middleware::request_id::request_id_middleware,
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Catalogue
        .route("/api/v1/materials", get(materials::list_materials))
        .route("/api/v1/materials/me", get(materials::list_my_materials))
        .route("/api/v1/materials/trending", get(materials::list_trending))
        .route(
            "/api/v1/materials/trending-topics",
            get(materials::trending_topics),
        )
        .route(
            "/api/v1/materials/{id}",
            get(materials::get_material).delete(materials::delete_material),
        )
        .route(
            "/api/v1/materials/{id}/download",
            get(materials::download_material),
        )
        // Engagement
        .route("/api/v1/materials/{id}/like", post(social::like_material))
        .route(
            "/api/v1/materials/{id}/rating",
            get(social::get_rating).post(social::submit_rating),
        )
        .route(
            "/api/v1/materials/{id}/comments",
            get(social::get_comments).post(social::add_comment),
        )
        .route(
            "/api/v1/materials/{id}/comments/{comment_id}/like",
            post(social::like_comment),
        )
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}
