use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::Store,
    middleware::{make_request_span, request_id_middleware},
    services::{recommendations::Recommender, weather::WeatherService},
};

pub mod feedback;
pub mod outfits;
pub mod wardrobe;
pub mod weather;

/// Shared state handed to every handler
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub recommender: Recommender,
    pub weather: WeatherService,
}

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes())
        .with_state(Arc::new(state))
        .layer(
            // Outermost first: the request id must exist before the trace span is built
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(CorsLayer::permissive()),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/users/:user_id/wardrobe",
            get(wardrobe::list_items).post(wardrobe::create_item),
        )
        .route(
            "/users/:user_id/wardrobe/:item_id",
            get(wardrobe::get_item).delete(wardrobe::delete_item),
        )
        .route("/users/:user_id/outfits/generate", post(outfits::generate))
        .route(
            "/users/:user_id/outfits/saved",
            get(outfits::list_saved).post(outfits::save),
        )
        .route("/users/:user_id/outfits/:outfit_id", get(outfits::get_outfit))
        .route("/users/:user_id/feedback", post(feedback::submit))
        .route("/users/:user_id/preferences", get(feedback::get_preferences))
        .route("/weather", get(weather::current))
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}
