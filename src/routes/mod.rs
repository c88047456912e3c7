pub mod health;
pub mod plan;
pub mod pois;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/pois/search", get(pois::search_pois))
        .route("/pois", post(pois::save_poi).get(pois::list_pois))
        .route("/routes/optimize", post(plan::optimize_route))
        .route("/routes/preview", post(plan::preview_route))
        .route("/routes", post(plan::save_route).get(plan::list_routes))
        .route("/routes/{id}/load", post(plan::load_route))
        .route("/routes/{id}", delete(plan::delete_route))
        .route("/health", get(health::health_check))
        .with_state(state)
}
