//! HTTP route handlers for the gateway.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                                  - Banner
//! GET    /health                            - Liveness check
//! GET    /health/ready                      - Readiness check (pings the store)
//!
//! # Collections
//! GET    /collection/{collectionName}       - All documents
//! POST   /collection/{collectionName}       - Insert one document
//! GET    /collection/{collectionName}/{id}  - One document
//! PUT    /collection/{collectionName}/{id}  - Merge fields into one document
//! DELETE /collection/{collectionName}/{id}  - Delete one document
//!
//! # Orders
//! POST   /place-order                       - Validate and insert an order
//!
//! # Static
//! GET    /static/*                          - Files from the static directory
//! ```

pub mod collections;
pub mod health;
pub mod home;
pub mod orders;

use std::path::Path;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::{
    catch_panic::CatchPanicLayer, cors::CorsLayer, services::ServeDir, trace::TraceLayer,
};

use crate::error::panic_response;
use crate::middleware::activity_middleware;
use crate::state::AppState;

/// Create the collection routes router.
pub fn collection_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/{collectionName}",
            get(collections::index).post(collections::create),
        )
        .route(
            "/{collectionName}/{id}",
            get(collections::show)
                .put(collections::update)
                .delete(collections::destroy),
        )
}

/// Create all routes for the gateway.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/collection", collection_routes())
        .route("/place-order", post(orders::place_order))
}

/// Build the complete application: routes, static files, and middleware.
pub fn app(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    routes()
        .nest_service("/static", ServeDir::new(static_dir.as_ref()))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            activity_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
