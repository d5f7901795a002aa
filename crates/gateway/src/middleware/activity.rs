//! Request activity logging.
//!
//! Writes `Request: <METHOD> <URI>` for every request before it is handled,
//! and `Error: <detail>` when the response carries a [`FailureReport`].

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::FailureReport;
use crate::state::AppState;

/// Log each request, and its failure detail if it failed on the server.
pub async fn activity_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    state
        .activity()
        .log(format!("Request: {} {}", request.method(), request.uri()));

    let response = next.run(request).await;

    if let Some(FailureReport(detail)) = response.extensions().get::<FailureReport>() {
        state.activity().log(format!("Error: {detail}"));
    }

    response
}
