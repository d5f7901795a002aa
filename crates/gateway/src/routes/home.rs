//! Home route.

use axum::extract::State;

use crate::state::AppState;

/// Text served at `/`.
pub const BANNER: &str = "Select a collection, e.g., /collection/messages";

/// Display the banner.
pub async fn home(State(state): State<AppState>) -> &'static str {
    state.activity().log("Homepage accessed");
    BANNER
}
