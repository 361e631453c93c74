pub mod forms;
pub mod health;
pub mod schema;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/schema", get(schema::get_schema))
        .route("/api/forms", post(forms::create_form))
        .route("/api/forms/:id", get(forms::get_form).delete(forms::end_form))
        .route("/api/forms/:id/submit", post(forms::submit_field))
        .layer(CatchPanicLayer::custom(forms::panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
