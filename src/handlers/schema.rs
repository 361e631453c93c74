use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::models::field::{helper_info, input_schema, required_fields};
use crate::services::agent::{initial_message, prompt_preamble, ACTION_NAME};
use crate::state::AppState;

pub async fn get_schema(State(state): State<Arc<AppState>>) -> Json<Value> {
    let required: Vec<&str> = required_fields().map(|f| f.as_str()).collect();
    Json(json!({
        "action": ACTION_NAME,
        "input_schema": input_schema(),
        "helper_info": helper_info(),
        "required_fields": required,
        "initial_message": initial_message(&state.config.clinic_name),
        "prompt_preamble": prompt_preamble(),
    }))
}
