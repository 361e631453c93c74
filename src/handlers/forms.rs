use std::any::Any;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{FormId, FormSnapshot, StepOutcome};
use crate::services::intake::Intake;
use crate::state::AppState;

#[derive(Serialize, Deserialize)]
pub struct CreatedForm {
    pub form_id: FormId,
}

#[derive(Serialize, Deserialize)]
pub struct FormView {
    #[serde(flatten)]
    pub snapshot: FormSnapshot,
    pub status: String,
}

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub payload: Value,
}

pub async fn create_form(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<CreatedForm>), AppError> {
    let form_id = state.forms.create()?;
    tracing::info!(form_id = %form_id, "form created");
    Ok((StatusCode::CREATED, Json(CreatedForm { form_id })))
}

pub async fn get_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<FormView>, AppError> {
    let id = FormId(id);
    let form = state.forms.get(id)?;
    let snapshot = form.lock().await.snapshot();
    let status = state.registry.status_label(id)?.to_string();
    Ok(Json(FormView { snapshot, status }))
}

pub async fn submit_field(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<StepOutcome>, AppError> {
    let id = FormId(id);
    let form = state.forms.get(id)?;

    let Value::Object(payload) = req.payload else {
        return Ok(Json(StepOutcome::fail(
            "payload should be an object mapping one field name to its value",
            "please input only one key at a time",
        )));
    };
    let key = payload.keys().next().cloned().unwrap_or_default();

    let intake = Intake {
        registry: &state.registry,
        notifier: state.messaging.as_ref(),
        catalog: &state.catalog,
        today: Local::now().date_naive(),
    };

    let outcome = {
        let mut form = form.lock().await;
        match intake.validate_and_apply(&mut form, &payload).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(form_id = %id, key = %key, error = %e, "submission failed");
                StepOutcome::application_error()
            }
        }
    };

    tracing::info!(form_id = %id, key = %key, success = outcome.success, "field submitted");
    tracing::debug!(form_id = %id, "{}", outcome.describe());
    Ok(Json(outcome))
}

pub async fn end_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let id = FormId(id);
    state.forms.remove(id)?;
    state.registry.forget(id)?;
    tracing::info!(form_id = %id, "form discarded");
    Ok(StatusCode::NO_CONTENT)
}

pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(detail, "handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(StepOutcome::application_error()),
    )
        .into_response()
}
