use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use intake::config::AppConfig;
use intake::handlers;
use intake::models::Catalog;
use intake::services::forms::FormStore;
use intake::services::messaging::MessagingProvider;
use intake::services::registry::SchedulerRegistry;
use intake::state::AppState;

// ── Mock Providers ──

struct MockMessaging {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
}

#[async_trait]
impl MessagingProvider for MockMessaging {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("carrier unavailable");
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), body.to_string()));
        Ok(())
    }
}

struct PanickingMessaging {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl MessagingProvider for PanickingMessaging {
    async fn send_message(&self, _to: &str, _body: &str) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("carrier client crashed");
    }
}

// ── Helpers ──

fn test_config() -> AppConfig {
    AppConfig {
        port: 3000,
        clinic_name: "Test Clinic".to_string(),
        twilio_account_sid: "".to_string(),
        twilio_auth_token: "".to_string(),
        twilio_phone_number: "+15551234567".to_string(),
        catalog_path: None,
        form_ttl_minutes: 30,
    }
}

fn state_from(messaging: Box<dyn MessagingProvider>) -> Arc<AppState> {
    Arc::new(AppState {
        config: test_config(),
        messaging,
        registry: SchedulerRegistry::new(),
        forms: FormStore::new(chrono::Duration::minutes(30)),
        catalog: Catalog::default_clinic(),
    })
}

fn state_with(fail: bool) -> (Arc<AppState>, Arc<Mutex<Vec<(String, String)>>>) {
    let sent = Arc::new(Mutex::new(vec![]));
    let state = state_from(Box::new(MockMessaging {
        sent: Arc::clone(&sent),
        fail,
    }));
    (state, sent)
}

fn test_app(state: Arc<AppState>) -> Router {
    handlers::router(state)
}

async fn send(state: &Arc<AppState>, req: Request<Body>) -> (StatusCode, Value) {
    let res = test_app(state.clone()).oneshot(req).await.unwrap();
    let status = res.status();
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

async fn create_form(state: &Arc<AppState>) -> String {
    let (status, json) = send(
        state,
        Request::builder()
            .method("POST")
            .uri("/api/forms")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["form_id"].as_str().unwrap().to_string()
}

async fn post_payload(state: &Arc<AppState>, form_id: &str, payload: Value) -> (StatusCode, Value) {
    send(
        state,
        Request::builder()
            .method("POST")
            .uri(format!("/api/forms/{form_id}/submit"))
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "payload": payload }).to_string()))
            .unwrap(),
    )
    .await
}

async fn submit(state: &Arc<AppState>, form_id: &str, payload: Value) -> Value {
    let (status, json) = post_payload(state, form_id, payload).await;
    assert_eq!(status, StatusCode::OK);
    json
}

async fn get_form(state: &Arc<AppState>, form_id: &str) -> (StatusCode, Value) {
    send(
        state,
        Request::builder()
            .uri(format!("/api/forms/{form_id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

async fn fill_required(state: &Arc<AppState>, form_id: &str, send_text: bool) {
    for payload in [
        json!({"patient_name": "Jane Doe"}),
        json!({"patient_dob": "1985-09-30"}),
        json!({"reason_for_visit": "follow-up"}),
        json!({"patient_phone_number": "415-555-2671"}),
        json!({"appointment_id": "appt_id_155121"}),
        json!({"send_text": send_text}),
    ] {
        let outcome = submit(state, form_id, payload.clone()).await;
        assert_eq!(outcome["success"], true, "{payload}: {outcome}");
    }
}

// ── Tests ──

#[tokio::test]
async fn test_health() {
    let (state, _) = state_with(false);
    let res = test_app(state)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"ok");
}

#[tokio::test]
async fn test_schema_describes_form() {
    let (state, _) = state_with(false);
    let (status, json) = send(
        &state,
        Request::builder()
            .uri("/api/schema")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["input_schema"]["type"], "object");
    assert!(json["input_schema"]["properties"]["*see_next_step"].is_object());
    assert_eq!(json["required_fields"].as_array().unwrap().len(), 6);
    assert!(json["initial_message"]
        .as_str()
        .unwrap()
        .contains("Test Clinic"));
    assert!(json["prompt_preamble"].as_str().unwrap().contains("*validate_all_and_submit_if_valid"));
}

#[tokio::test]
async fn test_new_form_is_empty_and_unsubmitted() {
    let (state, _) = state_with(false);
    let form_id = create_form(&state).await;

    let (status, json) = get_form(&state, &form_id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["form_id"], form_id.as_str());
    assert_eq!(json["status"], "unsubmitted");
    assert_eq!(json["fields"]["patient_name"], Value::Null);
}

#[tokio::test]
async fn test_unknown_form_not_found() {
    let (state, _) = state_with(false);
    let missing = uuid::Uuid::new_v4();
    let (status, json) = get_form(&state, &missing.to_string()).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_field_validation_round_trip() {
    let (state, _) = state_with(false);
    let form_id = create_form(&state).await;

    let outcome = submit(&state, &form_id, json!({"patient_name": "Jane"})).await;
    assert_eq!(outcome["success"], false);

    let outcome = submit(&state, &form_id, json!({"patient_name": "Jane Doe"})).await;
    assert_eq!(outcome["success"], true);

    let outcome = submit(&state, &form_id, json!({"patient_phone_number": "+14155552671"})).await;
    assert_eq!(outcome["success"], true);
    assert_eq!(outcome["info"], "The parsed number that will be used is +14155552671");

    let (_, json) = get_form(&state, &form_id).await;
    assert_eq!(json["fields"]["patient_name"], "Jane Doe");
    assert_eq!(json["fields"]["patient_phone_number"], "+14155552671");
}

#[tokio::test]
async fn test_non_object_payload_rejected() {
    let (state, _) = state_with(false);
    let form_id = create_form(&state).await;

    let outcome = submit(&state, &form_id, json!("Jane Doe")).await;
    assert_eq!(outcome["success"], false);
    assert_eq!(outcome["next_step"], "please input only one key at a time");
}

#[tokio::test]
async fn test_full_submission_texts_once() {
    let (state, sent) = state_with(false);
    let form_id = create_form(&state).await;
    fill_required(&state, &form_id, true).await;

    let outcome = submit(&state, &form_id, json!({"*validate_all_and_submit_if_valid": ""})).await;
    assert_eq!(outcome["success"], true, "{outcome}");

    let (_, json) = get_form(&state, &form_id).await;
    assert_eq!(json["status"], "scheduled");
    assert_eq!(json["fields"]["appointment_time"], "2:00 PM Saturday July 20");
    assert_eq!(json["fields"]["appointment_physician_name"], "Dr. Nickel Baker");
    assert_eq!(json["fields"]["appointment_address"], "123 St Clinic, 123 123 St");

    let again = submit(&state, &form_id, json!({"*validate_all_and_submit_if_valid": ""})).await;
    assert_eq!(again["success"], false);

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "+14155552671");
}

#[tokio::test]
async fn test_failed_text_leaves_form_unsubmitted() {
    let (state, _) = state_with(true);
    let form_id = create_form(&state).await;
    fill_required(&state, &form_id, true).await;

    let outcome = submit(&state, &form_id, json!({"*validate_all_and_submit_if_valid": ""})).await;
    assert_eq!(outcome["success"], false);
    assert_eq!(outcome["info"], "Could not send confirmation text");
    assert_eq!(outcome["next_step"], "please retry");

    let (_, json) = get_form(&state, &form_id).await;
    assert_eq!(json["status"], "unsubmitted");
}

#[tokio::test]
async fn test_notifier_panic_becomes_application_error_and_releases_form() {
    let calls = Arc::new(AtomicUsize::new(0));
    let state = state_from(Box::new(PanickingMessaging {
        calls: Arc::clone(&calls),
    }));
    let form_id = create_form(&state).await;
    fill_required(&state, &form_id, true).await;

    let expected = json!({
        "success": false,
        "info": "Error: an application error has occurred",
        "next_step": "retry?",
    });

    let (status, json) =
        post_payload(&state, &form_id, json!({"*validate_all_and_submit_if_valid": ""})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, expected);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let (_, view) = get_form(&state, &form_id).await;
    assert_eq!(view["status"], "unsubmitted");

    // A retry gets past the claim and reaches the notifier again.
    let (status, json) =
        post_payload(&state, &form_id, json!({"*validate_all_and_submit_if_valid": ""})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json, expected);
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let outcome = submit(&state, &form_id, json!({"*see_next_step": ""})).await;
    assert_eq!(outcome["success"], true);
}

#[tokio::test]
async fn test_incomplete_form_lists_all_problems() {
    let (state, sent) = state_with(false);
    let form_id = create_form(&state).await;
    submit(&state, &form_id, json!({"reason_for_visit": "rash"})).await;

    let outcome = submit(&state, &form_id, json!({"*validate_all_and_submit_if_valid": ""})).await;
    assert_eq!(outcome["success"], false);
    let info = outcome["info"].as_str().unwrap();
    for field in ["patient_name", "patient_dob", "patient_phone_number", "appointment_id", "send_text"] {
        assert!(info.contains(field), "{field} missing from: {info}");
    }
    assert!(sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_end_form_discards_it() {
    let (state, _) = state_with(false);
    let form_id = create_form(&state).await;

    let res = test_app(state.clone())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/forms/{form_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (status, _) = get_form(&state, &form_id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
