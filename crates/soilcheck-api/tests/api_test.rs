//! Router tests driving the API through `tower::ServiceExt::oneshot`

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use soilcheck_api::{create_router, AppState};
use soilcheck_core::models::{AnalysisResult, NutrientStatus, SoilInput};
use soilcheck_core::ports::{InferenceCapability, InferenceFailure, InferenceResult};
use soilcheck_orchestrator::{FailureClassifier, RATE_LIMITED_MESSAGE};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;
use tower::ServiceExt;

const BOUNDARY: &str = "soilcheck-test-boundary";

fn sample_result() -> AnalysisResult {
    AnalysisResult {
        soil_health_score: 72.0,
        nutrient_status: NutrientStatus {
            nitrogen_status: "Low".to_string(),
            nitrogen_level: None,
            phosphorus_status: "Medium".to_string(),
            phosphorus_level: None,
            potassium_status: "High".to_string(),
            potassium_level: None,
        },
        deficiency_analysis: "Nitrogen is low for wheat".to_string(),
        fertilizer_recommendations: Vec::new(),
        crop_advice: "Split the urea dose".to_string(),
        local_context: "Rabi season".to_string(),
        result_date: None,
        analysis_type: None,
    }
}

/// Succeeds for parameters, fails with 429 for images
#[derive(Default)]
struct StubInference {
    calls: AtomicUsize,
}

#[async_trait]
impl InferenceCapability for StubInference {
    async fn analyze_from_parameters(&self, _input: &SoilInput) -> InferenceResult<AnalysisResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(sample_result())
    }

    async fn analyze_from_image(
        &self,
        _image: &[u8],
        _mime_type: &str,
        _crop_hint: &str,
    ) -> InferenceResult<AnalysisResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(InferenceFailure::with_status(429, "Too Many Requests"))
    }
}

/// Blocks parameter requests until released
#[derive(Default)]
struct GatedInference {
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl InferenceCapability for GatedInference {
    async fn analyze_from_parameters(&self, _input: &SoilInput) -> InferenceResult<AnalysisResult> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(sample_result())
    }

    async fn analyze_from_image(
        &self,
        _image: &[u8],
        _mime_type: &str,
        _crop_hint: &str,
    ) -> InferenceResult<AnalysisResult> {
        Err(InferenceFailure::new("not used"))
    }
}

fn state_with(inference: Arc<dyn InferenceCapability>) -> Arc<AppState> {
    Arc::new(AppState::new(inference, FailureClassifier::new()))
}

fn app_with(inference: Arc<dyn InferenceCapability>) -> Router {
    create_router(state_with(inference))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, body)
}

fn empty(method: Method, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn multipart_request(uri: &str, field: &str, content_type: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{}\"; filename=\"soil.jpg\"\r\n", field)
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY))
        .body(Body::from(body))
        .unwrap()
}

async fn create_session(app: &Router) -> String {
    let (status, body) = send(app, empty(Method::POST, "/api/v1/sessions")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["outcome"]["state"], "idle");
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let app = app_with(Arc::new(StubInference::default()));
    let (status, body) = send(&app, empty(Method::GET, "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "service": "soilcheck-api"}));
}

#[tokio::test]
async fn test_crops_catalog() {
    let app = app_with(Arc::new(StubInference::default()));
    let (status, body) = send(&app, empty(Method::GET, "/api/v1/crops")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["crops"].as_array().unwrap().iter().any(|c| c["name"] == "Wheat"));
    assert_eq!(body["soil_categories"].as_array().unwrap().len(), 7);
}

#[tokio::test]
async fn test_session_lifecycle_with_manual_analysis() {
    let inference = Arc::new(StubInference::default());
    let state = state_with(inference.clone());
    let app = create_router(state.clone());
    let id = create_session(&app).await;
    assert_eq!(state.session_count().await, 1);

    let (status, draft) = send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/api/v1/sessions/{}/draft", id),
            json!({"soilCategory": "Loamy", "cropLabel": "wheat", "nitrogen": 250}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(draft["cropLabel"], "Wheat");
    assert_eq!(draft["nitrogen"], 100.0);

    let (status, outcome) =
        send(&app, empty(Method::POST, &format!("/api/v1/sessions/{}/analysis/manual", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["state"], "succeeded");
    assert_eq!(outcome["result"]["soilHealthScore"], 72.0);
    assert_eq!(outcome["result"]["analysisType"], "manual");
    assert_eq!(inference.calls.load(Ordering::SeqCst), 1);

    let (_, outcome) =
        send(&app, empty(Method::GET, &format!("/api/v1/sessions/{}/outcome", id))).await;
    assert_eq!(outcome["state"], "succeeded");

    let (status, outcome) =
        send(&app, empty(Method::POST, &format!("/api/v1/sessions/{}/reset", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["state"], "idle");

    // Reset keeps the draft
    let (_, draft) = send(&app, empty(Method::GET, &format!("/api/v1/sessions/{}/draft", id))).await;
    assert_eq!(draft["soilCategory"], "Loamy");

    let (status, _) = send(&app, empty(Method::DELETE, &format!("/api/v1/sessions/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.session_count().await, 0);

    let (status, _) =
        send(&app, empty(Method::GET, &format!("/api/v1/sessions/{}/outcome", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app = app_with(Arc::new(StubInference::default()));
    let id = uuid::Uuid::new_v4();

    let (status, body) =
        send(&app, empty(Method::POST, &format!("/api/v1/sessions/{}/analysis/manual", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Session not found");

    let (status, _) = send(&app, empty(Method::DELETE, &format!("/api/v1/sessions/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_incomplete_draft_fails_as_invalid_input() {
    let inference = Arc::new(StubInference::default());
    let app = app_with(inference.clone());
    let id = create_session(&app).await;

    let (status, outcome) =
        send(&app, empty(Method::POST, &format!("/api/v1/sessions/{}/analysis/manual", id))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["state"], "failed");
    assert_eq!(outcome["class"], "invalid_input");
    assert_eq!(inference.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_invalid_draft_patch_is_bad_request() {
    let app = app_with(Arc::new(StubInference::default()));
    let id = create_session(&app).await;

    let (status, body) = send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/api/v1/sessions/{}/draft", id),
            json!({"soilCategory": "Marble"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid draft update");
}

#[tokio::test]
async fn test_image_analysis_rate_limited() {
    let app = app_with(Arc::new(StubInference::default()));
    let id = create_session(&app).await;

    let (status, outcome) = send(
        &app,
        multipart_request(
            &format!("/api/v1/sessions/{}/analysis/image", id),
            "image",
            "image/jpeg",
            b"\xFF\xD8\xFF\xE0jpeg",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["state"], "failed");
    assert_eq!(outcome["class"], "rate_limited");
    assert_eq!(outcome["message"], RATE_LIMITED_MESSAGE);
}

#[tokio::test]
async fn test_image_analysis_without_image_field_is_bad_request() {
    let app = app_with(Arc::new(StubInference::default()));
    let id = create_session(&app).await;

    let (status, body) = send(
        &app,
        multipart_request(
            &format!("/api/v1/sessions/{}/analysis/image", id),
            "photo",
            "image/jpeg",
            b"jpeg",
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No image provided");
}

#[tokio::test]
async fn test_concurrent_run_is_conflict() {
    let inference = Arc::new(GatedInference::default());
    let app = app_with(inference.clone());
    let id = create_session(&app).await;

    send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/api/v1/sessions/{}/draft", id),
            json!({"soilCategory": "Clay", "cropLabel": "Rice"}),
        ),
    )
    .await;

    let first = {
        let app = app.clone();
        let uri = format!("/api/v1/sessions/{}/analysis/manual", id);
        tokio::spawn(async move { send(&app, empty(Method::POST, &uri)).await })
    };
    inference.entered.notified().await;

    let (status, body) =
        send(&app, empty(Method::POST, &format!("/api/v1/sessions/{}/analysis/manual", id))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Analysis already in progress");

    let (_, outcome) =
        send(&app, empty(Method::GET, &format!("/api/v1/sessions/{}/outcome", id))).await;
    assert_eq!(outcome["state"], "in_progress");

    inference.release.notify_one();
    let (status, outcome) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["state"], "succeeded");
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let state = state_with(Arc::new(StubInference::default()));
    let app = create_router(state.clone());
    let first = create_session(&app).await;
    let second = create_session(&app).await;
    assert_ne!(first, second);
    assert_eq!(state.session_count().await, 2);

    send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/api/v1/sessions/{}/draft", first),
            json!({"soilCategory": "Sandy", "cropLabel": "Maize"}),
        ),
    )
    .await;
    send(&app, empty(Method::POST, &format!("/api/v1/sessions/{}/analysis/manual", first))).await;

    let (_, outcome) =
        send(&app, empty(Method::GET, &format!("/api/v1/sessions/{}/outcome", second))).await;
    assert_eq!(outcome["state"], "idle");

    let (_, draft) =
        send(&app, empty(Method::GET, &format!("/api/v1/sessions/{}/draft", second))).await;
    assert_eq!(draft["soilCategory"], "Unselected");
}

#[tokio::test]
async fn test_reset_during_analysis_is_conflict() {
    let inference = Arc::new(GatedInference::default());
    let app = app_with(inference.clone());
    let id = create_session(&app).await;

    send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/api/v1/sessions/{}/draft", id),
            json!({"soilCategory": "Silt", "cropLabel": "Cotton"}),
        ),
    )
    .await;

    let running = {
        let app = app.clone();
        let uri = format!("/api/v1/sessions/{}/analysis/manual", id);
        tokio::spawn(async move { send(&app, empty(Method::POST, &uri)).await })
    };
    inference.entered.notified().await;

    let (status, body) =
        send(&app, empty(Method::POST, &format!("/api/v1/sessions/{}/reset", id))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Analysis in progress");

    inference.release.notify_one();
    let (_, outcome) = running.await.unwrap();
    assert_eq!(outcome["state"], "succeeded");

    // Once the run has finished the reset goes through
    let (status, outcome) =
        send(&app, empty(Method::POST, &format!("/api/v1/sessions/{}/reset", id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["state"], "idle");
}

#[tokio::test]
async fn test_session_limit_evicts_least_recently_used() {
    let state = Arc::new(
        AppState::new(Arc::new(StubInference::default()), FailureClassifier::new())
            .with_max_sessions(2),
    );
    let app = create_router(state.clone());

    let oldest = create_session(&app).await;
    let idle = create_session(&app).await;

    // Touching the oldest session makes the other one the eviction candidate
    let (status, _) =
        send(&app, empty(Method::GET, &format!("/api/v1/sessions/{}/draft", oldest))).await;
    assert_eq!(status, StatusCode::OK);

    let newest = create_session(&app).await;
    assert_eq!(state.session_count().await, 2);

    let (status, _) =
        send(&app, empty(Method::GET, &format!("/api/v1/sessions/{}/draft", idle))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for id in [&oldest, &newest] {
        let (status, _) =
            send(&app, empty(Method::GET, &format!("/api/v1/sessions/{}/draft", id))).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_session_limit_never_evicts_a_running_analysis() {
    let inference = Arc::new(GatedInference::default());
    let state = Arc::new(
        AppState::new(inference.clone(), FailureClassifier::new()).with_max_sessions(1),
    );
    let app = create_router(state.clone());
    let busy = create_session(&app).await;

    send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/api/v1/sessions/{}/draft", busy),
            json!({"soilCategory": "Peaty", "cropLabel": "Millet"}),
        ),
    )
    .await;

    let running = {
        let app = app.clone();
        let uri = format!("/api/v1/sessions/{}/analysis/manual", busy);
        tokio::spawn(async move { send(&app, empty(Method::POST, &uri)).await })
    };
    inference.entered.notified().await;

    let (status, body) = send(&app, empty(Method::POST, "/api/v1/sessions")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Too many active sessions");
    assert_eq!(state.session_count().await, 1);

    inference.release.notify_one();
    let (_, outcome) = running.await.unwrap();
    assert_eq!(outcome["state"], "succeeded");

    // Finished sessions can be evicted again
    let replacement = create_session(&app).await;
    assert_ne!(replacement, busy);
    assert_eq!(state.session_count().await, 1);
}
