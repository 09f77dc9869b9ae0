//! Behavioural tests for `POST /api/optimize` against a mock generator.

mod support;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use optiview::ai::{OptimizationTarget, YandexGptConfig, YandexGptService};
use optiview::server::{AppState, OPTIMIZE_ROUTE, router};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};
use serde_json::{Value, json};
use support::runtime::{SharedRuntime, completion_body, ensure_runtime_and_server};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "t1.test-token";
const FOLDER_ID: &str = "b1gtest";
const REVIEW_MARKER: &str = "<<ORIGINAL CODE>>";

#[derive(ScenarioState, Default)]
struct ServiceState {
    runtime: Slot<SharedRuntime>,
    server: Slot<MockServer>,
    app: Slot<Router>,
    status: Slot<u16>,
    body: Slot<Value>,
}

#[fixture]
fn service_state() -> ServiceState {
    ServiceState::default()
}

type StepResult = Result<(), Box<dyn std::error::Error>>;

fn unquote(raw: &str) -> String {
    raw.trim_matches('"').replace("\\n", "\n")
}

/// Starts the mock generator, mounts `mocks` in order, and builds the app
/// pointing at it.
fn start_generator(state: &ServiceState, mocks: Vec<Mock>) -> StepResult {
    let runtime = ensure_runtime_and_server(&state.runtime, &state.server)?;

    let base_url = state
        .server
        .with_ref(|server| {
            for mock in mocks {
                runtime.block_on(mock.mount(server));
            }
            format!("{}/foundationModels/v1", server.uri())
        })
        .ok_or("mock server not initialised")?;

    let config = YandexGptConfig::new(
        base_url,
        Some(API_KEY.to_owned()),
        Some(FOLDER_ID.to_owned()),
        Duration::from_secs(5),
    );
    let state_for_app = AppState::new(
        Arc::new(YandexGptService::new(config)),
        OptimizationTarget::default(),
    );
    state.app.set(router(state_for_app));
    Ok(())
}

fn completion_mock() -> wiremock::MockBuilder {
    Mock::given(method("POST")).and(path("/foundationModels/v1/completion"))
}

fn post(state: &ServiceState, body: &Value) -> StepResult {
    let runtime = state.runtime.get().ok_or("runtime not initialised")?;
    let app = state.app.get().ok_or("app not initialised")?;
    let request = Request::builder()
        .method("POST")
        .uri(OPTIMIZE_ROUTE)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))?;

    let (status, bytes) = runtime.block_on(async {
        let response = app.oneshot(request).await?;
        let status = response.status().as_u16();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok::<_, Box<dyn std::error::Error>>((status, bytes))
    })?;

    state.status.set(status);
    state.body.set(serde_json::from_slice(&bytes)?);
    Ok(())
}

fn response_body(state: &ServiceState) -> Result<Value, Box<dyn std::error::Error>> {
    state
        .body
        .get()
        .ok_or_else(|| "a request should be posted before assertions".into())
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a generator that rewrites code to {optimized} and reviews with {review}")]
fn given_answering_generator(
    service_state: &ServiceState,
    optimized: String,
    review: String,
) -> StepResult {
    let review_mock = completion_mock()
        .and(body_string_contains(REVIEW_MARKER))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(&unquote(&review))));
    let optimize_mock = completion_mock().respond_with(
        ResponseTemplate::new(200).set_body_json(completion_body(&unquote(&optimized))),
    );
    start_generator(service_state, vec![review_mock, optimize_mock])
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[given("a generator that rewrites code to {optimized} and fails the review")]
fn given_failing_review(service_state: &ServiceState, optimized: String) -> StepResult {
    let review_mock = completion_mock()
        .and(body_string_contains(REVIEW_MARKER))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"));
    let optimize_mock = completion_mock().respond_with(
        ResponseTemplate::new(200).set_body_json(completion_body(&unquote(&optimized))),
    );
    start_generator(service_state, vec![review_mock, optimize_mock])
}

#[given("a generator that fails with status {status:u16}")]
fn given_failing_generator(service_state: &ServiceState, status: u16) -> StepResult {
    let mock = completion_mock().respond_with(
        ResponseTemplate::new(status).set_body_json(json!({"error": {"message": "internal"}})),
    );
    start_generator(service_state, vec![mock])
}

#[given("a generator that answers with malformed JSON")]
fn given_malformed_generator(service_state: &ServiceState) -> StepResult {
    let mock = completion_mock().respond_with(ResponseTemplate::new(200).set_body_string("{oops"));
    start_generator(service_state, vec![mock])
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[when("a client posts the code {code}")]
fn when_client_posts_code(service_state: &ServiceState, code: String) -> StepResult {
    post(service_state, &json!({"code": unquote(&code)}))
}

#[when("a client posts a request without code")]
fn when_client_posts_without_code(service_state: &ServiceState) -> StepResult {
    post(service_state, &json!({"language": "cpp"}))
}

#[then("the response status is {status:u16}")]
fn then_status(service_state: &ServiceState, status: u16) -> StepResult {
    let actual = service_state.status.get().ok_or("no response recorded")?;
    if actual != status {
        let body = response_body(service_state)?;
        return Err(format!("expected status {status}, got {actual}: {body}").into());
    }
    Ok(())
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the response optimized code is {code}")]
fn then_optimized_code(service_state: &ServiceState, code: String) -> StepResult {
    let expected = unquote(&code);
    let body = response_body(service_state)?;
    if body["optimizedcode"] != json!(expected) {
        return Err(format!("expected optimized code '{expected}', got {body}").into());
    }
    if !body["annotatedcode"].is_string() || !body["rows"].is_array() {
        return Err(format!("response should carry the comparison, got {body}").into());
    }
    Ok(())
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the response comments are {comments}")]
fn then_comments(service_state: &ServiceState, comments: String) -> StepResult {
    let expected: Vec<&str> = comments.trim_matches('"').split('|').collect();
    let body = response_body(service_state)?;
    if body["comments"] != json!(expected) {
        return Err(format!("expected comments {expected:?}, got {}", body["comments"]).into());
    }
    Ok(())
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the response error mentions {fragment}")]
fn then_error_mentions(service_state: &ServiceState, fragment: String) -> StepResult {
    let expected = fragment.trim_matches('"');
    let body = response_body(service_state)?;
    let message = body["error"].as_str().unwrap_or_default();
    if !message.contains(expected) {
        return Err(format!("expected error to mention '{expected}', got {body}").into());
    }
    Ok(())
}

fn received_requests(
    service_state: &ServiceState,
) -> Result<Vec<wiremock::Request>, Box<dyn std::error::Error>> {
    let runtime = service_state.runtime.get().ok_or("runtime not initialised")?;
    service_state
        .server
        .with_ref(|server| runtime.block_on(server.received_requests()))
        .flatten()
        .ok_or_else(|| "request recording should be enabled".into())
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the generator received {count:usize} requests authorised with {token}")]
fn then_generator_requests(service_state: &ServiceState, count: usize, token: String) -> StepResult {
    let expected_header = format!("Bearer {}", token.trim_matches('"'));
    let requests = received_requests(service_state)?;
    if requests.len() != count {
        return Err(format!("expected {count} generator requests, got {}", requests.len()).into());
    }
    for request in &requests {
        let header = request
            .headers
            .get("authorization")
            .and_then(|value| value.to_str().ok());
        if header != Some(expected_header.as_str()) {
            return Err(format!("unexpected authorization header {header:?}").into());
        }
    }
    Ok(())
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "rstest-bdd passes owned step arguments"
)]
#[then("the generator was asked for model {model_uri}")]
fn then_model_uri(service_state: &ServiceState, model_uri: String) -> StepResult {
    let expected = model_uri.trim_matches('"');
    for request in received_requests(service_state)? {
        let payload: Value = serde_json::from_slice(&request.body)?;
        if payload["modelUri"] != json!(expected) {
            return Err(format!("expected modelUri '{expected}', got {payload}").into());
        }
    }
    Ok(())
}

#[scenario(path = "tests/features/optimize_service.feature", index = 0)]
fn posted_code_is_rewritten_and_reviewed(service_state: ServiceState) {
    let _ = service_state;
}

#[scenario(path = "tests/features/optimize_service.feature", index = 1)]
fn generator_errors_are_bad_gateway(service_state: ServiceState) {
    let _ = service_state;
}

#[scenario(path = "tests/features/optimize_service.feature", index = 2)]
fn malformed_generator_payloads_are_bad_gateway(service_state: ServiceState) {
    let _ = service_state;
}

#[scenario(path = "tests/features/optimize_service.feature", index = 3)]
fn missing_code_is_rejected_early(service_state: ServiceState) {
    let _ = service_state;
}

#[scenario(path = "tests/features/optimize_service.feature", index = 4)]
fn failed_review_falls_back(service_state: ServiceState) {
    let _ = service_state;
}
