//! # REST API
//!
//! Builds the axum router that exposes the deployed token over HTTP.
//! All endpoints share application state through axum's `State` extractor.
//!
//! ## Endpoints
//!
//! | Method | Path                          | Description                        |
//! |--------|-------------------------------|------------------------------------|
//! | GET    | `/health`                     | Liveness probe                     |
//! | GET    | `/token`                      | Token summary ([`TokenInfo`])      |
//! | GET    | `/accounts/:principal`        | Balance and list membership        |
//! | GET    | `/allowances/:owner/:spender` | Remaining allowance                |
//! | GET    | `/allowlist`                  | Allow-list in supplied order       |
//! | GET    | `/events?since=N`             | Event log from sequence `N`        |
//! | POST   | `/calls`                      | Execute an [`Invocation`]          |
//!
//! Rejected calls answer `422` with `{code, category, message}`. Bodies or
//! path segments that do not parse answer `400` in the same shape.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use bastion_contracts::{ErrorCategory, EventRecord, GatedToken, Invocation, TokenError, TokenInfo};
use bastion_protocol::{Amount, Principal, PrincipalError};

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared application state available to all request handlers.
///
/// Cheap to clone: everything lives behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The node's reported version string.
    pub version: String,
    /// The deployed token. The mutex serializes every call, so each one
    /// runs to completion before the next is observed.
    pub token: Arc<Mutex<GatedToken>>,
    /// Reference to Prometheus metrics for in-handler recording.
    pub metrics: SharedMetrics,
}

impl AppState {
    pub fn new(version: String, token: GatedToken, metrics: SharedMetrics) -> Self {
        metrics.observe_state(token.is_paused(), token.events().len());
        Self {
            version,
            token: Arc::new(Mutex::new(token)),
            metrics,
        }
    }
}

/// Builds the API router with CORS and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/token", get(token_handler))
        .route("/accounts/:principal", get(account_handler))
        .route("/allowances/:owner/:spender", get(allowance_handler))
        .route("/allowlist", get(allow_list_handler))
        .route("/events", get(events_handler))
        .route("/calls", post(call_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// `GET /health` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// `GET /accounts/:principal` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
    pub principal: Principal,
    pub balance: Amount,
    pub denied: bool,
    pub allowed: bool,
}

/// `GET /allowances/:owner/:spender` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AllowanceResponse {
    pub owner: Principal,
    pub spender: Principal,
    pub allowance: Amount,
}

/// `GET /allowlist` response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AllowListResponse {
    pub enabled: bool,
    pub accounts: Vec<Principal>,
}

/// `POST /calls` success response: the events the call emitted.
#[derive(Debug, Serialize, Deserialize)]
pub struct CallResponse {
    pub method: String,
    pub events: Vec<EventRecord>,
}

/// Error body shared by 400 and 422 responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ErrorCategory>,
    pub message: String,
}

impl From<&TokenError> for ErrorResponse {
    fn from(err: &TokenError) -> Self {
        Self {
            code: err.code().to_string(),
            category: Some(err.category()),
            message: err.to_string(),
        }
    }
}

/// Query string of `GET /events`.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    #[serde(default)]
    pub since: u64,
}

fn bad_request(body: ErrorResponse) -> Response {
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

fn parse_principal(raw: &str) -> Result<Principal, Response> {
    raw.parse::<Principal>().map_err(|e: PrincipalError| {
        tracing::debug!(input = raw, error = %e, "rejected malformed principal");
        bad_request(ErrorResponse::from(&TokenError::from(e)))
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health`: liveness probe.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".into(),
        version: state.version.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// `GET /token`: token summary.
async fn token_handler(State(state): State<AppState>) -> Json<TokenInfo> {
    Json(state.token.lock().info())
}

/// `GET /accounts/:principal`: balance and list membership.
async fn account_handler(
    Path(principal): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let principal = match parse_principal(&principal) {
        Ok(p) => p,
        Err(resp) => return resp,
    };

    let token = state.token.lock();
    Json(AccountResponse {
        principal,
        balance: token.balance_of(&principal),
        denied: token.is_denied(&principal),
        allowed: token.is_allowed(&principal),
    })
    .into_response()
}

/// `GET /allowances/:owner/:spender`: what `spender` may still move.
async fn allowance_handler(
    Path((owner, spender)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Response {
    let (owner, spender) = match (parse_principal(&owner), parse_principal(&spender)) {
        (Ok(o), Ok(s)) => (o, s),
        (Err(resp), _) | (_, Err(resp)) => return resp,
    };

    let allowance = state.token.lock().allowance(&owner, &spender);
    Json(AllowanceResponse {
        owner,
        spender,
        allowance,
    })
    .into_response()
}

/// `GET /allowlist`: the allow-list snapshot.
async fn allow_list_handler(State(state): State<AppState>) -> Json<AllowListResponse> {
    let token = state.token.lock();
    Json(AllowListResponse {
        enabled: token.is_allow_list_enabled(),
        accounts: token.allow_list_snapshot().to_vec(),
    })
}

/// `GET /events?since=N`: event log suffix.
async fn events_handler(
    Query(query): Query<EventsQuery>,
    State(state): State<AppState>,
) -> Json<Vec<EventRecord>> {
    Json(state.token.lock().events_since(query.since).to_vec())
}

/// `POST /calls`: executes one invocation under the token lock.
async fn call_handler(
    State(state): State<AppState>,
    payload: Result<Json<Invocation>, JsonRejection>,
) -> Response {
    let Json(invocation) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "rejected malformed call");
            return bad_request(ErrorResponse {
                code: "MalformedRequest".into(),
                category: None,
                message: rejection.body_text(),
            });
        }
    };

    let method = invocation.call.method();
    let caller = invocation.caller;
    let timer = state.metrics.call_latency_seconds.start_timer();

    let (result, emitted) = {
        let mut token = state.token.lock();
        let before = token.events().len() as u64;
        let result = token.invoke(invocation);
        let emitted = token.events_since(before).to_vec();
        state
            .metrics
            .observe_state(token.is_paused(), token.events().len());
        (result, emitted)
    };
    timer.observe_duration();

    match result {
        Ok(()) => {
            state
                .metrics
                .calls_accepted_total
                .with_label_values(&[method])
                .inc();
            (
                StatusCode::OK,
                Json(CallResponse {
                    method: method.to_string(),
                    events: emitted,
                }),
            )
                .into_response()
        }
        Err(err) => {
            state
                .metrics
                .calls_rejected_total
                .with_label_values(&[err.code()])
                .inc();
            tracing::warn!(%caller, method, code = err.code(), "call rejected: {}", err);
            (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::from(&err))).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use bastion_contracts::{FeatureFlags, TokenConfig, TokenEvent};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn p(label: &str) -> Principal {
        Principal::derive(label)
    }

    /// Creates a test AppState around a freshly deployed token.
    fn test_app_state(features: FeatureFlags) -> AppState {
        let config = TokenConfig {
            name: "Test Dollar".into(),
            symbol: "TUSD".into(),
            initial_supply: 1_000,
            decimals: 0,
            owner: p("issuer"),
            features,
        };
        let token = GatedToken::deploy(config, p("issuer")).expect("deploy");
        let metrics = Arc::new(crate::metrics::NodeMetrics::new());
        AppState::new("0.1.0-test".into(), token, metrics)
    }

    fn compliance_features() -> FeatureFlags {
        FeatureFlags {
            pausable: true,
            deny_list_enabled: true,
            ..FeatureFlags::default()
        }
    }

    /// Sends a GET request and returns the (status, body_bytes).
    async fn get(router: &Router, path: &str) -> (StatusCode, Vec<u8>) {
        let req = Request::builder().uri(path).body(Body::empty()).unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        (status, body)
    }

    /// Sends a POST request with JSON body and returns (status, body_bytes).
    async fn post_json(router: &Router, path: &str, body: Value) -> (StatusCode, Vec<u8>) {
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let body = resp
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec();
        (status, body)
    }

    fn call(caller: &str, call: Value) -> Value {
        json!({ "caller": p(caller).to_hex(), "call": call })
    }

    // -- Reads ---------------------------------------------------------------

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let router = create_router(test_app_state(FeatureFlags::default()));
        let (status, body) = get(&router, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let health: HealthResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(health.status, "ok");
        assert_eq!(health.version, "0.1.0-test");
    }

    #[tokio::test]
    async fn token_endpoint_returns_info() {
        let router = create_router(test_app_state(compliance_features()));
        let (status, body) = get(&router, "/token").await;
        assert_eq!(status, StatusCode::OK);
        let info: TokenInfo = serde_json::from_slice(&body).unwrap();
        assert_eq!(info.symbol, "TUSD");
        assert_eq!(info.total_supply, 1_000);
        assert!(info.features.deny_list_enabled);
        assert_eq!(info.owner, Some(p("issuer")));
    }

    #[tokio::test]
    async fn account_endpoint_reports_balance() {
        let router = create_router(test_app_state(FeatureFlags::default()));
        let (status, body) = get(&router, &format!("/accounts/{}", p("issuer"))).await;
        assert_eq!(status, StatusCode::OK);
        let account: AccountResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(account.balance, 1_000);
        assert!(!account.denied);
    }

    #[tokio::test]
    async fn account_endpoint_rejects_malformed_principal() {
        let router = create_router(test_app_state(FeatureFlags::default()));
        let (status, body) = get(&router, "/accounts/0xnothex").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.code, "InvalidPrincipal");
        assert_eq!(err.category, Some(ErrorCategory::Principal));
    }

    #[tokio::test]
    async fn allowance_endpoint_reflects_approval() {
        let state = test_app_state(FeatureFlags::default());
        let router = create_router(state.clone());
        state
            .token
            .lock()
            .approve(&p("issuer"), &p("spender"), 25)
            .unwrap();

        let (status, body) = get(
            &router,
            &format!("/allowances/{}/{}", p("issuer"), p("spender")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let allowance: AllowanceResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(allowance.allowance, 25);
    }

    // -- Calls ---------------------------------------------------------------

    #[tokio::test]
    async fn transfer_call_returns_emitted_events() {
        let router = create_router(test_app_state(FeatureFlags::default()));
        let (status, body) = post_json(
            &router,
            "/calls",
            call(
                "issuer",
                json!({ "transfer": { "to": p("alice").to_hex(), "amount": 40 } }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let resp: CallResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(resp.method, "transfer");
        assert_eq!(resp.events.len(), 1);
        assert_eq!(
            resp.events[0].event,
            TokenEvent::Transfer {
                from: Some(p("issuer")),
                to: Some(p("alice")),
                amount: 40
            }
        );

        let (_, body) = get(&router, &format!("/accounts/{}", p("alice"))).await;
        let account: AccountResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(account.balance, 40);
    }

    #[tokio::test]
    async fn rejected_call_returns_422_with_code() {
        let router = create_router(test_app_state(FeatureFlags::default()));
        let (status, body) = post_json(
            &router,
            "/calls",
            call(
                "issuer",
                json!({ "mint": { "to": p("alice").to_hex(), "amount": 1 } }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.code, "MintingNotEnabled");
        assert_eq!(err.category, Some(ErrorCategory::CapabilityDisabled));
    }

    #[tokio::test]
    async fn malformed_principal_in_call_returns_400() {
        let router = create_router(test_app_state(FeatureFlags::default()));
        let (status, body) = post_json(
            &router,
            "/calls",
            json!({
                "caller": p("issuer").to_hex(),
                "call": { "transfer": { "to": "0x1234", "amount": 1 } }
            }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.code, "MalformedRequest");
    }

    #[tokio::test]
    async fn denied_recipient_is_rejected_over_http() {
        let router = create_router(test_app_state(compliance_features()));
        let (status, _) = post_json(
            &router,
            "/calls",
            call("issuer", json!({ "deny": { "account": p("bob").to_hex() } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = post_json(
            &router,
            "/calls",
            call(
                "issuer",
                json!({ "transfer": { "to": p("bob").to_hex(), "amount": 1 } }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let err: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(err.code, "RecipientBlacklisted");

        let (_, body) = get(&router, &format!("/accounts/{}", p("bob"))).await;
        let account: AccountResponse = serde_json::from_slice(&body).unwrap();
        assert!(account.denied);
    }

    #[tokio::test]
    async fn allowlist_endpoint_returns_snapshot_in_order() {
        let router = create_router(test_app_state(FeatureFlags {
            allow_list_enabled: true,
            ..FeatureFlags::default()
        }));
        let accounts = vec![p("c").to_hex(), p("a").to_hex(), p("c").to_hex()];
        let (status, _) = post_json(
            &router,
            "/calls",
            call(
                "issuer",
                json!({ "replace_allow_list": { "accounts": accounts } }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = get(&router, "/allowlist").await;
        assert_eq!(status, StatusCode::OK);
        let list: AllowListResponse = serde_json::from_slice(&body).unwrap();
        assert!(list.enabled);
        assert_eq!(list.accounts, vec![p("c"), p("a"), p("c")]);
    }

    #[tokio::test]
    async fn events_endpoint_honours_since() {
        let router = create_router(test_app_state(compliance_features()));
        // Deployment recorded ownership and the initial mint.
        let (_, body) = get(&router, "/events").await;
        let all: Vec<EventRecord> = serde_json::from_slice(&body).unwrap();
        assert_eq!(all.len(), 2);

        post_json(&router, "/calls", call("issuer", json!("pause"))).await;

        let (status, body) = get(&router, "/events?since=2").await;
        assert_eq!(status, StatusCode::OK);
        let tail: Vec<EventRecord> = serde_json::from_slice(&body).unwrap();
        assert_eq!(tail.len(), 1);
        assert_eq!(tail[0].sequence, 2);
        assert_eq!(tail[0].event, TokenEvent::Paused { by: p("issuer") });
    }

    #[tokio::test]
    async fn calls_update_metrics() {
        let state = test_app_state(compliance_features());
        let router = create_router(state.clone());

        post_json(&router, "/calls", call("issuer", json!("pause"))).await;
        post_json(
            &router,
            "/calls",
            call(
                "issuer",
                json!({ "transfer": { "to": p("alice").to_hex(), "amount": 1 } }),
            ),
        )
        .await;

        let text = state.metrics.encode().unwrap();
        assert!(text.contains(r#"bastion_calls_accepted_total{method="pause"} 1"#));
        assert!(text.contains(r#"bastion_calls_rejected_total{code="Paused"} 1"#));
        assert!(text.contains("bastion_paused 1"));
        assert!(text.contains("bastion_events_recorded 3"));
    }
}
