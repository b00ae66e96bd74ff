//! HTTP Handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;

use daisy_core::{
    AccountFilter, DaisyError, Invoice, InvoiceParams, Plan, Receipt, SubmitRequest,
    Subscription, SubscriptionCriteria, SubscriptionLookup, SubscriptionManager,
};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub payments_configured: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub type ApiResult<T> = Result<Json<T>, ApiError>;

fn api_error(err: DaisyError) -> ApiError {
    let (status, code) = match &err {
        DaisyError::Argument(_) => (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT"),
        DaisyError::PlanNotFound(_) => (StatusCode::NOT_FOUND, "PLAN_NOT_FOUND"),
        DaisyError::Status { status, .. } => (
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            "UPSTREAM_ERROR",
        ),
        DaisyError::Transport(_) | DaisyError::Decode(_) => {
            (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
        }
        DaisyError::Config(_) | DaisyError::Other(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    };

    if status.is_server_error() {
        tracing::error!("Daisy error: {}", err);
    } else {
        tracing::warn!("Daisy request rejected: {}", err);
    }

    (
        status,
        Json(ErrorResponse {
            error: err.user_message(),
            code: code.into(),
        }),
    )
}

fn not_found(what: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("{what} not found"),
            code: "NOT_FOUND".into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        payments_configured: state.payments.is_some(),
    })
}

/// Subscription manager with plans
pub async fn get_manager(State(state): State<AppState>) -> ApiResult<SubscriptionManager> {
    let manager = state.subscriptions.fetch_manager().await.map_err(api_error)?;
    Ok(Json(manager))
}

/// Plans only, for pricing pages
pub async fn list_plans(State(state): State<AppState>) -> ApiResult<Vec<Plan>> {
    let manager = state.subscriptions.fetch_manager().await.map_err(api_error)?;
    Ok(Json(manager.plans))
}

pub async fn list_subscriptions(
    State(state): State<AppState>,
    Query(filter): Query<AccountFilter>,
) -> ApiResult<Vec<Subscription>> {
    let subscriptions = state
        .subscriptions
        .list_subscriptions(&filter)
        .await
        .map_err(api_error)?;
    Ok(Json(subscriptions))
}

/// Submit a browser-signed agreement; relays the service's body as-is
pub async fn submit_subscription(
    State(state): State<AppState>,
    Json(payload): Json<SubmitRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let response = state.subscriptions.submit(payload).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Lookup by `?id=` or `?subscriptionHash=`
pub async fn get_subscription(
    State(state): State<AppState>,
    Query(criteria): Query<SubscriptionCriteria>,
) -> ApiResult<Subscription> {
    let lookup = SubscriptionLookup::try_from(criteria).map_err(api_error)?;
    state
        .subscriptions
        .get_subscription(&lookup)
        .await
        .map_err(api_error)?
        .map(Json)
        .ok_or_else(|| not_found("Subscription"))
}

pub async fn get_receipts(
    State(state): State<AppState>,
    Query(criteria): Query<SubscriptionCriteria>,
) -> ApiResult<Vec<Receipt>> {
    let lookup = SubscriptionLookup::try_from(criteria).map_err(api_error)?;
    let receipts = state
        .subscriptions
        .get_receipts(&lookup)
        .await
        .map_err(api_error)?;
    Ok(Json(receipts))
}

/// Create a one-time-payment invoice
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(params): Json<InvoiceParams>,
) -> Result<(StatusCode, Json<Invoice>), ApiError> {
    let payments = state.payments.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Payments not configured".into(),
                code: "PAYMENTS_DISABLED".into(),
            }),
        )
    })?;

    let invoice = payments.create_invoice(&params).await.map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
        Router,
    };
    use daisy_core::MockTransport;
    use daisy_payments::{PaymentsClient, SubscriptionClient};
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::build_router;

    fn app(transport: &Arc<MockTransport>, with_payments: bool) -> Router {
        let state = AppState {
            subscriptions: Arc::new(SubscriptionClient::new(transport.clone())),
            payments: with_payments.then(|| Arc::new(PaymentsClient::new(transport.clone()))),
        };
        build_router(state)
    }

    fn manager_body() -> Value {
        json!({ "data": {
            "name": "Margarita",
            "identifier": "margarita",
            "plans": [{ "id": "plan-1", "onChainId": "P1", "name": "Basic", "active": true }]
        } })
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_plans_route() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(manager_body()).await;

        let (status, body) = call(app(&transport, false), get("/api/plans")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["onChainId"], "P1");
    }

    #[tokio::test]
    async fn test_lookup_without_keys_is_bad_request() {
        let transport = Arc::new(MockTransport::new());

        let (status, body) = call(app(&transport, false), get("/api/subscription")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");
        assert_eq!(body["error"], "Missing arguments");
        assert_eq!(transport.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_lookup_by_hash_route() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_response(json!({ "data": [{ "id": "rcpt-1", "action": "BILLED" }] }))
            .await;

        let (status, body) = call(
            app(&transport, false),
            get("/api/subscription/receipts?subscriptionHash=0xfeed"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], "rcpt-1");
        assert_eq!(
            transport.requests().await[0].path,
            "/subscriptions/hash/0xfeed/receipts/"
        );
    }

    #[tokio::test]
    async fn test_id_with_slash_is_bad_request() {
        let transport = Arc::new(MockTransport::new());

        let (status, body) =
            call(app(&transport, false), get("/api/subscription?id=hash%2F0xfeed")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_ARGUMENT");
        assert_eq!(transport.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_subscription_is_not_found() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(json!({ "data": null })).await;

        let (status, _) = call(app(&transport, false), get("/api/subscription?id=sub-9")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_submit_unknown_plan_is_not_found() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(manager_body()).await;

        let (status, body) = call(
            app(&transport, false),
            post(
                "/api/subscriptions",
                json!({ "agreement": { "plan": "P2" }, "receipt": "r", "signature": "s" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "PLAN_NOT_FOUND");
        assert_eq!(transport.request_count().await, 1);
    }

    #[tokio::test]
    async fn test_submit_known_plan_is_created() {
        let transport = Arc::new(MockTransport::new());
        transport.push_response(manager_body()).await;
        transport
            .push_response(json!({ "data": { "id": "sub-1", "state": "PENDING" } }))
            .await;

        let (status, body) = call(
            app(&transport, false),
            post(
                "/api/subscriptions",
                json!({ "agreement": { "plan": "P1" }, "receipt": "r", "signature": "s" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["state"], "PENDING");
    }

    #[tokio::test]
    async fn test_invoice_requires_payments() {
        let transport = Arc::new(MockTransport::new());

        let (status, body) = call(
            app(&transport, false),
            post("/api/invoices", json!({ "invoicedPrice": "100" })),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["code"], "PAYMENTS_DISABLED");
    }

    #[tokio::test]
    async fn test_invoice_without_price_is_bad_request() {
        let transport = Arc::new(MockTransport::new());

        let (status, _) = call(
            app(&transport, true),
            post("/api/invoices", json!({ "invoicedEmail": "buyer@example.com" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(transport.request_count().await, 0);
    }

    #[tokio::test]
    async fn test_upstream_status_passes_through() {
        let transport = Arc::new(MockTransport::new());
        transport
            .push_error(DaisyError::Status { status: 401, body: "Unauthorized".into() })
            .await;

        let (status, body) = call(app(&transport, false), get("/api/manager")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UPSTREAM_ERROR");
    }
}
