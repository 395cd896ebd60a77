//! HTTP Handlers

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Form, Json,
};
use checkout_payments::PaymentForm;
use serde::Serialize;
use tracing::Instrument;

use crate::outcome::process_payment;
use crate::pages::IndexView;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub gateway: String,
    pub checkout_configured: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        gateway: state.gateway.name().to_string(),
        checkout_configured: state.checkout.public_key.is_some(),
    })
}

/// Payment form
pub async fn payment_page(State(state): State<AppState>) -> Response {
    let view = IndexView::new(state.checkout.public_key.as_deref());
    state.pages.respond(&view)
}

/// Form submission: validate, make one gateway call, redirect or re-render.
///
/// Fields arrive as raw pairs so a repeated `recurring` (checkbox plus
/// hidden fallback) does not reject the whole body.
pub async fn create_payment(
    State(state): State<AppState>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let span = tracing::info_span!("create_payment", request_id = %uuid::Uuid::new_v4());

    async move {
        let form = PaymentForm::from_pairs(fields);
        tracing::info!(recurring = form.recurring, "Processing payment...");

        let view = IndexView::new(state.checkout.public_key.as_deref()).with_form(form.clone());

        let request = match form.validate() {
            Ok(request) => request,
            Err(errors) => {
                tracing::warn!(%errors, "Payment form is invalid");
                return state.pages.respond(&view.with_field_errors(&errors));
            }
        };

        let outcome =
            process_payment(state.gateway.as_ref(), &request, &state.checkout.currency).await;
        tracing::info!(success = outcome.is_success(), "Payment submission handled");
        outcome.respond(&state.pages, view)
    }
    .instrument(span)
    .await
}

/// Fallback for unknown routes
pub async fn not_found() -> impl IntoResponse {
    (axum::http::StatusCode::NOT_FOUND, "Not found")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        Router,
    };
    use checkout_payments::{
        GatewayCall, MockGateway, MockResponse, PaymentGateway, PaystackClient, PaystackConfig,
    };
    use tower::ServiceExt;

    use crate::pages::Pages;
    use crate::state::{AppState, CheckoutSettings};

    fn app(gateway: Arc<dyn PaymentGateway>) -> Router {
        let state = AppState::new(
            gateway,
            Pages::new().unwrap(),
            CheckoutSettings {
                public_key: Some("pk_test_public".into()),
                currency: "ZAR".into(),
            },
        );
        crate::router(state, "static")
    }

    fn submit(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_get_renders_form() {
        let response = app(Arc::new(MockGateway::new()))
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains(r#"name="email""#));
        assert!(html.contains(r#"name="recurring""#));
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Arc::new(MockGateway::new()))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["gateway"], "mock");
        assert_eq!(json["checkout_configured"], true);
    }

    #[tokio::test]
    async fn test_one_time_payment_redirects_to_authorization_url() {
        let gateway = Arc::new(
            MockGateway::new()
                .with_transaction_response(MockResponse::Succeed("https://pay.example/abc".into())),
        );

        let response = app(gateway.clone())
            .oneshot(submit("email=jane%40example.com&amount=5000&name=Jane&recurring=false"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://pay.example/abc"
        );

        let calls = gateway.calls().await;
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            GatewayCall::InitializeTransaction(tx) => {
                assert_eq!(tx.email, "jane@example.com");
                assert_eq!(tx.amount, 500_000);
                assert_eq!(tx.metadata.name, "Jane");
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_recurring_payment_renders_plan_code() {
        let gateway =
            Arc::new(MockGateway::new().with_plan_response(MockResponse::Succeed("PLN_x".into())));

        let response = app(gateway.clone())
            .oneshot(submit("email=jane%40example.com&amount=1999&name=Jane&recurring=true&recurring=false"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
        let html = body_text(response).await;
        assert!(html.contains(r#"data-plan="PLN_x""#));
        assert!(html.contains(r#"data-key="pk_test_public""#));

        match &gateway.calls().await[0] {
            GatewayCall::CreatePlan(plan) => {
                assert_eq!(plan.amount, 199_900);
                assert_eq!(plan.name, "Jane Subscription Plan");
            }
            other => panic!("unexpected call: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_recurring_without_email_skips_checkout_widget() {
        let gateway =
            Arc::new(MockGateway::new().with_plan_response(MockResponse::Succeed("PLN_x".into())));

        let html = body_text(
            app(gateway.clone())
                .oneshot(submit("amount=1999&name=Jane&recurring=true"))
                .await
                .unwrap(),
        )
        .await;

        assert!(html.contains(r#"data-plan="PLN_x""#));
        assert!(html.contains("Enter your email address"));
        assert!(!html.contains("PaystackPop.setup"));
        assert_eq!(gateway.calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_gateway_rejection_renders_error() {
        let gateway = Arc::new(MockGateway::new().with_transaction_response(MockResponse::Reject {
            status: 400,
            body: r#"{"message":"bad request"}"#.into(),
        }));

        let response = app(gateway)
            .oneshot(submit("email=jane%40example.com&amount=5000&name=Jane"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
        let html = body_text(response).await;
        assert!(html.contains("Payment initialization failed: bad request"));
    }

    #[tokio::test]
    async fn test_recurring_rejection_adds_retry_message() {
        let gateway = Arc::new(MockGateway::new().with_plan_response(MockResponse::Reject {
            status: 400,
            body: r#"{"status":false,"message":"Invalid amount"}"#.into(),
        }));

        let html = body_text(
            app(gateway)
                .oneshot(submit("amount=10&name=Jane&recurring=on"))
                .await
                .unwrap(),
        )
        .await;

        assert!(html.contains("Failed to create plan: Invalid amount"));
        assert!(html.contains(crate::outcome::PLAN_RETRY_MESSAGE));
        assert!(!html.contains("data-plan="));
    }

    #[tokio::test]
    async fn test_missing_email_rejected_before_gateway() {
        let gateway = Arc::new(MockGateway::new());

        let response = app(gateway.clone())
            .oneshot(submit("amount=5000&name=Jane"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Email is required for a one-time payment."));
        assert!(html.contains(r#"value="5000""#));
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_non_numeric_amount_rejected() {
        let gateway = Arc::new(MockGateway::new());

        let html = body_text(
            app(gateway.clone())
                .oneshot(submit("email=jane%40example.com&amount=lots&name=Jane"))
                .await
                .unwrap(),
        )
        .await;

        assert!(html.contains("Amount must be a whole number."));
        assert!(gateway.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_end_to_end_against_paystack_api() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/transaction/initialize")
            .match_header("authorization", "Bearer sk_test_secret")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "email": "jane@example.com",
                "amount": 500_000,
                "metadata": { "name": "Jane" },
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":true,"message":"Authorization URL created","data":{"authorization_url":"https://pay.example/abc","access_code":"x","reference":"y"}}"#)
            .expect(1)
            .create_async()
            .await;

        let client = PaystackClient::new(
            PaystackConfig::new("sk_test_secret").with_base_url(server.url()),
        )
        .unwrap();

        let response = app(Arc::new(client))
            .oneshot(submit("email=jane%40example.com&amount=5000&name=Jane"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://pay.example/abc"
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_gateway_renders_error() {
        // Bind then drop, leaving a local port nothing listens on
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let client = PaystackClient::new(
            PaystackConfig::new("sk_test_secret").with_base_url(format!("http://127.0.0.1:{port}")),
        )
        .unwrap();

        let response = app(Arc::new(client))
            .oneshot(submit("email=jane%40example.com&amount=5000&name=Jane"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
        let html = body_text(response).await;
        assert!(html.contains("Payment initialization failed: Could not reach the payment provider"));
        assert!(html.contains(r#"value="jane@example.com""#));
    }

    #[tokio::test]
    async fn test_end_to_end_missing_plan_code() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/plan")
            .with_status(201)
            .with_body(r#"{"status":true,"message":"Plan created","data":{}}"#)
            .create_async()
            .await;

        let client = PaystackClient::new(
            PaystackConfig::new("sk_test_secret").with_base_url(server.url()),
        )
        .unwrap();

        let response = app(Arc::new(client))
            .oneshot(submit("amount=1999&name=Jane&recurring=true"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Failed to create plan: The payment provider returned an unexpected response."));
        assert!(!html.contains("data-plan="));
    }
}
