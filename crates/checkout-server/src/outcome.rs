//! Payment Outcome Routing
//!
//! One validated request makes one gateway call and ends in exactly one of
//! four outcomes. Only a successful one-time payment leaves the page.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use checkout_payments::{
    CreatePlan, GatewayError, InitializeTransaction, PaymentGateway, PaymentRequest, PlanData,
    TransactionData,
};

use crate::pages::{IndexView, Pages};

/// Shown under a failed plan creation, after the gateway's own message
pub const PLAN_RETRY_MESSAGE: &str = "Failed to create subscription plan. Please try again.";

/// Terminal state of a payment submission
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Plan created; the page hands the code to the checkout widget
    RecurringSuccess { plan_code: String },

    /// Plan creation failed
    RecurringFailure { message: String },

    /// Transaction initialized; the user goes to the hosted checkout page
    OneTimeSuccess { authorization_url: String },

    /// Transaction initialization failed
    OneTimeFailure { message: String },
}

impl PaymentOutcome {
    pub fn from_plan(result: Result<PlanData, GatewayError>) -> Self {
        match result {
            Ok(data) => Self::RecurringSuccess {
                plan_code: data.plan_code,
            },
            Err(e) => Self::RecurringFailure {
                message: failure_message("Failed to create plan", &e),
            },
        }
    }

    pub fn from_transaction(result: Result<TransactionData, GatewayError>) -> Self {
        match result {
            Ok(data) => Self::OneTimeSuccess {
                authorization_url: data.authorization_url,
            },
            Err(e) => Self::OneTimeFailure {
                message: failure_message("Payment initialization failed", &e),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::RecurringSuccess { .. } | Self::OneTimeSuccess { .. }
        )
    }

    /// Turn the outcome into a response: a 303 redirect for a successful
    /// one-time payment, the re-rendered payment page otherwise.
    pub fn respond(self, pages: &Pages, view: IndexView) -> Response {
        match self {
            Self::RecurringSuccess { plan_code } => pages.respond(&view.with_plan_code(plan_code)),
            Self::RecurringFailure { message } => {
                pages.respond(&view.with_error(message).with_error(PLAN_RETRY_MESSAGE))
            }
            Self::OneTimeFailure { message } => pages.respond(&view.with_error(message)),
            Self::OneTimeSuccess { authorization_url } => {
                match HeaderValue::from_str(&authorization_url) {
                    Ok(location) => {
                        (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response()
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Authorization URL is not a valid Location header");
                        pages.respond(&view.with_error(
                            "Payment initialization failed: the payment provider returned an invalid checkout link.",
                        ))
                    }
                }
            }
        }
    }
}

/// Make the single gateway call a validated request calls for.
pub async fn process_payment(
    gateway: &dyn PaymentGateway,
    request: &PaymentRequest,
    currency: &str,
) -> PaymentOutcome {
    if request.recurring {
        tracing::info!("Recurring payment selected. Creating plan...");
        let plan = CreatePlan::monthly(request, currency);
        let outcome = PaymentOutcome::from_plan(gateway.create_plan(&plan).await);
        log_outcome(&outcome);
        return outcome;
    }

    tracing::info!("One-time payment selected. Initializing transaction...");
    let outcome = match InitializeTransaction::try_from(request) {
        Ok(transaction) => {
            PaymentOutcome::from_transaction(gateway.initialize_transaction(&transaction).await)
        }
        Err(errors) => PaymentOutcome::OneTimeFailure {
            message: errors.to_string(),
        },
    };
    log_outcome(&outcome);
    outcome
}

fn log_outcome(outcome: &PaymentOutcome) {
    match outcome {
        PaymentOutcome::RecurringSuccess { plan_code } => {
            tracing::info!(%plan_code, "Plan created");
        }
        PaymentOutcome::OneTimeSuccess { authorization_url } => {
            tracing::info!(%authorization_url, "Redirecting to checkout");
        }
        PaymentOutcome::RecurringFailure { message } | PaymentOutcome::OneTimeFailure { message } => {
            tracing::warn!(%message, "Payment not started");
        }
    }
}

/// `"<prefix>: <detail>"`, where the detail is the gateway's own message
/// for rejections and a generic explanation for everything else.
fn failure_message(prefix: &str, error: &GatewayError) -> String {
    match error.gateway_message() {
        Some(detail) => format!("{prefix}: {detail}"),
        None => {
            tracing::error!(error = %error, retryable = error.is_retryable(), "Gateway call failed");
            format!("{prefix}: {}", error.user_message())
        }
    }
}
