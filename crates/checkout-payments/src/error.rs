//! Payment Error Types

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors raised while talking to the payment gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request never produced a response (connect, TLS, body read)
    #[error("Gateway request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with a non-success status
    #[error("Gateway rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// A success status whose body did not have the expected shape
    #[error("Gateway response parse error: {0}")]
    Parse(String),

    /// Client construction or configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl GatewayError {
    /// Check if this error is retryable
    ///
    /// Nothing retries today; callers can use this to decide what to log.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Request(_) => true,
            GatewayError::Rejected { status, .. } => *status == 429 || *status >= 500,
            GatewayError::Parse(_) | GatewayError::Config(_) => false,
        }
    }

    /// Message taken from the gateway's response body.
    ///
    /// Paystack error bodies look like `{"status":false,"message":"..."}`;
    /// when the body is not JSON or has no `message`, the raw body is used.
    pub fn gateway_message(&self) -> Option<String> {
        let GatewayError::Rejected { body, .. } = self else {
            return None;
        };

        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
            .filter(|m| !m.trim().is_empty());

        Some(message.unwrap_or_else(|| body.trim().to_string()))
    }

    /// Get user-friendly message
    pub fn user_message(&self) -> &str {
        match self {
            GatewayError::Request(_) => "Could not reach the payment provider. Please try again.",
            GatewayError::Rejected { .. } => "The payment provider declined the request.",
            GatewayError::Parse(_) => "The payment provider returned an unexpected response.",
            GatewayError::Config(_) => "Payment service configuration error.",
        }
    }
}

/// Field-level validation failures for a submitted payment form
///
/// Keys are form field names; iteration order is stable so pages render the
/// same way every time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`. The first error recorded for a field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| message.into());
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.fields.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}: {v}")).collect();
        write!(f, "Invalid payment form: {}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}
