//! Payment Gateway Integration
//!
//! The [`PaymentGateway`] trait is the seam between the HTTP handlers and the
//! third-party payment API. [`PaystackClient`] talks to Paystack over HTTPS;
//! [`MockGateway`] answers from a script for tests and local demos.

mod mock;
mod paystack;

pub use mock::{GatewayCall, MockGateway, MockResponse};
pub use paystack::{PaystackClient, PaystackConfig, SecretKey, DEFAULT_BASE_URL, DEFAULT_CURRENCY};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{GatewayError, Result, ValidationErrors};
use crate::request::PaymentRequest;

/// Payment gateway trait (Strategy pattern)
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a recurring-billing plan, returning its plan code
    async fn create_plan(&self, plan: &CreatePlan) -> Result<PlanData>;

    /// Initialize a one-time transaction, returning the hosted checkout URL
    async fn initialize_transaction(
        &self,
        transaction: &InitializeTransaction,
    ) -> Result<TransactionData>;

    /// Gateway name, for logs and the health endpoint
    fn name(&self) -> &str;
}

/// Billing interval of a plan
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanInterval {
    Daily,
    Weekly,
    #[default]
    Monthly,
    Quarterly,
    Biannually,
    Annually,
}

/// Body of `POST /plan`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreatePlan {
    pub name: String,
    /// Amount in the currency subunit
    pub amount: u64,
    pub interval: PlanInterval,
    pub currency: String,
}

impl CreatePlan {
    /// Monthly plan named after the payer
    pub fn monthly(request: &PaymentRequest, currency: &str) -> Self {
        Self {
            name: request.plan_name(),
            amount: request.subunit_amount(),
            interval: PlanInterval::Monthly,
            currency: currency.to_string(),
        }
    }
}

/// Body of `POST /transaction/initialize`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InitializeTransaction {
    pub email: String,
    /// Amount in the currency subunit
    pub amount: u64,
    pub metadata: TransactionMetadata,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionMetadata {
    pub name: String,
}

impl TryFrom<&PaymentRequest> for InitializeTransaction {
    type Error = ValidationErrors;

    fn try_from(request: &PaymentRequest) -> std::result::Result<Self, Self::Error> {
        let Some(email) = request.email.clone() else {
            let mut errors = ValidationErrors::new();
            errors.add("email", "Email is required for a one-time payment.");
            return Err(errors);
        };

        Ok(Self {
            email,
            amount: request.subunit_amount(),
            metadata: TransactionMetadata {
                name: request.name.clone(),
            },
        })
    }
}

/// Standard Paystack response wrapper: `{status, message, data}`
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: T,
}

/// `data` of a successful plan creation
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PlanData {
    pub plan_code: String,

    #[serde(default)]
    pub name: Option<String>,
}

/// `data` of a successful transaction initialization
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TransactionData {
    pub authorization_url: String,

    #[serde(default)]
    pub access_code: Option<String>,

    #[serde(default)]
    pub reference: Option<String>,
}

impl PlanData {
    pub(crate) fn checked(self) -> Result<Self> {
        if self.plan_code.trim().is_empty() {
            return Err(GatewayError::Parse("empty data.plan_code".into()));
        }
        Ok(self)
    }
}

impl TransactionData {
    /// Reject anything that is not a usable redirect target.
    pub(crate) fn checked(self) -> Result<Self> {
        let raw = self.authorization_url.as_str();
        if raw.chars().any(char::is_control) {
            return Err(GatewayError::Parse(
                "data.authorization_url contains control characters".into(),
            ));
        }

        let url = url::Url::parse(raw).map_err(|e| {
            GatewayError::Parse(format!("data.authorization_url is not a URL: {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(GatewayError::Parse(format!(
                "data.authorization_url has unsupported scheme {}",
                url.scheme()
            )));
        }
        Ok(self)
    }
}
