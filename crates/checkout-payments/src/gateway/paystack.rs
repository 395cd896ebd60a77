//! Paystack HTTP Client
//!
//! Implements [`PaymentGateway`] against the Paystack REST API using one
//! shared `reqwest::Client` and a bearer secret key.

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{CreatePlan, Envelope, InitializeTransaction, PaymentGateway, PlanData, TransactionData};
use crate::error::{GatewayError, Result};

/// Production API base
pub const DEFAULT_BASE_URL: &str = "https://api.paystack.co";

/// Currency used for plans when none is configured
pub const DEFAULT_CURRENCY: &str = "ZAR";

/// Secret API key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key, for the `Authorization` header only
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(***)")
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Paystack client configuration
#[derive(Clone, Debug)]
pub struct PaystackConfig {
    /// Secret key sent as the bearer credential
    pub secret_key: SecretKey,

    /// API base URL, without trailing slash
    pub base_url: String,

    /// ISO currency code for created plans
    pub currency: String,
}

impl PaystackConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: SecretKey::new(secret_key),
            base_url: DEFAULT_BASE_URL.into(),
            currency: DEFAULT_CURRENCY.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into().to_uppercase();
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

/// Paystack gateway client
#[derive(Clone, Debug)]
pub struct PaystackClient {
    http: reqwest::Client,
    config: PaystackConfig,
}

impl PaystackClient {
    /// Create a client with its own connection pool
    pub fn new(config: PaystackConfig) -> Result<Self> {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Create a client sharing an existing `reqwest::Client`
    pub fn with_http_client(http: reqwest::Client, config: PaystackConfig) -> Result<Self> {
        if config.secret_key.is_empty() {
            return Err(GatewayError::Config("Paystack secret key is empty".into()));
        }
        url::Url::parse(&config.base_url)
            .map_err(|e| GatewayError::Config(format!("invalid Paystack base URL: {e}")))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &PaystackConfig {
        &self.config
    }

    /// POST a JSON body and decode the `data` of the response envelope.
    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned + Send,
    {
        let url = self.config.endpoint(path);
        tracing::debug!(
            %url,
            body = %serde_json::to_string(body).unwrap_or_default(),
            "Sending Paystack request"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.secret_key.expose())
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                %url,
                status = status.as_u16(),
                error = %text,
                "Paystack request failed"
            );
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        tracing::info!(%url, response = %text, "Paystack request succeeded");

        let envelope: Envelope<T> = serde_json::from_str(&text)
            .map_err(|e| GatewayError::Parse(format!("{path}: {e}")))?;

        if envelope.status == Some(false) {
            tracing::error!(
                %url,
                gateway_message = envelope.message.as_deref().unwrap_or_default(),
                "Paystack reported failure with a success status"
            );
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(envelope.data)
    }
}

#[async_trait]
impl PaymentGateway for PaystackClient {
    async fn create_plan(&self, plan: &CreatePlan) -> Result<PlanData> {
        let data: PlanData = self.post("plan", plan).await?;
        data.checked()
    }

    async fn initialize_transaction(
        &self,
        transaction: &InitializeTransaction,
    ) -> Result<TransactionData> {
        let data: TransactionData = self.post("transaction/initialize", transaction).await?;
        data.checked()
    }

    fn name(&self) -> &str {
        "paystack"
    }
}
