//! Mock Payment Gateway
//!
//! For testing and demo purposes. Answers from a fixed script and records
//! every call it receives.

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{CreatePlan, InitializeTransaction, PaymentGateway, PlanData, TransactionData};
use crate::error::{GatewayError, Result};

/// Scripted reply for one kind of gateway call
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// Succeed with this plan code or authorization URL
    Succeed(String),

    /// Fail as if the gateway returned this status and body
    Reject { status: u16, body: String },

    /// Fail as if a success status came back with an unexpected body
    Malformed,
}

/// A call received by the mock
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayCall {
    CreatePlan(CreatePlan),
    InitializeTransaction(InitializeTransaction),
}

/// Mock gateway with scripted responses
pub struct MockGateway {
    plan: MockResponse,
    transaction: MockResponse,
    calls: Mutex<Vec<GatewayCall>>,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            plan: MockResponse::Succeed("PLN_mock".into()),
            transaction: MockResponse::Succeed("https://checkout.paystack.com/mock".into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_plan_response(mut self, response: MockResponse) -> Self {
        self.plan = response;
        self
    }

    pub fn with_transaction_response(mut self, response: MockResponse) -> Self {
        self.transaction = response;
        self
    }

    /// Calls received so far, oldest first
    pub async fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().await.clone()
    }

    fn reply(response: &MockResponse) -> Result<String> {
        match response {
            MockResponse::Succeed(value) => Ok(value.clone()),
            MockResponse::Reject { status, body } => Err(GatewayError::Rejected {
                status: *status,
                body: body.clone(),
            }),
            MockResponse::Malformed => Err(GatewayError::Parse("mock malformed response".into())),
        }
    }
}

#[async_trait]
impl PaymentGateway for MockGateway {
    async fn create_plan(&self, plan: &CreatePlan) -> Result<PlanData> {
        self.calls.lock().await.push(GatewayCall::CreatePlan(plan.clone()));

        let plan_code = Self::reply(&self.plan)?;
        PlanData {
            plan_code,
            name: Some(plan.name.clone()),
        }
        .checked()
    }

    async fn initialize_transaction(
        &self,
        transaction: &InitializeTransaction,
    ) -> Result<TransactionData> {
        self.calls
            .lock()
            .await
            .push(GatewayCall::InitializeTransaction(transaction.clone()));

        let authorization_url = Self::reply(&self.transaction)?;
        TransactionData {
            authorization_url,
            access_code: None,
            reference: None,
        }
        .checked()
    }

    fn name(&self) -> &str {
        "mock"
    }
}
