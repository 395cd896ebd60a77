//! # checkout-payments
//!
//! Payment form validation and the Paystack gateway client for
//! paystack-checkout.
//!
//! ## Payment Flows
//!
//! A validated [`PaymentRequest`] takes exactly one of two paths:
//!
//! ### 1. One-time payment (hosted checkout)
//!
//! ```text
//! ┌─────────────┐  POST /transaction/initialize  ┌──────────────────┐
//! │  Your Site  │───────────────────────────────▶│     Paystack     │
//! │   (form)    │◀───── authorization_url ───────│                  │
//! └─────────────┘                                └──────────────────┘
//!        │ 303 redirect
//!        ▼
//! ┌──────────────────┐
//! │ Paystack hosted  │
//! │  checkout page   │
//! └──────────────────┘
//! ```
//!
//! ### 2. Recurring payment (subscription plan)
//!
//! ```text
//! ┌─────────────┐        POST /plan             ┌──────────────────┐
//! │  Your Site  │──────────────────────────────▶│     Paystack     │
//! │   (form)    │◀──────── plan_code ───────────│                  │
//! └─────────────┘                               └──────────────────┘
//!        │ page re-rendered with plan code + public key
//!        ▼
//! ┌──────────────────┐
//! │  Inline checkout │
//! │  widget (popup)  │
//! └──────────────────┘
//! ```
//!
//! Amounts are submitted in whole units and sent to the gateway multiplied
//! by [`SUBUNIT_FACTOR`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use checkout_payments::{CreatePlan, PaymentForm, PaymentGateway, PaystackClient, PaystackConfig};
//!
//! let client = PaystackClient::new(PaystackConfig::new("sk_test_xxx"))?;
//!
//! let request = form.validate()?;
//! let plan = client.create_plan(&CreatePlan::monthly(&request, "ZAR")).await?;
//!
//! // Hand plan.plan_code to the inline checkout widget
//! ```

mod error;
pub mod gateway;
mod request;

pub use error::{GatewayError, Result, ValidationErrors};
pub use gateway::{
    CreatePlan, GatewayCall, InitializeTransaction, MockGateway, MockResponse, PaymentGateway,
    PaystackClient, PaystackConfig, PlanData, PlanInterval, SecretKey, TransactionData,
    TransactionMetadata,
};
pub use request::{PaymentForm, PaymentRequest, SUBUNIT_FACTOR};
