//! Application State

use std::sync::Arc;

use checkout_payments::PaymentGateway;

use crate::pages::Pages;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment gateway (Paystack, or a mock in tests)
    pub gateway: Arc<dyn PaymentGateway>,

    /// Compiled page templates
    pub pages: Arc<Pages>,

    /// Settings the checkout page needs
    pub checkout: Arc<CheckoutSettings>,
}

/// Per-deployment checkout settings
#[derive(Clone, Debug)]
pub struct CheckoutSettings {
    /// Publishable key for the inline widget (None disables the popup key)
    pub public_key: Option<String>,

    /// Currency for created plans
    pub currency: String,
}

impl AppState {
    pub fn new(gateway: Arc<dyn PaymentGateway>, pages: Pages, checkout: CheckoutSettings) -> Self {
        Self {
            gateway,
            pages: Arc::new(pages),
            checkout: Arc::new(checkout),
        }
    }
}
