//! Page Rendering
//!
//! The payment page is a single Tera template compiled into the binary.

use std::collections::BTreeMap;

use axum::response::{Html, IntoResponse, Response};
use checkout_payments::{PaymentForm, ValidationErrors};
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::ServerError;

const INDEX_TEMPLATE: &str = "index.html";

/// Compiled page templates
pub struct Pages {
    tera: Tera,
}

impl Pages {
    pub fn new() -> Result<Self, ServerError> {
        let mut tera = Tera::default();
        tera.add_raw_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
        Ok(Self { tera })
    }

    /// Render the payment page
    pub fn index(&self, view: &IndexView) -> Result<String, ServerError> {
        let context = Context::from_serialize(view)?;
        Ok(self.tera.render(INDEX_TEMPLATE, &context)?)
    }

    /// Render the payment page as a response, 500 on template failure
    pub fn respond(&self, view: &IndexView) -> Response {
        match self.index(view) {
            Ok(body) => Html(body).into_response(),
            Err(e) => e.into_response(),
        }
    }
}

/// Everything the payment page shows
#[derive(Clone, Debug, Default, Serialize)]
pub struct IndexView {
    /// Publishable key for the inline checkout widget
    pub public_key: Option<String>,

    /// Values to put back into the inputs
    pub form: PaymentForm,

    /// Per-field messages, keyed by input name
    pub field_errors: BTreeMap<String, String>,

    /// Messages not tied to one field
    pub errors: Vec<String>,

    /// Set after a plan is created; opens the checkout widget when both an
    /// email and a public key are present, otherwise shows a notice
    pub plan_code: Option<String>,
}

impl IndexView {
    pub fn new(public_key: Option<&str>) -> Self {
        Self {
            public_key: public_key.map(str::to_owned),
            ..Default::default()
        }
    }

    pub fn with_form(mut self, form: PaymentForm) -> Self {
        self.form = form;
        self
    }

    pub fn with_field_errors(mut self, errors: &ValidationErrors) -> Self {
        self.field_errors = errors
            .iter()
            .map(|(field, message)| (field.to_string(), message.to_string()))
            .collect();
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }

    pub fn with_plan_code(mut self, plan_code: impl Into<String>) -> Self {
        self.plan_code = Some(plan_code.into());
        self
    }
}
