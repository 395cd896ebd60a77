//! Payment Form Validation
//!
//! Turns the raw fields a user submitted into a [`PaymentRequest`] the
//! gateway client can act on, or into field-level [`ValidationErrors`].

use serde::Serialize;

use crate::error::ValidationErrors;

/// Multiplier from the submitted amount to the gateway's subunit (kobo/cents)
pub const SUBUNIT_FACTOR: u64 = 100;

/// Raw payment form fields as submitted
///
/// Kept around after validation fails so the page can be re-rendered with
/// what the user typed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PaymentForm {
    pub email: String,
    pub amount: String,
    pub name: String,
    pub recurring: bool,
}

impl PaymentForm {
    /// Build a form from urlencoded `(key, value)` pairs.
    ///
    /// Unknown keys are ignored. Text fields keep the last value sent.
    /// `recurring` may repeat (a checkbox followed by a hidden `false`
    /// fallback); any truthy value selects the recurring flow.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            match key.as_ref() {
                "email" => form.email = value.into(),
                "amount" => form.amount = value.into(),
                "name" => form.name = value.into(),
                "recurring" => {
                    let value: String = value.into();
                    form.recurring |= is_truthy(&value);
                }
                _ => {}
            }
        }
        form
    }

    /// Validate the form into a [`PaymentRequest`].
    ///
    /// Every problem is reported at once, keyed by field name.
    pub fn validate(&self) -> Result<PaymentRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let amount = match parse_amount(&self.amount) {
            Ok(amount) => Some(amount),
            Err(message) => {
                errors.add("amount", message);
                None
            }
        };

        let name = self.name.trim();
        if name.is_empty() {
            errors.add("name", "Name is required.");
        }

        let email = self.email.trim();
        let email = if email.is_empty() {
            if !self.recurring {
                errors.add("email", "Email is required for a one-time payment.");
            }
            None
        } else if !looks_like_email(email) {
            errors.add("email", "Enter a valid email address.");
            None
        } else {
            Some(email.to_string())
        };

        match amount {
            Some(amount) if errors.is_empty() => Ok(PaymentRequest {
                email,
                amount,
                name: name.to_string(),
                recurring: self.recurring,
            }),
            _ => Err(errors),
        }
    }
}

/// A validated payment request, consumed by one gateway call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Payer email; always present for one-time payments
    pub email: Option<String>,

    /// Whole currency units as submitted
    pub amount: u64,

    /// Display name used for plan naming and transaction metadata
    pub name: String,

    /// Selects plan creation instead of transaction initialization
    pub recurring: bool,
}

impl PaymentRequest {
    /// Amount sent to the gateway. Validation guarantees this cannot overflow.
    pub fn subunit_amount(&self) -> u64 {
        self.amount.saturating_mul(SUBUNIT_FACTOR)
    }

    /// Name given to the plan created for a recurring payment
    pub fn plan_name(&self) -> String {
        format!("{} Subscription Plan", self.name)
    }
}

fn parse_amount(raw: &str) -> Result<u64, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Amount is required.");
    }
    if raw.starts_with('-') {
        return Err("Amount must be greater than zero.");
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err("Amount must be a whole number.");
    }

    let amount: u64 = raw
        .parse()
        .map_err(|_| "Amount must be a whole number.")?;

    if amount == 0 {
        return Err("Amount must be greater than zero.");
    }
    if amount.checked_mul(SUBUNIT_FACTOR).is_none() {
        return Err("Amount is too large.");
    }
    Ok(amount)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "on" | "1" | "yes"
    )
}

fn looks_like_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !domain.starts_with('.')
        }
        None => false,
    }
}
