//! Server Configuration
//!
//! Values come from an optional JSON settings file (`appsettings.json`, or the
//! path in `APP_SETTINGS`), then environment variables override them. `.env`
//! is loaded into the environment by `main` before this runs.
//!
//! ```json
//! {
//!   "Paystack": {
//!     "PublicKey": "pk_test_xxx",
//!     "SecretKey": "sk_test_xxx",
//!     "Currency": "ZAR"
//!   }
//! }
//! ```

use std::path::PathBuf;

use checkout_payments::{PaystackConfig, SecretKey};
use serde::Deserialize;

use crate::error::ServerError;

const DEFAULT_SETTINGS_PATH: &str = "appsettings.json";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_STATIC_DIR: &str = "static";

/// Fully resolved server configuration
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Publishable key handed to the inline checkout widget
    pub public_key: Option<String>,

    /// Secret key for server-to-gateway calls
    pub secret_key: SecretKey,

    pub currency: String,

    pub base_url: Option<String>,

    pub bind_addr: String,

    pub static_dir: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SettingsFile {
    #[serde(default)]
    paystack: PaystackSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PaystackSection {
    public_key: Option<String>,
    secret_key: Option<String>,
    currency: Option<String>,
    base_url: Option<String>,
}

impl AppConfig {
    /// Load from the settings file (if any) and the process environment
    pub fn load() -> Result<Self, ServerError> {
        let path = std::env::var("APP_SETTINGS").unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.into());

        let settings = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::info!(%path, "Loaded settings file");
                Some(contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(ServerError::Config(format!("cannot read {path}: {e}")));
            }
        };

        Self::from_sources(settings.as_deref(), |key| std::env::var(key).ok())
    }

    /// Resolve configuration from settings file contents and an env lookup.
    pub fn from_sources<F>(settings: Option<&str>, env: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: SettingsFile = match settings {
            Some(contents) => serde_json::from_str(contents)
                .map_err(|e| ServerError::Config(format!("invalid settings file: {e}")))?,
            None => SettingsFile::default(),
        };
        let section = file.paystack;

        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let secret_key = non_empty(env("PAYSTACK_SECRET_KEY"))
            .or(non_empty(section.secret_key))
            .ok_or_else(|| {
                ServerError::Config(
                    "Paystack secret key missing (PAYSTACK_SECRET_KEY or Paystack:SecretKey)".into(),
                )
            })?;

        Ok(Self {
            public_key: non_empty(env("PAYSTACK_PUBLIC_KEY")).or(non_empty(section.public_key)),
            secret_key: SecretKey::new(secret_key),
            currency: non_empty(env("PAYSTACK_CURRENCY"))
                .or(non_empty(section.currency))
                .unwrap_or_else(|| checkout_payments::gateway::DEFAULT_CURRENCY.into())
                .to_uppercase(),
            base_url: non_empty(env("PAYSTACK_BASE_URL")).or(non_empty(section.base_url)),
            bind_addr: non_empty(env("BIND_ADDR")).unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            static_dir: non_empty(env("STATIC_DIR"))
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.into())
                .into(),
        })
    }

    /// Gateway client configuration derived from these settings
    pub fn paystack(&self) -> PaystackConfig {
        let mut config = PaystackConfig::new(self.secret_key.expose()).with_currency(&self.currency);
        if let Some(base_url) = &self.base_url {
            config = config.with_base_url(base_url.as_str());
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_settings_file_only() {
        let settings = r#"{"Paystack":{"PublicKey":"pk_file","SecretKey":"sk_file"}}"#;
        let config = AppConfig::from_sources(Some(settings), env(&[])).unwrap();

        assert_eq!(config.public_key.as_deref(), Some("pk_file"));
        assert_eq!(config.secret_key.expose(), "sk_file");
        assert_eq!(config.currency, "ZAR");
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.static_dir, PathBuf::from("static"));
    }

    #[test]
    fn test_env_overrides_file() {
        let settings = r#"{"Paystack":{"PublicKey":"pk_file","SecretKey":"sk_file","Currency":"ngn"}}"#;
        let config = AppConfig::from_sources(
            Some(settings),
            env(&[
                ("PAYSTACK_SECRET_KEY", "sk_env"),
                ("PAYSTACK_BASE_URL", "http://127.0.0.1:9999"),
                ("BIND_ADDR", "127.0.0.1:8080"),
            ]),
        )
        .unwrap();

        assert_eq!(config.secret_key.expose(), "sk_env");
        assert_eq!(config.public_key.as_deref(), Some("pk_file"));
        assert_eq!(config.currency, "NGN");
        assert_eq!(config.bind_addr, "127.0.0.1:8080");

        let paystack = config.paystack();
        assert_eq!(paystack.base_url, "http://127.0.0.1:9999");
        assert_eq!(paystack.currency, "NGN");
    }

    #[test]
    fn test_blank_env_values_fall_back_to_gateway_defaults() {
        let config = AppConfig::from_sources(
            None,
            env(&[
                ("PAYSTACK_SECRET_KEY", "sk_env"),
                ("PAYSTACK_BASE_URL", ""),
                ("PAYSTACK_CURRENCY", "  "),
            ]),
        )
        .unwrap();

        let paystack = config.paystack();
        assert_eq!(paystack.base_url, checkout_payments::gateway::DEFAULT_BASE_URL);
        assert_eq!(paystack.currency, checkout_payments::gateway::DEFAULT_CURRENCY);
        assert_eq!(paystack.secret_key.expose(), "sk_env");
    }

    #[test]
    fn test_missing_secret_is_error() {
        let err = AppConfig::from_sources(None, env(&[("PAYSTACK_SECRET_KEY", " ")])).unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn test_invalid_settings_file() {
        let err = AppConfig::from_sources(Some("{not json"), env(&[("PAYSTACK_SECRET_KEY", "sk")]))
            .unwrap_err();
        assert!(err.to_string().contains("invalid settings file"));
    }
}
