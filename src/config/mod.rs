#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::adapters::resend::DEFAULT_API_BASE_URL;
use crate::core::intake::DeliveryPolicy;
use crate::core::lead::ValidationPolicy;
use crate::utils::error::{LeadError, Result};
use crate::utils::validation::{
    validate_mailbox, validate_non_empty_string, validate_range, validate_socket_addr,
    validate_url, Validate,
};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

pub const API_KEY_VARS: &[&str] = &["RESEND_API_KEY"];
pub const TO_VARS: &[&str] = &["CONTACT_TO_EMAIL", "LEAD_TO_EMAIL"];
pub const FROM_VARS: &[&str] = &[
    "RESEND_FROM",
    "CONTACT_FROM_EMAIL",
    "LEAD_FROM_EMAIL",
    "RESEND_FROM_EMAIL",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

/// Everything needed to reach the email provider. Only exists when the key,
/// recipient and sender are all known.
#[derive(Clone, PartialEq, Eq)]
pub struct MailSettings {
    pub api_key: String,
    pub to: String,
    pub from: String,
    pub api_base_url: String,
    pub timeout_seconds: u64,
}

// API key 與信箱地址不可出現在日誌
impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("api_key", &"***")
            .field("to", &"***")
            .field("from", &"***")
            .field("api_base_url", &self.api_base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Process-wide configuration, loaded once at start-up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub mail: Option<MailSettings>,
    pub validation: ValidationPolicy,
    pub delivery: DeliveryPolicy,
}

fn first_set<F>(lookup: &F, keys: &[&str]) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    keys.iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

pub(crate) fn parse_flag(field_name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(LeadError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected a boolean (true/false)".to_string(),
        }),
    }
}

fn flag_or<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match first_set(lookup, &[key]) {
        Some(value) => parse_flag(key, &value),
        None => Ok(default),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key/value source shaped like the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_seconds = match first_set(&lookup, &["RESEND_TIMEOUT_SECS"]) {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| LeadError::InvalidConfigValueError {
                    field: "RESEND_TIMEOUT_SECS".to_string(),
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
            None => DEFAULT_TIMEOUT_SECONDS,
        };

        let mail = match (
            first_set(&lookup, API_KEY_VARS),
            first_set(&lookup, TO_VARS),
            first_set(&lookup, FROM_VARS),
        ) {
            (Some(api_key), Some(to), Some(from)) => Some(MailSettings {
                api_key,
                to,
                from,
                api_base_url: first_set(&lookup, &["RESEND_API_URL"])
                    .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
                timeout_seconds,
            }),
            _ => None,
        };

        let defaults = ValidationPolicy::default();
        let validation = ValidationPolicy {
            require_surname: flag_or(&lookup, "LEAD_REQUIRE_SURNAME", defaults.require_surname)?,
            require_phone: flag_or(&lookup, "LEAD_REQUIRE_PHONE", defaults.require_phone)?,
            require_message: flag_or(&lookup, "LEAD_REQUIRE_MESSAGE", defaults.require_message)?,
        };

        let defaults = DeliveryPolicy::default();
        let delivery = DeliveryPolicy {
            require_delivery: flag_or(&lookup, "LEAD_REQUIRE_DELIVERY", defaults.require_delivery)?,
            expose_provider_errors: flag_or(
                &lookup,
                "LEAD_EXPOSE_PROVIDER_ERRORS",
                defaults.expose_provider_errors,
            )?,
        };

        let server = ServerSettings {
            bind_addr: first_set(&lookup, &["BIND_ADDR"])
                .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        };

        Ok(Self {
            server,
            mail,
            validation,
            delivery,
        })
    }

    pub fn is_mail_configured(&self) -> bool {
        self.mail.is_some()
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("server.bind_addr", &self.server.bind_addr)?;

        if let Some(mail) = &self.mail {
            validate_non_empty_string("mail.api_key", &mail.api_key)?;
            validate_mailbox("mail.to", &mail.to)?;
            validate_mailbox("mail.from", &mail.from)?;
            validate_url("mail.api_base_url", &mail.api_base_url)?;
            validate_range("mail.timeout_seconds", mail.timeout_seconds, 1, 120)?;
        }

        if !self.is_mail_configured() {
            if self.delivery.require_delivery {
                tracing::warn!(
                    "⚠️ Mail delivery is not configured; lead submissions will be refused with 500"
                );
            } else {
                tracing::warn!("⚠️ Mail delivery is not configured; leads will not be forwarded");
            }
        }

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }
}
