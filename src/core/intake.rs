use crate::core::lead::{is_honeypot_triggered, validate_lead, ValidationPolicy};
use crate::core::notify::LeadNotifier;
use crate::domain::model::IntakeOutcome;
use crate::utils::error::{LeadError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryPolicy {
    /// Refuse submissions with 500 when mail is not configured. When false
    /// the lead is accepted and no email is sent.
    pub require_delivery: bool,
    /// Pass the provider's error text to the client instead of a generic code.
    pub expose_provider_errors: bool,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            require_delivery: true,
            expose_provider_errors: false,
        }
    }
}

/// Runs one submission through parse, honeypot, validation and notification.
pub struct LeadIntake {
    validation: ValidationPolicy,
    delivery: DeliveryPolicy,
    notifier: Option<LeadNotifier>,
}

impl LeadIntake {
    pub fn new(
        validation: ValidationPolicy,
        delivery: DeliveryPolicy,
        notifier: Option<LeadNotifier>,
    ) -> Self {
        Self {
            validation,
            delivery,
            notifier,
        }
    }

    pub fn delivery_policy(&self) -> &DeliveryPolicy {
        &self.delivery
    }

    /// Entry point for raw request bodies.
    pub async fn submit(&self, body: &[u8]) -> Result<IntakeOutcome> {
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            tracing::debug!("Rejecting unparseable body: {}", e);
            LeadError::InvalidPayload {
                message: format!("Invalid JSON body: {}", e),
            }
        })?;
        self.submit_value(&value).await
    }

    pub async fn submit_value(&self, value: &Value) -> Result<IntakeOutcome> {
        if !value.is_object() {
            return Err(LeadError::InvalidPayload {
                message: "Expected a JSON object".to_string(),
            });
        }

        if is_honeypot_triggered(value) {
            tracing::warn!("🪤 Honeypot field filled, discarding submission");
            return Ok(IntakeOutcome::Discarded);
        }

        let lead = validate_lead(value, &self.validation).map_err(|errors| {
            tracing::info!("Lead rejected with {} validation error(s)", errors.len());
            LeadError::ValidationFailed { errors }
        })?;

        let Some(notifier) = &self.notifier else {
            if self.delivery.require_delivery {
                tracing::error!("❌ Lead received but mail delivery is not configured");
                return Err(LeadError::MissingConfigError {
                    field: "RESEND_API_KEY, CONTACT_TO_EMAIL, RESEND_FROM".to_string(),
                });
            }
            tracing::warn!("Mail delivery not configured, lead accepted without notification");
            return Ok(IntakeOutcome::Skipped);
        };

        let receipt = notifier.notify(&lead).await?;
        Ok(IntakeOutcome::Delivered(receipt))
    }
}
