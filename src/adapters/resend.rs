use crate::domain::model::{EmailMessage, SendReceipt};
use crate::domain::ports::Mailer;
use crate::utils::error::{LeadError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "https://api.resend.com";

/// [`Mailer`] backed by the Resend `POST /emails` endpoint.
#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
    reply_to: &'a str,
}

#[derive(Deserialize)]
struct SendEmailResponse {
    id: Option<String>,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
    name: Option<String>,
}

impl ResendMailer {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_key, base_url))
    }

    pub fn with_client(client: Client, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/emails", self.base_url)
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: &EmailMessage) -> Result<SendReceipt> {
        let request = SendEmailRequest {
            from: &message.from,
            to: &message.to,
            subject: &message.subject,
            text: &message.text,
            html: &message.html,
            reply_to: &message.reply_to,
        };

        tracing::debug!("Making Resend request to: {}", self.endpoint());
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("Resend response status: {}", status);

        if status.is_success() {
            let body: SendEmailResponse = response.json().await?;
            return Ok(SendReceipt { id: body.id });
        }

        // 錯誤回應不一定是 JSON
        let raw = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ProviderErrorBody>(&raw) {
            Ok(ProviderErrorBody {
                message: Some(message),
                ..
            }) => message,
            Ok(ProviderErrorBody { name: Some(name), .. }) => name,
            _ if !raw.trim().is_empty() => raw.trim().to_string(),
            _ => status.canonical_reason().unwrap_or("unknown error").to_string(),
        };

        tracing::warn!("⚠️ Resend rejected message with {}: {}", status, message);
        Err(LeadError::ProviderRejected {
            status: status.as_u16(),
            message,
        })
    }
}
